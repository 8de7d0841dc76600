use std::collections::HashMap;

use crate::descriptor::{Flow, OptSpec};
use crate::error::ConfigError;

/// Bundles of commonly re-registered options, for [`Registry::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// `-h|--help`: render usage and halt parsing successfully.
    Help,
    /// `-v|--verbose`: bind `verbose=1`.
    Verbose,
    /// `-q|--quiet`: bind `quiet=1`.
    Quiet,
    /// `--color`: bind `color=always`.
    Color,
    /// `--no-color`: bind `color=never`.
    NoColor,
    /// `--trace`: bind `trace=1`.
    Trace,
}

impl Preset {
    pub(crate) fn spec(self) -> OptSpec {
        match self {
            Self::Help => OptSpec::invoke("help", |cli, _bindings| {
                Ok(Flow::Halt(cli.render_usage()))
            })
            .alias("h")
            .alias("help")
            .help("Show usage and exit"),
            Self::Verbose => OptSpec::constant("verbose", "1")
                .alias("v")
                .alias("verbose")
                .help("Enable verbose output"),
            Self::Quiet => OptSpec::constant("quiet", "1")
                .alias("q")
                .alias("quiet")
                .help("Suppress informational output"),
            Self::Color => OptSpec::constant("color", "always")
                .alias("color")
                .help("Force colored output"),
            Self::NoColor => OptSpec::constant("no-color", "never")
                .target("color")
                .alias("no-color")
                .help("Disable colored output"),
            Self::Trace => OptSpec::constant("trace", "1")
                .alias("trace")
                .help("Enable trace output"),
        }
    }
}

/// Ordered collection of option descriptors plus the scan policy.
///
/// Registration builds the alias index up front; the scan loop only ever
/// performs O(1) lookups against it.
#[derive(Debug, Default)]
pub struct Registry {
    specs: Vec<OptSpec>,
    by_alias: HashMap<String, usize>,
    break_on_first_positional: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one option descriptor.
    ///
    /// Fails on a descriptor with no aliases, an empty alias, an alias
    /// already claimed by another descriptor, or a reused canonical name.
    /// All of these are configuration errors surfaced before any parsing.
    pub fn register(&mut self, spec: OptSpec) -> Result<(), ConfigError> {
        if spec.aliases.is_empty() {
            return Err(ConfigError::NoAliases {
                name: spec.name.clone(),
            });
        }
        if self.specs.iter().any(|s| s.name == spec.name) {
            return Err(ConfigError::DuplicateName {
                name: spec.name.clone(),
            });
        }
        for alias in &spec.aliases {
            if alias.is_empty() {
                return Err(ConfigError::EmptyAlias {
                    name: spec.name.clone(),
                });
            }
            if let Some(&idx) = self.by_alias.get(alias) {
                return Err(ConfigError::DuplicateAlias {
                    alias: alias.clone(),
                    existing: self.specs[idx].name.clone(),
                    name: spec.name.clone(),
                });
            }
        }
        // Also catch the same alias repeated within one descriptor.
        for (i, alias) in spec.aliases.iter().enumerate() {
            if spec.aliases[..i].contains(alias) {
                return Err(ConfigError::DuplicateAlias {
                    alias: alias.clone(),
                    existing: spec.name.clone(),
                    name: spec.name.clone(),
                });
            }
        }

        let idx = self.specs.len();
        for alias in &spec.aliases {
            self.by_alias.insert(alias.clone(), idx);
        }
        self.specs.push(spec);
        Ok(())
    }

    /// Clear the registry and re-seed it with a preset bundle.
    pub fn reset(&mut self, presets: &[Preset]) -> Result<(), ConfigError> {
        self.specs.clear();
        self.by_alias.clear();
        for preset in presets {
            self.register(preset.spec())?;
        }
        Ok(())
    }

    /// Stop option scanning at the first free token, treating everything
    /// after it (dash-prefixed or not) as positional.
    pub fn break_on_first_positional(&mut self, on: bool) {
        self.break_on_first_positional = on;
    }

    pub(crate) fn breaks_on_first_positional(&self) -> bool {
        self.break_on_first_positional
    }

    pub(crate) fn lookup(&self, alias: &str) -> Option<&OptSpec> {
        self.by_alias.get(alias).map(|&idx| &self.specs[idx])
    }

    /// Resolve a long-form invocation; one-character aliases are short forms
    /// and do not match here.
    pub(crate) fn lookup_long(&self, name: &str) -> Option<&OptSpec> {
        if name.chars().count() < 2 {
            return None;
        }
        self.lookup(name)
    }

    /// Resolve a single short-form character.
    pub(crate) fn lookup_short(&self, c: char) -> Option<&OptSpec> {
        self.lookup(c.encode_utf8(&mut [0u8; 4]))
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Descriptors in registration order.
    pub fn specs(&self) -> &[OptSpec] {
        self.specs.as_slice()
    }
}
