use std::fmt;

use crate::bindings::Bindings;
use crate::cli::Cli;
use crate::error::ParseError;

/// What an [`crate::Action::Invoke`] callback wants the scanner to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Keep scanning the remaining tokens.
    Continue,
    /// Stop parsing successfully, surfacing `text` to the caller.
    ///
    /// This is the `--help` path: the only way parsing ends early with a
    /// success status.
    Halt(String),
}

/// Arbitrary logic attached to an option.
pub type Callback = Box<dyn Fn(&Cli, &mut Bindings<'_>) -> Result<Flow, ParseError>>;

/// The effect a matched option has on the bindings.
pub enum Action {
    /// Assign a fixed value to `target`; consumes no argument.
    SetConst { target: String, value: String },
    /// Consume the inline or following token as the value for `target`.
    /// A later occurrence overrides an earlier one.
    ReadValue { target: String },
    /// Like `ReadValue` but accumulates an ordered list under `target`.
    AppendValue { target: String },
    /// Run a callback; consumes nothing unless the callback halts parsing.
    Invoke(Callback),
}

impl Action {
    pub fn takes_value(&self) -> bool {
        matches!(self, Self::ReadValue { .. } | Self::AppendValue { .. })
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetConst { target, value } => f
                .debug_struct("SetConst")
                .field("target", target)
                .field("value", value)
                .finish(),
            Self::ReadValue { target } => {
                f.debug_struct("ReadValue").field("target", target).finish()
            }
            Self::AppendValue { target } => f
                .debug_struct("AppendValue")
                .field("target", target)
                .finish(),
            Self::Invoke(_) => f.write_str("Invoke(..)"),
        }
    }
}

/// One accepted option: canonical name, invocation aliases, description, and
/// the action performed when it matches.
///
/// Aliases are stored without dashes; a one-character alias is a short form
/// (`-x`), anything longer a long form (`--xxx`). An empty `help` string
/// hides the option from the usage table while keeping it matchable.
#[derive(Debug)]
pub struct OptSpec {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) help: String,
    pub(crate) action: Action,
}

impl OptSpec {
    /// A flag that assigns a fixed value (target defaults to the name).
    pub fn constant(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            action: Action::SetConst {
                target: name.clone(),
                value: value.into(),
            },
            name,
            aliases: Vec::new(),
            help: String::new(),
        }
    }

    /// A value-taking option; the last occurrence wins.
    pub fn value(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            action: Action::ReadValue {
                target: name.clone(),
            },
            name,
            aliases: Vec::new(),
            help: String::new(),
        }
    }

    /// A value-taking option that accumulates every occurrence.
    pub fn append(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            action: Action::AppendValue {
                target: name.clone(),
            },
            name,
            aliases: Vec::new(),
            help: String::new(),
        }
    }

    /// An option that runs a callback when matched.
    pub fn invoke(
        name: impl Into<String>,
        callback: impl Fn(&Cli, &mut Bindings<'_>) -> Result<Flow, ParseError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            help: String::new(),
            action: Action::Invoke(Box::new(callback)),
        }
    }

    /// Add an invocation alias (without dashes).
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the description shown in the usage table.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = text.into();
        self
    }

    /// Redirect a value-carrying action at a different binding target.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        let target = target.into();
        match &mut self.action {
            Action::SetConst { target: t, .. }
            | Action::ReadValue { target: t }
            | Action::AppendValue { target: t } => *t = target,
            Action::Invoke(_) => {}
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn takes_value(&self) -> bool {
        self.action.takes_value()
    }

    /// Whether the option appears in the rendered usage table.
    pub fn visible(&self) -> bool {
        !self.help.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_value_follows_action_kind() {
        assert!(!OptSpec::constant("verbose", "1").takes_value());
        assert!(OptSpec::value("output").takes_value());
        assert!(OptSpec::append("include").takes_value());
        assert!(!OptSpec::invoke("help", |_, _| Ok(Flow::Continue)).takes_value());
    }

    #[test]
    fn target_redirects_value_actions() {
        let spec = OptSpec::constant("no-color", "never").target("color");
        match spec.action {
            Action::SetConst { ref target, ref value } => {
                assert_eq!(target, "color");
                assert_eq!(value, "never");
            }
            ref other => panic!("expected SetConst, got {other:?}"),
        }
    }

    #[test]
    fn help_controls_visibility() {
        assert!(!OptSpec::constant("debug", "1").alias("debug").visible());
        assert!(
            OptSpec::constant("debug", "1")
                .alias("debug")
                .help("Debug output")
                .visible()
        );
    }
}
