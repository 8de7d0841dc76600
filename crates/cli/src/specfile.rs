use anyhow::{Context, Result, bail};
use optsh_engine::{Cli, OptSpec, Preset};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// JSON declaration of a script's command line.
///
/// This is what a script author writes once; `optsh` turns it into an engine
/// [`Cli`] per invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    /// Preset bundles registered before the declared options
    /// (`help`, `verbose`, `quiet`, `color`, `no-color`, `trace`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positionals: Vec<SlotEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<RestEntry>,

    /// Stop option scanning at the first positional token.
    #[serde(default)]
    pub break_on_first_positional: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionEntry {
    pub name: String,

    /// Invocation aliases without dashes; defaults to the name itself.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,

    #[serde(default)]
    pub action: ActionKind,

    /// Constant assigned by a `set` action (default `"1"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Binding target when it differs from the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl OptionEntry {
    /// The binding target this entry writes to.
    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Flag: assign a constant.
    #[default]
    Set,
    /// Value-taking option; the last occurrence wins.
    Value,
    /// Value-taking option accumulating a list.
    Append,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotEntry {
    pub name: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestEntry {
    pub name: String,
    #[serde(default)]
    pub min: usize,
}

pub fn load(path: &Path) -> Result<SpecFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read spec file: {}", path.display()))?;
    let spec: SpecFile = serde_json::from_str(&text)
        .with_context(|| format!("invalid spec file: {}", path.display()))?;
    Ok(spec)
}

fn preset_from_name(name: &str) -> Option<Preset> {
    match name {
        "help" => Some(Preset::Help),
        "verbose" => Some(Preset::Verbose),
        "quiet" => Some(Preset::Quiet),
        "color" => Some(Preset::Color),
        "no-color" => Some(Preset::NoColor),
        "trace" => Some(Preset::Trace),
        _ => None,
    }
}

/// The binding target a preset writes to, if any.
pub fn preset_target(name: &str) -> Option<&'static str> {
    match name {
        "verbose" => Some("verbose"),
        "quiet" => Some("quiet"),
        "color" | "no-color" => Some("color"),
        "trace" => Some("trace"),
        _ => None,
    }
}

/// Build an engine [`Cli`] from a loaded spec file.
///
/// Schema mistakes in the file (duplicate aliases, misordered slots, unknown
/// presets) surface here, before any of the script's arguments are looked at.
pub fn build_cli(file: &SpecFile, program_override: Option<&str>) -> Result<Cli> {
    let program = program_override
        .or(file.program.as_deref())
        .unwrap_or("prog");
    let mut cli = Cli::new(program);

    let mut presets = Vec::with_capacity(file.presets.len());
    for name in &file.presets {
        match preset_from_name(name) {
            Some(preset) => presets.push(preset),
            None => bail!("unknown preset '{name}' in spec file"),
        }
    }
    cli.reset(&presets)
        .context("invalid preset bundle in spec file")?;

    for entry in &file.options {
        let mut spec = match entry.action {
            ActionKind::Set => OptSpec::constant(
                entry.name.as_str(),
                entry.value.as_deref().unwrap_or("1"),
            ),
            ActionKind::Value => OptSpec::value(entry.name.as_str()),
            ActionKind::Append => OptSpec::append(entry.name.as_str()),
        };
        if let Some(target) = &entry.target {
            spec = spec.target(target.as_str());
        }
        if entry.aliases.is_empty() {
            spec = spec.alias(entry.name.as_str());
        }
        for alias in &entry.aliases {
            spec = spec.alias(alias.as_str());
        }
        spec = spec.help(entry.help.as_str());
        cli.register(spec)
            .with_context(|| format!("invalid option '{}' in spec file", entry.name))?;
    }

    for slot in &file.positionals {
        let declared = if slot.required {
            cli.positional(slot.name.as_str())
        } else {
            cli.positional_opt(slot.name.as_str())
        };
        declared.with_context(|| format!("invalid positional slot '{}' in spec file", slot.name))?;
    }
    if let Some(rest) = &file.rest {
        cli.rest(rest.name.as_str(), rest.min)
            .with_context(|| format!("invalid rest slot '{}' in spec file", rest.name))?;
    }
    if file.break_on_first_positional {
        cli.break_on_first_positional(true);
    }

    Ok(cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use optsh_engine::ParseOutcome;

    const SAMPLE: &str = r#"{
        "program": "frobnicate",
        "presets": ["help", "verbose"],
        "options": [
            { "name": "output", "aliases": ["o", "output"], "help": "Output file", "action": "value" },
            { "name": "include", "aliases": ["I"], "help": "Include path", "action": "append" },
            { "name": "force", "help": "Overwrite" }
        ],
        "positionals": [
            { "name": "input", "required": true },
            { "name": "mode" }
        ],
        "rest": { "name": "extras", "min": 0 }
    }"#;

    #[test]
    fn deserializes_and_builds_a_working_cli() {
        let file: SpecFile = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(file.program.as_deref(), Some("frobnicate"));
        assert_eq!(file.options[2].action, ActionKind::Set);

        let cli = build_cli(&file, None).unwrap();
        let argv: Vec<String> = ["-v", "--output=out.txt", "--force", "in.txt", "strict", "a", "b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ParseOutcome::Bindings(b) = cli.parse(&argv).unwrap() else {
            panic!("expected bindings");
        };
        assert_eq!(b.get("verbose"), Some("1"));
        assert_eq!(b.get("output"), Some("out.txt"));
        assert_eq!(b.get("force"), Some("1"));
        assert_eq!(b.get("input"), Some("in.txt"));
        assert_eq!(b.get("mode"), Some("strict"));
        assert_eq!(b.rest(), &["a", "b"]);
    }

    #[test]
    fn program_override_wins_over_the_file() {
        let file: SpecFile = serde_json::from_str(SAMPLE).unwrap();
        let cli = build_cli(&file, Some("renamed")).unwrap();
        assert!(cli.render_usage().starts_with("Usage: renamed "));
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let file = SpecFile {
            presets: vec!["metrics".to_string()],
            ..Default::default()
        };
        let err = build_cli(&file, None).unwrap_err();
        assert!(err.to_string().contains("unknown preset 'metrics'"));
    }

    #[test]
    fn duplicate_alias_in_file_is_a_config_error() {
        let file = SpecFile {
            options: vec![
                OptionEntry {
                    name: "alpha".to_string(),
                    aliases: vec!["a".to_string()],
                    ..Default::default()
                },
                OptionEntry {
                    name: "all".to_string(),
                    aliases: vec!["a".to_string()],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let err = build_cli(&file, None).unwrap_err();
        assert!(err.to_string().contains("invalid option 'all'"));
    }
}
