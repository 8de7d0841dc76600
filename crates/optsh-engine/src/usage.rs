//! Usage-text rendering.
//!
//! Pure: walks the registry and positional spec and produces a string, so it
//! can be called at any point, including while reporting a parse error.

use crate::positional::PositionalSpec;
use crate::registry::Registry;

pub(crate) fn render(program: &str, registry: &Registry, positionals: &PositionalSpec) -> String {
    let mut out = String::new();

    out.push_str("Usage: ");
    out.push_str(program);
    if !registry.is_empty() {
        out.push_str(" [options]");
    }
    for slot in positionals.slots() {
        if slot.required() {
            out.push_str(&format!(" <{}>", slot.name()));
        } else {
            out.push_str(&format!(" [{}]", slot.name()));
        }
    }
    if let Some(rest) = positionals.rest_slot() {
        out.push_str(&format!(" [-- {}...]", rest.name()));
    }
    out.push('\n');

    // One row per visible option, sorted by canonical name for determinism.
    let mut rows: Vec<(&str, String, &str)> = registry
        .specs()
        .iter()
        .filter(|s| s.visible())
        .map(|s| (s.name(), format_aliases(s.aliases()), s.help.as_str()))
        .collect();
    rows.sort_by_key(|(name, _, _)| *name);

    if !rows.is_empty() {
        out.push_str("\nOptions:\n");
        let width = rows.iter().map(|(_, left, _)| left.len()).max().unwrap_or(0);
        for (_, left, help) in rows {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }

    out
}

fn format_aliases(aliases: &[String]) -> String {
    let parts: Vec<String> = aliases
        .iter()
        .map(|a| {
            if a.chars().count() == 1 {
                format!("-{a}")
            } else {
                format!("--{a}")
            }
        })
        .collect();
    parts.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::OptSpec;
    use crate::registry::Preset;

    fn sample_registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(OptSpec::value("output").alias("o").alias("output").help("Output file"))
            .unwrap();
        registry
            .register(OptSpec::constant("verbose", "1").alias("v").alias("verbose").help("Verbose output"))
            .unwrap();
        registry
            .register(OptSpec::constant("debug", "1").alias("debug"))
            .unwrap();
        registry
    }

    #[test]
    fn synopsis_lists_slots_and_rest() {
        let mut positionals = PositionalSpec::new();
        positionals.required("source").unwrap();
        positionals.optional("dest").unwrap();
        positionals.rest("files", 0).unwrap();

        let text = render("cp-ish", &sample_registry(), &positionals);
        assert!(text.starts_with("Usage: cp-ish [options] <source> [dest] [-- files...]\n"));
    }

    #[test]
    fn synopsis_omits_options_when_registry_is_empty() {
        let text = render("bare", &Registry::new(), &PositionalSpec::new());
        assert_eq!(text, "Usage: bare\n");
    }

    #[test]
    fn table_is_sorted_aligned_and_skips_hidden_options() {
        let text = render("tool", &sample_registry(), &PositionalSpec::new());
        // "debug" has no description: matchable but not rendered.
        assert!(!text.contains("--debug"));
        let output_row = text.lines().position(|l| l.contains("-o|--output"));
        let verbose_row = text.lines().position(|l| l.contains("-v|--verbose"));
        assert!(output_row.unwrap() < verbose_row.unwrap());
        assert!(text.contains("-o|--output   Output file"));
        assert!(text.contains("-v|--verbose  Verbose output"));
    }

    #[test]
    fn rendering_is_idempotent_across_fresh_registries() {
        let positionals = PositionalSpec::new();
        let first = render("tool", &sample_registry(), &positionals);
        let second = render("tool", &sample_registry(), &positionals);
        assert_eq!(first, second);
    }

    #[test]
    fn preset_bundle_renders_deterministically() {
        let mut registry = Registry::new();
        registry
            .reset(&[Preset::Help, Preset::Verbose, Preset::Quiet])
            .unwrap();
        let text = render("tool", &registry, &PositionalSpec::new());
        assert!(text.contains("-h|--help"));
        assert!(text.contains("-q|--quiet"));
        assert!(text.contains("-v|--verbose"));
    }
}
