mod specfile;

use std::collections::HashSet;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use optsh_engine::{Bindings, Cli, OptSpec, ParseOutcome, Preset};
use tracing_subscriber::{EnvFilter, fmt};

use crate::specfile::{ActionKind, SpecFile};

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("optsh: error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let own = own_cli()?;

    let bindings = match own.parse(&argv) {
        Ok(ParseOutcome::Halted(text)) => {
            print!("{text}");
            return Ok(ExitCode::SUCCESS);
        }
        Ok(ParseOutcome::Bindings(b)) => b,
        Err(err) => {
            eprintln!("optsh: {err}");
            eprint!("{}", own.render_usage());
            return Ok(ExitCode::from(2));
        }
    };

    let Some(spec_path) = bindings.get("spec") else {
        eprintln!("optsh: missing required option --spec");
        eprint!("{}", own.render_usage());
        return Ok(ExitCode::from(2));
    };

    tracing::debug!(path = spec_path, "loading spec file");
    let file = specfile::load(Path::new(spec_path))?;
    let target = specfile::build_cli(&file, bindings.get("program"))?;

    let script_args: Vec<String> = bindings.rest().iter().map(|s| s.to_string()).collect();
    match target.parse(&script_args) {
        Ok(ParseOutcome::Halted(text)) => {
            print!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(ParseOutcome::Bindings(b)) => {
            print!("{}", emit(&file, &b));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}: {err}", target.program());
            eprint!("{}", target.render_usage());
            Ok(ExitCode::from(2))
        }
    }
}

/// optsh's own command line, parsed with the engine it ships.
fn own_cli() -> Result<Cli> {
    let mut cli = Cli::with_presets("optsh", &[Preset::Help, Preset::Verbose])?;
    cli.register(
        OptSpec::value("spec")
            .alias("s")
            .alias("spec")
            .help("Path to the option-spec JSON file"),
    )?;
    cli.register(
        OptSpec::value("program")
            .alias("p")
            .alias("program")
            .help("Program name shown in usage (overrides the spec file)"),
    )?;
    cli.rest("args", 0)?;
    Ok(cli)
}

/// Render bindings as shell-evaluable assignments.
///
/// Scalar targets become `name='value'` (unset ones are skipped so the
/// script's own defaults survive), append targets become `name_count=N` plus
/// `name_1=..` lines, and a declared rest slot becomes a trailing
/// `set -- ...` so the script can replace its positional parameters.
fn emit(file: &SpecFile, bindings: &Bindings<'_>) -> String {
    let mut out = String::new();
    let mut emitted: HashSet<String> = HashSet::new();

    for preset in &file.presets {
        if let Some(target) = specfile::preset_target(preset) {
            emit_scalar(&mut out, &mut emitted, target, bindings);
        }
    }

    for entry in &file.options {
        let target = entry.target();
        if entry.action == ActionKind::Append {
            if !emitted.insert(target.to_string()) {
                continue;
            }
            let var = shell_var(target);
            let values = bindings.get_all(target).unwrap_or(&[]);
            out.push_str(&format!("{var}_count={}\n", values.len()));
            for (i, value) in values.iter().enumerate() {
                out.push_str(&format!("{var}_{}={}\n", i + 1, shell_quote(value)));
            }
        } else {
            emit_scalar(&mut out, &mut emitted, target, bindings);
        }
    }

    for slot in &file.positionals {
        emit_scalar(&mut out, &mut emitted, &slot.name, bindings);
    }

    if file.rest.is_some() {
        out.push_str("set --");
        for token in bindings.rest() {
            out.push(' ');
            out.push_str(&shell_quote(token));
        }
        out.push('\n');
    }

    out
}

fn emit_scalar(
    out: &mut String,
    emitted: &mut HashSet<String>,
    target: &str,
    bindings: &Bindings<'_>,
) {
    if !emitted.insert(target.to_string()) {
        return;
    }
    if let Some(value) = bindings.get(target) {
        out.push_str(&format!("{}={}\n", shell_var(target), shell_quote(value)));
    }
}

/// Targets may use kebab-case; shell variables cannot.
fn shell_var(target: &str) -> String {
    target.replace('-', "_")
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // stdout is eval'ed by the calling script, so logs go to stderr.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
