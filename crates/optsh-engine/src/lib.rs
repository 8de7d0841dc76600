//! Declarative option/argument parsing and help rendering.
//!
//! A program declares its accepted options and positional slots as data on a
//! [`Cli`], then a single [`Cli::parse`] call scans the argument vector,
//! dispatches option actions, and binds positionals into a [`Bindings`] map.
//! Supported token forms: `--flag`, `-f`, `--opt=value`, combined short
//! clusters (`-abc`, `-xVALUE`), and `--` end-of-options.
//!
//! Two failure classes are kept apart: [`ConfigError`] (a bug in the declared
//! schema, surfaced at registration time) and [`ParseError`] (bad user input,
//! reported with the offending token so the caller can print usage and exit).

mod bindings;
mod cli;
mod descriptor;
mod error;
mod positional;
mod registry;
mod scanner;
mod usage;

pub use bindings::Bindings;
pub use cli::{Cli, ParseOutcome};
pub use descriptor::{Action, Callback, Flow, OptSpec};
pub use error::{ConfigError, ParseError};
pub use positional::{PositionalSpec, RestSlot, Slot};
pub use registry::{Preset, Registry};
