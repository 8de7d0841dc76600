use std::borrow::Cow;

use tracing::{debug, trace};

use crate::bindings::Bindings;
use crate::descriptor::{Action, Flow, OptSpec};
use crate::error::{ConfigError, ParseError};
use crate::positional::PositionalSpec;
use crate::registry::{Preset, Registry};
use crate::scanner::{self, Token};
use crate::usage;

/// How a completed `parse` call ended.
#[derive(Debug, Clone)]
pub enum ParseOutcome<'a> {
    /// All tokens scanned and bound.
    Bindings(Bindings<'a>),
    /// An `Invoke` callback halted parsing successfully (e.g. `--help`);
    /// the caller is expected to print the text and exit with status 0.
    Halted(String),
}

enum Dispatch {
    Continue { consumed_next: bool },
    Halt(String),
}

/// A declared command line: option registry plus positional slots.
///
/// Built fresh per invocation, used by exactly one [`Cli::parse`] call.
#[derive(Debug, Default)]
pub struct Cli {
    program: String,
    registry: Registry,
    positionals: PositionalSpec,
}

impl Cli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            registry: Registry::new(),
            positionals: PositionalSpec::new(),
        }
    }

    /// Shorthand for [`Cli::new`] followed by [`Cli::reset`].
    pub fn with_presets(
        program: impl Into<String>,
        presets: &[Preset],
    ) -> Result<Self, ConfigError> {
        let mut cli = Self::new(program);
        cli.reset(presets)?;
        Ok(cli)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Register one option descriptor; see [`Registry::register`].
    pub fn register(&mut self, spec: OptSpec) -> Result<(), ConfigError> {
        self.registry.register(spec)
    }

    /// Clear the registry and re-seed it with a preset bundle.
    pub fn reset(&mut self, presets: &[Preset]) -> Result<(), ConfigError> {
        self.registry.reset(presets)
    }

    /// Declare a required positional slot.
    pub fn positional(&mut self, name: impl Into<String>) -> Result<(), ConfigError> {
        self.positionals.required(name)
    }

    /// Declare an optional positional slot.
    pub fn positional_opt(&mut self, name: impl Into<String>) -> Result<(), ConfigError> {
        self.positionals.optional(name)
    }

    /// Declare the trailing rest collector with a minimum length.
    pub fn rest(&mut self, name: impl Into<String>, min: usize) -> Result<(), ConfigError> {
        self.positionals.rest(name, min)
    }

    /// Stop option scanning at the first free token.
    pub fn break_on_first_positional(&mut self, on: bool) {
        self.registry.break_on_first_positional(on);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn positionals(&self) -> &PositionalSpec {
        &self.positionals
    }

    /// Render the synopsis and option table.
    ///
    /// Pure; callable at any time, including after a failed parse.
    pub fn render_usage(&self) -> String {
        usage::render(&self.program, &self.registry, &self.positionals)
    }

    /// Scan `argv` (program name excluded), dispatch options, and bind
    /// positionals. Errors are returned at the first offending token.
    pub fn parse<'a>(&self, argv: &'a [String]) -> Result<ParseOutcome<'a>, ParseError> {
        let mut bindings = Bindings::default();
        let mut buffer: Vec<&'a str> = Vec::new();

        let mut i = 0usize;
        while i < argv.len() {
            let arg = argv[i].as_str();
            match scanner::classify(arg) {
                Token::Separator => {
                    trace!("end of options, buffering tail verbatim");
                    buffer.extend(argv[i + 1..].iter().map(String::as_str));
                    i = argv.len();
                }
                Token::Long { name, inline } => {
                    let display_name = format!("--{name}");
                    let Some(spec) = self.registry.lookup_long(name) else {
                        return Err(ParseError::UnknownOption { token: display_name });
                    };
                    trace!(option = %display_name, "matched long option");
                    let next = argv.get(i + 1).map(String::as_str);
                    match self.dispatch(spec, &display_name, inline, next, &mut bindings)? {
                        Dispatch::Continue { consumed_next } => {
                            i += if consumed_next { 2 } else { 1 };
                        }
                        Dispatch::Halt(text) => return Ok(ParseOutcome::Halted(text)),
                    }
                }
                Token::Cluster(body) => {
                    let mut step = 1usize;
                    for (pos, c) in body.char_indices() {
                        let display_name = format!("-{c}");
                        let Some(spec) = self.registry.lookup_short(c) else {
                            return Err(ParseError::UnknownOption { token: display_name });
                        };
                        trace!(option = %display_name, "matched short option");
                        if spec.takes_value() {
                            // The cluster remainder is the inline value; it
                            // always wins over the next token.
                            let tail = &body[pos + c.len_utf8()..];
                            let inline = (!tail.is_empty()).then_some(tail);
                            let next = argv.get(i + 1).map(String::as_str);
                            match self.dispatch(spec, &display_name, inline, next, &mut bindings)? {
                                Dispatch::Continue { consumed_next } => {
                                    if consumed_next {
                                        step = 2;
                                    }
                                }
                                Dispatch::Halt(text) => return Ok(ParseOutcome::Halted(text)),
                            }
                            break;
                        }
                        match self.dispatch(spec, &display_name, None, None, &mut bindings)? {
                            Dispatch::Continue { .. } => {}
                            Dispatch::Halt(text) => return Ok(ParseOutcome::Halted(text)),
                        }
                    }
                    i += step;
                }
                Token::Free => {
                    if self.registry.breaks_on_first_positional() {
                        trace!(token = arg, "first positional token, stopping option scan");
                        buffer.extend(argv[i..].iter().map(String::as_str));
                        i = argv.len();
                    } else {
                        trace!(token = arg, "free token");
                        buffer.push(arg);
                        i += 1;
                    }
                }
            }
        }

        self.positionals.bind(buffer, &mut bindings)?;
        Ok(ParseOutcome::Bindings(bindings))
    }

    fn dispatch<'a>(
        &self,
        spec: &OptSpec,
        display_name: &str,
        inline: Option<&'a str>,
        next: Option<&'a str>,
        bindings: &mut Bindings<'a>,
    ) -> Result<Dispatch, ParseError> {
        match &spec.action {
            Action::SetConst { target, value } => {
                if inline.is_some() {
                    return Err(ParseError::UnexpectedValue {
                        option: display_name.to_string(),
                    });
                }
                debug!(option = %display_name, target = %target, value = %value, "set constant");
                bindings.push_value(target, Cow::Owned(value.clone()));
                Ok(Dispatch::Continue {
                    consumed_next: false,
                })
            }
            Action::ReadValue { target } | Action::AppendValue { target } => {
                let (value, consumed_next): (Cow<'a, str>, bool) = match inline {
                    Some(v) => (Cow::Borrowed(v), false),
                    None => match next {
                        Some(n) => (Cow::Borrowed(n), true),
                        None => {
                            return Err(ParseError::MissingValue {
                                option: display_name.to_string(),
                            });
                        }
                    },
                };
                debug!(option = %display_name, target = %target, value = %value, "bound value");
                bindings.push_value(target, value);
                Ok(Dispatch::Continue { consumed_next })
            }
            Action::Invoke(callback) => {
                if inline.is_some() {
                    return Err(ParseError::UnexpectedValue {
                        option: display_name.to_string(),
                    });
                }
                debug!(option = %display_name, "invoking callback");
                match callback(self, bindings)? {
                    Flow::Continue => Ok(Dispatch::Continue {
                        consumed_next: false,
                    }),
                    Flow::Halt(text) => Ok(Dispatch::Halt(text)),
                }
            }
        }
    }
}
