use thiserror::Error;

/// Programmer mistakes in the declared option/positional schema.
///
/// These are detected eagerly at registration time and indicate a bug in the
/// calling program, not bad user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("option '{name}' declares no aliases")]
    NoAliases { name: String },

    #[error("option '{name}' declares an empty alias")]
    EmptyAlias { name: String },

    #[error("alias '{alias}' is claimed by both '{existing}' and '{name}'")]
    DuplicateAlias {
        alias: String,
        existing: String,
        name: String,
    },

    #[error("option '{name}' is registered twice")]
    DuplicateName { name: String },

    #[error("required positional slot '{slot}' declared after an optional slot")]
    RequiredAfterOptional { slot: String },

    #[error("positional slot '{slot}' is declared twice")]
    DuplicateSlot { slot: String },

    #[error("positional slot '{slot}' declared after the rest slot")]
    SlotAfterRest { slot: String },

    #[error("rest slot '{slot}' conflicts with an earlier rest declaration")]
    RestAlreadyDeclared { slot: String },
}

/// Bad user input found while scanning or binding an argument vector.
///
/// These are recoverable from the engine's point of view: the caller decides
/// whether to print usage and exit. Every variant names the offending token,
/// option, or slot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown option: {token}")]
    UnknownOption { token: String },

    #[error("missing value for option {option}")]
    MissingValue { option: String },

    #[error("option {option} does not take a value")]
    UnexpectedValue { option: String },

    #[error("expects {missing} more argument(s)")]
    MissingPositionals { missing: usize },

    #[error("unexpected argument: {token}")]
    UnexpectedPositional { token: String },

    #[error("'{slot}...' expects at least {min} argument(s), got {got}")]
    RestTooFew { slot: String, min: usize, got: usize },

    #[error("{0}")]
    Callback(String),
}
