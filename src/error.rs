use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by custom parsers and [`Decode`](crate::Decode) types.
pub type DecodeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure while resolving a default-value expression.
#[derive(Debug, Error)]
pub enum ExprError {
    #[error("Malformed expression '{expr}': '$' must be followed by a name or '$'")]
    Malformed { expr: String },

    #[error("Cannot evaluate '{expr}': {reason}")]
    Evaluation { expr: String, reason: String },
}

/// Failure while converting a raw string into a field's declared kind.
#[derive(Debug, Error)]
pub enum CoerceError {
    #[error("`{raw}` couldn't convert to {expected} value")]
    TypeMismatch { raw: String, expected: String },

    #[error("`{raw}` overflows {expected}")]
    ValueOverflow { raw: String, expected: String },

    #[error("Unsupported type {kind} as sub field")]
    UnsupportedNesting { kind: String },

    #[error("Empty key=value pair")]
    EmptyPair,

    #[error("Unsupported type: {type_name}")]
    UnsupportedType { type_name: String },

    #[error("Cannot decode `{raw}`: {source}")]
    Decode { raw: String, source: DecodeError },
}

/// Caller-facing error for binding, applying, prompting and finishing a
/// [`FieldSet`](crate::FieldSet).
#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum BindError {
    #[error("Invalid default for {flag}: {source}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(flagbind::expression),
            help("defaults may use $NAME for environment variables and $$ for a literal '$'")
        )
    )]
    Expression { flag: String, source: ExprError },

    #[error("Invalid value for {flag}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagbind::coerce)))]
    Coerce { flag: String, source: CoerceError },

    #[error("Failed to read {flag} from prompt: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagbind::prompt)))]
    Prompt {
        flag: String,
        source: std::io::Error,
    },

    #[error("Flag name '{name}' is bound more than once")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(flagbind::duplicate_name),
            help("every short and long name must be unique within one field set")
        )
    )]
    DuplicateName { name: String },

    #[error("Unknown flag '{name}'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagbind::unknown_flag)))]
    UnknownFlag { name: String },

    #[error("Required flags missing: {}", names.join(", "))]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagbind::missing_required)))]
    MissingRequired { names: Vec<String> },
}

impl BindError {
    /// The flag name the error refers to, when it refers to a single flag.
    pub fn flag(&self) -> Option<&str> {
        match self {
            BindError::Expression { flag, .. }
            | BindError::Coerce { flag, .. }
            | BindError::Prompt { flag, .. } => Some(flag),
            BindError::DuplicateName { name } | BindError::UnknownFlag { name } => Some(name),
            BindError::MissingRequired { .. } => None,
        }
    }
}

/// Failure while loading [`Settings`](crate::Settings).
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] confique::Error),
}
