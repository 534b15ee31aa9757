use contact_model::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

/// Coarse classification shared by every command error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or incomplete command syntax.
    Format,
    /// Well-formed value that is semantically invalid.
    Constraint,
    /// The operation would break a registry or collection invariant.
    State,
    /// The data file could not be read or written.
    Storage,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Format => "format_error",
            ErrorKind::Constraint => "constraint_error",
            ErrorKind::State => "state_error",
            ErrorKind::Storage => "storage_error",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid command format!\n{usage}")]
    InvalidFormat { usage: &'static str },

    #[error("{}", contact_model::TAG_CONSTRAINTS)]
    InvalidTagFormat(String),

    #[error(
        "Cannot filter by invalid tag(s): {}. Allowed tags: {}",
        .invalid.join(", "),
        .allowed.join(", ")
    )]
    UnknownTags {
        invalid: Vec<String>,
        allowed: Vec<String>,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl QueryError {
    pub const fn format(usage: &'static str) -> Self {
        Self::InvalidFormat { usage }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            QueryError::InvalidFormat { .. } => ErrorKind::Format,
            QueryError::InvalidTagFormat(_)
            | QueryError::UnknownTags { .. }
            | QueryError::Model(_) => ErrorKind::Constraint,
        }
    }
}
