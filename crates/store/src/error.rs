use std::path::PathBuf;

use contact_model::ModelError;
use contact_query::{ErrorKind, QueryError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Data file {} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("This tag already exists in the allowed list.")]
    DuplicateTag(String),

    #[error("Tag '{0}' is not in the allowed list.")]
    MissingTag(String),

    #[error("This person already exists in the address book")]
    DuplicateContact(String),

    #[error("This meeting already exists for this person")]
    DuplicateMeeting,

    #[error("The person index provided is invalid")]
    InvalidIndex(usize),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Malformed {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Io { .. } | StoreError::Malformed { .. } | StoreError::Serialization(_) => {
                ErrorKind::Storage
            }
            StoreError::DuplicateTag(_)
            | StoreError::MissingTag(_)
            | StoreError::DuplicateContact(_)
            | StoreError::DuplicateMeeting => ErrorKind::State,
            StoreError::InvalidIndex(_) | StoreError::Model(_) => ErrorKind::Constraint,
            StoreError::Query(err) => err.kind(),
        }
    }
}
