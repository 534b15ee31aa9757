use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("{}", crate::TAG_CONSTRAINTS)]
    InvalidTagFormat(String),

    #[error("Tag '{0}' is not in the allowed tag list")]
    TagNotAllowed(String),

    #[error("{message}")]
    InvalidField {
        field: &'static str,
        message: &'static str,
    },

    #[error("Meeting end time must differ from start time")]
    MeetingTimesEqual,
}

impl ModelError {
    pub(crate) const fn invalid_field(field: &'static str, message: &'static str) -> Self {
        Self::InvalidField { field, message }
    }
}
