use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const RESPONSE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// `format_error`, `constraint_error`, `state_error`, `storage_error` or `internal`.
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

/// What a single command line produced, as printed by `--json`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CommandResponse {
    pub schema_version: u32,
    pub action: String,
    pub status: CommandStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    #[serde(default)]
    pub data: Value,
}

impl CommandResponse {
    pub fn ok(action: impl Into<String>, message: impl Into<String>, data: Value) -> Self {
        Self {
            schema_version: RESPONSE_SCHEMA_VERSION,
            action: action.into(),
            status: CommandStatus::Ok,
            message: Some(message.into()),
            error: None,
            data,
        }
    }

    pub fn error(action: impl Into<String>, error: ErrorEnvelope) -> Self {
        Self {
            schema_version: RESPONSE_SCHEMA_VERSION,
            action: action.into(),
            status: CommandStatus::Error,
            message: Some(error.message.clone()),
            error: Some(error),
            data: Value::Null,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
