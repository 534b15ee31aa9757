use std::fmt;

use contact_model::ModelError;
use contact_protocol::ErrorEnvelope;
use contact_query::{ErrorKind, QueryError};
use contact_store::StoreError;
use serde_json::json;

pub const ADD_USAGE: &str = "add: Adds a person to the address book.\n\
     Parameters: name=NAME phone=PHONE email=EMAIL address=ADDRESS [company=COMPANY] \
     [nickname=NICKNAME] [tag=TAG]...\n\
     Example: add name=John Doe phone=98765432 email=johnd@example.com \
     address=311, Clementi Ave 2, #02-25 company=Google tag=friend";

pub const TAG_USAGE: &str = "tag: Attaches allowed tags to the person identified by the index \
     number used in the displayed person list.\n\
     Parameters: INDEX (must be a positive integer) tag=TAG [tag=TAG]...\n\
     Example: tag 1 tag=friend tag=client";

pub const DELETE_USAGE: &str = "delete: Deletes the person identified by the index number used \
     in the displayed person list.\n\
     Parameters: INDEX (must be a positive integer)\n\
     Example: delete 1";

pub const MEET_USAGE: &str = "meet: Schedules a meeting with the person identified by the index \
     number used in the displayed person list.\n\
     Parameters: INDEX title=TITLE date=YYYY-MM-DD start=HH:MM end=HH:MM [notes=NOTES]\n\
     Example: meet 1 title=Project sync date=2025-03-14 start=09:00 end=09:30";

pub const ADD_TAG_USAGE: &str = "addtag: Adds a tag to the allowed tag list.\n\
     Parameters: tag=TAG\n\
     Example: addtag tag=friends";

pub const DEL_TAG_USAGE: &str = "deltag: Removes a tag from the allowed tag list. Persons keep \
     tags they already carry.\n\
     Parameters: tag=TAG\n\
     Example: deltag tag=friends";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    Find,
    FilterCompany,
    List,
    Add,
    Tag,
    Delete,
    Meet,
    AddTag,
    DelTag,
    ListTag,
    Exit,
}

impl CommandAction {
    pub const ALL: [CommandAction; 11] = [
        CommandAction::Find,
        CommandAction::FilterCompany,
        CommandAction::List,
        CommandAction::Add,
        CommandAction::Tag,
        CommandAction::Delete,
        CommandAction::Meet,
        CommandAction::AddTag,
        CommandAction::DelTag,
        CommandAction::ListTag,
        CommandAction::Exit,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CommandAction::Find => "find",
            CommandAction::FilterCompany => "filtercompany",
            CommandAction::List => "list",
            CommandAction::Add => "add",
            CommandAction::Tag => "tag",
            CommandAction::Delete => "delete",
            CommandAction::Meet => "meet",
            CommandAction::AddTag => "addtag",
            CommandAction::DelTag => "deltag",
            CommandAction::ListTag => "listtag",
            CommandAction::Exit => "exit",
        }
    }

    /// Commands whose success must be written back to the data file.
    pub const fn mutates(self) -> bool {
        matches!(
            self,
            CommandAction::Add
                | CommandAction::Tag
                | CommandAction::Delete
                | CommandAction::Meet
                | CommandAction::AddTag
                | CommandAction::DelTag
        )
    }

    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == word)
    }
}

impl fmt::Display for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown command: {}", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

/// One raw command line split into its command word and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub action: CommandAction,
    pub args: String,
}

impl CommandRequest {
    pub fn parse(line: &str) -> Result<Self, UnknownCommand> {
        let line = line.trim();
        let (word, args) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        let action = CommandAction::from_word(word).ok_or_else(|| UnknownCommand(word.to_string()))?;
        Ok(Self {
            action,
            args: args.to_string(),
        })
    }
}

fn query_error(err: &anyhow::Error) -> Option<&QueryError> {
    if let Some(StoreError::Query(inner)) = err.downcast_ref::<StoreError>() {
        return Some(inner);
    }
    err.downcast_ref::<QueryError>()
}

fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    if let Some(store) = err.downcast_ref::<StoreError>() {
        return Some(store.kind());
    }
    if let Some(query) = err.downcast_ref::<QueryError>() {
        return Some(query.kind());
    }
    err.downcast_ref::<ModelError>()
        .map(|_| ErrorKind::Constraint)
}

/// Map a command failure to the envelope printed by `--json`.
pub fn classify_error(err: &anyhow::Error) -> ErrorEnvelope {
    let code = if err.downcast_ref::<UnknownCommand>().is_some() {
        "unknown_command"
    } else {
        error_kind(err).map_or("internal", ErrorKind::as_str)
    };
    let envelope = ErrorEnvelope::new(code, err.to_string());

    match query_error(err) {
        Some(QueryError::UnknownTags { invalid, allowed }) => envelope
            .with_details(json!({ "invalid": invalid, "allowed": allowed }))
            .with_hint("Register missing tags with `addtag tag=NAME` first."),
        Some(QueryError::InvalidFormat { usage }) => {
            envelope.with_details(json!({ "usage": usage }))
        }
        _ if err.downcast_ref::<UnknownCommand>().is_some() => envelope.with_hint(format!(
            "Known commands: {}",
            CommandAction::ALL.map(CommandAction::as_str).join(", ")
        )),
        _ => envelope,
    }
}
