pub mod domain;
mod parse;

pub use domain::{classify_error, CommandAction, CommandRequest};

use anyhow::Result;
use contact_model::TagRegistry;
use contact_protocol::CommandResponse;
use contact_store::{AddressBook, JsonAddressBookStorage};
use serde_json::{json, Value};

use crate::report;
use domain::{ADD_TAG_USAGE, DEL_TAG_USAGE};

/// What one command line produced: the JSON response plus its human rendering.
#[derive(Debug, Clone)]
pub struct CommandReply {
    pub response: CommandResponse,
    pub text: String,
    pub exit: bool,
}

struct CommandOutcome {
    message: String,
    text: String,
    data: Value,
}

impl CommandOutcome {
    fn message(message: impl Into<String>, data: Value) -> Self {
        let message = message.into();
        Self {
            text: message.clone(),
            message,
            data,
        }
    }
}

/// Runs raw command lines against one address book and writes successful
/// mutations back to its data file.
pub struct CommandHandler {
    book: AddressBook,
    storage: JsonAddressBookStorage,
}

impl CommandHandler {
    /// Load the data file, or start an empty book seeded with `seed_tags` when
    /// it does not exist yet.
    pub fn open(storage: JsonAddressBookStorage, seed_tags: &[String]) -> Result<Self> {
        let mut book = match storage.read()? {
            Some(book) => book,
            None => AddressBook::new(TagRegistry::new(seed_tags)),
        };
        book.show_all();
        Ok(Self { book, storage })
    }

    pub fn book(&self) -> &AddressBook {
        &self.book
    }

    pub fn execute(&mut self, line: &str) -> CommandReply {
        let request = match CommandRequest::parse(line) {
            Ok(request) => request,
            Err(err) => return error_reply("unknown", &anyhow::Error::new(err)),
        };
        let action = request.action;
        log::debug!("Executing {action} {:?}", request.args);

        match self.dispatch(&request) {
            Ok(outcome) => CommandReply {
                response: CommandResponse::ok(action.as_str(), outcome.message, outcome.data),
                text: outcome.text,
                exit: action == CommandAction::Exit,
            },
            Err(err) => error_reply(action.as_str(), &err),
        }
    }

    fn dispatch(&mut self, request: &CommandRequest) -> Result<CommandOutcome> {
        let args = request.args.as_str();
        let snapshot = request.action.mutates().then(|| self.book.clone());
        let outcome = match request.action {
            CommandAction::Find => {
                self.book.find(args)?;
                self.listing()
            }
            CommandAction::FilterCompany => {
                self.book.filter_company(args)?;
                self.listing()
            }
            CommandAction::List => {
                self.book.show_all();
                self.listing()
            }
            CommandAction::Add => {
                let contact = parse::parse_add(args, self.book.registry())?;
                let data = json!({ "contact": contact });
                let message = format!("New person added: {}", contact.name());
                self.book.add_contact(contact)?;
                CommandOutcome::message(message, data)
            }
            CommandAction::Tag => {
                let (index, tags) = parse::parse_tag_contact(args)?;
                let contact = self.book.tag_contact(index, &tags)?;
                CommandOutcome::message(
                    format!("Tagged person: {}", contact.name()),
                    json!({ "contact": contact }),
                )
            }
            CommandAction::Delete => {
                let index = parse::parse_delete(args)?;
                let removed = self.book.delete(index)?;
                CommandOutcome::message(
                    format!("Deleted person: {}", removed.name()),
                    json!({ "contact": removed }),
                )
            }
            CommandAction::Meet => {
                let (index, meeting) = parse::parse_meeting(args)?;
                let message = format!("Meeting scheduled: {meeting}");
                let contact = self.book.schedule_meeting(index, meeting)?;
                CommandOutcome::message(message, json!({ "contact": contact }))
            }
            CommandAction::AddTag => {
                let raw = parse::parse_tag_name(args, ADD_TAG_USAGE)?;
                let name = self.book.add_allowed_tag(&raw)?;
                CommandOutcome::message(format!("Tag added: {name}"), json!({ "tag": name }))
            }
            CommandAction::DelTag => {
                let raw = parse::parse_tag_name(args, DEL_TAG_USAGE)?;
                let name = self.book.remove_allowed_tag(&raw)?;
                CommandOutcome::message(format!("Tag removed: {name}"), json!({ "tag": name }))
            }
            CommandAction::ListTag => {
                let usage = self.book.tag_usage();
                let text = report::render_tag_usage(&usage);
                CommandOutcome {
                    message: text.clone(),
                    text,
                    data: json!({ "tags": usage }),
                }
            }
            CommandAction::Exit => CommandOutcome::message("Bye!", Value::Null),
        };

        if let Some(snapshot) = snapshot {
            if let Err(err) = self.storage.save(&self.book) {
                log::warn!("Rolled back {} after failed save", request.action);
                self.book = snapshot;
                return Err(err.into());
            }
        }
        Ok(outcome)
    }

    fn listing(&self) -> CommandOutcome {
        let count = self.book.view().len();
        let contacts: Vec<_> = self.book.displayed().collect();
        CommandOutcome {
            message: report::persons_listed(count),
            text: report::render_contact_list(contacts.iter().copied()),
            data: json!({ "count": count, "contacts": contacts }),
        }
    }
}

fn error_reply(action: &str, err: &anyhow::Error) -> CommandReply {
    let envelope = classify_error(err);
    log::debug!("{action} failed with {}: {}", envelope.code, envelope.message);
    CommandReply {
        text: envelope.message.clone(),
        response: CommandResponse::error(action, envelope),
        exit: false,
    }
}
