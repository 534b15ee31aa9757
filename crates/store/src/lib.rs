//! # Contact Store
//!
//! The session model over a contact collection and its JSON data file.
//!
//! [`AddressBook`] owns the contacts, the [`contact_model::TagRegistry`] and the
//! displayed [`contact_query::FilteredView`]; [`JsonAddressBookStorage`] reads
//! and writes it as `{ "allowed_tags": [...], "contacts": [...] }`.

mod book;
mod error;
mod storage;

pub use book::{AddressBook, TagUsage};
pub use error::{Result, StoreError};
pub use storage::JsonAddressBookStorage;
