//! # Contact Model
//!
//! Value objects for the contact book and the tag allow-list that governs them.
//!
//! ## Architecture
//!
//! ```text
//! TagRegistry (allow-list, lower-cased, alphanumeric)
//!     │
//!     └──> Tag (constructed against the current registry)
//!
//! Contact
//!     ├─ Name / Phone / Email / Address / Company / Nickname
//!     ├─ Meeting[] (title, date, start/end, participants, notes)
//!     └─ Tag set
//! ```
//!
//! Every field type validates on construction and on deserialization, so a
//! `Contact` that exists is always well-formed.

mod contact;
mod error;
mod fields;
mod meeting;
mod tag;

pub use contact::Contact;
pub use error::{ModelError, Result};
pub use fields::{Address, Company, Email, Name, Nickname, Phone};
pub use meeting::{Meeting, MeetingTitle};
pub use tag::{
    is_valid_tag_name, normalize_tag_name, Tag, TagRegistry, DEFAULT_TAGS, TAG_CONSTRAINTS,
};
