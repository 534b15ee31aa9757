//! # Contact Query
//!
//! Turns a free-form `find` command into a single criterion over contacts and
//! applies it to the live collection.
//!
//! ## Pipeline
//!
//! ```text
//! raw args
//!     │
//!     ├──> tokenize            preamble + tag= / company= groups
//!     │
//!     ├──> validate            tag format, empty company, at least one group
//!     │
//!     ├──> build + compose     Name AND Tags AND Company (absent = neutral)
//!     │
//!     ├──> gate                every requested tag is in the registry *now*
//!     │
//!     └──> apply               FilteredView keeps matches in original order
//! ```
//!
//! Any failure before `apply` leaves the displayed view untouched.

mod criteria;
mod error;
mod executor;
mod parser;
mod tokenizer;

pub use criteria::Criterion;
pub use error::{ErrorKind, QueryError, Result};
pub use executor::{execute, FilteredView};
pub use parser::{parse_filter_company, parse_find, Query, FILTER_COMPANY_USAGE, FIND_USAGE};
pub use tokenizer::{
    tokenize, ArgumentMultimap, Prefix, PREFIX_ADDRESS, PREFIX_COMPANY, PREFIX_DATE, PREFIX_EMAIL,
    PREFIX_END, PREFIX_NAME, PREFIX_NICKNAME, PREFIX_NOTES, PREFIX_PHONE, PREFIX_START,
    PREFIX_TAG, PREFIX_TITLE,
};
