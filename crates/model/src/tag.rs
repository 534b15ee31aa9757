use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

pub const TAG_CONSTRAINTS: &str = "Tags names should be alphanumeric";

/// Tags allowed in a fresh session when no data file or config provides any.
pub const DEFAULT_TAGS: [&str; 5] = ["friend", "family", "colleague", "classmate", "client"];

/// Trim and lower-case a tag name the way the registry stores it.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// True for a non-empty, ASCII alphanumeric name. Callers normalize first.
pub fn is_valid_tag_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Allow-list of tag names a contact may carry.
///
/// Names are stored trimmed and lower-cased, so every lookup and mutation is
/// case-insensitive. The registry is owned by the session and handed to
/// whoever needs it by reference; nothing prunes it implicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegistry {
    allowed: HashSet<String>,
}

impl TagRegistry {
    /// Build a registry from seed names. Seeds that are not alphanumeric after
    /// normalization are skipped.
    pub fn new<I, S>(seed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        for name in seed {
            let name = name.as_ref();
            if !registry.add(name) && !registry.is_allowed(name) {
                log::warn!("Skipping invalid seed tag {name:?}");
            }
        }
        registry
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_TAGS)
    }

    pub fn is_allowed(&self, name: &str) -> bool {
        self.allowed.contains(&normalize_tag_name(name))
    }

    /// Returns `true` only if the name was well-formed and not yet present.
    pub fn add(&mut self, name: &str) -> bool {
        let normalized = normalize_tag_name(name);
        if !is_valid_tag_name(&normalized) {
            return false;
        }
        self.allowed.insert(normalized)
    }

    /// Returns whether the name was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.allowed.remove(&normalize_tag_name(name))
    }

    /// Owned snapshot of the allow-list; changing it never touches the registry.
    pub fn view(&self) -> BTreeSet<String> {
        self.allowed.iter().cloned().collect()
    }

    /// Allowed names, alphabetical and case-insensitive.
    pub fn sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = self.allowed.iter().cloned().collect();
        names.sort_by_key(|name| name.to_lowercase());
        names
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// A normalized tag name.
///
/// [`Tag::new`] checks the name against the registry as it is *now*;
/// [`Tag::from_stored`] only checks the format, for tags that were valid when
/// they were attached and must survive a later shrink of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub fn new(name: &str, registry: &TagRegistry) -> Result<Self> {
        let tag = Self::from_stored(name)?;
        if !registry.is_allowed(&tag.0) {
            return Err(ModelError::TagNotAllowed(tag.0));
        }
        Ok(tag)
    }

    pub fn from_stored(name: &str) -> Result<Self> {
        let normalized = normalize_tag_name(name);
        if !is_valid_tag_name(&normalized) {
            return Err(ModelError::InvalidTagFormat(name.trim().to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Tag {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_stored(&value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}
