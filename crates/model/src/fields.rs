use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub const CONSTRAINTS: &'static str =
        "Names should only contain alphanumeric characters and spaces, and it should not be blank";

    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !Self::is_valid(trimmed) {
            return Err(ModelError::invalid_field("name", Self::CONSTRAINTS));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn is_valid(value: &str) -> bool {
        value.chars().next().is_some_and(char::is_alphanumeric)
            && value.chars().all(|c| c.is_alphanumeric() || c == ' ')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub const CONSTRAINTS: &'static str =
        "Phone numbers should only contain numbers, and it should be at least 3 digits long";

    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !Self::is_valid(trimmed) {
            return Err(ModelError::invalid_field("phone", Self::CONSTRAINTS));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn is_valid(value: &str) -> bool {
        value.len() >= 3 && value.chars().all(|c| c.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub const CONSTRAINTS: &'static str =
        "Emails should be of the format local-part@domain, where the local-part holds \
         alphanumerics and +_.- (not at either end) and the domain is a sequence of \
         alphanumeric labels separated by periods or hyphens, ending in a label of at \
         least 2 characters";

    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !Self::is_valid(trimmed) {
            return Err(ModelError::invalid_field("email", Self::CONSTRAINTS));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn is_valid(value: &str) -> bool {
        let Ok(pattern) = EMAIL_PATTERN.as_ref() else {
            return false;
        };
        pattern.is_match(value)
            && value
                .rsplit(['@', '.'])
                .next()
                .is_some_and(|last| last.len() >= 2)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

static EMAIL_PATTERN: LazyLock<std::result::Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9]+([+_.-][A-Za-z0-9]+)*@([A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?\.)*[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?$",
    )
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub const CONSTRAINTS: &'static str = "Addresses can take any values, and it should not be blank";

    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::invalid_field("address", Self::CONSTRAINTS));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Employer of a contact. Empty means "no company" and is a legal value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Company(String);

impl Company {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Nickname(String);

impl Nickname {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_conversions {
    (try: $($ty:ident),*; infallible: $($plain:ident),*) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = ModelError;

                fn try_from(value: String) -> Result<Self> {
                    Self::parse(&value)
                }
            }
        )*
        $(
            impl From<String> for $plain {
                fn from(value: String) -> Self {
                    Self::new(&value)
                }
            }
        )*
        $(
            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.0
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
        $(
            impl From<$plain> for String {
                fn from(value: $plain) -> Self {
                    value.0
                }
            }

            impl fmt::Display for $plain {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

string_conversions!(try: Name, Phone, Email, Address; infallible: Company, Nickname);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_allows_alphanumerics_and_spaces() {
        assert_eq!(Name::parse("  Alice Pauline ").unwrap().as_str(), "Alice Pauline");
        assert!(Name::parse("R2 D2").is_ok());
        assert!(Name::parse("").is_err());
        assert!(Name::parse("   ").is_err());
        assert!(Name::parse("peter*").is_err());
    }

    #[test]
    fn phone_needs_three_digits() {
        assert!(Phone::parse("911").is_ok());
        assert!(Phone::parse("93121534").is_ok());
        assert!(Phone::parse("91").is_err());
        assert!(Phone::parse("9011p041").is_err());
    }

    #[test]
    fn email_checks_local_part_and_domain() {
        assert!(Email::parse("alice@example.com").is_ok());
        assert!(Email::parse("a+b_c.d-e@ex-ample.co").is_ok());
        assert!(Email::parse("alice@localhost").is_ok());
        assert!(Email::parse("alice").is_err());
        assert!(Email::parse("-alice@example.com").is_err());
        assert!(Email::parse("alice@example.c").is_err());
        assert!(Email::parse("alice@-example.com").is_err());
        assert!(Email::parse("alice@example..com").is_err());
        assert!(Email::parse("a..b@example.com").is_err());
        assert!(Email::parse("a+-b@example.com").is_err());
        assert!(Email::parse("alice@@example.com").is_err());
    }

    #[test]
    fn address_must_not_be_blank() {
        assert!(Address::parse("Blk 30 Geylang Street 29").is_ok());
        assert_eq!(
            Address::parse(" "),
            Err(ModelError::invalid_field("address", Address::CONSTRAINTS))
        );
    }

    #[test]
    fn company_may_be_empty() {
        assert!(Company::new("   ").is_empty());
        assert_eq!(Company::new(" Google ").as_str(), "Google");
        assert_eq!(Company::default(), Company::new(""));
    }

    #[test]
    fn invalid_field_error_carries_message() {
        let err = Phone::parse("x").unwrap_err();
        assert_eq!(err.to_string(), Phone::CONSTRAINTS);
    }
}
