use std::collections::BTreeSet;
use std::fmt;

use contact_model::{normalize_tag_name, Contact};

/// A filter over contacts, interpreted by [`Criterion::matches`].
///
/// Each group of a query builds at most one criterion; a group that was not
/// requested is `None` rather than an always-true criterion, and the groups are
/// joined with [`Criterion::all_of`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Name contains any of the keywords, case-insensitive. Stored lower-cased.
    NameKeywords(Vec<String>),
    /// Contact carries every one of the normalized tags.
    AllTags(BTreeSet<String>),
    /// Company contains any of the needles, case-insensitive. An empty needle
    /// only matches an empty company.
    AnyCompany(Vec<String>),
    /// Company contains the needle as whole words, case-insensitive. An empty
    /// needle only matches an empty company.
    CompanyWord(String),
    /// Every part must match.
    And(Vec<Criterion>),
}

impl Criterion {
    pub fn name_keywords<I, S>(keywords: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        (!keywords.is_empty()).then_some(Self::NameKeywords(keywords))
    }

    /// Inputs are expected to be registry-valid already; only normalization
    /// happens here.
    pub fn all_tags<I, S>(tags: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags: BTreeSet<String> = tags
            .into_iter()
            .map(|tag| normalize_tag_name(tag.as_ref()))
            .filter(|tag| !tag.is_empty())
            .collect();
        (!tags.is_empty()).then_some(Self::AllTags(tags))
    }

    pub fn any_company<I, S>(companies: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let companies: Vec<String> = companies
            .into_iter()
            .map(|company| company.as_ref().trim().to_lowercase())
            .collect();
        (!companies.is_empty()).then_some(Self::AnyCompany(companies))
    }

    pub fn company_word(company: &str) -> Self {
        Self::CompanyWord(company.trim().to_lowercase())
    }

    /// AND of the present parts. A single part is returned as-is.
    pub fn all_of(parts: impl IntoIterator<Item = Option<Criterion>>) -> Option<Self> {
        let mut parts: Vec<Criterion> = parts.into_iter().flatten().collect();
        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Self::And(parts)),
        }
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        match self {
            Criterion::NameKeywords(keywords) => {
                let name = contact.name().as_str().to_lowercase();
                keywords.iter().any(|keyword| name.contains(keyword.as_str()))
            }
            Criterion::AllTags(tags) => tags.iter().all(|tag| contact.has_tag(tag)),
            Criterion::AnyCompany(needles) => {
                let company = contact.company().as_str().to_lowercase();
                needles.iter().any(|needle| company_contains(&company, needle))
            }
            Criterion::CompanyWord(needle) => {
                let company = contact.company().as_str().to_lowercase();
                if needle.is_empty() {
                    return company.is_empty();
                }
                contains_words(&company, needle)
            }
            Criterion::And(parts) => parts.iter().all(|part| part.matches(contact)),
        }
    }
}

fn company_contains(company: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return company.is_empty();
    }
    company.contains(needle)
}

fn contains_words(haystack: &str, needle: &str) -> bool {
    let words: Vec<&str> = haystack.split_whitespace().collect();
    let wanted: Vec<&str> = needle.split_whitespace().collect();
    !wanted.is_empty() && words.windows(wanted.len()).any(|window| window == wanted.as_slice())
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::NameKeywords(keywords) => write!(f, "name~{keywords:?}"),
            Criterion::AllTags(tags) => write!(f, "all-tags={tags:?}"),
            Criterion::AnyCompany(needles) => write!(f, "company~{needles:?}"),
            Criterion::CompanyWord(needle) => write!(f, "company-word={needle:?}"),
            Criterion::And(parts) => {
                for (idx, part) in parts.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" AND ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}
