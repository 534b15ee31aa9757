use contact_model::{is_valid_tag_name, normalize_tag_name, Tag, TagRegistry};

use crate::criteria::Criterion;
use crate::error::{QueryError, Result};
use crate::tokenizer::{tokenize, PREFIX_COMPANY, PREFIX_TAG};

pub const FIND_USAGE: &str = "find: Finds contacts by name keywords, tags and/or companies.\n\
     Name match: case-insensitive contains, any keyword.\n\
     Tag match: exact, every tag= must be carried.\n\
     Company match: case-insensitive contains, any company= may match.\n\
     Parameters: [KEYWORD [MORE_KEYWORDS]...] [tag=TAG]... [company=COMPANY]...\n\
     Example: find alice tag=friend company=Google company=Meta";

pub const FILTER_COMPANY_USAGE: &str = "filtercompany: Lists contacts whose company contains \
     the given name as whole words (case-insensitive).\n\
     Parameters: COMPANY_NAME\n\
     Example: filtercompany Google";

/// A parsed `find` command: the raw groups as typed plus the composed criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    keywords: Vec<String>,
    requested_tags: Vec<String>,
    companies: Vec<String>,
    criterion: Criterion,
}

impl Query {
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Tag names exactly as the user typed them (trimmed).
    pub fn requested_tags(&self) -> &[String] {
        &self.requested_tags
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    pub fn criterion(&self) -> &Criterion {
        &self.criterion
    }

    /// Second-stage check run right before the query touches the collection:
    /// every requested tag must be allowed by the registry as it is now.
    pub fn gate(&self, registry: &TagRegistry) -> Result<Vec<Tag>> {
        let mut tags = Vec::with_capacity(self.requested_tags.len());
        let mut invalid = Vec::new();
        for raw in &self.requested_tags {
            match Tag::new(raw, registry) {
                Ok(tag) => tags.push(tag),
                Err(_) => invalid.push(raw.clone()),
            }
        }
        if !invalid.is_empty() {
            return Err(QueryError::UnknownTags {
                invalid,
                allowed: registry.sorted(),
            });
        }
        Ok(tags)
    }
}

/// Parse the arguments of `find` (everything after the command word).
pub fn parse_find(args: &str) -> Result<Query> {
    let map = tokenize(args, &[PREFIX_TAG, PREFIX_COMPANY]);

    let requested_tags = non_empty(map.all_values(PREFIX_TAG));

    let company_values = map.all_values(PREFIX_COMPANY);
    let has_blank_company = company_values.iter().any(|value| value.trim().is_empty());
    let companies = non_empty(company_values);

    let keywords: Vec<String> = map
        .preamble()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    if let Some(bad) = requested_tags
        .iter()
        .find(|tag| !is_valid_tag_name(&normalize_tag_name(tag)))
    {
        return Err(QueryError::InvalidTagFormat(bad.clone()));
    }

    if has_blank_company && companies.is_empty() {
        return Err(QueryError::format(FIND_USAGE));
    }

    let criterion = Criterion::all_of([
        Criterion::name_keywords(&keywords),
        Criterion::all_tags(&requested_tags),
        Criterion::any_company(&companies),
    ])
    .ok_or(QueryError::format(FIND_USAGE))?;

    log::debug!("Parsed find query: {criterion}");

    Ok(Query {
        keywords,
        requested_tags,
        companies,
        criterion,
    })
}

/// Parse the argument of `filtercompany`.
pub fn parse_filter_company(args: &str) -> Result<Criterion> {
    let company = args.trim();
    if company.is_empty() {
        return Err(QueryError::format(FILTER_COMPANY_USAGE));
    }
    Ok(Criterion::company_word(company))
}

fn non_empty(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_args_are_a_format_error() {
        for args in ["", "     ", " \t\n "] {
            assert_eq!(parse_find(args), Err(QueryError::format(FIND_USAGE)));
        }
    }

    #[test]
    fn keywords_split_on_any_whitespace() {
        let query = parse_find(" \n Alice \n \t Bob  \t").unwrap();
        assert_eq!(query.keywords(), ["Alice", "Bob"]);
        assert_eq!(
            query.criterion(),
            &Criterion::name_keywords(["alice", "bob"]).unwrap()
        );
        assert!(query.requested_tags().is_empty());
    }

    #[test]
    fn blank_tag_alone_is_a_format_error() {
        assert_eq!(parse_find(" tag= "), Err(QueryError::format(FIND_USAGE)));
    }

    #[test]
    fn blank_tag_next_to_other_criteria_is_ignored() {
        let query = parse_find("alice tag= ").unwrap();
        assert!(query.requested_tags().is_empty());
        assert_eq!(query.criterion(), &Criterion::name_keywords(["alice"]).unwrap());
    }

    #[test]
    fn blank_tag_next_to_company_leaves_company_only() {
        let query = parse_find("tag= company=Google").unwrap();
        assert!(query.requested_tags().is_empty());
        assert!(query.keywords().is_empty());
        assert_eq!(query.criterion(), &Criterion::any_company(["google"]).unwrap());
    }

    #[test]
    fn malformed_tag_fails_before_anything_else() {
        assert_eq!(
            parse_find(" tag=bad tag company="),
            Err(QueryError::InvalidTagFormat("bad tag".to_string()))
        );
        assert_eq!(
            parse_find(" tag=bad tag").unwrap_err().to_string(),
            contact_model::TAG_CONSTRAINTS
        );
    }

    #[test]
    fn blank_company_is_a_format_error() {
        assert_eq!(parse_find(" company= "), Err(QueryError::format(FIND_USAGE)));
        assert_eq!(
            parse_find("alice company=  "),
            Err(QueryError::format(FIND_USAGE))
        );
    }

    #[test]
    fn blank_company_next_to_a_real_one_is_dropped() {
        let query = parse_find("company= company=Google").unwrap();
        assert_eq!(query.companies(), ["Google"]);
    }

    #[test]
    fn tags_are_kept_raw_for_the_gate() {
        let query = parse_find(" tag=Clients tag=vip").unwrap();
        assert_eq!(query.requested_tags(), ["Clients", "vip"]);
        assert_eq!(
            query.criterion(),
            &Criterion::all_tags(["clients", "vip"]).unwrap()
        );
    }

    #[test]
    fn all_groups_compose_with_and() {
        let query = parse_find(" Alice tag=clients company=Google company=Microsoft").unwrap();
        assert_eq!(
            query.criterion(),
            &Criterion::And(vec![
                Criterion::name_keywords(["alice"]).unwrap(),
                Criterion::all_tags(["clients"]).unwrap(),
                Criterion::any_company(["google", "microsoft"]).unwrap(),
            ])
        );
    }

    #[test]
    fn gate_lists_unknown_tags_and_allow_list() {
        let registry = TagRegistry::new(["friend", "family"]);
        let query = parse_find("tag=friend tag=nonexistent tag=Ghost").unwrap();
        let err = query.gate(&registry).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownTags {
                invalid: vec!["nonexistent".to_string(), "Ghost".to_string()],
                allowed: vec!["family".to_string(), "friend".to_string()],
            }
        );
        assert_eq!(
            err.to_string(),
            "Cannot filter by invalid tag(s): nonexistent, Ghost. Allowed tags: family, friend"
        );
    }

    #[test]
    fn gate_accepts_registered_tags_case_insensitively() {
        let registry = TagRegistry::new(["friend"]);
        let query = parse_find("tag=FRIEND").unwrap();
        let tags = query.gate(&registry).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].as_str(), "friend");
    }

    #[test]
    fn filter_company_requires_an_argument() {
        assert_eq!(
            parse_filter_company("   "),
            Err(QueryError::format(FILTER_COMPANY_USAGE))
        );
        assert_eq!(
            parse_filter_company(" Google "),
            Ok(Criterion::company_word("google"))
        );
    }
}
