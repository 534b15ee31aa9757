use std::collections::HashMap;
use std::fmt;

/// Marker that starts an argument value, e.g. `tag=` in `find tag=friend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix(&'static str);

impl Prefix {
    pub const fn new(marker: &'static str) -> Self {
        Self(marker)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub const PREFIX_NAME: Prefix = Prefix::new("name=");
pub const PREFIX_PHONE: Prefix = Prefix::new("phone=");
pub const PREFIX_EMAIL: Prefix = Prefix::new("email=");
pub const PREFIX_ADDRESS: Prefix = Prefix::new("address=");
pub const PREFIX_COMPANY: Prefix = Prefix::new("company=");
pub const PREFIX_NICKNAME: Prefix = Prefix::new("nickname=");
pub const PREFIX_TAG: Prefix = Prefix::new("tag=");
pub const PREFIX_TITLE: Prefix = Prefix::new("title=");
pub const PREFIX_DATE: Prefix = Prefix::new("date=");
pub const PREFIX_START: Prefix = Prefix::new("start=");
pub const PREFIX_END: Prefix = Prefix::new("end=");
pub const PREFIX_NOTES: Prefix = Prefix::new("notes=");

/// Tokenized arguments: free text before the first marker plus every value
/// seen for each marker, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentMultimap {
    preamble: String,
    values: HashMap<Prefix, Vec<String>>,
}

impl ArgumentMultimap {
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Last value given for the marker.
    pub fn value(&self, prefix: Prefix) -> Option<&str> {
        self.values
            .get(&prefix)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    pub fn all_values(&self, prefix: Prefix) -> &[String] {
        self.values.get(&prefix).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, prefix: Prefix) -> bool {
        self.values.contains_key(&prefix)
    }

    /// Markers among `prefixes` that were given more than once.
    pub fn duplicated(&self, prefixes: &[Prefix]) -> Vec<Prefix> {
        prefixes
            .iter()
            .copied()
            .filter(|prefix| self.all_values(*prefix).len() > 1)
            .collect()
    }
}

/// Split `args` on the given markers. A marker only counts at the start of the
/// input or right after whitespace, so `x=tag=y` stays one value. Values and
/// the preamble are trimmed.
pub fn tokenize(args: &str, prefixes: &[Prefix]) -> ArgumentMultimap {
    let mut positions: Vec<(usize, Prefix)> = Vec::new();
    let mut previous: Option<char> = None;
    for (idx, ch) in args.char_indices() {
        if previous.map_or(true, char::is_whitespace) {
            if let Some(prefix) = prefixes
                .iter()
                .find(|prefix| args[idx..].starts_with(prefix.as_str()))
            {
                positions.push((idx, *prefix));
            }
        }
        previous = Some(ch);
    }

    let preamble_end = positions.first().map_or(args.len(), |(idx, _)| *idx);
    let mut multimap = ArgumentMultimap {
        preamble: args[..preamble_end].trim().to_string(),
        values: HashMap::new(),
    };

    for (i, (start, prefix)) in positions.iter().enumerate() {
        let value_start = start + prefix.as_str().len();
        let value_end = positions.get(i + 1).map_or(args.len(), |(next, _)| *next);
        let value = args[value_start..value_end].trim().to_string();
        multimap.values.entry(*prefix).or_default().push(value);
    }

    multimap
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_markers_leaves_everything_in_preamble() {
        let map = tokenize("  Alice   Bob ", &[PREFIX_TAG]);
        assert_eq!(map.preamble(), "Alice   Bob");
        assert!(!map.contains(PREFIX_TAG));
        assert!(map.all_values(PREFIX_TAG).is_empty());
    }

    #[test]
    fn collects_repeated_markers_in_order() {
        let map = tokenize(
            "alice tag=friend company=Acme Corp tag=family",
            &[PREFIX_TAG, PREFIX_COMPANY],
        );
        assert_eq!(map.preamble(), "alice");
        assert_eq!(map.all_values(PREFIX_TAG), ["friend", "family"]);
        assert_eq!(map.value(PREFIX_COMPANY), Some("Acme Corp"));
        assert_eq!(map.duplicated(&[PREFIX_TAG, PREFIX_COMPANY]), vec![PREFIX_TAG]);
    }

    #[test]
    fn marker_at_start_of_input_is_recognized() {
        let map = tokenize("tag=friend", &[PREFIX_TAG]);
        assert_eq!(map.preamble(), "");
        assert_eq!(map.all_values(PREFIX_TAG), ["friend"]);
    }

    #[test]
    fn marker_inside_a_word_is_not_recognized() {
        let map = tokenize("hashtag=x name=Bob", &[PREFIX_TAG, PREFIX_NAME]);
        assert_eq!(map.preamble(), "hashtag=x");
        assert_eq!(map.value(PREFIX_NAME), Some("Bob"));
    }

    #[test]
    fn empty_values_are_kept_as_empty_strings() {
        let map = tokenize(" tag= company=  ", &[PREFIX_TAG, PREFIX_COMPANY]);
        assert_eq!(map.all_values(PREFIX_TAG), [""]);
        assert_eq!(map.all_values(PREFIX_COMPANY), [""]);
    }

    #[test]
    fn unknown_markers_stay_in_values() {
        let map = tokenize("tag=friend foo=bar", &[PREFIX_TAG]);
        assert_eq!(map.value(PREFIX_TAG), Some("friend foo=bar"));
    }
}
