use anyhow::Result;
use contact_model::{
    Address, Company, Contact, Email, Meeting, MeetingTitle, Name, Nickname, Phone, Tag,
    TagRegistry,
};
use contact_query::{
    tokenize, ArgumentMultimap, Prefix, QueryError, PREFIX_ADDRESS, PREFIX_COMPANY, PREFIX_DATE,
    PREFIX_EMAIL, PREFIX_END, PREFIX_NAME, PREFIX_NICKNAME, PREFIX_NOTES, PREFIX_PHONE,
    PREFIX_START, PREFIX_TAG, PREFIX_TITLE,
};

use super::domain::{ADD_USAGE, DELETE_USAGE, MEET_USAGE, TAG_USAGE};

/// A 1-based index into the displayed list.
pub fn parse_index(raw: &str, usage: &'static str) -> Result<usize, QueryError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|index| *index > 0)
        .ok_or(QueryError::format(usage))
}

fn require(
    map: &ArgumentMultimap,
    required: &[Prefix],
    single: &[Prefix],
    usage: &'static str,
) -> Result<(), QueryError> {
    if required.iter().any(|prefix| !map.contains(*prefix)) {
        return Err(QueryError::format(usage));
    }
    let duplicated = map.duplicated(single);
    if !duplicated.is_empty() {
        log::debug!("Repeated single-valued fields: {duplicated:?}");
        return Err(QueryError::format(usage));
    }
    Ok(())
}

fn value<'a>(map: &'a ArgumentMultimap, prefix: Prefix) -> &'a str {
    map.value(prefix).unwrap_or_default()
}

pub fn parse_add(args: &str, registry: &TagRegistry) -> Result<Contact> {
    let single = [
        PREFIX_NAME,
        PREFIX_PHONE,
        PREFIX_EMAIL,
        PREFIX_ADDRESS,
        PREFIX_COMPANY,
        PREFIX_NICKNAME,
    ];
    let mut all = single.to_vec();
    all.push(PREFIX_TAG);
    let map = tokenize(args, &all);

    if !map.preamble().is_empty() {
        return Err(QueryError::format(ADD_USAGE).into());
    }
    require(&map, &single[..4], &single, ADD_USAGE)?;

    let mut contact = Contact::new(
        Name::parse(value(&map, PREFIX_NAME))?,
        Phone::parse(value(&map, PREFIX_PHONE))?,
        Email::parse(value(&map, PREFIX_EMAIL))?,
        Address::parse(value(&map, PREFIX_ADDRESS))?,
    );
    if let Some(company) = map.value(PREFIX_COMPANY) {
        contact = contact.with_company(Company::new(company));
    }
    if let Some(nickname) = map.value(PREFIX_NICKNAME).filter(|nick| !nick.is_empty()) {
        contact = contact.with_nickname(Nickname::new(nickname));
    }
    let tags = map
        .all_values(PREFIX_TAG)
        .iter()
        .map(|name| Tag::new(name, registry))
        .collect::<contact_model::Result<Vec<_>>>()?;
    Ok(contact.with_tags(tags))
}

pub fn parse_tag_contact(args: &str) -> Result<(usize, Vec<String>)> {
    let map = tokenize(args, &[PREFIX_TAG]);
    let index = parse_index(map.preamble(), TAG_USAGE)?;
    let tags: Vec<String> = map
        .all_values(PREFIX_TAG)
        .iter()
        .filter(|tag| !tag.is_empty())
        .cloned()
        .collect();
    if tags.is_empty() {
        return Err(QueryError::format(TAG_USAGE).into());
    }
    Ok((index, tags))
}

pub fn parse_delete(args: &str) -> Result<usize> {
    Ok(parse_index(args, DELETE_USAGE)?)
}

pub fn parse_meeting(args: &str) -> Result<(usize, Meeting)> {
    let fields = [PREFIX_TITLE, PREFIX_DATE, PREFIX_START, PREFIX_END, PREFIX_NOTES];
    let map = tokenize(args, &fields);
    let index = parse_index(map.preamble(), MEET_USAGE)?;
    require(&map, &fields[..4], &fields, MEET_USAGE)?;

    let meeting = Meeting::new(
        MeetingTitle::parse(value(&map, PREFIX_TITLE))?,
        Meeting::parse_date(value(&map, PREFIX_DATE))?,
        Meeting::parse_time(value(&map, PREFIX_START))?,
        Meeting::parse_time(value(&map, PREFIX_END))?,
        Vec::new(),
    )?
    .with_notes(value(&map, PREFIX_NOTES))?;
    Ok((index, meeting))
}

/// The single `tag=` argument of `addtag` / `deltag`, trimmed but otherwise
/// unchecked.
pub fn parse_tag_name(args: &str, usage: &'static str) -> Result<String, QueryError> {
    let map = tokenize(args, &[PREFIX_TAG]);
    match map.value(PREFIX_TAG) {
        Some(name) if map.preamble().is_empty() => Ok(name.to_string()),
        _ => Err(QueryError::format(usage)),
    }
}
