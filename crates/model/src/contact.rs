use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::fields::{Address, Company, Email, Name, Nickname, Phone};
use crate::meeting::Meeting;
use crate::tag::Tag;

/// A person in the contact book. Immutable; edits produce a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    name: Name,
    phone: Phone,
    email: Email,
    address: Address,
    #[serde(default)]
    company: Company,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nickname: Option<Nickname>,
    #[serde(default)]
    meetings: Vec<Meeting>,
    #[serde(default)]
    tags: BTreeSet<Tag>,
}

impl Contact {
    pub fn new(name: Name, phone: Phone, email: Email, address: Address) -> Self {
        Self {
            name,
            phone,
            email,
            address,
            company: Company::default(),
            nickname: None,
            meetings: Vec::new(),
            tags: BTreeSet::new(),
        }
    }

    /// Builder: set company
    #[must_use]
    pub fn with_company(mut self, company: Company) -> Self {
        self.company = company;
        self
    }

    /// Builder: set nickname
    #[must_use]
    pub fn with_nickname(mut self, nickname: Nickname) -> Self {
        self.nickname = Some(nickname);
        self
    }

    /// Builder: add tags (already validated against the registry)
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Builder: append a meeting, keeping the list ordered by date and start
    #[must_use]
    pub fn with_meeting(mut self, meeting: Meeting) -> Self {
        self.meetings.push(meeting);
        self.meetings
            .sort_by_key(|meeting| (meeting.date(), meeting.start()));
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn company(&self) -> &Company {
        &self.company
    }

    pub fn nickname(&self) -> Option<&Nickname> {
        self.nickname.as_ref()
    }

    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.as_str() == name)
    }

    /// First meeting that is not completed.
    pub fn next_meeting(&self) -> Option<&Meeting> {
        self.meetings.iter().find(|meeting| !meeting.is_completed())
    }

    pub fn upcoming_meetings(&self) -> impl Iterator<Item = &Meeting> {
        self.meetings.iter().filter(|meeting| !meeting.is_completed())
    }

    pub fn completed_meetings(&self) -> impl Iterator<Item = &Meeting> {
        self.meetings.iter().filter(|meeting| meeting.is_completed())
    }

    /// Weaker identity used to reject duplicates: same name.
    pub fn is_same_contact(&self, other: &Contact) -> bool {
        self.name == other.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meeting::MeetingTitle;
    use crate::tag::TagRegistry;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn alice() -> Contact {
        Contact::new(
            Name::parse("Alice Pauline").unwrap(),
            Phone::parse("94351253").unwrap(),
            Email::parse("alice@example.com").unwrap(),
            Address::parse("123, Jurong West Ave 6").unwrap(),
        )
    }

    fn meeting(title: &str, day: u32, completed: bool) -> Meeting {
        Meeting::new(
            MeetingTitle::parse(title).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            Vec::new(),
        )
        .unwrap()
        .completed(completed)
    }

    #[test]
    fn defaults_are_empty() {
        let contact = alice();
        assert!(contact.company().is_empty());
        assert!(contact.nickname().is_none());
        assert!(contact.tags().is_empty());
        assert!(contact.next_meeting().is_none());
    }

    #[test]
    fn next_meeting_skips_completed_ones() {
        let contact = alice()
            .with_meeting(meeting("Later", 20, false))
            .with_meeting(meeting("Done", 2, true))
            .with_meeting(meeting("Soon", 10, false));
        assert_eq!(contact.next_meeting().unwrap().title().as_str(), "Soon");
        assert_eq!(contact.upcoming_meetings().count(), 2);
        assert_eq!(contact.completed_meetings().count(), 1);
    }

    #[test]
    fn same_contact_compares_names_only() {
        let registry = TagRegistry::with_defaults();
        let tagged = alice().with_tags([Tag::new("friend", &registry).unwrap()]);
        assert!(tagged.is_same_contact(&alice()));
        assert_ne!(tagged, alice());
        assert!(tagged.has_tag("friend"));
    }

    #[test]
    fn json_round_trip_keeps_every_field() {
        let registry = TagRegistry::with_defaults();
        let contact = alice()
            .with_company(Company::new("Google"))
            .with_nickname(Nickname::new("Al"))
            .with_tags([Tag::new("client", &registry).unwrap()])
            .with_meeting(meeting("Kickoff", 3, false));
        let json = serde_json::to_string(&contact).unwrap();
        let back: Contact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, contact);
    }

    #[test]
    fn deserialization_rejects_invalid_fields() {
        let json = r#"{"name":"Bob","phone":"12","email":"bob@example.com","address":"x"}"#;
        let err = serde_json::from_str::<Contact>(json).unwrap_err();
        assert!(err.to_string().contains("Phone numbers"));
    }
}
