use contact_model::{
    is_valid_tag_name, normalize_tag_name, Contact, Meeting, ModelError, Tag, TagRegistry,
};
use contact_query::{parse_filter_company, parse_find, FilteredView};
use serde::Serialize;

use crate::error::{Result, StoreError};

/// A tag name from the registry and how many contacts carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagUsage {
    pub name: String,
    pub count: usize,
}

/// One session over the contact collection.
///
/// Owns the contacts, the tag registry and the displayed view. Every mutation
/// either succeeds completely or leaves all three untouched.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    contacts: Vec<Contact>,
    registry: TagRegistry,
    view: FilteredView,
}

impl AddressBook {
    pub fn new(registry: TagRegistry) -> Self {
        Self {
            contacts: Vec::new(),
            registry,
            view: FilteredView::default(),
        }
    }

    /// Rebuild a session from stored parts, rejecting duplicate contacts.
    pub fn from_parts(registry: TagRegistry, contacts: Vec<Contact>) -> Result<Self> {
        let mut book = Self::new(registry);
        for contact in contacts {
            book.add_contact(contact)?;
        }
        Ok(book)
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn displayed(&self) -> impl Iterator<Item = &Contact> {
        self.view.visible(&self.contacts)
    }

    /// Run a `find` command. Returns the number of contacts now displayed.
    pub fn find(&mut self, args: &str) -> Result<usize> {
        let query = parse_find(args)?;
        contact_query::execute(&query, &self.registry, &self.contacts, &mut self.view).map_err(
            |err| {
                log::warn!("Rejected find {:?}: {err}", args.trim());
                StoreError::from(err)
            },
        )
    }

    pub fn filter_company(&mut self, args: &str) -> Result<usize> {
        let criterion = parse_filter_company(args)?;
        Ok(self.view.apply(criterion, &self.contacts))
    }

    pub fn show_all(&mut self) -> usize {
        self.view.show_all(&self.contacts)
    }

    pub fn add_contact(&mut self, contact: Contact) -> Result<()> {
        if self.contacts.iter().any(|existing| existing.is_same_contact(&contact)) {
            return Err(StoreError::DuplicateContact(contact.name().to_string()));
        }
        log::debug!("Adding contact {}", contact.name());
        self.contacts.push(contact);
        self.view.refresh(&self.contacts);
        Ok(())
    }

    /// Remove the contact shown at the 1-based `displayed` index.
    pub fn delete(&mut self, displayed: usize) -> Result<Contact> {
        let position = self.resolve(displayed)?;
        let removed = self.contacts.remove(position);
        self.view.refresh(&self.contacts);
        Ok(removed)
    }

    /// Attach tags to the displayed contact. Every name must be in the
    /// registry; nothing is attached if one is not.
    pub fn tag_contact<S: AsRef<str>>(&mut self, displayed: usize, names: &[S]) -> Result<&Contact> {
        let position = self.resolve(displayed)?;
        let tags = names
            .iter()
            .map(|name| Tag::new(name.as_ref(), &self.registry))
            .collect::<contact_model::Result<Vec<_>>>()?;
        let updated = self.contacts[position].clone().with_tags(tags);
        self.replace(position, updated)
    }

    pub fn schedule_meeting(&mut self, displayed: usize, meeting: Meeting) -> Result<&Contact> {
        let position = self.resolve(displayed)?;
        let current = &self.contacts[position];
        if current
            .meetings()
            .iter()
            .any(|existing| existing.is_same_meeting(&meeting))
        {
            return Err(StoreError::DuplicateMeeting);
        }
        let updated = current.clone().with_meeting(meeting);
        self.replace(position, updated)
    }

    /// Register a tag. Returns the name as stored.
    pub fn add_allowed_tag(&mut self, raw: &str) -> Result<String> {
        let name = normalize_tag_name(raw);
        if !is_valid_tag_name(&name) {
            return Err(ModelError::InvalidTagFormat(raw.trim().to_string()).into());
        }
        if !self.registry.add(&name) {
            return Err(StoreError::DuplicateTag(name));
        }
        log::info!("Registered tag {name}");
        Ok(name)
    }

    /// Unregister a tag. Contacts keep tags they already carry.
    pub fn remove_allowed_tag(&mut self, raw: &str) -> Result<String> {
        let name = normalize_tag_name(raw);
        if !self.registry.remove(&name) {
            return Err(StoreError::MissingTag(raw.trim().to_string()));
        }
        log::info!("Unregistered tag {name}");
        Ok(name)
    }

    /// Allowed tags in sorted order with their usage across the whole
    /// collection, regardless of the current view.
    pub fn tag_usage(&self) -> Vec<TagUsage> {
        self.registry
            .sorted()
            .into_iter()
            .map(|name| {
                let count = self
                    .contacts
                    .iter()
                    .filter(|contact| contact.has_tag(&name))
                    .count();
                TagUsage { name, count }
            })
            .collect()
    }

    fn resolve(&self, displayed: usize) -> Result<usize> {
        self.view
            .resolve(displayed)
            .ok_or(StoreError::InvalidIndex(displayed))
    }

    fn replace(&mut self, position: usize, contact: Contact) -> Result<&Contact> {
        self.contacts[position] = contact;
        self.view.refresh(&self.contacts);
        Ok(&self.contacts[position])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use contact_model::{Address, Company, Email, MeetingTitle, Name, Phone};
    use contact_query::ErrorKind;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn person(name: &str, company: &str) -> Contact {
        Contact::new(
            Name::parse(name).unwrap(),
            Phone::parse("87654321").unwrap(),
            Email::parse("friend@example.org").unwrap(),
            Address::parse("Blk 30 Geylang Street 29").unwrap(),
        )
        .with_company(Company::new(company))
    }

    fn book() -> AddressBook {
        let mut book = AddressBook::from_parts(
            TagRegistry::with_defaults(),
            vec![
                person("Alice Pauline", "Google"),
                person("Benson Meier", "Meta"),
                person("Carl Kurz", ""),
            ],
        )
        .unwrap();
        book.show_all();
        book
    }

    fn displayed_names(book: &AddressBook) -> Vec<String> {
        book.displayed().map(|c| c.name().to_string()).collect()
    }

    #[test]
    fn add_tag_then_find_by_it() {
        let mut book = book();
        assert_eq!(book.add_allowed_tag(" VIP ").unwrap(), "vip");
        book.tag_contact(2, &["vip"]).unwrap();

        assert_eq!(book.find("tag=vip").unwrap(), 1);
        assert_eq!(displayed_names(&book), ["Benson Meier"]);
    }

    #[test]
    fn duplicate_tag_is_a_state_error() {
        let mut book = book();
        let err = book.add_allowed_tag("Friend").unwrap_err();
        assert_eq!(err.to_string(), "This tag already exists in the allowed list.");
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn malformed_tag_is_a_constraint_error() {
        let mut book = book();
        let err = book.add_allowed_tag("bad tag").unwrap_err();
        assert_eq!(err.to_string(), contact_model::TAG_CONSTRAINTS);
        assert_eq!(err.kind(), ErrorKind::Constraint);
        assert!(!book.registry().is_allowed("badtag"));
    }

    #[test]
    fn removing_a_tag_keeps_it_on_contacts() {
        let mut book = book();
        book.tag_contact(1, &["friend"]).unwrap();
        book.remove_allowed_tag("FRIEND").unwrap();

        assert!(book.contacts()[0].has_tag("friend"));
        let err = book.find("tag=friend").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Cannot filter by invalid tag(s): friend. Allowed tags: "));
        assert_eq!(book.view().len(), 3);
    }

    #[test]
    fn removing_an_absent_tag_is_a_state_error() {
        let mut book = book();
        let err = book.remove_allowed_tag("ghost").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn tagging_with_unknown_tag_changes_nothing() {
        let mut book = book();
        let err = book.tag_contact(1, &["friend", "ghost"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Constraint);
        assert!(book.contacts()[0].tags().is_empty());
    }

    #[test]
    fn tag_usage_counts_whole_collection() {
        let mut book = book();
        book.tag_contact(1, &["client"]).unwrap();
        book.tag_contact(3, &["client", "friend"]).unwrap();
        book.find("Benson").unwrap();

        let usage = book.tag_usage();
        let client = usage.iter().find(|u| u.name == "client").unwrap();
        assert_eq!(client.count, 2);
        let family = usage.iter().find(|u| u.name == "family").unwrap();
        assert_eq!(family.count, 0);
        let names: Vec<&str> = usage.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["classmate", "client", "colleague", "family", "friend"]);
    }

    #[test]
    fn indices_follow_the_displayed_view() {
        let mut book = book();
        book.filter_company("meta").unwrap();
        assert_eq!(displayed_names(&book), ["Benson Meier"]);

        let removed = book.delete(1).unwrap();
        assert_eq!(removed.name().as_str(), "Benson Meier");
        assert!(book.view().is_empty());
        assert!(matches!(book.delete(1), Err(StoreError::InvalidIndex(1))));
        assert_eq!(book.contacts().len(), 2);
    }

    #[test]
    fn duplicate_contact_is_rejected() {
        let mut book = book();
        let err = book.add_contact(person("Alice Pauline", "Initech")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateContact(_)));
        assert_eq!(book.contacts().len(), 3);
    }

    #[test]
    fn added_contact_appears_in_unfiltered_view() {
        let mut book = book();
        book.add_contact(person("Daniel Tan", "Acme")).unwrap();
        assert_eq!(book.view().len(), 4);
    }

    #[test]
    fn meetings_are_scheduled_once() {
        let mut book = book();
        let meeting = Meeting::new(
            MeetingTitle::parse("Coffee").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            Vec::new(),
        )
        .unwrap();

        let contact = book.schedule_meeting(1, meeting.clone()).unwrap();
        assert_eq!(contact.next_meeting(), Some(&meeting));
        assert!(matches!(
            book.schedule_meeting(1, meeting),
            Err(StoreError::DuplicateMeeting)
        ));
    }

    #[test]
    fn find_format_error_keeps_view() {
        let mut book = book();
        book.find("Alice").unwrap();
        let err = book.find("   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(displayed_names(&book), ["Alice Pauline"]);
    }

    proptest! {
        #[test]
        fn proptest_added_tag_is_visible_in_registry(name in "[a-zA-Z0-9]{1,12}") {
            let mut book = AddressBook::new(TagRegistry::default());
            let stored = book.add_allowed_tag(&name).unwrap();
            prop_assert!(book.registry().view().contains(&stored));
            prop_assert!(book.add_allowed_tag(&name).is_err());
        }
    }
}
