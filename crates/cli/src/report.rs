use contact_model::Contact;
use contact_store::TagUsage;

pub const NO_TAGS: &str = "There are currently no tags.";

pub fn persons_listed(count: usize) -> String {
    format!("{count} persons listed!")
}

pub fn render_contact_card(index: usize, contact: &Contact) -> String {
    let mut card = format!("{index}. {}\n", contact.name());
    if let Some(nickname) = contact.nickname() {
        card.push_str(&format!("   Nickname: {nickname}\n"));
    }
    card.push_str(&format!("   Phone: {}\n", contact.phone()));
    card.push_str(&format!("   Address: {}\n", contact.address()));
    card.push_str(&format!("   Email: {}\n", contact.email()));
    if !contact.company().is_empty() {
        card.push_str(&format!("   Company: {}\n", contact.company()));
    }
    match contact.next_meeting() {
        Some(meeting) => card.push_str(&format!("   Next meeting: {meeting}\n")),
        None => card.push_str("   Next meeting: No meeting scheduled\n"),
    }
    if !contact.tags().is_empty() {
        let tags: Vec<String> = contact.tags().iter().map(ToString::to_string).collect();
        card.push_str(&format!("   Tags: {}\n", tags.join(" ")));
    }
    card
}

/// Numbered cards for the displayed contacts followed by the count line.
pub fn render_contact_list<'a>(contacts: impl IntoIterator<Item = &'a Contact>) -> String {
    let mut out = String::new();
    let mut count = 0usize;
    for contact in contacts {
        count += 1;
        out.push_str(&render_contact_card(count, contact));
    }
    out.push_str(&persons_listed(count));
    out
}

pub fn render_tag_usage(usage: &[TagUsage]) -> String {
    if usage.is_empty() {
        return NO_TAGS.to_string();
    }
    let entries: Vec<String> = usage
        .iter()
        .map(|tag| format!("{} ({})", tag.name, tag.count))
        .collect();
    format!("Tags: {}", entries.join(", "))
}
