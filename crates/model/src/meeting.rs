use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::fields::Name;

const MAX_TITLE_CHARS: usize = 100;
const MAX_NOTES_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MeetingTitle(String);

impl MeetingTitle {
    pub const CONSTRAINTS: &'static str =
        "Meeting titles should be 1 to 100 characters long after trimming.";

    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !Self::is_valid(trimmed) {
            return Err(ModelError::invalid_field("title", Self::CONSTRAINTS));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn is_valid(value: &str) -> bool {
        let trimmed = value.trim();
        !trimmed.is_empty() && trimmed.chars().count() <= MAX_TITLE_CHARS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MeetingTitle {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<MeetingTitle> for String {
    fn from(value: MeetingTitle) -> Self {
        value.0
    }
}

impl fmt::Display for MeetingTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A scheduled meeting. Identity (see [`Meeting::is_same_meeting`]) is
/// title + date + start time; equality compares every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMeeting")]
pub struct Meeting {
    title: MeetingTitle,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    participants: Vec<Name>,
    completed: bool,
    notes: String,
}

#[derive(Deserialize)]
struct RawMeeting {
    title: MeetingTitle,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    #[serde(default)]
    participants: Vec<Name>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    notes: String,
}

impl TryFrom<RawMeeting> for Meeting {
    type Error = ModelError;

    fn try_from(raw: RawMeeting) -> Result<Self> {
        Meeting::new(raw.title, raw.date, raw.start, raw.end, raw.participants)?
            .with_notes(&raw.notes)
            .map(|meeting| meeting.completed(raw.completed))
    }
}

impl Meeting {
    pub const NOTES_CONSTRAINTS: &'static str = "Meeting notes should be at most 500 characters long.";

    pub fn new(
        title: MeetingTitle,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        participants: Vec<Name>,
    ) -> Result<Self> {
        if start == end {
            return Err(ModelError::MeetingTimesEqual);
        }
        Ok(Self {
            title,
            date,
            start,
            end,
            participants,
            completed: false,
            notes: String::new(),
        })
    }

    #[must_use]
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Result<Self> {
        if !Self::is_valid_notes(notes) {
            return Err(ModelError::invalid_field("notes", Self::NOTES_CONSTRAINTS));
        }
        self.notes = notes.trim().to_string();
        Ok(self)
    }

    pub const DATE_CONSTRAINTS: &'static str = "Meeting dates should be in the format YYYY-MM-DD.";
    pub const TIME_CONSTRAINTS: &'static str = "Meeting times should be in the format HH:MM.";

    pub fn parse_date(raw: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| ModelError::invalid_field("date", Self::DATE_CONSTRAINTS))
    }

    pub fn parse_time(raw: &str) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(raw.trim(), "%H:%M")
            .map_err(|_| ModelError::invalid_field("time", Self::TIME_CONSTRAINTS))
    }

    pub fn is_valid_notes(notes: &str) -> bool {
        notes.trim().chars().count() <= MAX_NOTES_CHARS
    }

    pub fn title(&self) -> &MeetingTitle {
        &self.title
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn participants(&self) -> &[Name] {
        &self.participants
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn is_same_meeting(&self, other: &Meeting) -> bool {
        self.title == other.title && self.date == other.date && self.start == other.start
    }
}

impl fmt::Display for Meeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} {}-{}",
            self.title,
            self.date,
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}
