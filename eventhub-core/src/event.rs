//! Calendar events and the draft they are composed from.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::zone::CalendarZone;

/// A committed calendar event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Event {
    pub fn new(id: impl Into<String>, fields: EventFields) -> Self {
        Event {
            id: id.into(),
            title: fields.title,
            description: fields.description,
            date: fields.date,
            location: fields.location,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Validated contents of a draft, ready to receive an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
}

/// Field of an [`EventDraft`] the presentation layer can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
    Date,
    Location,
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "title" => Ok(DraftField::Title),
            "description" | "desc" => Ok(DraftField::Description),
            "date" | "when" => Ok(DraftField::Date),
            "location" | "where" => Ok(DraftField::Location),
            other => Err(format!(
                "Unknown field '{other}'. Expected title, description, date or location"
            )),
        }
    }
}

/// In-progress fields for a prospective event. Not validated until submit.
///
/// `date` holds the raw text the user typed so a half-edited value survives
/// until validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
}

impl EventDraft {
    /// Fresh draft with `date` defaulted to `now`.
    pub fn starting_at(now: &DateTime<Utc>, zone: &CalendarZone) -> Self {
        EventDraft {
            date: zone.format_input(now),
            ..Default::default()
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Title => self.title = value,
            DraftField::Description => self.description = value,
            DraftField::Date => self.date = value,
            DraftField::Location => self.location = value,
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Description => &self.description,
            DraftField::Date => &self.date,
            DraftField::Location => &self.location,
        }
    }

    /// Check required fields and parse the date.
    ///
    /// Title and description must be non-blank after trimming. Location is
    /// optional; a blank location becomes `None`.
    pub fn validate(&self, zone: &CalendarZone) -> Result<EventFields, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::BlankTitle);
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::BlankDescription);
        }

        let date = zone.parse_instant(&self.date)?;

        let location = match self.location.trim() {
            "" => None,
            loc => Some(loc.to_string()),
        };

        Ok(EventFields {
            title: title.to_string(),
            description: description.to_string(),
            date,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn filled_draft() -> EventDraft {
        EventDraft {
            title: "Volunteer Day".into(),
            description: "Help out at the local park.".into(),
            date: "2025-03-20T15:00".into(),
            location: "Central Park".into(),
        }
    }

    #[test]
    fn validate_accepts_complete_draft() {
        let fields = filled_draft().validate(&CalendarZone::default()).unwrap();
        assert_eq!(fields.title, "Volunteer Day");
        assert_eq!(fields.date, Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap());
        assert_eq!(fields.location.as_deref(), Some("Central Park"));
    }

    #[test]
    fn validate_trims_and_drops_blank_location() {
        let mut draft = filled_draft();
        draft.title = "  Volunteer Day \n".into();
        draft.location = "   ".into();
        let fields = draft.validate(&CalendarZone::default()).unwrap();
        assert_eq!(fields.title, "Volunteer Day");
        assert_eq!(fields.location, None);
    }

    #[test]
    fn validate_rejects_blank_title() {
        let mut draft = filled_draft();
        draft.title = "   ".into();
        assert_eq!(
            draft.validate(&CalendarZone::default()),
            Err(ValidationError::BlankTitle)
        );
    }

    #[test]
    fn validate_rejects_blank_description() {
        let mut draft = filled_draft();
        draft.description = "".into();
        assert_eq!(
            draft.validate(&CalendarZone::default()),
            Err(ValidationError::BlankDescription)
        );
    }

    #[test]
    fn validate_rejects_unparseable_date() {
        let mut draft = filled_draft();
        draft.date = "someday".into();
        assert!(matches!(
            draft.validate(&CalendarZone::default()),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn set_and_get_fields() {
        let mut draft = EventDraft::default();
        draft.set(DraftField::Location, "Office HQ");
        assert_eq!(draft.get(DraftField::Location), "Office HQ");
        assert_eq!("desc".parse::<DraftField>(), Ok(DraftField::Description));
        assert!("colour".parse::<DraftField>().is_err());
    }

    #[test]
    fn starting_at_defaults_date_to_now() {
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 9, 41, 12).unwrap();
        let draft = EventDraft::starting_at(&now, &CalendarZone::default());
        assert_eq!(draft.date, "2025-03-20T09:41");
        assert!(draft.title.is_empty());
    }
}
