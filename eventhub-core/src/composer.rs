//! State of the add-event form.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::event::{DraftField, EventDraft};
use crate::zone::CalendarZone;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComposerState {
    pub draft: EventDraft,
    pub open: bool,
    /// Last submit failure, shown until dismissed or the next submit.
    pub error: Option<String>,
}

impl ComposerState {
    pub fn new(now: &DateTime<Utc>, zone: &CalendarZone) -> Self {
        ComposerState {
            draft: EventDraft::starting_at(now, zone),
            ..Default::default()
        }
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Close the form and start over with a fresh draft.
    pub fn reset(&mut self, now: &DateTime<Utc>, zone: &CalendarZone) {
        *self = ComposerState::new(now, zone);
    }
}
