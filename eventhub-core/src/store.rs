//! The event collection, its date-filtered queries and validated insert.
//!
//! Events live in an `Arc<Vec<Event>>` inside a `watch` channel. Inserts copy
//! on write, so an [`EventList`] handed out earlier keeps seeing the
//! collection as it was when the list was taken.

use std::iter::FusedIterator;
use std::slice;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::busy::{self, BusyState};
use crate::error::{HubError, HubResult, Operation, PersistError, ValidationError};
use crate::event::{Event, EventDraft, EventFields};
use crate::provider::{IdGenerator, PersistProvider};
use crate::session::SessionState;
use crate::zone::CalendarZone;

/// Attempts at drawing an id that is not already in the store.
const MAX_ID_ATTEMPTS: usize = 8;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreState {
    /// All events in insertion order.
    pub events: Arc<Vec<Event>>,
    /// True only while an insert is in flight.
    pub busy: bool,
    pub error: Option<String>,
}

impl StoreState {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.events.iter().any(|e| e.id == id)
    }

    pub fn upcoming(&self) -> EventList {
        EventList {
            events: Arc::clone(&self.events),
            filter: None,
        }
    }

    pub fn on_date(&self, day: NaiveDate, zone: CalendarZone) -> EventList {
        EventList {
            events: Arc::clone(&self.events),
            filter: Some(DayFilter { day, zone }),
        }
    }
}

impl BusyState for StoreState {
    fn is_busy(&self) -> bool {
        self.busy
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DayFilter {
    day: NaiveDate,
    zone: CalendarZone,
}

impl DayFilter {
    fn matches(&self, event: &Event) -> bool {
        self.zone.day_of(&event.date) == self.day
    }
}

/// A restartable view over a snapshot of the store.
///
/// Either every event, or only those on one calendar day. Iterating does not
/// copy events and can be repeated any number of times.
#[derive(Debug, Clone)]
pub struct EventList {
    events: Arc<Vec<Event>>,
    filter: Option<DayFilter>,
}

impl EventList {
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.events.iter(),
            filter: self.filter.as_ref(),
        }
    }

    /// The calendar day this list is filtered to, if any.
    pub fn day(&self) -> Option<NaiveDate> {
        self.filter.map(|f| f.day)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn to_vec(&self) -> Vec<Event> {
        self.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a EventList {
    type Item = &'a Event;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a> {
    inner: slice::Iter<'a, Event>,
    filter: Option<&'a DayFilter>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Event;

    fn next(&mut self) -> Option<Self::Item> {
        match self.filter {
            None => self.inner.next(),
            Some(filter) => self.inner.by_ref().find(|e| filter.matches(e)),
        }
    }
}

impl FusedIterator for Iter<'_> {}

pub struct EventStore {
    state: watch::Sender<StoreState>,
    persist: Arc<dyn PersistProvider>,
    ids: Arc<dyn IdGenerator>,
    zone: CalendarZone,
}

impl EventStore {
    pub fn new(
        persist: Arc<dyn PersistProvider>,
        ids: Arc<dyn IdGenerator>,
        zone: CalendarZone,
    ) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        EventStore {
            state,
            persist,
            ids,
            zone,
        }
    }

    /// Start from existing events. Later duplicates of an id are skipped.
    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        let mut seeded: Vec<Event> = Vec::new();
        for event in events {
            if seeded.iter().any(|e| e.id == event.id) {
                warn!(id = %event.id, "skipping seed event with duplicate id");
                continue;
            }
            seeded.push(event);
        }
        self.state = watch::channel(StoreState {
            events: Arc::new(seeded),
            ..Default::default()
        })
        .0;
        self
    }

    pub fn zone(&self) -> CalendarZone {
        self.zone
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    /// Every event, in insertion order.
    pub fn list_upcoming(&self) -> EventList {
        self.state.borrow().upcoming()
    }

    /// Events whose date falls on `day` in the store's calendar zone.
    pub fn list_on_date(&self, day: NaiveDate) -> EventList {
        self.state.borrow().on_date(day, self.zone)
    }

    /// Events on the calendar day `instant` falls on, normalized like stored dates.
    pub fn list_on_day_of(&self, instant: &DateTime<Utc>) -> EventList {
        self.list_on_date(self.zone.day_of(instant))
    }

    pub fn validate_draft(&self, draft: &EventDraft) -> Result<EventFields, ValidationError> {
        draft.validate(&self.zone)
    }

    /// Validate `draft` and insert it as a new event.
    ///
    /// Fails without touching the collection when `session` may not manage
    /// events, when the draft is invalid, or while another insert is in
    /// flight. Those checks happen before the first suspension point.
    pub async fn add_event(&self, session: &SessionState, draft: &EventDraft) -> HubResult<Event> {
        if !session.can_manage_events() {
            warn!("add event rejected: not an admin in admin mode");
            return Err(HubError::Unauthorized);
        }

        let fields = self.validate_draft(draft).inspect_err(|e| {
            debug!(error = %e, "draft failed validation");
        })?;

        let guard = busy::claim(&self.state, Operation::AddEvent, |_| Ok(()))?;

        let event = match self.fresh_id() {
            Ok(id) => Event::new(id, fields),
            Err(err) => {
                guard.fail(&err);
                return Err(err);
            }
        };
        info!(id = %event.id, title = %event.title, "adding event");
        let id = event.id.clone();

        match self.persist.create_event(event).await {
            Ok(saved) if saved.id != id => {
                let err = HubError::Persist(PersistError(format!(
                    "backend returned id '{}' for event '{}'",
                    saved.id, id
                )));
                warn!(error = %err, "event not added");
                guard.fail(&err);
                Err(err)
            }
            Ok(saved) => {
                info!(id = %saved.id, "event added");
                let added = saved.clone();
                guard.finish(move |s| Arc::make_mut(&mut s.events).push(saved));
                Ok(added)
            }
            Err(e) => {
                let err = HubError::Persist(e);
                warn!(error = %err, "event not added");
                guard.fail(&err);
                Err(err)
            }
        }
    }

    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    fn fresh_id(&self) -> HubResult<String> {
        let state = self.state.borrow();
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.new_id();
            if !state.contains_id(&id) {
                return Ok(id);
            }
            warn!(%id, "id generator returned an id already in use");
        }
        Err(HubError::Persist(PersistError(
            "could not generate a unique event id".to_string(),
        )))
    }
}
