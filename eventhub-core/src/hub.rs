//! The surface a front-end drives: one session, one event store, one form.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::composer::ComposerState;
use crate::config::HubConfig;
use crate::error::{HubError, HubResult};
use crate::event::{DraftField, Event, EventDraft};
use crate::mock::{self, MockAuthProvider, MockPersistProvider};
use crate::provider::{
    AuthProvider, Clock, IdGenerator, PersistProvider, SystemClock, UuidGenerator,
};
use crate::session::{SessionManager, SessionState};
use crate::store::{EventList, EventStore, StoreState};
use crate::user::{Mode, UserProfile};
use crate::view::{self, ViewModel};
use crate::zone::CalendarZone;

/// External capabilities the hub is built from.
pub struct Collaborators {
    pub auth: Arc<dyn AuthProvider>,
    pub persist: Arc<dyn PersistProvider>,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
}

impl Collaborators {
    /// Mock backends with the latencies from `config`, wall clock and UUIDs.
    pub fn mock(config: &HubConfig) -> Self {
        Collaborators {
            auth: Arc::new(MockAuthProvider {
                login_latency: config.login_latency,
                logout_latency: config.logout_latency,
                ..Default::default()
            }),
            persist: Arc::new(MockPersistProvider {
                latency: config.persist_latency,
            }),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
        }
    }
}

pub struct EventHub {
    session: SessionManager,
    store: EventStore,
    composer: watch::Sender<ComposerState>,
    selected_date: watch::Sender<Option<NaiveDate>>,
    clock: Arc<dyn Clock>,
    zone: CalendarZone,
}

impl EventHub {
    pub fn new(collaborators: Collaborators, zone: CalendarZone) -> Self {
        let Collaborators {
            auth,
            persist,
            clock,
            ids,
        } = collaborators;

        let (composer, _) = watch::channel(ComposerState::new(&clock.now(), &zone));
        let (selected_date, _) = watch::channel(None);

        EventHub {
            session: SessionManager::new(auth),
            store: EventStore::new(persist, ids, zone),
            composer,
            selected_date,
            clock,
            zone,
        }
    }

    /// A hub on mock backends, seeded with the sample events if configured.
    pub fn from_config(config: &HubConfig) -> HubResult<Self> {
        let zone = config.zone()?;
        let collaborators = Collaborators::mock(config);
        let samples = config
            .seed_sample_events
            .then(|| mock::sample_events(collaborators.clock.now(), collaborators.ids.as_ref()))
            .unwrap_or_default();

        Ok(EventHub::new(collaborators, zone).with_events(samples))
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.store = self.store.with_events(events);
        self
    }

    pub fn zone(&self) -> CalendarZone {
        self.zone
    }

    /// The current calendar day in the hub's zone, read from the hub's clock.
    pub fn today(&self) -> NaiveDate {
        self.zone.day_of(&self.clock.now())
    }

    // --- Read accessors ---

    pub fn session(&self) -> SessionState {
        self.session.snapshot()
    }

    pub fn store(&self) -> StoreState {
        self.store.snapshot()
    }

    pub fn composer(&self) -> ComposerState {
        self.composer.borrow().clone()
    }

    pub fn draft(&self) -> EventDraft {
        self.composer.borrow().draft.clone()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        *self.selected_date.borrow()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }

    pub fn subscribe_store(&self) -> watch::Receiver<StoreState> {
        self.store.subscribe()
    }

    pub fn subscribe_composer(&self) -> watch::Receiver<ComposerState> {
        self.composer.subscribe()
    }

    pub fn list_upcoming(&self) -> EventList {
        self.store.list_upcoming()
    }

    pub fn list_on_date(&self, day: NaiveDate) -> EventList {
        self.store.list_on_date(day)
    }

    /// The list the front-end should show for the current date selection.
    pub fn visible_events(&self) -> EventList {
        match self.selected_date() {
            Some(day) => self.store.list_on_date(day),
            None => self.store.list_upcoming(),
        }
    }

    pub fn view(&self) -> ViewModel {
        view::project(
            &self.session.snapshot(),
            &self.store.snapshot(),
            &self.composer.borrow(),
            self.selected_date(),
            &self.zone,
        )
    }

    // --- Session commands ---

    pub async fn login(&self) -> HubResult<UserProfile> {
        self.session.login().await
    }

    pub async fn logout(&self) -> HubResult<()> {
        self.session.logout().await
    }

    pub fn toggle_mode(&self) -> HubResult<Mode> {
        self.session.toggle_mode()
    }

    // --- Event commands ---

    pub fn select_date(&self, day: Option<NaiveDate>) {
        debug!(?day, "date selected");
        self.selected_date.send_replace(day);
    }

    /// Open the add-event form. Only for an admin in admin mode.
    pub fn open_composer(&self) -> HubResult<()> {
        if !self.session.snapshot().can_manage_events() {
            return Err(HubError::Unauthorized);
        }
        self.composer.send_modify(|c| c.open = true);
        Ok(())
    }

    /// Close the form and discard the draft.
    pub fn cancel_composer(&self) {
        let now = self.clock.now();
        self.composer.send_modify(|c| c.reset(&now, &self.zone));
    }

    pub fn update_draft_field(&self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        self.composer.send_modify(|c| c.set_field(field, value));
    }

    /// Validate the current draft and add it as an event.
    ///
    /// Success resets the draft and closes the form, unless the draft was
    /// edited while the insert was in flight; those edits are kept. Failure
    /// keeps the draft and records the reason on the form.
    pub async fn submit_draft(&self) -> HubResult<Event> {
        let session = self.session.snapshot();
        let mut draft = EventDraft::default();
        self.composer.send_modify(|c| {
            c.error = None;
            draft = c.draft.clone();
        });

        match self.store.add_event(&session, &draft).await {
            Ok(event) => {
                info!(id = %event.id, "draft submitted");
                let now = self.clock.now();
                self.composer.send_modify(|c| {
                    if c.draft == draft {
                        c.reset(&now, &self.zone);
                    }
                });
                Ok(event)
            }
            Err(err) => {
                let message = err.to_string();
                self.composer.send_modify(|c| c.error = Some(message));
                Err(err)
            }
        }
    }

    /// Clear every visible error message.
    pub fn dismiss_error(&self) {
        self.composer.send_if_modified(|c| c.error.take().is_some());
        self.session.dismiss_error();
        self.store.dismiss_error();
    }
}
