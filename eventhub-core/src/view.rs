//! Pure projection of hub state into what a front-end draws.
//!
//! All presentation rules live here: who sees the mode switch, who may add
//! events, which list is shown and how it is labelled. A front-end renders
//! a [`ViewModel`] and dispatches hub commands; it decides nothing itself.

use chrono::NaiveDate;
use serde::Serialize;

use crate::composer::ComposerState;
use crate::event::{Event, EventDraft};
use crate::session::SessionState;
use crate::store::StoreState;
use crate::user::Mode;
use crate::zone::CalendarZone;

pub const UPCOMING_HEADING: &str = "Upcoming Events";
pub const NO_EVENTS_ON_DATE: &str = "No events found for this date.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthAction {
    Login,
    LoggingIn,
    Logout,
    LoggingOut,
}

impl AuthAction {
    pub fn label(&self) -> &'static str {
        match self {
            AuthAction::Login => "Login",
            AuthAction::LoggingIn => "Logging In...",
            AuthAction::Logout => "Logout",
            AuthAction::LoggingOut => "Logging Out...",
        }
    }

    pub fn in_progress(&self) -> bool {
        matches!(self, AuthAction::LoggingIn | AuthAction::LoggingOut)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeToggle {
    pub current: Mode,
    /// Names the mode the button switches to.
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub when: String,
}

impl EventCard {
    fn new(event: &Event, zone: &CalendarZone) -> Self {
        EventCard {
            id: event.id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            when: zone.format_when(&event.date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposerView {
    pub draft: EventDraft,
    pub submitting: bool,
    pub submit_label: &'static str,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    /// "Display Name (role)" when signed in.
    pub user_line: Option<String>,
    pub auth_action: AuthAction,
    pub mode_toggle: Option<ModeToggle>,
    pub can_add_events: bool,
    pub composer: Option<ComposerView>,
    pub selected_date: Option<NaiveDate>,
    pub list_heading: String,
    pub events: Vec<EventCard>,
    pub empty_message: Option<&'static str>,
    /// Session-level error, e.g. a failed login.
    pub error: Option<String>,
}

pub fn project(
    session: &SessionState,
    store: &StoreState,
    composer: &ComposerState,
    selected_date: Option<NaiveDate>,
    zone: &CalendarZone,
) -> ViewModel {
    let auth_action = match (session.is_signed_in(), session.busy) {
        (false, false) => AuthAction::Login,
        (false, true) => AuthAction::LoggingIn,
        (true, false) => AuthAction::Logout,
        (true, true) => AuthAction::LoggingOut,
    };

    let mode_toggle = session.is_admin().then(|| ModeToggle {
        current: session.mode,
        label: match session.mode {
            Mode::Member => "Admin Mode",
            Mode::Admin => "Member Mode",
        },
        enabled: !session.busy,
    });

    let can_add_events = session.can_manage_events();

    // The form is only reachable while the session may use it
    let composer = (can_add_events && composer.open).then(|| ComposerView {
        draft: composer.draft.clone(),
        submitting: store.busy,
        submit_label: if store.busy { "Adding..." } else { "Add Event" },
        error: composer.error.clone().or_else(|| store.error.clone()),
    });

    let list = match selected_date {
        Some(day) => store.on_date(day, *zone),
        None => store.upcoming(),
    };
    let events: Vec<EventCard> = list.iter().map(|e| EventCard::new(e, zone)).collect();

    let list_heading = match selected_date {
        Some(day) => format!("Events on {}", zone.format_day(day)),
        None => UPCOMING_HEADING.to_string(),
    };

    let empty_message = (selected_date.is_some() && events.is_empty()).then_some(NO_EVENTS_ON_DATE);

    ViewModel {
        user_line: session
            .user
            .as_ref()
            .map(|u| format!("{} ({})", u.display_name, u.role)),
        auth_action,
        mode_toggle,
        can_add_events,
        composer,
        selected_date,
        list_heading,
        events,
        empty_message,
        error: session.error.clone(),
    }
}
