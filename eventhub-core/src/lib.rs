//! Core of the community events hub.
//!
//! - [`session`]: authentication, role and member/admin mode
//! - [`store`]: the event collection, date-filtered queries and validated insert
//! - [`hub`]: the command surface a front-end drives, combining both
//! - [`view`]: pure projection of hub state into a view model
//!
//! Authentication and persistence are external capabilities ([`provider`]);
//! [`mock`] supplies stand-ins with artificial latency.

mod busy;
pub mod composer;
pub mod config;
pub mod error;
pub mod event;
pub mod hub;
pub mod mock;
pub mod provider;
pub mod session;
pub mod store;
pub mod user;
pub mod view;
pub mod zone;

pub use error::{HubError, HubResult};
pub use event::{DraftField, Event, EventDraft};
pub use hub::{Collaborators, EventHub};
pub use user::{Mode, Role, UserProfile};
pub use zone::CalendarZone;
