//! Stand-in collaborators with artificial latency and fixed data.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{AuthError, PersistError};
use crate::event::Event;
use crate::provider::{AuthProvider, IdGenerator, PersistProvider};
use crate::user::{Role, UserProfile};

pub const DEFAULT_LOGIN_LATENCY: Duration = Duration::from_millis(1000);
pub const DEFAULT_LOGOUT_LATENCY: Duration = Duration::from_millis(500);
pub const DEFAULT_PERSIST_LATENCY: Duration = Duration::from_millis(500);

/// The profile every mock login returns.
pub fn mock_user() -> UserProfile {
    UserProfile {
        uid: "user123".to_string(),
        email: "user@example.com".to_string(),
        display_name: "Test User".to_string(),
        role: Role::Admin,
    }
}

/// Authentication that always succeeds after a fixed delay.
#[derive(Debug, Clone)]
pub struct MockAuthProvider {
    pub login_latency: Duration,
    pub logout_latency: Duration,
    pub profile: UserProfile,
}

impl Default for MockAuthProvider {
    fn default() -> Self {
        MockAuthProvider {
            login_latency: DEFAULT_LOGIN_LATENCY,
            logout_latency: DEFAULT_LOGOUT_LATENCY,
            profile: mock_user(),
        }
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn authenticate(&self) -> Result<UserProfile, AuthError> {
        debug!(latency = ?self.login_latency, "mock authenticate");
        tokio::time::sleep(self.login_latency).await;
        Ok(self.profile.clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        debug!(latency = ?self.logout_latency, "mock sign out");
        tokio::time::sleep(self.logout_latency).await;
        Ok(())
    }
}

/// Persistence that accepts every event after a fixed delay.
#[derive(Debug, Clone)]
pub struct MockPersistProvider {
    pub latency: Duration,
}

impl Default for MockPersistProvider {
    fn default() -> Self {
        MockPersistProvider {
            latency: DEFAULT_PERSIST_LATENCY,
        }
    }
}

#[async_trait]
impl PersistProvider for MockPersistProvider {
    async fn create_event(&self, event: Event) -> Result<Event, PersistError> {
        debug!(id = %event.id, latency = ?self.latency, "mock persist");
        tokio::time::sleep(self.latency).await;
        Ok(event)
    }
}

/// The three events a fresh hub is seeded with, dated relative to `now`.
pub fn sample_events(now: DateTime<Utc>, ids: &dyn IdGenerator) -> Vec<Event> {
    let sample = |title: &str, description: &str, days: i64, location: &str| Event {
        id: ids.new_id(),
        title: title.to_string(),
        description: description.to_string(),
        date: now + chrono::Duration::days(days),
        location: Some(location.to_string()),
    };

    vec![
        sample("Volunteer Day", "Help out at the local park.", 1, "Central Park"),
        sample("Fundraising Gala", "Formal event to raise funds.", 7, "Hilton Hotel"),
        sample("Board Meeting", "Monthly board meeting.", 30, "Office HQ"),
    ]
}
