//! Capabilities the hub consumes from the outside world.
//!
//! Authentication and persistence are reached only through these traits.
//! The hub never talks to a concrete backend; [`crate::mock`] supplies the
//! stand-ins used by the terminal front-end.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{AuthError, PersistError};
use crate::event::Event;
use crate::user::UserProfile;

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign a user in and return the profile the backend issued.
    async fn authenticate(&self) -> Result<UserProfile, AuthError>;

    /// End the backend session for the current user.
    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

#[async_trait]
pub trait PersistProvider: Send + Sync {
    /// Store a new event and return it as persisted.
    async fn create_event(&self, event: Event) -> Result<Event, PersistError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait IdGenerator: Send + Sync {
    /// A string unique for the lifetime of the process.
    fn new_id(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Ids "1", "2", "3", ... in call order.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn starting_at(first: u64) -> Self {
        SequentialIds {
            next: AtomicU64::new(first.saturating_sub(1)),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn new_id(&self) -> String {
        (self.next.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::default();
        assert_eq!(ids.new_id(), "1");
        assert_eq!(ids.new_id(), "2");

        let ids = SequentialIds::starting_at(4);
        assert_eq!(ids.new_id(), "4");
    }

    #[test]
    fn uuids_do_not_repeat() {
        let ids = UuidGenerator;
        let seen: HashSet<String> = (0..1000).map(|_| ids.new_id()).collect();
        assert_eq!(seen.len(), 1000);
    }
}
