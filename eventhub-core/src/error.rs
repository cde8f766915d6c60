//! Error types for the events hub.

use std::fmt;

use thiserror::Error;

/// An operation the hub can refuse while another one is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Logout,
    ToggleMode,
    AddEvent,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Login => write!(f, "log in"),
            Operation::Logout => write!(f, "log out"),
            Operation::ToggleMode => write!(f, "switch mode"),
            Operation::AddEvent => write!(f, "add event"),
        }
    }
}

/// A draft that cannot become an event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields: title is required.")]
    BlankTitle,

    #[error("Please fill in all fields: description is required.")]
    BlankDescription,

    #[error("Invalid date '{0}'. Expected an RFC 3339 instant, YYYY-MM-DDTHH:MM or YYYY-MM-DD")]
    InvalidDate(String),
}

/// Failure reported by an authentication provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct AuthError(pub String);

/// Failure reported by a persistence provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PersistError(pub String);

/// Errors that can occur in events hub operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Only an admin in admin mode may do that")]
    Unauthorized,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Already signed in")]
    AlreadySignedIn,

    #[error("Cannot {0} while another operation is in progress")]
    Busy(Operation),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Could not save event: {0}")]
    Persist(#[from] PersistError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for events hub operations.
pub type HubResult<T> = Result<T, HubError>;
