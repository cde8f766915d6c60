//! Identity of an authenticated session.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Member => write!(f, "member"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Restricted or privileged view of an admin-role session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Member,
    Admin,
}

impl Mode {
    /// Mode a freshly authenticated session starts in.
    ///
    /// Admins opt into admin mode explicitly, so every role starts as member.
    pub fn default_for(_role: Role) -> Self {
        Mode::Member
    }

    pub fn flipped(self) -> Self {
        match self {
            Mode::Member => Mode::Admin,
            Mode::Admin => Mode::Member,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Member => write!(f, "member"),
            Mode::Admin => write!(f, "admin"),
        }
    }
}

/// Profile issued by the authentication provider. Replaced wholesale on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
