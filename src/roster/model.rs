//! Domain records: accounts, events, and their read-side views.
//!
//! `Account.email` is the sole identifier used in every relation; there are no
//! surrogate ids, so renaming an email is modeled as delete + recreate.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use utoipa::ToSchema;

/// Privilege tiers, total order: chief > admin > user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Chief,
}

impl Role {
    /// Admins and chiefs lead events; they share the `admins_joined` relation.
    #[must_use]
    pub fn is_leader(self) -> bool {
        matches!(self, Self::Admin | Self::Chief)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Chief => "chief",
            Self::Admin => "admin",
            Self::User => "user",
        };
        f.write_str(name)
    }
}

/// A registered identity. Internal record; the hash never leaves the crate,
/// the read side is [`AccountView`].
#[derive(Clone)]
pub struct Account {
    /// Normalized (trimmed, lowercased) email, the primary key.
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub uniform_required: String,
    /// Ordered by earn time; a badge may be earned more than once.
    pub achievements: Vec<String>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password_hash", &"***")
            .field("role", &self.role)
            .field("uniform_required", &self.uniform_required)
            .field("achievements", &self.achievements)
            .finish()
    }
}

/// An event and its membership sets. The sets live here, not on accounts, so
/// deleting an event is a single-key removal.
#[derive(Debug, Clone)]
pub struct Event {
    /// Unique name, the primary key.
    pub event_name: String,
    pub date: String,
    pub description: String,
    pub created_by: String,
    /// Emails of role=user accounts assigned by a leader.
    pub users_assigned: BTreeSet<String>,
    /// Emails of role=admin/chief accounts that joined as leaders.
    pub admins_joined: BTreeSet<String>,
}

impl Event {
    #[must_use]
    pub fn is_member(&self, email: &str) -> bool {
        self.users_assigned.contains(email) || self.admins_joined.contains(email)
    }
}

/// Read-side account projection. `events_joined_count` is derived from the
/// event sets at query time and never stored.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountView {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub uniform_required: String,
    pub achievements: Vec<String>,
    pub events_joined_count: usize,
}

/// Read-side event projection with membership sets as sorted lists.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventView {
    pub event_name: String,
    pub date: String,
    pub description: String,
    pub created_by: String,
    pub users_assigned: Vec<String>,
    pub admins_joined: Vec<String>,
}

impl From<&Event> for EventView {
    fn from(event: &Event) -> Self {
        Self {
            event_name: event.event_name.clone(),
            date: event.date.clone(),
            description: event.description.clone(),
            created_by: event.created_by.clone(),
            users_assigned: event.users_assigned.iter().cloned().collect(),
            admins_joined: event.admins_joined.iter().cloned().collect(),
        }
    }
}

/// Aggregate counts for the stats endpoint.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct Stats {
    pub total_users: usize,
    pub total_events: usize,
    pub total_admins: usize,
}

/// Normalize an email for lookup/uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
#[must_use]
pub fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}
