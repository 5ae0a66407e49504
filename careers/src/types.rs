//! Common type definitions.
//!
//! All entity IDs are UUIDs wrapped in type aliases so signatures say which table an ID
//! points into:
//!
//! - [`CompanyId`]: tenant root
//! - [`RecruiterId`]: authenticated principal
//! - [`SectionId`]: careers page section
//! - [`JobId`]: job listing
//!
//! [`Operation`] names the action a caller attempted, used when rejecting cross-tenant access.

use std::fmt;
use uuid::Uuid;

pub type CompanyId = Uuid;
pub type RecruiterId = Uuid;
pub type SectionId = Uuid;
pub type JobId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "read"),
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}
