//! Database models for careers page sections.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::api::models::sections::{SectionCreate, SectionType, SectionUpdate};
use crate::types::{CompanyId, SectionId};

/// Database request for creating a section
#[derive(Debug, Clone)]
pub struct SectionCreateDBRequest {
    pub company_id: CompanyId,
    pub section_type: SectionType,
    pub title: String,
    pub content: String,
    pub media_url: Option<String>,
    pub order_index: i32,
    pub is_visible: bool,
}

impl From<SectionCreate> for SectionCreateDBRequest {
    fn from(api: SectionCreate) -> Self {
        Self {
            company_id: api.company_id,
            section_type: api.section_type,
            title: api.title,
            content: api.content,
            media_url: api.media_url,
            order_index: api.order_index.unwrap_or(0),
            is_visible: api.is_visible.unwrap_or(true),
        }
    }
}

/// Database request for updating a section
#[derive(Debug, Clone, Default)]
pub struct SectionUpdateDBRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `None` leaves the URL alone, `Some(None)` clears it
    pub media_url: Option<Option<String>>,
    pub order_index: Option<i32>,
    pub is_visible: Option<bool>,
}

impl From<SectionUpdate> for SectionUpdateDBRequest {
    fn from(api: SectionUpdate) -> Self {
        Self {
            title: api.title,
            content: api.content,
            media_url: api.media_url,
            order_index: api.order_index,
            is_visible: api.is_visible,
        }
    }
}

/// Database response for a section
#[derive(Debug, Clone, FromRow)]
pub struct SectionDBResponse {
    pub id: SectionId,
    pub company_id: CompanyId,
    #[sqlx(rename = "type")]
    pub section_type: SectionType,
    pub title: String,
    pub content: String,
    pub media_url: Option<String>,
    pub order_index: i32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a bulk reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderOutcome {
    /// `sections_version` after the reorder
    pub version: i64,
    pub applied: u64,
    pub skipped: u64,
}
