//! API request/response models for careers page sections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::models::sections::SectionDBResponse;
use crate::types::{CompanyId, SectionId};

/// Kind of content block. Drives presentation only; ordering treats all types alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "section_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    About,
    Mission,
    Values,
    Culture,
    Life,
    Benefits,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct SectionCreate {
    #[schema(value_type = String, format = "uuid")]
    pub company_id: CompanyId,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 10000, message = "content must be at most 10000 characters"))]
    pub content: String,
    #[validate(url(message = "Invalid URL"))]
    pub media_url: Option<String>,
    /// Defaults to 0. Clients appending a section pass the current count.
    #[validate(range(min = 0, message = "order_index must be a non-negative integer"))]
    pub order_index: Option<i32>,
    /// Defaults to true
    pub is_visible: Option<bool>,
}

/// Partial update. Absent or null fields are left unchanged, except `media_url`, where null
/// removes the media.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct SectionUpdate {
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 10000, message = "content must be at most 10000 characters"))]
    pub content: Option<String>,
    /// Media URL (absent = no change, null = clear, string = set)
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[validate(url(message = "Invalid URL"))]
    pub media_url: Option<Option<String>>,
    #[validate(range(min = 0, message = "order_index must be a non-negative integer"))]
    pub order_index: Option<i32>,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SectionResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: SectionId,
    #[schema(value_type = String, format = "uuid")]
    pub company_id: CompanyId,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub title: String,
    pub content: String,
    pub media_url: Option<String>,
    pub order_index: i32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SectionDBResponse> for SectionResponse {
    fn from(db: SectionDBResponse) -> Self {
        Self {
            id: db.id,
            company_id: db.company_id,
            section_type: db.section_type,
            title: db.title,
            content: db.content,
            media_url: db.media_url,
            order_index: db.order_index,
            is_visible: db.is_visible,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// One `{id, order_index}` pair of a bulk reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct SectionOrder {
    #[schema(value_type = String, format = "uuid")]
    pub id: SectionId,
    #[validate(range(min = 0, message = "order_index must be a non-negative integer"))]
    pub order_index: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct ReorderRequest {
    /// Non-empty. If an id repeats, its last occurrence wins.
    #[validate(length(min = 1, message = "At least one section required"), nested)]
    pub sections: Vec<SectionOrder>,
    /// Reject with 409 unless the company's `sections_version` still equals this value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReorderResponse {
    pub success: bool,
    /// `sections_version` after this reorder
    pub version: i64,
    /// Pairs written
    pub applied: u64,
    /// Pairs ignored: unknown ids, other companies' sections and superseded duplicates
    pub skipped: u64,
}
