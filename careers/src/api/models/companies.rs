//! API request/response models for companies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::db::models::companies::CompanyDBResponse;
use crate::types::CompanyId;
use crate::validation::hex_color;

/// Partial branding update. Absent or null fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct CompanyUpdate {
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub logo_url: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub banner_url: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub culture_video_url: Option<String>,
    /// `#RRGGBB`
    #[validate(custom(function = "hex_color"))]
    pub primary_color: Option<String>,
    /// `#RRGGBB`
    #[validate(custom(function = "hex_color"))]
    pub secondary_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CompanyId,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub culture_video_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    /// Bumped by every write that can change section order
    pub sections_version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CompanyDBResponse> for CompanyResponse {
    fn from(db: CompanyDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            slug: db.slug,
            logo_url: db.logo_url,
            banner_url: db.banner_url,
            culture_video_url: db.culture_video_url,
            primary_color: db.primary_color,
            secondary_color: db.secondary_color,
            sections_version: db.sections_version,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
