//! Database models for companies.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::api::models::companies::CompanyUpdate;
use crate::types::CompanyId;

/// Database request for creating a company
#[derive(Debug, Clone)]
pub struct CompanyCreateDBRequest {
    pub name: String,
    /// Already normalized to lowercase
    pub slug: String,
    /// Column default applies when `None`
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

/// Database request for updating a company's branding
#[derive(Debug, Clone, Default)]
pub struct CompanyUpdateDBRequest {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub culture_video_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

impl From<CompanyUpdate> for CompanyUpdateDBRequest {
    fn from(api: CompanyUpdate) -> Self {
        Self {
            name: api.name,
            logo_url: api.logo_url,
            banner_url: api.banner_url,
            culture_video_url: api.culture_video_url,
            primary_color: api.primary_color,
            secondary_color: api.secondary_color,
        }
    }
}

/// Database response for a company
#[derive(Debug, Clone, FromRow)]
pub struct CompanyDBResponse {
    pub id: CompanyId,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub culture_video_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub sections_version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
