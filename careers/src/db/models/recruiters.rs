//! Database models for recruiters.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::api::models::auth::{CurrentRecruiter, RecruiterResponse};
use crate::types::{CompanyId, RecruiterId};

/// Database request for creating a recruiter
#[derive(Debug, Clone)]
pub struct RecruiterCreateDBRequest {
    pub company_id: CompanyId,
    /// Stored lowercased
    pub email: String,
    pub name: String,
    /// Argon2id PHC string
    pub password_hash: String,
}

/// Database request for updating a recruiter
#[derive(Debug, Clone, Default)]
pub struct RecruiterUpdateDBRequest {
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

/// Database response for a recruiter
#[derive(Debug, Clone, FromRow)]
pub struct RecruiterDBResponse {
    pub id: RecruiterId,
    pub company_id: CompanyId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&RecruiterDBResponse> for CurrentRecruiter {
    fn from(db: &RecruiterDBResponse) -> Self {
        Self {
            id: db.id,
            email: db.email.clone(),
            name: db.name.clone(),
            company_id: db.company_id,
        }
    }
}

impl From<RecruiterDBResponse> for RecruiterResponse {
    fn from(db: RecruiterDBResponse) -> Self {
        Self {
            id: db.id,
            email: db.email,
            name: db.name,
        }
    }
}
