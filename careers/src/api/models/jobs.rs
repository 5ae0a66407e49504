//! API request/response models for job listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::db::models::jobs::JobDBResponse;
use crate::types::{CompanyId, JobId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct JobCreate {
    #[schema(value_type = String, format = "uuid")]
    pub company_id: CompanyId,
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(max = 10000, message = "description must be at most 10000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 200, message = "location must be at most 200 characters"))]
    pub location: Option<String>,
    /// Defaults to `full-time`
    pub job_type: Option<JobType>,
    #[validate(length(max = 100, message = "department must be at most 100 characters"))]
    pub department: Option<String>,
    #[validate(length(max = 100, message = "salary_range must be at most 100 characters"))]
    pub salary_range: Option<String>,
    #[validate(length(max = 10000, message = "requirements must be at most 10000 characters"))]
    pub requirements: Option<String>,
    /// Defaults to true
    pub is_active: Option<bool>,
}

/// Partial update. Absent or null fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct JobUpdate {
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 10000, message = "description must be at most 10000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 200, message = "location must be at most 200 characters"))]
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    #[validate(length(max = 100, message = "department must be at most 100 characters"))]
    pub department: Option<String>,
    #[validate(length(max = 100, message = "salary_range must be at most 100 characters"))]
    pub salary_range: Option<String>,
    #[validate(length(max = 10000, message = "requirements must be at most 10000 characters"))]
    pub requirements: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: JobId,
    #[schema(value_type = String, format = "uuid")]
    pub company_id: CompanyId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: JobType,
    pub department: Option<String>,
    pub salary_range: Option<String>,
    pub requirements: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobDBResponse> for JobResponse {
    fn from(db: JobDBResponse) -> Self {
        Self {
            id: db.id,
            company_id: db.company_id,
            title: db.title,
            description: db.description,
            location: db.location,
            job_type: db.job_type,
            department: db.department,
            salary_range: db.salary_range,
            requirements: db.requirements,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Filters for the public job board
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListPublicJobsQuery {
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
    /// Case-insensitive substring of location
    pub location: Option<String>,
    /// Exact job type
    pub job_type: Option<JobType>,
}
