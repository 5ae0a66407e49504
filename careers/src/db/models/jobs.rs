//! Database models for job listings.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::api::models::jobs::{JobCreate, JobType, JobUpdate};
use crate::types::{CompanyId, JobId};

/// Database request for creating a job
#[derive(Debug, Clone)]
pub struct JobCreateDBRequest {
    pub company_id: CompanyId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: JobType,
    pub department: Option<String>,
    pub salary_range: Option<String>,
    pub requirements: Option<String>,
    pub is_active: bool,
}

impl From<JobCreate> for JobCreateDBRequest {
    fn from(api: JobCreate) -> Self {
        Self {
            company_id: api.company_id,
            title: api.title,
            description: api.description,
            location: api.location,
            job_type: api.job_type.unwrap_or_default(),
            department: api.department,
            salary_range: api.salary_range,
            requirements: api.requirements,
            is_active: api.is_active.unwrap_or(true),
        }
    }
}

/// Database request for updating a job
#[derive(Debug, Clone, Default)]
pub struct JobUpdateDBRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub department: Option<String>,
    pub salary_range: Option<String>,
    pub requirements: Option<String>,
    pub is_active: Option<bool>,
}

impl From<JobUpdate> for JobUpdateDBRequest {
    fn from(api: JobUpdate) -> Self {
        Self {
            title: api.title,
            description: api.description,
            location: api.location,
            job_type: api.job_type,
            department: api.department,
            salary_range: api.salary_range,
            requirements: api.requirements,
            is_active: api.is_active,
        }
    }
}

/// Database response for a job
#[derive(Debug, Clone, FromRow)]
pub struct JobDBResponse {
    pub id: JobId,
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
