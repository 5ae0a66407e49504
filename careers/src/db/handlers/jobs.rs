//! Database repository for job listings.

use std::collections::HashMap;

use sqlx::{PgConnection, QueryBuilder};
use tracing::instrument;

use crate::api::models::jobs::JobType;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::jobs::{JobCreateDBRequest, JobDBResponse, JobUpdateDBRequest},
};
use crate::types::{CompanyId, JobId, abbrev_uuid};

/// Filter for listing a company's jobs
#[derive(Debug, Clone)]
pub struct JobFilter {
    pub company_id: CompanyId,
    pub active_only: bool,
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
    /// Case-insensitive substring of location
    pub location: Option<String>,
    pub job_type: Option<JobType>,
}

impl JobFilter {
    /// Every job of a company, for its recruiters
    pub fn owner(company_id: CompanyId) -> Self {
        Self {
            company_id,
            active_only: false,
            search: None,
            location: None,
            job_type: None,
        }
    }

    /// Active jobs only, for the public board
    pub fn public(company_id: CompanyId) -> Self {
        Self {
            active_only: true,
            ..Self::owner(company_id)
        }
    }
}

/// `%value%` with LIKE metacharacters escaped, so user input matches literally.
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub struct Jobs<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Jobs<'c> {
    type CreateRequest = JobCreateDBRequest;
    type UpdateRequest = JobUpdateDBRequest;
    type Response = JobDBResponse;
    type Id = JobId;
    type Filter = JobFilter;

    #[instrument(skip(self, request), fields(company_id = %abbrev_uuid(&request.company_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let job = sqlx::query_as::<_, JobDBResponse>(
            r#"
            INSERT INTO jobs (company_id, title, description, location, job_type, department, salary_range, requirements, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(request.company_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.job_type)
        .bind(&request.department)
        .bind(&request.salary_range)
        .bind(&request.requirements)
        .bind(request.is_active)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(job)
    }

    #[instrument(skip(self), fields(job_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let job = sqlx::query_as::<_, JobDBResponse>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(job)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<JobId>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let jobs = sqlx::query_as::<_, JobDBResponse>("SELECT * FROM jobs WHERE id = ANY($1)")
            .bind(ids.as_slice())
            .fetch_all(&mut *self.db)
            .await?;

        Ok(jobs.into_iter().map(|j| (j.id, j)).collect())
    }

    #[instrument(skip(self, filter), fields(company_id = %abbrev_uuid(&filter.company_id), active_only = filter.active_only), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new("SELECT * FROM jobs WHERE company_id = ");
        query.push_bind(filter.company_id);

        if filter.active_only {
            query.push(" AND is_active");
        }

        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = contains_pattern(search.trim());
            query.push(" AND (title ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR COALESCE(description, '') ILIKE ");
            query.push_bind(pattern);
            query.push(")");
        }

        if let Some(location) = filter.location.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(" AND COALESCE(location, '') ILIKE ");
            query.push_bind(contains_pattern(location.trim()));
        }

        if let Some(job_type) = filter.job_type {
            query.push(" AND job_type = ");
            query.push_bind(job_type);
        }

        query.push(" ORDER BY created_at DESC, id DESC");

        let jobs = query.build_query_as::<JobDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(jobs)
    }

    #[instrument(skip(self), fields(job_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(job_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let job = sqlx::query_as::<_, JobDBResponse>(
            r#"
            UPDATE jobs SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                job_type = COALESCE($5, job_type),
                department = COALESCE($6, department),
                salary_range = COALESCE($7, salary_range),
                requirements = COALESCE($8, requirements),
                is_active = COALESCE($9, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.job_type)
        .bind(&request.department)
        .bind(&request.salary_range)
        .bind(&request.requirements)
        .bind(request.is_active)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(job)
    }
}

impl<'c> Jobs<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}
