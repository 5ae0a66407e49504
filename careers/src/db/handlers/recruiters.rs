//! Database repository for recruiters.

use std::collections::HashMap;

use sqlx::PgConnection;
use tracing::instrument;

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::recruiters::{RecruiterCreateDBRequest, RecruiterDBResponse, RecruiterUpdateDBRequest},
};
use crate::types::{CompanyId, RecruiterId, abbrev_uuid};

/// Filter for listing recruiters
#[derive(Debug, Clone)]
pub struct RecruiterFilter {
    pub company_id: CompanyId,
}

pub struct Recruiters<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Recruiters<'c> {
    type CreateRequest = RecruiterCreateDBRequest;
    type UpdateRequest = RecruiterUpdateDBRequest;
    type Response = RecruiterDBResponse;
    type Id = RecruiterId;
    type Filter = RecruiterFilter;

    #[instrument(skip(self, request), fields(company_id = %abbrev_uuid(&request.company_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let recruiter = sqlx::query_as::<_, RecruiterDBResponse>(
            r#"
            INSERT INTO recruiters (company_id, email, name, password_hash)
            VALUES ($1, LOWER($2), $3, $4)
            RETURNING *
            "#,
        )
        .bind(request.company_id)
        .bind(&request.email)
        .bind(&request.name)
        .bind(&request.password_hash)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(recruiter)
    }

    #[instrument(skip(self), fields(recruiter_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let recruiter = sqlx::query_as::<_, RecruiterDBResponse>("SELECT * FROM recruiters WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(recruiter)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<RecruiterId>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let recruiters = sqlx::query_as::<_, RecruiterDBResponse>("SELECT * FROM recruiters WHERE id = ANY($1)")
            .bind(ids.as_slice())
            .fetch_all(&mut *self.db)
            .await?;

        Ok(recruiters.into_iter().map(|r| (r.id, r)).collect())
    }

    #[instrument(skip(self, filter), fields(company_id = %abbrev_uuid(&filter.company_id)), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let recruiters = sqlx::query_as::<_, RecruiterDBResponse>("SELECT * FROM recruiters WHERE company_id = $1 ORDER BY created_at ASC")
            .bind(filter.company_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(recruiters)
    }

    #[instrument(skip(self), fields(recruiter_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM recruiters WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(recruiter_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let recruiter = sqlx::query_as::<_, RecruiterDBResponse>(
            r#"
            UPDATE recruiters SET
                name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.password_hash)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(recruiter)
    }
}

impl<'c> Recruiters<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Case-insensitive email lookup
    #[instrument(skip(self, email), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<RecruiterDBResponse>> {
        let recruiter = sqlx::query_as::<_, RecruiterDBResponse>("SELECT * FROM recruiters WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(recruiter)
    }
}
