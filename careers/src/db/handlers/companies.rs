//! Database repository for companies.

use std::collections::HashMap;

use sqlx::PgConnection;
use tracing::instrument;

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::companies::{CompanyCreateDBRequest, CompanyDBResponse, CompanyUpdateDBRequest},
};
use crate::types::{CompanyId, abbrev_uuid};

pub const DEFAULT_PRIMARY_COLOR: &str = "#2563eb";
pub const DEFAULT_SECONDARY_COLOR: &str = "#1e40af";

/// Filter for listing companies
#[derive(Debug, Clone)]
pub struct CompanyFilter {
    pub skip: i64,
    pub limit: i64,
}

impl CompanyFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

pub struct Companies<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Companies<'c> {
    type CreateRequest = CompanyCreateDBRequest;
    type UpdateRequest = CompanyUpdateDBRequest;
    type Response = CompanyDBResponse;
    type Id = CompanyId;
    type Filter = CompanyFilter;

    #[instrument(skip(self, request), fields(slug = %request.slug), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let company = sqlx::query_as::<_, CompanyDBResponse>(
            r#"
            INSERT INTO companies (name, slug, primary_color, secondary_color)
            VALUES ($1, $2, COALESCE($3, $5), COALESCE($4, $6))
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.slug)
        .bind(&request.primary_color)
        .bind(&request.secondary_color)
        .bind(DEFAULT_PRIMARY_COLOR)
        .bind(DEFAULT_SECONDARY_COLOR)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(company)
    }

    #[instrument(skip(self), fields(company_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let company = sqlx::query_as::<_, CompanyDBResponse>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(company)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<CompanyId>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let companies = sqlx::query_as::<_, CompanyDBResponse>("SELECT * FROM companies WHERE id = ANY($1)")
            .bind(ids.as_slice())
            .fetch_all(&mut *self.db)
            .await?;

        Ok(companies.into_iter().map(|c| (c.id, c)).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let companies = sqlx::query_as::<_, CompanyDBResponse>("SELECT * FROM companies ORDER BY created_at DESC LIMIT $1 OFFSET $2")
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(companies)
    }

    #[instrument(skip(self), fields(company_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(company_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let company = sqlx::query_as::<_, CompanyDBResponse>(
            r#"
            UPDATE companies SET
                name = COALESCE($2, name),
                logo_url = COALESCE($3, logo_url),
                banner_url = COALESCE($4, banner_url),
                culture_video_url = COALESCE($5, culture_video_url),
                primary_color = COALESCE($6, primary_color),
                secondary_color = COALESCE($7, secondary_color),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.logo_url)
        .bind(&request.banner_url)
        .bind(&request.culture_video_url)
        .bind(&request.primary_color)
        .bind(&request.secondary_color)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(company)
    }
}

impl<'c> Companies<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Case-insensitive slug lookup
    #[instrument(skip(self), err)]
    pub async fn get_by_slug(&mut self, slug: &str) -> Result<Option<CompanyDBResponse>> {
        let company = sqlx::query_as::<_, CompanyDBResponse>("SELECT * FROM companies WHERE LOWER(slug) = LOWER($1)")
            .bind(slug)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(company)
    }
}
