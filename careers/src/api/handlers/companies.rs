use axum::{Json, extract::State};
use validator::Validate;

use crate::{
    AppState,
    api::{
        extractors::{ApiPath, JsonBody},
        models::{
            auth::CurrentRecruiter,
            companies::{CompanyResponse, CompanyUpdate},
        },
    },
    auth::permissions::require_company,
    db::{
        handlers::{Companies, Repository},
        models::companies::CompanyUpdateDBRequest,
    },
    errors::{Error, Result},
    types::{CompanyId, Operation},
};

/// Public company lookup for a careers page
#[utoipa::path(
    get,
    path = "/api/companies/slug/{slug}",
    tag = "companies",
    summary = "Get company by slug",
    params(("slug" = String, Path, description = "Company slug, matched case-insensitively")),
    responses(
        (status = 200, description = "Company", body = CompanyResponse),
        (status = 400, description = "Invalid slug"),
        (status = 404, description = "Company not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_company_by_slug(State(state): State<AppState>, ApiPath(slug): ApiPath<String>) -> Result<Json<CompanyResponse>> {
    let len = slug.chars().count();
    if !(1..=50).contains(&len) {
        return Err(Error::BadRequest {
            message: "Invalid slug".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let company = Companies::new(&mut conn).get_by_slug(&slug).await?.ok_or_else(|| Error::NotFound {
        resource: "Company".to_string(),
        id: slug.clone(),
    })?;

    Ok(Json(company.into()))
}

/// Update a company's name and branding
#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    tag = "companies",
    summary = "Update company",
    request_body = CompanyUpdate,
    params(("id" = uuid::Uuid, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Updated company", body = CompanyResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Company belongs to another tenant"),
        (status = 404, description = "Company not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_company(
    State(state): State<AppState>,
    current: CurrentRecruiter,
    ApiPath(id): ApiPath<CompanyId>,
    JsonBody(update): JsonBody<CompanyUpdate>,
) -> Result<Json<CompanyResponse>> {
    require_company(&current, id, Operation::Update, "company")?;

    update.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let company = Companies::new(&mut conn).update(id, &CompanyUpdateDBRequest::from(update)).await?;

    Ok(Json(company.into()))
}
