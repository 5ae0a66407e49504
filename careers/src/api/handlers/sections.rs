//! Careers page sections.
//!
//! Display order is ascending `order_index`. Reads never renumber anything: gaps and ties left by
//! deletes or single-section edits stay until the owner commits a full reorder through
//! `PUT /api/sections/bulk/order`, which is the only multi-row write.

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    api::{
        extractors::{ApiPath, JsonBody},
        models::{
            SuccessResponse,
            auth::CurrentRecruiter,
            sections::{ReorderRequest, ReorderResponse, SectionCreate, SectionResponse, SectionUpdate},
        },
    },
    auth::permissions::require_company,
    db::{
        handlers::{
            Repository, Sections,
            sections::{ReorderResult, SectionFilter},
        },
        models::sections::{SectionCreateDBRequest, SectionDBResponse, SectionUpdateDBRequest},
    },
    errors::{Error, Result},
    ordering::client::SECTIONS_VERSION_HEADER,
    types::{CompanyId, Operation, SectionId},
};

/// Look up a section and check the caller's company owns it.
async fn owned_section(state: &AppState, current: &CurrentRecruiter, id: SectionId, action: Operation) -> Result<SectionDBResponse> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let section = Sections::new(&mut conn).get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Section".to_string(),
        id: id.to_string(),
    })?;

    require_company(current, section.company_id, action, "section")?;
    Ok(section)
}

/// Visible sections of a company, in display order
#[utoipa::path(
    get,
    path = "/api/sections/public/{company_id}",
    tag = "sections",
    summary = "List public sections",
    params(("company_id" = uuid::Uuid, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Visible sections, ascending order_index", body = Vec<SectionResponse>),
        (status = 400, description = "Invalid company ID"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_public_sections(
    State(state): State<AppState>,
    ApiPath(company_id): ApiPath<CompanyId>,
) -> Result<Json<Vec<SectionResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let sections = Sections::new(&mut conn).list(&SectionFilter::public(company_id)).await?;

    Ok(Json(sections.into_iter().map(SectionResponse::from).collect()))
}

/// Every section of the caller's company, with the version the listing reflects
#[utoipa::path(
    get,
    path = "/api/sections/company/{company_id}",
    tag = "sections",
    summary = "List company sections",
    params(("company_id" = uuid::Uuid, Path, description = "Company ID")),
    responses(
        (status = 200, description = "All sections, ascending order_index", body = Vec<SectionResponse>,
            headers(("x-sections-version" = i64, description = "Company sections_version at read time"))),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Company belongs to another tenant"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_company_sections(
    State(state): State<AppState>,
    current: CurrentRecruiter,
    ApiPath(company_id): ApiPath<CompanyId>,
) -> Result<([(&'static str, String); 1], Json<Vec<SectionResponse>>)> {
    require_company(&current, company_id, Operation::Read, "sections")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let (sections, version) = Sections::new(&mut conn).list_with_version(company_id).await?;

    Ok((
        [(SECTIONS_VERSION_HEADER, version.to_string())],
        Json(sections.into_iter().map(SectionResponse::from).collect()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/sections",
    tag = "sections",
    summary = "Create section",
    request_body = SectionCreate,
    responses(
        (status = 201, description = "Section created", body = SectionResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Company belongs to another tenant"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_section(
    State(state): State<AppState>,
    current: CurrentRecruiter,
    JsonBody(create): JsonBody<SectionCreate>,
) -> Result<(StatusCode, Json<SectionResponse>)> {
    create.validate()?;

    require_company(&current, create.company_id, Operation::Create, "section")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let section = Sections::new(&mut conn).create(&SectionCreateDBRequest::from(create)).await?;

    Ok((StatusCode::CREATED, Json(section.into())))
}

#[utoipa::path(
    put,
    path = "/api/sections/{id}",
    tag = "sections",
    summary = "Update section",
    request_body = SectionUpdate,
    params(("id" = uuid::Uuid, Path, description = "Section ID")),
    responses(
        (status = 200, description = "Updated section", body = SectionResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Section belongs to another tenant"),
        (status = 404, description = "Section not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_section(
    State(state): State<AppState>,
    current: CurrentRecruiter,
    ApiPath(id): ApiPath<SectionId>,
    JsonBody(update): JsonBody<SectionUpdate>,
) -> Result<Json<SectionResponse>> {
    update.validate()?;

    owned_section(&state, &current, id, Operation::Update).await?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let section = Sections::new(&mut conn).update(id, &SectionUpdateDBRequest::from(update)).await?;

    Ok(Json(section.into()))
}

/// Apply a full or partial ordering for the caller's company in one transaction
#[utoipa::path(
    put,
    path = "/api/sections/bulk/order",
    tag = "sections",
    summary = "Reorder sections",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Reorder applied; pairs for unknown or foreign sections are skipped", body = ReorderResponse),
        (status = 400, description = "Empty list, bad id or negative index"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "expected_version is stale"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(company_id = %current.company_id))]
pub async fn reorder_sections(
    State(state): State<AppState>,
    current: CurrentRecruiter,
    JsonBody(request): JsonBody<ReorderRequest>,
) -> Result<Json<ReorderResponse>> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let result = Sections::new(&mut conn)
        .reorder(current.company_id, &request.sections, request.expected_version)
        .await?;

    match result {
        ReorderResult::Applied(outcome) => {
            info!(
                version = outcome.version,
                applied = outcome.applied,
                skipped = outcome.skipped,
                "Sections reordered"
            );
            Ok(Json(ReorderResponse {
                success: true,
                version: outcome.version,
                applied: outcome.applied,
                skipped: outcome.skipped,
            }))
        }
        ReorderResult::Stale { current_version } => Err(Error::Conflict {
            message: format!("Sections have changed since they were loaded (current version {current_version})"),
        }),
    }
}

#[utoipa::path(
    delete,
    path = "/api/sections/{id}",
    tag = "sections",
    summary = "Delete section",
    params(("id" = uuid::Uuid, Path, description = "Section ID")),
    responses(
        (status = 200, description = "Section deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Section belongs to another tenant"),
        (status = 404, description = "Section not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_section(
    State(state): State<AppState>,
    current: CurrentRecruiter,
    ApiPath(id): ApiPath<SectionId>,
) -> Result<Json<SuccessResponse>> {
    owned_section(&state, &current, id, Operation::Delete).await?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    if !Sections::new(&mut conn).delete(id).await? {
        return Err(Error::NotFound {
            resource: "Section".to_string(),
            id: id.to_string(),
        });
    }

    Ok(Json(SuccessResponse::ok()))
}
