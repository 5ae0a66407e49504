use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    AppState,
    api::{
        extractors::{ApiPath, JsonBody},
        models::{
            SuccessResponse,
            auth::CurrentRecruiter,
            jobs::{JobCreate, JobResponse, JobUpdate, ListPublicJobsQuery},
        },
    },
    auth::permissions::require_company,
    db::{
        handlers::{Jobs, Repository, jobs::JobFilter},
        models::jobs::{JobCreateDBRequest, JobDBResponse, JobUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{CompanyId, JobId, Operation},
};

async fn owned_job(state: &AppState, current: &CurrentRecruiter, id: JobId, action: Operation) -> Result<JobDBResponse> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let job = Jobs::new(&mut conn).get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Job".to_string(),
        id: id.to_string(),
    })?;

    require_company(current, job.company_id, action, "job")?;
    Ok(job)
}

/// Public job board: active jobs, newest first
#[utoipa::path(
    get,
    path = "/api/jobs/public/{company_id}",
    tag = "jobs",
    summary = "List public jobs",
    params(("company_id" = uuid::Uuid, Path, description = "Company ID"), ListPublicJobsQuery),
    responses(
        (status = 200, description = "Active jobs", body = Vec<JobResponse>),
        (status = 400, description = "Invalid company ID or filter"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_public_jobs(
    State(state): State<AppState>,
    ApiPath(company_id): ApiPath<CompanyId>,
    Query(query): Query<ListPublicJobsQuery>,
) -> Result<Json<Vec<JobResponse>>> {
    let filter = JobFilter {
        search: query.search,
        location: query.location,
        job_type: query.job_type,
        ..JobFilter::public(company_id)
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let jobs = Jobs::new(&mut conn).list(&filter).await?;

    Ok(Json(jobs.into_iter().map(JobResponse::from).collect()))
}

/// Every job of the caller's company, newest first
#[utoipa::path(
    get,
    path = "/api/jobs/company/{company_id}",
    tag = "jobs",
    summary = "List company jobs",
    params(("company_id" = uuid::Uuid, Path, description = "Company ID")),
    responses(
        (status = 200, description = "All jobs including inactive", body = Vec<JobResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Company belongs to another tenant"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_company_jobs(
    State(state): State<AppState>,
    current: CurrentRecruiter,
    ApiPath(company_id): ApiPath<CompanyId>,
) -> Result<Json<Vec<JobResponse>>> {
    require_company(&current, company_id, Operation::Read, "jobs")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let jobs = Jobs::new(&mut conn).list(&JobFilter::owner(company_id)).await?;

    Ok(Json(jobs.into_iter().map(JobResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "jobs",
    summary = "Get job",
    params(("id" = uuid::Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job", body = JobResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Job belongs to another tenant"),
        (status = 404, description = "Job not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_job(State(state): State<AppState>, current: CurrentRecruiter, ApiPath(id): ApiPath<JobId>) -> Result<Json<JobResponse>> {
    let job = owned_job(&state, &current, id, Operation::Read).await?;
    Ok(Json(job.into()))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "jobs",
    summary = "Create job",
    request_body = JobCreate,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Company belongs to another tenant"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_job(
    State(state): State<AppState>,
    current: CurrentRecruiter,
    JsonBody(create): JsonBody<JobCreate>,
) -> Result<(StatusCode, Json<JobResponse>)> {
    create.validate()?;

    require_company(&current, create.company_id, Operation::Create, "job")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let job = Jobs::new(&mut conn).create(&JobCreateDBRequest::from(create)).await?;

    Ok((StatusCode::CREATED, Json(job.into())))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    tag = "jobs",
    summary = "Update job",
    request_body = JobUpdate,
    params(("id" = uuid::Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Updated job", body = JobResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Job belongs to another tenant"),
        (status = 404, description = "Job not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_job(
    State(state): State<AppState>,
    current: CurrentRecruiter,
    ApiPath(id): ApiPath<JobId>,
    JsonBody(update): JsonBody<JobUpdate>,
) -> Result<Json<JobResponse>> {
    update.validate()?;

    owned_job(&state, &current, id, Operation::Update).await?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let job = Jobs::new(&mut conn).update(id, &JobUpdateDBRequest::from(update)).await?;

    Ok(Json(job.into()))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    tag = "jobs",
    summary = "Delete job",
    params(("id" = uuid::Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Job belongs to another tenant"),
        (status = 404, description = "Job not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_job(State(state): State<AppState>, current: CurrentRecruiter, ApiPath(id): ApiPath<JobId>) -> Result<Json<SuccessResponse>> {
    owned_job(&state, &current, id, Operation::Delete).await?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    if !Jobs::new(&mut conn).delete(id).await? {
        return Err(Error::NotFound {
            resource: "Job".to_string(),
            id: id.to_string(),
        });
    }

    Ok(Json(SuccessResponse::ok()))
}
