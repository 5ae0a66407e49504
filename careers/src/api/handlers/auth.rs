use axum::{Json, extract::State, http::StatusCode};
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    api::{
        extractors::JsonBody,
        models::{
            auth::{AuthResponse, CurrentRecruiter, LoginRequest, MeResponse, RegisterRequest},
            companies::CompanyResponse,
        },
    },
    auth::{
        password::{self, Argon2Params},
        session,
    },
    db::{
        handlers::{Companies, Recruiters, Repository},
        models::{companies::CompanyCreateDBRequest, recruiters::RecruiterCreateDBRequest},
    },
    errors::{Error, Result},
    validation::{self, length_between},
};

fn invalid_credentials() -> Error {
    Error::Unauthenticated {
        message: Some("Invalid email or password".to_string()),
    }
}

/// Register a company together with its first recruiter
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    tag = "auth",
    summary = "Register company",
    responses(
        (status = 201, description = "Company and recruiter created", body = AuthResponse),
        (status = 400, description = "Invalid input or registration disabled"),
        (status = 409, description = "Slug or email already taken"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, JsonBody(request): JsonBody<RegisterRequest>) -> Result<(StatusCode, Json<AuthResponse>)> {
    if !state.config.auth.allow_registration {
        return Err(Error::BadRequest {
            message: "Company registration is disabled".to_string(),
        });
    }

    let request = request.normalized();
    let password_config = &state.config.auth.password;
    validation::validate_with(
        &request,
        length_between("password", &request.password, password_config.min_length, password_config.max_length),
    )?;

    let params = Argon2Params::from(password_config);
    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password, params))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let company = Companies::new(&mut tx)
        .create(&CompanyCreateDBRequest {
            name: request.company_name,
            slug: request.slug,
            primary_color: None,
            secondary_color: None,
        })
        .await?;

    let recruiter = Recruiters::new(&mut tx)
        .create(&RecruiterCreateDBRequest {
            company_id: company.id,
            email: request.email,
            name: request.name,
            password_hash,
        })
        .await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    info!(company = %company.slug, "Registered company");

    let token = session::create_session_token(&CurrentRecruiter::from(&recruiter), &state.config)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: recruiter.into(),
            company: company.into(),
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "auth",
    summary = "Login",
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid email or password"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, JsonBody(request): JsonBody<LoginRequest>) -> Result<Json<AuthResponse>> {
    let request = request.normalized();
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let recruiter = Recruiters::new(&mut conn)
        .get_by_email(&request.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password = request.password;
    let hash = recruiter.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(invalid_credentials());
    }

    let company = Companies::new(&mut conn)
        .get_by_id(recruiter.company_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Company".to_string(),
            id: recruiter.company_id.to_string(),
        })?;

    let token = session::create_session_token(&CurrentRecruiter::from(&recruiter), &state.config)?;

    Ok(Json(AuthResponse {
        token,
        user: recruiter.into(),
        company: company.into(),
    }))
}

/// The authenticated recruiter and their company
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    summary = "Current recruiter",
    responses(
        (status = 200, description = "Current recruiter", body = MeResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Recruiter no longer exists"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn me(State(state): State<AppState>, current: CurrentRecruiter) -> Result<Json<MeResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let recruiter = Recruiters::new(&mut conn).get_by_id(current.id).await?.ok_or_else(|| Error::NotFound {
        resource: "User".to_string(),
        id: current.id.to_string(),
    })?;

    let company = Companies::new(&mut conn)
        .get_by_id(recruiter.company_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Company".to_string(),
            id: recruiter.company_id.to_string(),
        })?;

    Ok(Json(MeResponse {
        user: recruiter.into(),
        company: CompanyResponse::from(company),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorBody;
    use crate::test_utils::{TEST_PASSWORD, bearer, create_test_app, create_test_app_with_config, create_test_company_with_recruiter, create_test_config};
    use serde_json::json;
    use sqlx::PgPool;

    fn register_body(slug: &str, email: &str) -> serde_json::Value {
        json!({
            "company_name": "TechCorp Solutions",
            "slug": slug,
            "name": "John Smith",
            "email": email,
            "password": "password123",
        })
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_login_me(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server
            .post("/api/auth/register")
            .json(&register_body("  TechCorp ", "Recruiter@TechCorp.com"))
            .await;
        response.assert_status(StatusCode::CREATED);
        let registered: AuthResponse = response.json();
        assert_eq!(registered.company.slug, "techcorp");
        assert_eq!(registered.company.sections_version, 0);
        assert_eq!(registered.user.email, "recruiter@techcorp.com");

        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": "RECRUITER@techcorp.com", "password": "password123"}))
            .await;
        response.assert_status_ok();
        let logged_in: AuthResponse = response.json();
        assert_eq!(logged_in.user.id, registered.user.id);

        let response = server.get("/api/auth/me").add_header("authorization", bearer(&logged_in.token)).await;
        response.assert_status_ok();
        let me: MeResponse = response.json();
        assert_eq!(me.user, registered.user);
        assert_eq!(me.company.id, registered.company.id);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_duplicate_slug_case_insensitive(pool: PgPool) {
        let server = create_test_app(pool).await;

        server
            .post("/api/auth/register")
            .json(&register_body("techcorp", "first@techcorp.com"))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/auth/register")
            .json(&register_body("TechCorp", "second@techcorp.com"))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        let body: ErrorBody = response.json();
        assert_eq!(body.error, "A company with this slug already exists");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_duplicate_email_rolls_back_company(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        server
            .post("/api/auth/register")
            .json(&register_body("techcorp", "recruiter@techcorp.com"))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/auth/register")
            .json(&register_body("othercorp", "recruiter@techcorp.com"))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        // The company insert shared the failed transaction
        server.get("/api/companies/slug/othercorp").await.assert_status_not_found();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_validation(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server
            .post("/api/auth/register")
            .json(&json!({
                "company_name": "",
                "slug": "tech corp",
                "name": "John",
                "email": "not-an-email",
                "password": "short",
            }))
            .await;
        response.assert_status_bad_request();
        let body: ErrorBody = response.json();
        let fields: Vec<_> = body.details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["company_name", "email", "password", "slug"]);
        assert_eq!(body.details[3].message, "slug may only contain lowercase letters, numbers and hyphens");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_registration_disabled(pool: PgPool) {
        let mut config = create_test_config();
        config.auth.allow_registration = false;
        let server = create_test_app_with_config(pool, config).await;

        let response = server
            .post("/api/auth/register")
            .json(&register_body("techcorp", "recruiter@techcorp.com"))
            .await;
        response.assert_status_bad_request();
        let body: ErrorBody = response.json();
        assert_eq!(body.error, "Company registration is disabled");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_failures_are_indistinguishable(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        create_test_company_with_recruiter(&pool, "techcorp").await;

        let wrong_password = server
            .post("/api/auth/login")
            .json(&json!({"email": "recruiter@techcorp.com", "password": "wrong-password"}))
            .await;
        wrong_password.assert_status_unauthorized();

        let unknown_email = server
            .post("/api/auth/login")
            .json(&json!({"email": "nobody@techcorp.com", "password": TEST_PASSWORD}))
            .await;
        unknown_email.assert_status_unauthorized();

        let a: ErrorBody = wrong_password.json();
        let b: ErrorBody = unknown_email.json();
        assert_eq!(a.error, "Invalid email or password");
        assert_eq!(a.error, b.error);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_me_requires_token(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server.get("/api/auth/me").await;
        response.assert_status_unauthorized();
        let body: ErrorBody = response.json();
        assert_eq!(body.error, "Access token required");

        server
            .get("/api/auth/me")
            .add_header("authorization", "Bearer not-a-jwt")
            .await
            .assert_status_unauthorized();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_me_recruiter_deleted(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        let (_, recruiter, token) = create_test_company_with_recruiter(&pool, "techcorp").await;

        let mut conn = pool.acquire().await.unwrap();
        assert!(Recruiters::new(&mut conn).delete(recruiter.id).await.unwrap());

        let response = server.get("/api/auth/me").add_header("authorization", bearer(&token)).await;
        response.assert_status_not_found();
        let body: ErrorBody = response.json();
        assert_eq!(body.error, "User not found");
    }
}
