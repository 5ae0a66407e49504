//! Test utilities for integration testing (available with `test-utils` feature).

use sqlx::PgPool;
use std::time::Duration;

use crate::{
    AppState,
    api::models::{auth::CurrentRecruiter, sections::SectionType},
    auth::{
        password::{self, Argon2Params},
        session,
    },
    config::{Config, PoolSettings},
    db::{
        handlers::{Companies, Recruiters, Repository, Sections},
        models::{
            companies::{CompanyCreateDBRequest, CompanyDBResponse},
            recruiters::RecruiterCreateDBRequest,
            sections::{SectionCreateDBRequest, SectionDBResponse},
        },
    },
    types::CompanyId,
};

/// Password every fixture recruiter is created with.
pub const TEST_PASSWORD: &str = "password123";

pub fn create_test_config() -> Config {
    let mut config = Config {
        secret_key: Some("test-secret-key-for-jwt".to_string()),
        ..Default::default()
    };
    config.database.pool = PoolSettings {
        max_connections: 4,
        min_connections: 0,
        ..Default::default()
    };
    config.auth.security.jwt_expiry = Duration::from_secs(3600);
    // Cheap hashing keeps the auth tests fast
    config.auth.password.argon2_memory_kib = 128;
    config.auth.password.argon2_iterations = 1;
    config.auth.password.argon2_parallelism = 1;
    config
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::builder().db(pool).config(create_test_config()).build()
}

/// Full application over the test pool, migrations already applied by `#[sqlx::test]`.
#[cfg(test)]
pub async fn create_test_app(pool: PgPool) -> axum_test::TestServer {
    create_test_app_with_config(pool, create_test_config()).await
}

#[cfg(test)]
pub async fn create_test_app_with_config(pool: PgPool, config: Config) -> axum_test::TestServer {
    crate::Application::new_with_pool(config, Some(pool))
        .await
        .expect("Failed to create application")
        .into_test_server()
}

pub async fn create_test_company(pool: &PgPool, slug: &str) -> CompanyDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Companies::new(&mut conn)
        .create(&CompanyCreateDBRequest {
            name: format!("{slug} Inc"),
            slug: slug.to_string(),
            primary_color: None,
            secondary_color: None,
        })
        .await
        .expect("Failed to create test company")
}

pub async fn create_test_section(pool: &PgPool, company_id: CompanyId, title: &str, order_index: i32, is_visible: bool) -> SectionDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Sections::new(&mut conn)
        .create(&SectionCreateDBRequest {
            company_id,
            section_type: SectionType::Custom,
            title: title.to_string(),
            content: format!("{title} content"),
            media_url: None,
            order_index,
            is_visible,
        })
        .await
        .expect("Failed to create test section")
}

/// A company plus one recruiter, returning the recruiter and a bearer token for them.
pub async fn create_test_company_with_recruiter(pool: &PgPool, slug: &str) -> (CompanyDBResponse, CurrentRecruiter, String) {
    let config = create_test_config();
    let company = create_test_company(pool, slug).await;

    let password_hash =
        password::hash_password(TEST_PASSWORD, Argon2Params::from(&config.auth.password)).expect("Failed to hash test password");

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let recruiter = Recruiters::new(&mut conn)
        .create(&RecruiterCreateDBRequest {
            company_id: company.id,
            email: format!("recruiter@{slug}.com"),
            name: "Test Recruiter".to_string(),
            password_hash,
        })
        .await
        .expect("Failed to create test recruiter");

    let current = CurrentRecruiter::from(&recruiter);
    let token = session::create_session_token(&current, &config).expect("Failed to create session token");
    (company, current, token)
}

/// `Authorization` header value for a token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
