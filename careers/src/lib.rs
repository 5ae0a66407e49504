//! # careers: multi-tenant careers page builder
//!
//! `careers` serves the API behind company careers pages. Each company (tenant) owns an ordered
//! list of content sections (about, values, benefits, ...) and a set of job listings. Recruiters
//! log in to edit their own company's page; candidates read the public view by company slug.
//!
//! ## Section ordering
//!
//! The display order of a page is ascending `order_index`. Recruiters rearrange sections in a
//! client-side draft ([`ordering::draft::SectionDraft`]) and commit the whole order at once with
//! `PUT /api/sections/bulk/order`. The server applies a commit in one transaction while holding a
//! lock on the company row, and bumps the company's `sections_version`. A commit carrying an
//! `expected_version` that no longer matches is rejected with `409 Conflict`, so one editor cannot
//! silently overwrite another's work.
//!
//! ## Architecture
//!
//! Built on [Axum](https://github.com/tokio-rs/axum) with PostgreSQL through `sqlx`:
//!
//! - [`api`]: handlers and request/response models
//! - [`auth`]: password hashing, JWT sessions and tenant checks
//! - [`db`]: repositories over `&mut PgConnection`
//! - [`ordering`]: move semantics, the draft buffer and an HTTP client for the sections API
//! - [`config`]: YAML plus environment configuration
//!
//! ## Lifecycle
//!
//! 1. **Create**: [`Application::new`] connects to the database, runs migrations and optionally
//!    seeds the demo tenants
//! 2. **Serve**: [`Application::serve`] binds to a TCP port and handles requests
//! 3. **Shutdown**: when the shutdown future resolves, in-flight requests drain and the pool closes

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod ordering;
pub mod seed;
pub mod telemetry;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use std::time::Duration;

use axum::{
    Router,
    http::{self, HeaderName, HeaderValue, Method},
    routing::{get, post, put},
};
use bon::Builder;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;

use crate::{config::CorsOrigin, openapi::ApiDoc, ordering::client::SECTIONS_VERSION_HEADER};

/// Shared state handed to every handler.
///
/// ```ignore
/// let state = AppState::builder().db(pool).config(config).build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the careers database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect the pool and run migrations
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let pool_settings = &config.database.pool;

    let mut options = PgPoolOptions::new()
        .max_connections(pool_settings.max_connections)
        .min_connections(pool_settings.min_connections)
        .acquire_timeout(Duration::from_secs(pool_settings.acquire_timeout_secs));

    // 0 disables the timeout
    if pool_settings.idle_timeout_secs > 0 {
        options = options.idle_timeout(Duration::from_secs(pool_settings.idle_timeout_secs));
    }
    if pool_settings.max_lifetime_secs > 0 {
        options = options.max_lifetime(Duration::from_secs(pool_settings.max_lifetime_secs));
    }

    let pool = options.connect(&config.database.url).await?;
    migrator().run(&pool).await?;

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let allowed = &config.auth.security.cors.allowed_origins;

    // A list may not contain "*", so a wildcard anywhere means any origin
    let allow_origin = if allowed.iter().any(|origin| matches!(origin, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in allowed {
            if let CorsOrigin::Url(url) = origin {
                // Origins never carry a path; Url::as_str would add a trailing slash
                origins.push(url.origin().ascii_serialization().parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .allow_credentials(config.auth.security.cors.allow_credentials)
        .expose_headers([HeaderName::from_static(SECTIONS_VERSION_HEADER)]);

    if let Some(max_age) = config.auth.security.cors.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers::{auth, companies, health, jobs, sections};

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me));

    let company_routes = Router::new()
        .route("/slug/{slug}", get(companies::get_company_by_slug))
        .route("/{id}", put(companies::update_company));

    // `/bulk/order` is static, so it wins over `/{id}` for PUT
    let section_routes = Router::new()
        .route("/", post(sections::create_section))
        .route("/public/{company_id}", get(sections::list_public_sections))
        .route("/company/{company_id}", get(sections::list_company_sections))
        .route("/bulk/order", put(sections::reorder_sections))
        .route("/{id}", put(sections::update_section).delete(sections::delete_section));

    let job_routes = Router::new()
        .route("/", post(jobs::create_job))
        .route("/public/{company_id}", get(jobs::list_public_jobs))
        .route("/company/{company_id}", get(jobs::list_company_jobs))
        .route("/{id}", get(jobs::get_job).put(jobs::update_job).delete(jobs::delete_job));

    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/openapi.json", get(|| async { axum::Json(ApiDoc::openapi()) }))
        .nest("/auth", auth_routes)
        .nest("/companies", company_routes)
        .nest("/sections", section_routes)
        .nest("/jobs", job_routes);

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

/// Main application struct that owns all resources
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Like [`Application::new`], reusing an existing pool when one is given
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!("Starting careers service with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => {
                migrator().run(&pool).await?;
                pool
            }
            None => setup_database(&config).await?,
        };

        if config.seed_demo_data {
            let created = seed::seed_demo_data(&pool, &config).await?;
            info!("Demo data seeding created {} companies", created);
        }

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Careers service listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
