//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//! - **[`extractors`]**: body and path extractors that reject with the JSON error shape
//!
//! # API Structure
//!
//! - **Authentication** (`/api/auth/*`): register, login, current recruiter
//! - **Companies** (`/api/companies/*`): public lookup by slug, branding updates
//! - **Sections** (`/api/sections/*`): careers page sections and the bulk reorder
//! - **Jobs** (`/api/jobs/*`): job listings and the public job board
//!
//! OpenAPI documentation is served at `/docs`.

pub mod extractors;
pub mod handlers;
pub mod models;
