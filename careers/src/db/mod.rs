//! Data access layer over PostgreSQL.
//!
//! ```text
//! API handlers
//!      │
//!      ↓
//! db::handlers   (repositories: queries and transactions)
//!      │
//!      ↓
//! db::models     (row structs)
//!      │
//!      ↓
//! PostgreSQL     (schema in migrations/)
//! ```
//!
//! - [`handlers`]: repository implementations
//! - [`models`]: request and row types
//! - [`errors`]: classification of sqlx errors

pub mod errors;
pub mod handlers;
pub mod models;
