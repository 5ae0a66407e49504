//! Database record models matching table schemas.
//!
//! Each entity has a `*CreateDBRequest`, a `*UpdateDBRequest` and a `*DBResponse` deriving
//! `sqlx::FromRow`. They are kept separate from the API models in [`crate::api::models`] so the
//! storage and wire representations can change independently; conversions are `From` impls.

pub mod companies;
pub mod jobs;
pub mod recruiters;
pub mod sections;
