//! Recruiter authentication.
//!
//! Recruiters log in with email and password (`/api/auth/login`) and receive an HS256 JWT. Every
//! owner-facing endpoint takes a [`CurrentRecruiter`](crate::api::models::auth::CurrentRecruiter)
//! extractor, which reads `Authorization: Bearer <token>` and verifies the token without touching
//! the database. The token carries the recruiter's company id, which is the tenant boundary for all
//! authorization checks.
//!
//! # Modules
//!
//! - [`password`]: Argon2id hashing and verification
//! - [`session`]: JWT creation and verification
//! - [`current_user`]: the axum extractor
//! - [`permissions`]: tenant ownership checks

pub mod current_user;
pub mod password;
pub mod permissions;
pub mod session;
