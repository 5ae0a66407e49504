//! HTTP request handlers for all API endpoints.
//!
//! Each handler validates its input, checks the caller's company against the target resource,
//! runs the work through the repositories in [`crate::db::handlers`] and converts rows to the
//! response models in [`crate::api::models`].
//!
//! # Handler Modules
//!
//! - [`auth`]: registration, login and the current recruiter
//! - [`companies`]: slug lookup and branding updates
//! - [`sections`]: careers page sections and the bulk reorder
//! - [`jobs`]: job listings and the public job board
//! - [`health`]: liveness
//!
//! # Authentication
//!
//! Owner endpoints take a [`CurrentRecruiter`](crate::api::models::auth::CurrentRecruiter)
//! extractor. Public reads (`/public/...`, `/slug/...`) take none.
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`], which converts to a status code and a JSON
//! `{"error": ...}` body.

pub mod auth;
pub mod companies;
pub mod health;
pub mod jobs;
pub mod sections;
