//! API request and response data models.
//!
//! These are the JSON shapes of the HTTP interface, each deriving `ToSchema` for the OpenAPI
//! document. Database rows live in [`crate::db::models`] and are converted with `From` impls.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod auth;
pub mod companies;
pub mod jobs;
pub mod sections;

/// Acknowledgement body for deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
