//! API request/response models for authentication.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::companies::CompanyResponse;
use crate::types::{CompanyId, RecruiterId};
use crate::validation;

/// The authenticated caller, resolved from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrentRecruiter {
    #[schema(value_type = String, format = "uuid")]
    pub id: RecruiterId,
    pub email: String,
    pub name: String,
    #[schema(value_type = String, format = "uuid")]
    pub company_id: CompanyId,
}

/// Password length bounds come from configuration and are checked by the handler.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Display name of the new company
    #[validate(length(min = 1, max = 100, message = "company_name must be between 1 and 100 characters"))]
    pub company_name: String,
    /// URL slug; trimmed and lowercased before validation
    #[validate(
        length(min = 1, max = 50, message = "slug must be between 1 and 50 characters"),
        custom(function = "validation::slug")
    )]
    pub slug: String,
    /// Recruiter's display name
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Trim names, and trim and lowercase the slug and email.
    pub fn normalized(self) -> Self {
        Self {
            company_name: self.company_name.trim().to_string(),
            slug: self.slug.trim().to_lowercase(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_lowercase(),
            password: self.password,
        }
    }
}

/// Public view of a recruiter. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecruiterResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: RecruiterId,
    pub email: String,
    pub name: String,
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: RecruiterResponse,
    pub company: CompanyResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub user: RecruiterResponse,
    pub company: CompanyResponse,
}
