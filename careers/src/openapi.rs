//! OpenAPI documentation for the careers API, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{api, errors::ErrorBody, validation::FieldError};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Session token returned by `/api/auth/login` or `/api/auth/register`:\n\n\
                            ```\nAuthorization: Bearer YOUR_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        api::handlers::health::health,
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::auth::me,
        api::handlers::companies::get_company_by_slug,
        api::handlers::companies::update_company,
        api::handlers::sections::list_public_sections,
        api::handlers::sections::list_company_sections,
        api::handlers::sections::create_section,
        api::handlers::sections::update_section,
        api::handlers::sections::reorder_sections,
        api::handlers::sections::delete_section,
        api::handlers::jobs::list_public_jobs,
        api::handlers::jobs::list_company_jobs,
        api::handlers::jobs::get_job,
        api::handlers::jobs::create_job,
        api::handlers::jobs::update_job,
        api::handlers::jobs::delete_job,
    ),
    components(
        schemas(
            ErrorBody,
            FieldError,
            api::models::SuccessResponse,
            api::handlers::health::HealthResponse,
            api::models::auth::RegisterRequest,
            api::models::auth::LoginRequest,
            api::models::auth::AuthResponse,
            api::models::auth::MeResponse,
            api::models::auth::RecruiterResponse,
            api::models::companies::CompanyResponse,
            api::models::companies::CompanyUpdate,
            api::models::sections::SectionType,
            api::models::sections::SectionCreate,
            api::models::sections::SectionUpdate,
            api::models::sections::SectionResponse,
            api::models::sections::SectionOrder,
            api::models::sections::ReorderRequest,
            api::models::sections::ReorderResponse,
            api::models::jobs::JobType,
            api::models::jobs::JobCreate,
            api::models::jobs::JobUpdate,
            api::models::jobs::JobResponse,
        )
    ),
    tags(
        (name = "auth", description = "Company registration and recruiter sessions"),
        (name = "companies", description = "Company lookup and branding"),
        (name = "sections", description = "Careers page sections and their order"),
        (name = "jobs", description = "Job listings"),
        (name = "health", description = "Liveness"),
    ),
    info(
        title = "Careers API",
        description = "Multi-tenant careers page builder",
    )
)]
pub struct ApiDoc;
