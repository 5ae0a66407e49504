use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, instrument, trace};

use crate::{
    AppState,
    api::models::auth::CurrentRecruiter,
    auth::session,
    errors::{Error, Result},
};

/// Pull the bearer token out of the `Authorization` header.
///
/// Returns `None` when the header is absent or uses another scheme.
fn bearer_token(parts: &Parts) -> Option<Result<&str>> {
    let header = parts.headers.get(axum::http::header::AUTHORIZATION)?;

    let value = match header.to_str() {
        Ok(value) => value,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid authorization header: {e}"),
            }));
        }
    };

    value.strip_prefix("Bearer ").map(|token| Ok(token.trim()))
}

impl FromRequestParts<AppState> for CurrentRecruiter {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = match bearer_token(parts) {
            Some(token) => token?,
            None => {
                trace!("No bearer token on request");
                return Err(Error::Unauthenticated {
                    message: Some("Access token required".to_string()),
                });
            }
        };

        let recruiter = session::verify_session_token(token, &state.config)?;
        debug!("Authenticated recruiter: {}", recruiter.id);
        Ok(recruiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_state;
    use axum::http::Request;
    use sqlx::PgPool;
    use uuid::Uuid;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/sections/company/x");
        if let Some(value) = value {
            builder = builder.header("authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[sqlx::test]
    async fn test_valid_bearer_token(pool: PgPool) {
        let state = create_test_state(pool);
        let recruiter = CurrentRecruiter {
            id: Uuid::new_v4(),
            email: "recruiter@techcorp.com".to_string(),
            name: "John Smith".to_string(),
            company_id: Uuid::new_v4(),
        };
        let token = session::create_session_token(&recruiter, &state.config).unwrap();

        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let extracted = CurrentRecruiter::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(extracted, recruiter);
    }

    #[sqlx::test]
    async fn test_missing_header_is_unauthenticated(pool: PgPool) {
        let state = create_test_state(pool);
        let mut parts = parts_with_header(None);

        let err = CurrentRecruiter::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert!(matches!(err, Error::Unauthenticated { .. }));
    }

    #[sqlx::test]
    async fn test_other_scheme_is_unauthenticated(pool: PgPool) {
        let state = create_test_state(pool);
        let mut parts = parts_with_header(Some("Basic dXNlcjpwYXNz"));

        let err = CurrentRecruiter::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert!(matches!(err, Error::Unauthenticated { .. }));
    }

    #[sqlx::test]
    async fn test_garbage_token_is_unauthenticated(pool: PgPool) {
        let state = create_test_state(pool);
        let mut parts = parts_with_header(Some("Bearer not-a-jwt"));

        let err = CurrentRecruiter::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert!(matches!(err, Error::Unauthenticated { .. }));
    }
}
