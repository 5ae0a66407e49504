//! Extractors whose rejections use the JSON error body.
//!
//! axum's own `Json` and `Path` reject with plain text (and `422` for a well-formed body of the
//! wrong shape). These wrappers turn every rejection into a `400` [`Error::BadRequest`] so clients
//! always get `{"error": ...}`.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::errors::Error;

/// JSON request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> Error {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => "Expected request with `Content-Type: application/json`".to_string(),
        other => format!("Invalid request body: {}", other.body_text()),
    };
    Error::BadRequest { message }
}

/// Path parameters, e.g. a UUID that must parse.
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(Error::BadRequest {
                message: format!("Invalid path parameter: {}", rejection.body_text()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::sections::ReorderRequest;
    use axum::{body::Body, http::Request as HttpRequest};

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("PUT")
            .uri("/api/sections/bulk/order")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_wrong_shape_is_bad_request() {
        let result = JsonBody::<ReorderRequest>::from_request(json_request(r#"{"sections":[{"id":"x","order_index":"1"}]}"#), &()).await;
        assert!(matches!(result, Err(Error::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_unknown_field_is_bad_request() {
        let result = JsonBody::<ReorderRequest>::from_request(json_request(r#"{"sections":[],"extra":true}"#), &()).await;
        assert!(matches!(result, Err(Error::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let request = HttpRequest::builder()
            .method("PUT")
            .uri("/api/sections/bulk/order")
            .body(Body::from(r#"{"sections":[]}"#))
            .unwrap();
        let err = JsonBody::<ReorderRequest>::from_request(request, &()).await.unwrap_err();
        assert_eq!(err.user_message(), "Expected request with `Content-Type: application/json`");
    }

    #[tokio::test]
    async fn test_valid_body() {
        let JsonBody(request) = JsonBody::<ReorderRequest>::from_request(json_request(r#"{"sections":[],"expected_version":3}"#), &())
            .await
            .unwrap();
        assert!(request.sections.is_empty());
        assert_eq!(request.expected_version, Some(3));
    }
}
