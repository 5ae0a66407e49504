//! JWT session token creation and verification.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    api::models::auth::CurrentRecruiter,
    config::Config,
    errors::Error,
    types::{CompanyId, RecruiterId},
};

/// JWT session claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: RecruiterId,      // Subject (recruiter ID)
    pub email: String,         // Recruiter email
    pub name: String,          // Display name
    pub company_id: CompanyId, // Tenant the recruiter acts for
    pub exp: i64,              // Expiration time
    pub iat: i64,              // Issued at
}

impl SessionClaims {
    pub fn new(recruiter: &CurrentRecruiter, config: &Config) -> Self {
        let now = Utc::now();
        let exp = now + config.auth.security.jwt_expiry;

        Self {
            sub: recruiter.id,
            email: recruiter.email.clone(),
            name: recruiter.name.clone(),
            company_id: recruiter.company_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

impl From<SessionClaims> for CurrentRecruiter {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            company_id: claims.company_id,
        }
    }
}

fn secret_key(config: &Config) -> Result<&str, Error> {
    config.secret_key.as_deref().ok_or_else(|| Error::Internal {
        operation: "JWT sessions: secret_key is required".to_string(),
    })
}

/// Create a signed session token for a recruiter
pub fn create_session_token(recruiter: &CurrentRecruiter, config: &Config) -> Result<String, Error> {
    let claims = SessionClaims::new(recruiter, config);
    let key = EncodingKey::from_secret(secret_key(config)?.as_bytes());

    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Verify and decode a session token
pub fn verify_session_token(token: &str, config: &Config) -> Result<CurrentRecruiter, Error> {
    let key = DecodingKey::from_secret(secret_key(config)?.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        // Client errors (401) - malformed, tampered or expired tokens
        jsonwebtoken::errors::ErrorKind::InvalidToken
        | jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::ExpiredSignature
        | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
        | jsonwebtoken::errors::ErrorKind::InvalidIssuer
        | jsonwebtoken::errors::ErrorKind::InvalidAudience
        | jsonwebtoken::errors::ErrorKind::InvalidSubject
        | jsonwebtoken::errors::ErrorKind::ImmatureSignature
        | jsonwebtoken::errors::ErrorKind::Base64(_)
        | jsonwebtoken::errors::ErrorKind::Json(_)
        | jsonwebtoken::errors::ErrorKind::Utf8(_)
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => Error::Unauthenticated {
            message: Some("Invalid or expired token".to_string()),
        },

        // Server errors (500) - key issues, internal failures
        jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_)
        | jsonwebtoken::errors::ErrorKind::RsaFailedSigning
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithmName
        | jsonwebtoken::errors::ErrorKind::InvalidKeyFormat
        | jsonwebtoken::errors::ErrorKind::MissingAlgorithm
        | jsonwebtoken::errors::ErrorKind::Crypto(_) => Error::Internal {
            operation: format!("JWT verification: {e}"),
        },

        _ => Error::Internal {
            operation: format!("JWT verification (unknown error): {e}"),
        },
    })?;

    Ok(CurrentRecruiter::from(token_data.claims))
}
