//! Bearer authentication boundary.
//!
//! The identity provider (external to this service) authenticates users
//! and mints HS256 bearer tokens carrying `{userId, email, role}`. This
//! module verifies those tokens and produces the [`Principal`] that every
//! service operation receives. Nothing below this boundary looks at a
//! token again.

use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};

use boxoffice_core::{Principal, Role};

use crate::error::ApiError;

/// Claims carried by the identity provider's bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthClaims {
    /// Subject user id
    pub user_id: String,

    /// Verified email address
    pub email: String,

    /// Authorization role
    pub role: Role,

    /// Expiration (Unix timestamp). Auth tokens always expire.
    pub exp: i64,
}

/// Verifies bearer tokens into principals.
#[derive(Clone)]
pub struct AuthVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthVerifier {
    /// Create a new verifier for the identity provider's shared secret.
    ///
    /// The algorithm is pinned to HS256: a token whose header claims any
    /// other algorithm is rejected outright, no negotiation.
    pub fn new(secret: &str) -> Self {
        AuthVerifier {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Validate a bearer token and produce the caller's principal.
    pub fn verify(&self, token: &str) -> Result<Principal, ApiError> {
        let token_data: TokenData<AuthClaims> = decode(token, &self.decoding_key, &self.validation)
            .map_err(|e| ApiError::AuthFailed(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;
        Ok(Principal {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        })
    }

    /// Extract and verify the `Authorization: Bearer` header of a request.
    pub fn principal_from_headers(&self, headers: &HeaderMap) -> Result<Principal, ApiError> {
        let auth_header = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::AuthFailed("Missing or invalid Authorization header".to_string())
            })?;

        let token = extract_bearer_token(auth_header).ok_or_else(|| {
            ApiError::AuthFailed("Missing or invalid Authorization header".to_string())
        })?;

        self.verify(token)
    }
}

/// Extract bearer token from an authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}
