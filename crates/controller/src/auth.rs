// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Verification of the bearer tokens issued by the identity service
use crate::settings::Auth;
use db_storage::users::UserId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Token Verification errors
///
/// The error messages will get displayed in a HTTP 401 response
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Not a valid JWT ({0})")]
    InvalidJwt(String),
    #[error("JWT has invalid claims")]
    InvalidClaims,
    #[error("JWT token expired")]
    Expired,
    #[error("JWT has an invalid signature")]
    InvalidSignature,
    #[error("JWT was issued by an unexpected issuer")]
    InvalidIssuer,
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the authenticated user
    pub sub: UserId,
    /// Expiry as unix timestamp
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Verify a raw HS256 JWT.
///
/// Returns `Err(_)` if the JWT is invalid or expired.
pub fn verify(settings: &Auth, token: &str) -> Result<Claims, VerifyError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = settings.leeway_secs;

    if let Some(issuer) = &settings.issuer {
        validation.set_issuer(&[issuer]);
    }

    let key = DecodingKey::from_secret(settings.secret.as_bytes());

    let token = decode::<Claims>(token, &key, &validation).map_err(|e| {
        log::warn!("Rejected access token, {}", e);

        match e.kind() {
            ErrorKind::ExpiredSignature => VerifyError::Expired,
            ErrorKind::InvalidSignature => VerifyError::InvalidSignature,
            ErrorKind::InvalidIssuer => VerifyError::InvalidIssuer,
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => VerifyError::InvalidClaims,
            _ => VerifyError::InvalidJwt(e.to_string()),
        }
    })?;

    Ok(token.claims)
}
