use tonic::metadata::MetadataMap;

use crate::domain::auth::models::{AuthError, BearerToken, TokenVerification};
use crate::domain::auth::ports::TokenVerifier;

/// Metadata key carrying the caller's bearer token.
pub const AUTHORIZATION_METADATA_KEY: &str = "authorization";

/// Extracts the bearer token from call metadata. The `Bearer ` scheme prefix is optional.
pub fn bearer_token(metadata: &MetadataMap) -> Result<BearerToken, AuthError> {
    let value = metadata
        .get(AUTHORIZATION_METADATA_KEY)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MissingCredentials)?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();

    BearerToken::new(token).ok_or(AuthError::MissingCredentials)
}

/// Lets the call through only when the identity service explicitly reports the caller's token as
/// valid. Failures of the verification call are returned as they were received.
pub async fn authorize<TV: TokenVerifier>(
    metadata: &MetadataMap,
    token_verifier: &TV,
) -> Result<(), AuthError> {
    let token = bearer_token(metadata)?;

    match token_verifier.verify_token(&token).await? {
        TokenVerification::Valid => Ok(()),
        TokenVerification::Invalid => {
            tracing::debug!("token rejected by identity service");
            Err(AuthError::InvalidToken)
        }
    }
}
