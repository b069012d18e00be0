use std::fmt;

use thiserror::Error;

/// Credential presented by a caller. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Returns `None` for an empty token.
    pub fn new(raw_token: &str) -> Option<Self> {
        if raw_token.is_empty() {
            None
        } else {
            Some(Self(raw_token.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Verdict of the identity service on a [BearerToken].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenVerification {
    Valid,
    Invalid,
}

impl From<bool> for TokenVerification {
    fn from(valid: bool) -> Self {
        if valid { Self::Valid } else { Self::Invalid }
    }
}

/// Failure of the verification call itself, as reported by the remote side.
#[derive(Debug, Error)]
#[error("token verification failed: {}", .0.message())]
pub struct VerifyTokenError(tonic::Status);

impl VerifyTokenError {
    pub fn status(&self) -> &tonic::Status {
        &self.0
    }

    pub fn into_status(self) -> tonic::Status {
        self.0
    }
}

impl From<tonic::Status> for VerifyTokenError {
    fn from(status: tonic::Status) -> Self {
        Self(status)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error(transparent)]
    Verification(#[from] VerifyTokenError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_rejected() {
        assert_eq!(BearerToken::new(""), None);
    }

    #[test]
    fn test_debug_hides_token() {
        let token = BearerToken::new("secret-value").unwrap();

        assert_eq!(format!("{:?}", token), "BearerToken(***)");
        assert_eq!(token.expose(), "secret-value");
    }

    #[test]
    fn test_verification_from_bool() {
        assert_eq!(TokenVerification::from(true), TokenVerification::Valid);
        assert_eq!(TokenVerification::from(false), TokenVerification::Invalid);
    }

    #[test]
    fn test_verify_token_error_keeps_status() {
        let err = VerifyTokenError::from(tonic::Status::unavailable("auth down"));

        assert_eq!(err.status().code(), tonic::Code::Unavailable);
        assert_eq!(err.to_string(), "token verification failed: auth down");
        assert_eq!(err.into_status().message(), "auth down");
    }
}
