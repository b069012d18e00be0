use std::future::Future;

use crate::domain::auth::models::{BearerToken, TokenVerification, VerifyTokenError};

/// `TokenVerifier` represents the external identity service.
pub trait TokenVerifier: Clone + Send + Sync + 'static {
    fn verify_token(
        &self,
        token: &BearerToken,
    ) -> impl Future<Output = Result<TokenVerification, VerifyTokenError>> + Send;
}
