use std::time::Duration;

use anyhow::Context;
use tonic::transport::{Channel, Endpoint};

use crate::domain::auth::models::{BearerToken, TokenVerification, VerifyTokenError};
use crate::domain::auth::ports::TokenVerifier;

pub mod proto {
    tonic::include_proto!("auth");
}

use proto::VerifyTokenRequest;
use proto::auth_service_client::AuthServiceClient;

/// [TokenVerifier] backed by the identity service's `VerifyToken` call.
#[derive(Debug, Clone)]
pub struct GrpcTokenVerifier {
    client: AuthServiceClient<Channel>,
}

impl GrpcTokenVerifier {
    /// The connection is established on first use, so the identity service does not have to be
    /// up when the registry starts.
    pub fn connect_lazy(url: &str, timeout: Duration) -> Result<GrpcTokenVerifier, anyhow::Error> {
        let endpoint = Endpoint::from_shared(url.to_string())
            .with_context(|| format!("invalid auth service url {}", url))?
            .timeout(timeout);

        Ok(GrpcTokenVerifier {
            client: AuthServiceClient::new(endpoint.connect_lazy()),
        })
    }
}

impl TokenVerifier for GrpcTokenVerifier {
    async fn verify_token(
        &self,
        token: &BearerToken,
    ) -> Result<TokenVerification, VerifyTokenError> {
        let mut client = self.client.clone();

        let response = client
            .verify_token(VerifyTokenRequest {
                token: token.expose().to_string(),
            })
            .await?;

        Ok(TokenVerification::from(response.into_inner().valid))
    }
}
