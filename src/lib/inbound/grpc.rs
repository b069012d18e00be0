use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

use crate::domain::auth::ports::TokenVerifier;
use crate::domain::device::ports::DeviceService;
use crate::inbound::grpc::handlers::{
    create_device::create_device, get_device_by_id::get_device_by_id,
    get_device_by_serial_number::get_device_by_serial_number,
    get_devices_by_user_id::get_devices_by_user_id,
};

pub mod authorization;
mod conversions;
mod errors;
mod handlers;

pub mod proto {
    tonic::include_proto!("device");
}

use proto::device_service_server::{
    DeviceService as DeviceServiceRpc, DeviceServiceServer,
};
use proto::{CreateDeviceRequest, Device, DeviceList, DeviceRequest, DeviceResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpcServerConfig<'a> {
    pub port: &'a str,
    /// Upper bound for a single call, store and identity round trips included.
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
struct AppState<DS: DeviceService, TV: TokenVerifier> {
    device_service: Arc<DS>,
    token_verifier: Arc<TV>,
    request_timeout: Duration,
}

impl<DS: DeviceService, TV: TokenVerifier> AppState<DS, TV> {
    /// Runs `call` under the request timeout. On expiry the pending call is dropped.
    async fn within_deadline<T, F>(&self, call: F) -> Result<T, Status>
    where
        F: Future<Output = Result<T, Status>>,
    {
        tokio::time::timeout(self.request_timeout, call)
            .await
            .map_err(|_| {
                Status::deadline_exceeded(format!(
                    "request did not complete within {:?}",
                    self.request_timeout
                ))
            })?
    }
}

/// Translates device calls between the wire and the device domain. Only creation is gated on the
/// caller's token; the lookups are open.
#[derive(Debug, Clone)]
pub struct DeviceDispatcher<DS: DeviceService, TV: TokenVerifier> {
    state: AppState<DS, TV>,
}

impl<DS: DeviceService, TV: TokenVerifier> DeviceDispatcher<DS, TV> {
    pub fn new(device_service: DS, token_verifier: TV, request_timeout: Duration) -> Self {
        Self {
            state: AppState {
                device_service: Arc::new(device_service),
                token_verifier: Arc::new(token_verifier),
                request_timeout,
            },
        }
    }
}

#[tonic::async_trait]
impl<DS: DeviceService, TV: TokenVerifier> DeviceServiceRpc for DeviceDispatcher<DS, TV> {
    async fn create_device(
        &self,
        request: Request<CreateDeviceRequest>,
    ) -> Result<Response<DeviceResponse>, Status> {
        create_device(&self.state, request).await
    }

    async fn get_device_by_id(
        &self,
        request: Request<DeviceRequest>,
    ) -> Result<Response<Device>, Status> {
        get_device_by_id(&self.state, request).await
    }

    async fn get_device_by_serial_number(
        &self,
        request: Request<DeviceRequest>,
    ) -> Result<Response<Device>, Status> {
        get_device_by_serial_number(&self.state, request).await
    }

    async fn get_devices_by_user_id(
        &self,
        request: Request<DeviceRequest>,
    ) -> Result<Response<DeviceList>, Status> {
        get_devices_by_user_id(&self.state, request).await
    }
}

pub struct GrpcServer<DS: DeviceService, TV: TokenVerifier> {
    dispatcher: DeviceDispatcher<DS, TV>,
    addr: SocketAddr,
    request_timeout: Duration,
}

impl<DS: DeviceService, TV: TokenVerifier> GrpcServer<DS, TV> {
    pub fn new(
        device_service: DS,
        token_verifier: TV,
        config: GrpcServerConfig<'_>,
    ) -> anyhow::Result<Self> {
        let addr = format!("0.0.0.0:{}", config.port)
            .parse()
            .with_context(|| format!("invalid server port {}", config.port))?;

        Ok(Self {
            dispatcher: DeviceDispatcher::new(
                device_service,
                token_verifier,
                config.request_timeout,
            ),
            addr,
            request_timeout: config.request_timeout,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let trace_layer = TraceLayer::new_for_grpc()
            .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO));

        tracing::info!("listening on {}", self.addr);
        Server::builder()
            .timeout(self.request_timeout)
            .layer(trace_layer)
            .add_service(DeviceServiceServer::new(self.dispatcher))
            .serve_with_shutdown(self.addr, shutdown_signal())
            .await
            .context("received error from running server")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!("failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
