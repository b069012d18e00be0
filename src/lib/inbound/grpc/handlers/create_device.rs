use tonic::{Request, Response, Status};
use tracing::{debug, info};

use crate::domain::auth::ports::TokenVerifier;
use crate::domain::device::models::device::Device;
use crate::domain::device::ports::DeviceService;
use crate::inbound::grpc::AppState;
use crate::inbound::grpc::authorization::authorize;
use crate::inbound::grpc::proto::{CreateDeviceRequest, DeviceResponse};

/// Authorizes the caller, then registers the embedded device. Nothing reaches the device service
/// unless the identity service accepted the caller's token.
pub async fn create_device<DS: DeviceService, TV: TokenVerifier>(
    state: &AppState<DS, TV>,
    request: Request<CreateDeviceRequest>,
) -> Result<Response<DeviceResponse>, Status> {
    state
        .within_deadline(async move {
            authorize(request.metadata(), state.token_verifier.as_ref()).await?;

            let device: Device = request
                .into_inner()
                .device
                .ok_or_else(|| Status::invalid_argument("request does not carry a device"))?
                .into();

            debug!(
                serial_number = %device.serial_number,
                user_id = %device.user_id,
                "received CreateDevice request"
            );

            let created = state.device_service.create_device(&device).await?;

            info!(device_id = %created.id, "device created");

            Ok::<_, Status>(Response::new(DeviceResponse {
                id: created.id.to_string(),
                success: true,
            }))
        })
        .await
}
