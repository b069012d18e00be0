use tonic::{Request, Response, Status};
use tracing::debug;

use crate::domain::auth::ports::TokenVerifier;
use crate::domain::device::models::device::DeviceId;
use crate::domain::device::ports::DeviceService;
use crate::inbound::grpc::AppState;
use crate::inbound::grpc::proto::{Device, DeviceRequest};

pub async fn get_device_by_id<DS: DeviceService, TV: TokenVerifier>(
    state: &AppState<DS, TV>,
    request: Request<DeviceRequest>,
) -> Result<Response<Device>, Status> {
    let id = DeviceId::from(request.into_inner().id);

    debug!(device_id = %id, "received GetDeviceById request");

    state
        .within_deadline(async {
            let device = state.device_service.get_device_by_id(&id).await?;

            Ok::<_, Status>(Response::new(device.into()))
        })
        .await
}
