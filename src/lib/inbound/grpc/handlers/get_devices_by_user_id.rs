use tonic::{Request, Response, Status};
use tracing::debug;

use crate::domain::auth::ports::TokenVerifier;
use crate::domain::device::models::device::UserId;
use crate::domain::device::ports::DeviceService;
use crate::inbound::grpc::AppState;
use crate::inbound::grpc::proto::{DeviceList, DeviceRequest};

pub async fn get_devices_by_user_id<DS: DeviceService, TV: TokenVerifier>(
    state: &AppState<DS, TV>,
    request: Request<DeviceRequest>,
) -> Result<Response<DeviceList>, Status> {
    let user_id = UserId::from(request.into_inner().id);

    debug!(%user_id, "received GetDevicesByUserId request");

    state
        .within_deadline(async {
            let devices = state.device_service.get_devices_by_user_id(&user_id).await?;

            debug!(%user_id, count = devices.len(), "listed devices");

            Ok::<_, Status>(Response::new(DeviceList {
                devices: devices.into_iter().map(Into::into).collect(),
            }))
        })
        .await
}
