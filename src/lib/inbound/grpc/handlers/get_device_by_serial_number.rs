use tonic::{Request, Response, Status};
use tracing::debug;

use crate::domain::auth::ports::TokenVerifier;
use crate::domain::device::models::device::SerialNumber;
use crate::domain::device::ports::DeviceService;
use crate::inbound::grpc::AppState;
use crate::inbound::grpc::proto::{Device, DeviceRequest};

/// The request's `id` field carries the serial number.
pub async fn get_device_by_serial_number<DS: DeviceService, TV: TokenVerifier>(
    state: &AppState<DS, TV>,
    request: Request<DeviceRequest>,
) -> Result<Response<Device>, Status> {
    let serial_number = SerialNumber::from(request.into_inner().id);

    debug!(%serial_number, "received GetDeviceBySerialNumber request");

    state
        .within_deadline(async {
            let device = state
                .device_service
                .get_device_by_serial_number(&serial_number)
                .await?;

            Ok::<_, Status>(Response::new(device.into()))
        })
        .await
}
