use crate::domain::device::models::device::{Device, DeviceId, SerialNumber, UserId};
use crate::inbound::grpc::proto;

impl From<proto::Device> for Device {
    fn from(device: proto::Device) -> Self {
        Self {
            id: DeviceId::from(device.id),
            user_id: UserId::from(device.user_id),
            device_type: device.device_type,
            name: device.name,
            status: device.status,
            serial_number: SerialNumber::from(device.serial_number),
            registration_date: device.registration_date,
            battery_level: device.battery_level,
        }
    }
}

impl From<Device> for proto::Device {
    fn from(device: Device) -> Self {
        Self {
            id: device.id.to_string(),
            user_id: device.user_id.to_string(),
            device_type: device.device_type,
            name: device.name,
            status: device.status,
            serial_number: device.serial_number.to_string(),
            registration_date: device.registration_date,
            battery_level: device.battery_level,
        }
    }
}
