use std::future::Future;

use crate::domain::device::models::device::{
    CreateDeviceError, GetDeviceError, GetDevicesByUserIdError,
};
use crate::domain::device::models::device::{Device, DeviceId, SerialNumber, UserId};

/// `DeviceService` is the public API for the device domain.
pub trait DeviceService: Clone + Send + Sync + 'static {
    /// Registers `device` and returns it with its persisted identifier.
    fn create_device(
        &self,
        device: &Device,
    ) -> impl Future<Output = Result<Device, CreateDeviceError>> + Send;

    fn get_device_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Device, GetDeviceError>> + Send;

    fn get_device_by_serial_number(
        &self,
        serial_number: &SerialNumber,
    ) -> impl Future<Output = Result<Device, GetDeviceError>> + Send;

    fn get_devices_by_user_id(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<Device>, GetDevicesByUserIdError>> + Send;
}

/// `DeviceRepository` represents a store of device data.
pub trait DeviceRepository: Send + Sync + Clone + 'static {
    fn create_device(
        &self,
        device: &Device,
    ) -> impl Future<Output = Result<Device, CreateDeviceError>> + Send;

    fn get_device_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Device, GetDeviceError>> + Send;

    fn get_device_by_serial_number(
        &self,
        serial_number: &SerialNumber,
    ) -> impl Future<Output = Result<Device, GetDeviceError>> + Send;

    /// Returns an empty list, not an error, when the user owns no devices.
    fn get_devices_by_user_id(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<Device>, GetDevicesByUserIdError>> + Send;
}
