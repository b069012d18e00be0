use crate::domain::device::models::device::{
    CreateDeviceError, GetDeviceError, GetDevicesByUserIdError,
};
use crate::domain::device::models::device::{Device, DeviceId, SerialNumber, UserId};
use crate::domain::device::ports::{DeviceRepository, DeviceService};

/// Canonical implementation of the [DeviceService] port, through which the device domain API is
/// consumed.
///
/// Every operation is handed straight to the repository. Business rules such as quotas or status
/// transitions belong here rather than in the repository or the transport.
#[derive(Debug, Clone)]
pub struct Service<R: DeviceRepository> {
    repo: R,
}

impl<R: DeviceRepository> Service<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

impl<R: DeviceRepository> DeviceService for Service<R> {
    async fn create_device(&self, device: &Device) -> Result<Device, CreateDeviceError> {
        self.repo.create_device(device).await
    }

    async fn get_device_by_id(&self, id: &DeviceId) -> Result<Device, GetDeviceError> {
        self.repo.get_device_by_id(id).await
    }

    async fn get_device_by_serial_number(
        &self,
        serial_number: &SerialNumber,
    ) -> Result<Device, GetDeviceError> {
        self.repo.get_device_by_serial_number(serial_number).await
    }

    async fn get_devices_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Device>, GetDevicesByUserIdError> {
        self.repo.get_devices_by_user_id(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow::anyhow;

    use super::*;
    use crate::domain::device::models::device::DeviceLookup;

    /// Repository fake that records the calls it receives.
    #[derive(Debug, Clone, Default)]
    struct RecordingRepository {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingRepository {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DeviceRepository for RecordingRepository {
        async fn create_device(&self, device: &Device) -> Result<Device, CreateDeviceError> {
            self.record(format!("create {}", device.serial_number));
            if device.serial_number.as_str() == "taken" {
                return Err(CreateDeviceError::Duplicate {
                    serial_number: device.serial_number.clone(),
                });
            }
            Ok(device.clone().with_id(DeviceId::new("generated")))
        }

        async fn get_device_by_id(&self, id: &DeviceId) -> Result<Device, GetDeviceError> {
            self.record(format!("by id {}", id));
            Err(GetDeviceError::NotFound(DeviceLookup::Id(id.clone())))
        }

        async fn get_device_by_serial_number(
            &self,
            serial_number: &SerialNumber,
        ) -> Result<Device, GetDeviceError> {
            self.record(format!("by serial {}", serial_number));
            Ok(Device {
                serial_number: serial_number.clone(),
                ..Default::default()
            })
        }

        async fn get_devices_by_user_id(
            &self,
            user_id: &UserId,
        ) -> Result<Vec<Device>, GetDevicesByUserIdError> {
            self.record(format!("by user {}", user_id));
            Err(anyhow!("connection reset").into())
        }
    }

    #[tokio::test]
    async fn test_create_device_returns_repository_result() {
        let repo = RecordingRepository::default();
        let service = Service::new(repo.clone());
        let device = Device {
            serial_number: SerialNumber::new("SN-1"),
            ..Default::default()
        };

        let created = service.create_device(&device).await.unwrap();

        assert_eq!(created.id, DeviceId::new("generated"));
        assert_eq!(repo.calls(), vec!["create SN-1".to_string()]);
    }

    #[tokio::test]
    async fn test_errors_pass_through_unchanged() {
        let repo = RecordingRepository::default();
        let service = Service::new(repo.clone());
        let device = Device {
            serial_number: SerialNumber::new("taken"),
            ..Default::default()
        };

        let duplicate = service.create_device(&device).await.unwrap_err();
        let missing = service
            .get_device_by_id(&DeviceId::new("nope"))
            .await
            .unwrap_err();
        let failed = service
            .get_devices_by_user_id(&UserId::new("user-1"))
            .await
            .unwrap_err();

        assert!(matches!(duplicate, CreateDeviceError::Duplicate { .. }));
        assert!(matches!(
            missing,
            GetDeviceError::NotFound(DeviceLookup::Id(ref id)) if id.as_str() == "nope"
        ));
        assert_eq!(failed.to_string(), "connection reset");
        assert_eq!(repo.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_get_device_by_serial_number_delegates() {
        let repo = RecordingRepository::default();
        let service = Service::new(repo.clone());

        let device = service
            .get_device_by_serial_number(&SerialNumber::new("SN-7"))
            .await
            .unwrap();

        assert_eq!(device.serial_number, SerialNumber::new("SN-7"));
        assert_eq!(repo.calls(), vec!["by serial SN-7".to_string()]);
    }
}
