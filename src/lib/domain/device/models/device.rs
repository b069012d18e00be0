use derive_more::{Display, From};
use thiserror::Error;

/// Externally visible device identifier. Empty until the device has been persisted.
#[derive(Display, Debug, Clone, Default, PartialEq, Eq, Hash, From)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(raw_id: &str) -> Self {
        Self(raw_id.to_string())
    }

    pub fn unassigned() -> Self {
        Self::default()
    }

    pub fn is_assigned(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Serial number of a device. Unique across all devices, enforced by the store.
#[derive(Display, Debug, Clone, Default, PartialEq, Eq, Hash, From)]
pub struct SerialNumber(String);

impl SerialNumber {
    pub fn new(raw_serial_number: &str) -> Self {
        Self(raw_serial_number.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of the user owning a device.
#[derive(Display, Debug, Clone, Default, PartialEq, Eq, Hash, From)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw_user_id: &str) -> Self {
        Self(raw_user_id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Device {
    pub id: DeviceId,
    pub user_id: UserId,
    pub device_type: String,
    pub name: String,
    /// Free-form, no transitions are validated.
    pub status: String,
    pub serial_number: SerialNumber,
    /// Seconds since the Unix epoch.
    pub registration_date: i64,
    /// Percentage, 0 to 100 by convention only.
    pub battery_level: i32,
}

impl Device {
    pub fn with_id(self, id: DeviceId) -> Self {
        Self { id, ..self }
    }
}

/// Raised when a [DeviceId] has no representation as a persistence key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{raw_id:?} is not a valid device identifier")]
pub struct DeviceIdTranslationError {
    raw_id: String,
}

impl DeviceIdTranslationError {
    pub fn new(raw_id: &str) -> Self {
        Self {
            raw_id: raw_id.to_string(),
        }
    }

    pub fn raw_id(&self) -> &str {
        &self.raw_id
    }
}

/// Key used to look a single device up.
#[derive(Display, Debug, Clone, PartialEq, Eq)]
pub enum DeviceLookup {
    #[display("id {_0}")]
    Id(DeviceId),
    #[display("serial number {_0}")]
    SerialNumber(SerialNumber),
}

#[derive(Debug, Error)]
pub enum CreateDeviceError {
    #[error("device with serial number {serial_number} already exists")]
    Duplicate { serial_number: SerialNumber },
    #[error("device with id {id} already exists")]
    DuplicateId { id: DeviceId },
    #[error(transparent)]
    InvalidId(#[from] DeviceIdTranslationError),
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum GetDeviceError {
    #[error("no device found with {0}")]
    NotFound(DeviceLookup),
    #[error(transparent)]
    InvalidId(#[from] DeviceIdTranslationError),
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum GetDevicesByUserIdError {
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}


#[cfg(test)]
mod device_error_tests {
    use super::*;

    #[test]
    fn test_translation_error_message() {
        let err = DeviceIdTranslationError::new("not-an-id");

        assert_eq!(err.raw_id(), "not-an-id");
        assert_eq!(
            err.to_string(),
            "\"not-an-id\" is not a valid device identifier"
        );
    }

    #[test]
    fn test_not_found_names_lookup_key() {
        let by_id = GetDeviceError::NotFound(DeviceLookup::Id(DeviceId::new("abc")));
        let by_serial =
            GetDeviceError::NotFound(DeviceLookup::SerialNumber(SerialNumber::new("SN-9")));

        assert_eq!(by_id.to_string(), "no device found with id abc");
        assert_eq!(
            by_serial.to_string(),
            "no device found with serial number SN-9"
        );
    }

    #[test]
    fn test_duplicate_names_serial_number() {
        let err = CreateDeviceError::Duplicate {
            serial_number: SerialNumber::new("SN-1"),
        };

        assert_eq!(
            err.to_string(),
            "device with serial number SN-1 already exists"
        );
    }
}
