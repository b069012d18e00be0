use anyhow::anyhow;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::domain::device::models::device::{
    CreateDeviceError, DeviceIdTranslationError, DeviceLookup, GetDeviceError,
    GetDevicesByUserIdError,
};
use crate::domain::device::models::device::{Device, DeviceId, SerialNumber, UserId};
use crate::domain::device::ports::DeviceRepository;
use crate::outbound::document_store::{DocumentCollection, Filter, StoreError};

pub const ID_FIELD: &str = "_id";
pub const USER_ID_FIELD: &str = "user_id";
pub const SERIAL_NUMBER_FIELD: &str = "serial_number";

/// Stored shape of a [Device]. Keyed by a store-native [ObjectId] instead of the domain's string
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub serial_number: String,
    pub device_type: String,
    pub name: String,
    pub status: String,
    pub registration_date: i64,
    pub battery_level: i32,
}

impl TryFrom<&Device> for DeviceDocument {
    type Error = DeviceIdTranslationError;

    /// An unassigned identifier is left for the store to generate.
    fn try_from(device: &Device) -> Result<Self, Self::Error> {
        let id = if device.id.is_assigned() {
            Some(object_id(&device.id)?)
        } else {
            None
        };

        Ok(Self {
            id,
            user_id: device.user_id.to_string(),
            serial_number: device.serial_number.to_string(),
            device_type: device.device_type.clone(),
            name: device.name.clone(),
            status: device.status.clone(),
            registration_date: device.registration_date,
            battery_level: device.battery_level,
        })
    }
}

impl From<DeviceDocument> for Device {
    fn from(document: DeviceDocument) -> Self {
        Self {
            id: document
                .id
                .map(|id| DeviceId::new(&id.to_hex()))
                .unwrap_or_default(),
            user_id: UserId::from(document.user_id),
            device_type: document.device_type,
            name: document.name,
            status: document.status,
            serial_number: SerialNumber::from(document.serial_number),
            registration_date: document.registration_date,
            battery_level: document.battery_level,
        }
    }
}

fn object_id(id: &DeviceId) -> Result<ObjectId, DeviceIdTranslationError> {
    ObjectId::parse_str(id.as_str()).map_err(|_| DeviceIdTranslationError::new(id.as_str()))
}

/// [DeviceRepository] over any [DocumentCollection] of [DeviceDocument]s.
#[derive(Debug, Clone)]
pub struct DocumentDeviceRepository<C> {
    collection: C,
}

impl<C: DocumentCollection<DeviceDocument>> DocumentDeviceRepository<C> {
    pub fn new(collection: C) -> Self {
        Self { collection }
    }

    async fn find_device(&self, filter: Filter, lookup: DeviceLookup) -> Result<Device, GetDeviceError> {
        let document = self
            .collection
            .find_one(filter)
            .await
            .map_err(|e| anyhow!(e).context(format!("failed to fetch device with {}", lookup)))?;

        match document {
            Some(document) => Ok(document.into()),
            None => Err(GetDeviceError::NotFound(lookup)),
        }
    }
}

impl<C: DocumentCollection<DeviceDocument>> DeviceRepository for DocumentDeviceRepository<C> {
    async fn create_device(&self, device: &Device) -> Result<Device, CreateDeviceError> {
        let document = DeviceDocument::try_from(device)?;

        let id = self
            .collection
            .insert_one(&document)
            .await
            .map_err(|e| match e {
                StoreError::DuplicateKey { index } if index.starts_with(ID_FIELD) => {
                    CreateDeviceError::DuplicateId {
                        id: device.id.clone(),
                    }
                }
                StoreError::DuplicateKey { .. } => CreateDeviceError::Duplicate {
                    serial_number: device.serial_number.clone(),
                },
                StoreError::Unknown(cause) => cause
                    .context(format!(
                        "failed to save device with serial number {}",
                        device.serial_number
                    ))
                    .into(),
            })?;

        Ok(device.clone().with_id(DeviceId::new(&id.to_hex())))
    }

    async fn get_device_by_id(&self, id: &DeviceId) -> Result<Device, GetDeviceError> {
        let key = object_id(id)?;

        self.find_device(Filter::eq(ID_FIELD, key), DeviceLookup::Id(id.clone()))
            .await
    }

    async fn get_device_by_serial_number(
        &self,
        serial_number: &SerialNumber,
    ) -> Result<Device, GetDeviceError> {
        self.find_device(
            Filter::eq(SERIAL_NUMBER_FIELD, serial_number.as_str()),
            DeviceLookup::SerialNumber(serial_number.clone()),
        )
        .await
    }

    async fn get_devices_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Device>, GetDevicesByUserIdError> {
        let documents = self
            .collection
            .find(Filter::eq(USER_ID_FIELD, user_id.as_str()))
            .await
            .map_err(|e| anyhow!(e).context(format!("failed to fetch devices of user {}", user_id)))?;

        Ok(documents.into_iter().map(Device::from).collect())
    }
}

#[cfg(test)]
mod translation_tests {
    use super::*;

    fn document(id: Option<ObjectId>) -> DeviceDocument {
        DeviceDocument {
            id,
            user_id: "user-1".to_string(),
            serial_number: "SN-1".to_string(),
            device_type: "tracker".to_string(),
            name: "Bike".to_string(),
            status: "active".to_string(),
            registration_date: 1_700_000_000,
            battery_level: 87,
        }
    }

    #[test]
    fn test_document_round_trip() {
        let stored = document(Some(ObjectId::new()));

        let device = Device::from(stored.clone());
        let back = DeviceDocument::try_from(&device).unwrap();

        assert_eq!(back, stored);
        assert_eq!(device.id.as_str(), stored.id.unwrap().to_hex());
    }

    #[test]
    fn test_unassigned_id_is_left_to_the_store() {
        let device = Device::from(document(None));

        let document = DeviceDocument::try_from(&device).unwrap();

        assert!(!device.id.is_assigned());
        assert_eq!(document.id, None);
    }

    #[test]
    fn test_malformed_id_fails_translation() {
        let device = Device {
            id: DeviceId::new("Error"),
            ..Device::from(document(None))
        };

        let err = DeviceDocument::try_from(&device).unwrap_err();

        assert_eq!(err, DeviceIdTranslationError::new("Error"));
    }

    #[test]
    fn test_id_must_be_24_hex_characters() {
        let too_short = Device {
            id: DeviceId::new("65f1c2a9e4b0"),
            ..Default::default()
        };
        let not_hex = Device {
            id: DeviceId::new("zzzzzzzzzzzzzzzzzzzzzzzz"),
            ..Default::default()
        };

        assert!(DeviceDocument::try_from(&too_short).is_err());
        assert!(DeviceDocument::try_from(&not_hex).is_err());
    }
}
