use tonic::Status;

use crate::domain::auth::models::AuthError;
use crate::domain::device::models::device::{
    CreateDeviceError, GetDeviceError, GetDevicesByUserIdError,
};

fn internal(cause: anyhow::Error) -> Status {
    tracing::error!("{:?}", cause);
    Status::internal("Internal server error")
}

impl From<AuthError> for Status {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingCredentials | AuthError::InvalidToken => {
                Status::unauthenticated(e.to_string())
            }
            AuthError::Verification(cause) => cause.into_status(),
        }
    }
}

impl From<CreateDeviceError> for Status {
    fn from(e: CreateDeviceError) -> Self {
        match e {
            CreateDeviceError::Duplicate { .. } | CreateDeviceError::DuplicateId { .. } => {
                Status::already_exists(e.to_string())
            }
            CreateDeviceError::InvalidId(cause) => Status::invalid_argument(cause.to_string()),
            CreateDeviceError::Unknown(cause) => internal(cause),
        }
    }
}

impl From<GetDeviceError> for Status {
    fn from(e: GetDeviceError) -> Self {
        match e {
            GetDeviceError::NotFound(_) => Status::not_found(e.to_string()),
            GetDeviceError::InvalidId(cause) => Status::invalid_argument(cause.to_string()),
            GetDeviceError::Unknown(cause) => internal(cause),
        }
    }
}

impl From<GetDevicesByUserIdError> for Status {
    fn from(e: GetDevicesByUserIdError) -> Self {
        match e {
            GetDevicesByUserIdError::Unknown(cause) => internal(cause),
        }
    }
}
