use thiserror::Error;

pub mod config;
pub mod context;
pub mod device;
pub mod graphql;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("device not found: {0}")]
    DeviceNotFound(i64),
    #[error("device name must not be empty")]
    EmptyDeviceName,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("not authenticated")]
    NotAuthenticated,
}
