use thiserror::Error;

use crate::service::ServiceError;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid vendor id: {0:?}")]
    InvalidVendorId(String),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Cancelled by operator")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
