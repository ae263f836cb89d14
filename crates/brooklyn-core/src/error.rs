use thiserror::Error;

use crate::client::ClientError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Invalid application definition: {0}")]
    InvalidDefinition(String),

    #[error("Failed to render application definition: {0}")]
    Render(String),

    #[error("Maximum number of retries ({attempts}) exceeded")]
    RetriesExceeded { attempts: u32 },

    #[error("application did not reach Starting state")]
    NotStarting,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = ApplicationError> = std::result::Result<T, E>;
