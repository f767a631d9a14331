//! AWS provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("aws CLI not found. Please install: https://aws.amazon.com/cli/")]
    AwsCliNotFound,

    #[error("aws CLI authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("aws CLI command failed: {0}")]
    CommandFailed(String),

    #[error("Stack not found: {0}")]
    StackNotFound(String),

    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error("Subnet mask /{mask} does not fit inside the /{prefix} network range")]
    SubnetMaskOutOfRange { mask: u8, prefix: u8 },

    #[error("Address space exhausted: no room left for another /{0} subnet")]
    AddressSpaceExhausted(u8),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<AwsError> for gridflow_cloud::CloudError {
    fn from(err: AwsError) -> Self {
        use gridflow_cloud::CloudError;
        match err {
            AwsError::AuthenticationFailed(msg) => CloudError::AuthenticationFailed(msg),
            AwsError::StackNotFound(name) => CloudError::ResourceNotFound(name),
            AwsError::JsonError(e) => CloudError::Json(e),
            AwsError::IoError(e) => CloudError::Io(e),
            AwsError::SubnetMaskOutOfRange { .. }
            | AwsError::AddressSpaceExhausted(_)
            | AwsError::InvalidCidr(_) => CloudError::InvalidConfig(err.to_string()),
            other => CloudError::CommandFailed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AwsError>;
