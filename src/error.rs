use std::time::Duration;
use thiserror::Error;

/// Failure of a single backend call.
///
/// Every transport problem is folded into one of these variants so callers
/// only have to decide on a recovery policy, not on how the call failed.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return GatewayError::Network(format!("invalid response body: {}", err));
        }
        GatewayError::Network(err.to_string())
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
