//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror. The
//! variants mirror where a vision call can fail: the retry boundary (transient
//! statuses, transport), the remote service (permanent statuses), or the
//! response itself (no usable text).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "API call failed after {attempts} attempts ({status}): {}",
        describe_body(.status, .body)
    )]
    TransientExhausted {
        status: u16,
        body: String,
        attempts: u32,
    },

    #[error("API call failed ({status}): {}", describe_body(.status, .body))]
    PermanentHttp { status: u16, body: String },

    #[error("Network/connection error: {0}")]
    Transport(String),

    #[error("Vision request failed: {0}")]
    MalformedResponse(String),

    #[error("API call failed after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status carried by the error, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::TransientExhausted { status, .. } | Error::PermanentHttp { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

fn describe_body(status: &u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("status code {}", status)
    } else {
        body.to_string()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
