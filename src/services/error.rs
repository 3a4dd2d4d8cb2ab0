//! Errors raised by the HTTP-backed collaborators

use crate::core::retry::RetryClassify;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// Turn a non-success response into `ServiceError::Status`
    pub fn check_status(
        service: &'static str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ServiceError::Status {
                service,
                status: status.as_u16(),
            })
        }
    }
}

impl RetryClassify for ServiceError {
    fn is_transient(&self) -> bool {
        match self {
            ServiceError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_body(),
            ServiceError::Status { .. } | ServiceError::Malformed(_) => false,
        }
    }

    fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Status { status, .. } => Some(*status),
            ServiceError::Transport(e) => e.status().map(|s| s.as_u16()),
            ServiceError::Malformed(_) => None,
        }
    }
}
