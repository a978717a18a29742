//! Error types for backend calls

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx status or an envelope with `success: false`. Displays the server message.
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response from {0} carried no data")]
    EmptyResponse(String),

    #[error("Not signed in. Log in from the dashboard or set AGENCY_API_TOKEN")]
    Unauthenticated,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        ApiError::Service {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Service { status, .. } => Some(*status),
            ApiError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthenticated) || self.status() == Some(401)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_displays_server_message() {
        let err = ApiError::service(404, "Skill assessment not found");
        assert_eq!(err.to_string(), "Skill assessment not found");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(ApiError::service(401, "Session expired").is_unauthorized());
        assert!(ApiError::Unauthenticated.is_unauthorized());
        assert!(!ApiError::Validation("Name is required".into()).is_unauthorized());
    }
}
