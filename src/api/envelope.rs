//! The `{ success, data, message, count }` wrapper used by every backend response

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub count: Option<u64>,
}

fn default_success() -> bool {
    true
}

impl<T> Envelope<T> {
    pub fn into_data(self, path: &str) -> ApiResult<T> {
        self.data
            .ok_or_else(|| ApiError::EmptyResponse(path.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Pull a human readable message out of an error body, if there is one.
fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

/// Turn a status + body pair into a typed envelope.
///
/// Non-2xx statuses and `success: false` bodies become [`ApiError::Service`]
/// with the server message, or `fallback` when the server sent none.
pub fn decode_envelope<T: DeserializeOwned>(
    status: u16,
    body: &str,
    path: &str,
    fallback: &str,
) -> ApiResult<Envelope<T>> {
    if !(200..300).contains(&status) {
        let message = server_message(body).unwrap_or_else(|| fallback.to_string());
        return Err(ApiError::service(status, message));
    }

    // 204 and friends
    if body.trim().is_empty() {
        return Ok(Envelope {
            success: true,
            data: None,
            message: None,
            count: None,
        });
    }

    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })?;

    if !envelope.success {
        let message = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        return Err(ApiError::service(status, message));
    }

    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_list_envelope() {
        let body = r#"{"success": true, "count": 2, "data": ["Engineering", "Health"]}"#;
        let envelope: Envelope<Vec<String>> =
            decode_envelope(200, body, "/skill-assessment/occupation-groups", "failed").unwrap();
        assert_eq!(envelope.count, Some(2));
        assert_eq!(envelope.into_data("/x").unwrap(), vec!["Engineering", "Health"]);
    }

    #[test]
    fn test_non_2xx_uses_server_message() {
        let body = r#"{"success": false, "message": "Skill assessment not found"}"#;
        let err = decode_envelope::<serde_json::Value>(404, body, "/skill-assessment/1", "Failed to fetch skill assessment")
            .unwrap_err();
        assert_eq!(err.to_string(), "Skill assessment not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_non_2xx_falls_back_to_generic_message() {
        let err = decode_envelope::<serde_json::Value>(500, "<html>oops</html>", "/visa", "Failed to fetch visa services")
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch visa services");
    }

    #[test]
    fn test_success_false_is_a_service_error() {
        let body = r#"{"success": false}"#;
        let err = decode_envelope::<serde_json::Value>(200, body, "/insurance", "Failed to create health insurance")
            .unwrap_err();
        assert!(matches!(err, ApiError::Service { status: 200, .. }));
        assert_eq!(err.to_string(), "Failed to create health insurance");
    }

    #[test]
    fn test_malformed_body_is_a_decode_error() {
        let err = decode_envelope::<Vec<String>>(200, "{not json", "/visa", "failed").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn test_missing_data() {
        let envelope: Envelope<Vec<String>> =
            decode_envelope(200, r#"{"success": true, "message": "Deleted"}"#, "/visa/1", "failed").unwrap();
        assert!(matches!(envelope.into_data("/visa/1"), Err(ApiError::EmptyResponse(_))));
    }
}
