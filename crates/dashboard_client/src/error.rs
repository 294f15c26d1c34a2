use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError
{
    #[error("request to {url} failed: {source}")]
    Transport
    {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{message} (HTTP {status})")]
    Status
    {
        status: StatusCode,
        message: String,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode
    {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError
{
    pub fn status(&self) -> Option<StatusCode>
    {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { source, .. } => source.status(),
            ApiError::Decode { .. } => None,
        }
    }
}

/// Text to show for a failed request: the server's `message`, then its
/// `error`, then the caller's fallback.
pub fn error_message(body: &str, fallback: &str) -> String
{
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback.to_string();
    };

    ["message", "error"]
        .iter()
        .find_map(|field| value.get(field).and_then(Value::as_str))
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests
{
    use reqwest::StatusCode;

    use super::ApiError;
    use super::error_message;

    #[test]
    fn test_error_message_prefers_message_field()
    {
        assert_eq!(error_message(r#"{"message": "Order tidak ditemukan", "error": "x"}"#, "fallback"), "Order tidak ditemukan");
        assert_eq!(error_message(r#"{"error": "Password salah"}"#, "fallback"), "Password salah");
        assert_eq!(error_message(r#"{"message": ""}"#, "Gagal login"), "Gagal login");
        assert_eq!(error_message("<html>502</html>", "Gagal login"), "Gagal login");
        assert_eq!(error_message(r#"{"message": 12}"#, "Gagal login"), "Gagal login");
    }

    #[test]
    fn test_status_error_display()
    {
        let error = ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: "Token tidak valid".to_string(),
        };

        assert_eq!(error.to_string(), "Token tidak valid (HTTP 401 Unauthorized)");
        assert_eq!(error.status(), Some(StatusCode::UNAUTHORIZED));
    }
}
