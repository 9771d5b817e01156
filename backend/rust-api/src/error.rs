use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::Artifact;

/// Failure talking to the chat-completion API itself.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request timed out")]
    Timeout,

    #[error("completion transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("completion API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to read completion response: {0}")]
    Decode(#[source] reqwest::Error),

    /// 2xx reply whose body is not a chat-completion envelope at all.
    #[error("completion response is not a JSON envelope: {0}")]
    MalformedBody(#[source] serde_json::Error),
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Timeout
        } else if err.is_decode() {
            CompletionError::Decode(err)
        } else {
            CompletionError::Transport(err)
        }
    }
}

/// Everything a proxy handler can fail with. The `Display` text is what the
/// caller sees in `{"error": ...}`; the full detail only goes to the log.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    Configuration(String),

    #[error("Failed to generate {artifact}")]
    Upstream {
        artifact: Artifact,
        #[source]
        source: CompletionError,
    },

    #[error("No {artifact} generated")]
    MissingResult { artifact: Artifact },

    #[error("Invalid {artifact} generated")]
    InvalidResult { artifact: Artifact, detail: String },
}

impl ProxyError {
    pub fn input(message: impl Into<String>) -> Self {
        ProxyError::Input(message.into())
    }

    pub fn invalid_result(artifact: Artifact, detail: impl Into<String>) -> Self {
        ProxyError::InvalidResult {
            artifact,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Input(_) => "input",
            ProxyError::Configuration(_) => "configuration",
            ProxyError::Upstream { .. } => "upstream",
            ProxyError::MissingResult { .. } | ProxyError::InvalidResult { .. } => "generation",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Input(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for ProxyError {
    fn from(err: validator::ValidationErrors) -> Self {
        ProxyError::Input(format!("Validation error: {}", err))
    }
}

impl From<config::ConfigError> for ProxyError {
    fn from(err: config::ConfigError) -> Self {
        ProxyError::Configuration(format!("Failed to load configuration: {}", err))
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            ProxyError::Input(message) => {
                tracing::warn!(kind = self.kind(), "Rejected request: {}", message);
            }
            ProxyError::Upstream { artifact, source } => {
                tracing::error!(kind = self.kind(), %artifact, "AI API error: {}", source);
            }
            ProxyError::InvalidResult { artifact, detail } => {
                tracing::error!(kind = self.kind(), %artifact, "Rejected generated payload: {}", detail);
            }
            other => {
                tracing::error!(kind = other.kind(), "Error: {}", other);
            }
        }

        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn public_messages_per_artifact() {
        assert_eq!(
            ProxyError::MissingResult {
                artifact: Artifact::Quiz
            }
            .to_string(),
            "No quiz generated"
        );
        assert_eq!(
            ProxyError::MissingResult {
                artifact: Artifact::StudyPlan
            }
            .to_string(),
            "No study plan generated"
        );
        assert_eq!(
            ProxyError::Upstream {
                artifact: Artifact::StudyPlan,
                source: CompletionError::Timeout,
            }
            .to_string(),
            "Failed to generate study plan"
        );
    }

    #[tokio::test]
    async fn upstream_detail_is_not_exposed() {
        let err = ProxyError::Upstream {
            artifact: Artifact::Quiz,
            source: CompletionError::Status {
                status: reqwest::StatusCode::PAYMENT_REQUIRED,
                body: "credits exhausted for workspace 42".to_string(),
            },
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to generate quiz");
        assert!(!body.to_string().contains("workspace 42"));
    }

    #[tokio::test]
    async fn input_errors_map_to_bad_request() {
        let response = ProxyError::input("Validation error: subject").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Validation error: subject");
    }

    #[test]
    fn generation_variants_share_kind() {
        let missing = ProxyError::MissingResult {
            artifact: Artifact::Quiz,
        };
        let invalid = ProxyError::invalid_result(Artifact::Quiz, "bad label");
        assert_eq!(missing.kind(), "generation");
        assert_eq!(invalid.kind(), "generation");
        assert_eq!(invalid.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
