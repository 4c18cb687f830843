use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Settings;
use crate::llm::openai::OpenAiClient;
use crate::{MedscribeError, Result};

/// Broad category of a completion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend could not be reached or the connection dropped.
    Transport,
    /// The backend rejected the credential.
    Authentication,
    /// The backend asked us to slow down.
    RateLimited,
    /// Any other non-success status from the backend.
    Backend,
    /// The body did not match the expected response shape.
    MalformedResponse,
    /// The response parsed but carried no text.
    EmptyResponse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Authentication => "authentication",
            ErrorKind::RateLimited => "rate limited",
            ErrorKind::Backend => "backend",
            ErrorKind::MalformedResponse => "malformed response",
            ErrorKind::EmptyResponse => "empty response",
        };
        f.write_str(name)
    }
}

/// A failed completion. `detail` may contain provider text and must stay in logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {detail}")]
pub struct CompletionFailure {
    pub kind: ErrorKind,
    pub detail: String,
}

impl CompletionFailure {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Raw backend text on success.
pub type CompletionResult = std::result::Result<String, CompletionFailure>;

/// A text-completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one system/user exchange and return the reply text verbatim.
    async fn complete(&self, system_instruction: &str, user_text: &str) -> CompletionResult;
}

/// Build a completion client from runtime settings.
pub fn build_client(settings: &Settings) -> Result<Arc<dyn CompletionClient>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "openai" => Ok(Arc::new(OpenAiClient::from_settings(settings)?)),
        other => Err(MedscribeError::Config(format!(
            "Unsupported llm.provider '{}'. Supported providers: openai",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn unsupported_provider_returns_error() {
        let mut settings = Settings::default();
        settings.llm.provider = "unknown".to_string();
        settings.llm.api_key = "test-key".to_string();

        let err = match build_client(&settings) {
            Ok(_) => panic!("expected client creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Unsupported llm.provider"));
    }

    #[test]
    fn openai_client_requires_api_key() {
        let settings = Settings::default();

        let err = match build_client(&settings) {
            Ok(_) => panic!("expected client creation to fail"),
            Err(e) => e,
        };
        assert!(matches!(err, MedscribeError::Config(_)));
        assert!(err.to_string().contains("OpenAI API key is missing"));
    }

    #[test]
    fn provider_name_is_case_insensitive() {
        let mut settings = Settings::default();
        settings.llm.provider = "OpenAI".to_string();
        settings.llm.api_key = "test-key".to_string();

        assert!(build_client(&settings).is_ok());
    }

    #[test]
    fn failure_display_includes_kind_and_detail() {
        let failure = CompletionFailure::new(ErrorKind::RateLimited, "slow down");
        assert_eq!(failure.to_string(), "rate limited error: slow down");
    }
}
