use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One role-tagged entry in the session transcript.
///
/// For every role except `system`, `content` holds a serialized JSON object
/// following the decision protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }

    /// Tool observations ride on the `developer` role, which the upstream
    /// chat API treats as trusted non-user input.
    pub fn observation(content: impl Into<String>) -> Self {
        Self {
            role: "developer".into(),
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Request one structured decision for the given transcript.
    ///
    /// Returns the raw reply text, which the agent loop decodes; the provider
    /// is responsible for constraining the model to a single JSON object.
    async fn complete(&self, transcript: &[ChatMessage]) -> anyhow::Result<String>;
}
