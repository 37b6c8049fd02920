use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of the decision protocol itself, as opposed to transport errors
/// from the provider or tool upstreams.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model reply is not a valid decision: {0}")]
    MalformedDecision(#[source] serde_json::Error),

    #[error("model requested unknown tool '{0}'")]
    UnknownTool(String),

    #[error("no final answer after {0} iterations")]
    IterationLimit(usize),
}

/// One structured reply from the model, tagged by `type`.
///
/// `plan` is informational: the loop records it and asks again. `action`
/// names a tool and its argument. `output` is terminal.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Decision {
    Plan {
        // Some models put the narrative under a `user` key, copying the
        // worked example's user turn. Accept both spellings.
        #[serde(default, alias = "user")]
        plan: String,
    },
    Action {
        function: String,
        input: String,
    },
    Output {
        output: String,
    },
}

impl Decision {
    pub fn parse(raw: &str) -> Result<Self, AgentError> {
        serde_json::from_str(raw).map_err(AgentError::MalformedDecision)
    }
}

/// Messages the loop itself appends to the transcript, tagged by `type`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Turn<'a> {
    User { user: &'a str },
    Observation { observation: &'a str },
}

impl Turn<'_> {
    pub fn encode(&self) -> String {
        // Both variants serialize to flat string-valued objects, which
        // cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
