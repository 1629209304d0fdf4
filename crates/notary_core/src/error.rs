/// Failures raised while talking to the notarization tool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotaryError {
    #[error("notarization tool executable not found")]
    ToolNotFound,
    /// Structured failure decoded from the tool's `product-errors` payload.
    #[error("{message} (code {code})")]
    Tool {
        code: i64,
        message: String,
        suggestion: Option<String>,
    },
    #[error("no data received from notarization tool")]
    NoData,
    #[error("failed to launch notarization tool: {0}")]
    Launch(String),
    /// Malformed or unexpected response payload.
    #[error("unexpected tool response: {0}")]
    Decode(String),
}

impl NotaryError {
    pub fn tool(code: i64, message: impl Into<String>) -> Self {
        NotaryError::Tool {
            code,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Decode failures count as "no items this cycle" and are never shown to the user.
    pub fn is_decode(&self) -> bool {
        matches!(self, NotaryError::Decode(_))
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            NotaryError::Tool { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }
}
