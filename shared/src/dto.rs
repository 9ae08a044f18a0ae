use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Body of `POST /api/assistant`. The message is kept loose so that a
/// missing or non-string value can be answered with a 400 instead of a
/// rejected extractor.
#[derive(Debug, Default, Deserialize)]
pub struct AssistantRequest {
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

impl AssistantRequest {
    /// The trimmed message, if present, a string and non-blank.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReplySource {
    Llm,
    KnowledgeBase,
    Help,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub answer: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "titulo")]
    pub title: String,
    pub source: ReplySource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub answer: String,
}
