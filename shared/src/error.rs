use thiserror::Error;

use crate::knowledge::CorpusError;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("knowledge base unavailable: {0}")]
    KnowledgeBaseUnavailable(#[from] CorpusError),
    #[error("knowledge base is empty")]
    EmptyKnowledgeBase,
}

pub type Result<T> = std::result::Result<T, AssistantError>;
