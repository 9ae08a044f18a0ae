//! Answering pipeline: language model first, knowledge base matcher as
//! fallback, and a help message listing the available topics when neither
//! produces an answer.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::commands::expand_command;
use crate::dto::{AssistantResponse, ReplySource};
use crate::error::{AssistantError, Result};
use crate::knowledge::{Corpus, KnowledgeBase};
use crate::matcher::find_best_match;
use crate::openai_client::{LanguageModel, LlmError};

pub const LLM_CATEGORY: &str = "Assistente IA";
pub const LLM_TITLE: &str = "Resposta Gerada";
pub const HELP_CATEGORY: &str = "Ajuda Geral";
pub const HELP_TITLE: &str = "Tópicos Disponíveis";

/// Help message returned when no process matches `message`.
pub fn help_text(message: &str, corpus: &Corpus) -> String {
    let topics = corpus
        .titles()
        .map(|t| format!("• {t}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Não encontrei uma resposta específica para sua pergunta sobre \"{message}\".\n\n\
         Aqui estão alguns tópicos que posso ajudar:\n{topics}\n\n\
         Você pode reformular sua pergunta ou perguntar sobre algum desses tópicos específicos."
    )
}

/// Answer from the knowledge base alone, without consulting a model.
///
/// Command prefixes are expanded for matching; the help text echoes `message`
/// as the user typed it.
pub fn answer_from_corpus(message: &str, corpus: &Corpus) -> AssistantResponse {
    match find_best_match(expand_command(message.trim()), corpus) {
        Some(record) => AssistantResponse {
            answer: record.answer.clone(),
            category: record.category.clone(),
            title: record.title.clone(),
            source: ReplySource::KnowledgeBase,
        },
        None => AssistantResponse {
            answer: help_text(message, corpus),
            category: HELP_CATEGORY.into(),
            title: HELP_TITLE.into(),
            source: ReplySource::Help,
        },
    }
}

pub struct Assistant {
    knowledge: KnowledgeBase,
    model: Arc<dyn LanguageModel>,
}

impl Assistant {
    pub fn new(knowledge: KnowledgeBase, model: Arc<dyn LanguageModel>) -> Self {
        Self { knowledge, model }
    }

    /// Answer a non-blank user message.
    pub async fn reply(&self, message: &str) -> Result<AssistantResponse> {
        let query = expand_command(message.trim());
        let corpus = self.knowledge.corpus().await?;
        if corpus.is_empty() {
            return Err(AssistantError::EmptyKnowledgeBase);
        }

        match self.model.answer(query, &corpus).await {
            Ok(llm) => {
                info!(model = %llm.model, "answered by language model");
                return Ok(AssistantResponse {
                    answer: llm.answer,
                    category: LLM_CATEGORY.into(),
                    title: LLM_TITLE.into(),
                    source: ReplySource::Llm,
                });
            }
            Err(LlmError::Disabled) => debug!("language model disabled, using knowledge base"),
            Err(e) => warn!("language model unavailable, using knowledge base: {e}"),
        }

        let reply = answer_from_corpus(message, &corpus);
        info!(source = %reply.source, title = %reply.title, "answered from knowledge base");
        Ok(reply)
    }
}
