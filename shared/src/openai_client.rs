use async_trait::async_trait;
use openai::chat::{ChatCompletionMessage, ChatCompletionMessageRole};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::{debug, error};

use crate::config::Settings;
use crate::knowledge::Corpus;

#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("language model disabled")]
    Disabled,
    #[error("missing api key")]
    MissingApiKey,
    #[error("network error: {0}")]
    Network(String),
    #[error("http error: {0}")]
    Http(u16),
    #[error("parse error: {0}")]
    Parse(serde_json::Error),
    #[error("empty answer")]
    EmptyAnswer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmAnswer {
    pub answer: String,
    pub model: String,
}

/// Generates an answer grounded on the knowledge base.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn answer(&self, question: &str, corpus: &Corpus) -> Result<LlmAnswer, LlmError>;
}

/// Used when no API key is configured; every call falls through to the matcher.
pub struct DisabledModel;

#[async_trait]
impl LanguageModel for DisabledModel {
    async fn answer(&self, _question: &str, _corpus: &Corpus) -> Result<LlmAnswer, LlmError> {
        Err(LlmError::Disabled)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatCompletionMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn msg(role: ChatCompletionMessageRole, txt: &str) -> ChatCompletionMessage {
    ChatCompletionMessage {
        role,
        content: Some(txt.to_string()),
        ..Default::default()
    }
}

/// System prompt restricting the model to the documented processes.
pub fn build_system_prompt(corpus: &Corpus) -> String {
    let mut prompt = String::from(
        "Você é o Oracle, assistente de processos internos da empresa. \
         Responda em português, de forma curta e objetiva, usando apenas os \
         processos documentados abaixo. Se a pergunta não for coberta por eles, \
         diga que não encontrou a informação.\n\nProcessos:\n",
    );
    for r in corpus {
        let _ = write!(
            prompt,
            "\n### {} ({})\nPergunta: {}\nResposta: {}\n",
            r.title, r.category, r.question, r.answer
        );
    }
    prompt
}

/// Chat-completions client for an OpenAI compatible endpoint.
pub struct OpenAiChat {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(client: Client, api_key: String, api_base: String, model: String) -> Self {
        Self {
            client,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(settings.llm_timeout())
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;
        Ok(Self::new(
            client,
            settings.openai_api_key.clone(),
            settings.openai_api_base.clone(),
            settings.openai_model.clone(),
        ))
    }

    pub async fn chat(&self, messages: Vec<ChatCompletionMessage>) -> Result<String, LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        let req = ChatRequest {
            model: &self.model,
            messages: &messages,
            temperature: 0.2,
        };
        let url = format!("{}/v1/chat/completions", self.api_base);
        debug!("\u{2192} OpenAI request: model = {}", req.model);

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| {
                error!("network error to OpenAI: {e}");
                LlmError::Network(e.to_string())
            })?;

        let status = res.status();
        let bytes = res
            .bytes()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;
        debug!(
            %status,
            "\u{2190} body = {}",
            String::from_utf8_lossy(&bytes[..bytes.len().min(1024)])
        );

        if !status.is_success() {
            return Err(LlmError::Http(status.as_u16()));
        }

        let chat: ChatResponse = serde_json::from_slice(&bytes).map_err(LlmError::Parse)?;
        let answer = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();
        if answer.is_empty() {
            return Err(LlmError::EmptyAnswer);
        }
        Ok(answer)
    }
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    async fn answer(&self, question: &str, corpus: &Corpus) -> Result<LlmAnswer, LlmError> {
        let messages = vec![
            msg(ChatCompletionMessageRole::System, &build_system_prompt(corpus)),
            msg(ChatCompletionMessageRole::User, question),
        ];
        let answer = self.chat(messages).await?;
        Ok(LlmAnswer {
            answer,
            model: self.model.clone(),
        })
    }
}
