use serde::Deserialize;
use std::time::Duration;

fn default_knowledge_base_path() -> String {
    "data/processos.json".into()
}

fn default_openai_api_base() -> String {
    "https://api.openai.com".into()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".into()
}

fn default_llm_timeout_secs() -> u64 {
    30
}

fn default_reload_knowledge_base() -> bool {
    true
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".into()
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_knowledge_base_path")]
    pub knowledge_base_path: String,
    /// Empty disables the LLM and answers from the knowledge base only.
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default = "default_openai_api_base")]
    pub openai_api_base: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,
    #[serde(default = "default_reload_knowledge_base")]
    pub reload_knowledge_base: bool,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            knowledge_base_path: default_knowledge_base_path(),
            openai_api_key: String::new(),
            openai_api_base: default_openai_api_base(),
            openai_model: default_openai_model(),
            llm_timeout_secs: default_llm_timeout_secs(),
            reload_knowledge_base: default_reload_knowledge_base(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
    }

    pub fn llm_enabled(&self) -> bool {
        !self.openai_api_key.trim().is_empty()
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}
