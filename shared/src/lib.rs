//! Core of the Oracle assistant: knowledge base model and loading, the
//! lexical matcher used as fallback, the OpenAI client and the answering
//! pipeline that ties them together, plus settings and DTOs shared with the
//! HTTP service.

pub mod assistant;
pub mod commands;
pub mod config;
pub mod dto;
pub mod error;
pub mod knowledge;
pub mod matcher;
pub mod normalize;
pub mod openai_client;
pub mod similarity;
