#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod entity;
pub mod error;
pub mod mapping;
pub mod patterns;
pub mod record;
pub mod region;

pub use entity::{EntityPayload, RawEntity};
pub use error::{Error, Result};
pub use mapping::{CategoryMapping, EntityCategory, EntityMappingConfig};
pub use record::{AddressField, AddressRecord, ExtractResponse, ResultCode};
pub use region::{RegionLevel, RegionRecord, RegionStore, RegionTypeCodes};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse>;
    fn get_default_model(&self) -> &str;
}

/// An external extraction model.
///
/// Backends are black boxes: they take the raw request text (plus an optional
/// extraction schema) and return whatever JSON their model produces. Turning
/// that JSON into an [`AddressRecord`] is the job of a [`ResultNormalizer`].
#[async_trait]
pub trait EntityBackend: Send + Sync {
    async fn infer(
        &self,
        text: &str,
        schema: Option<&serde_json::Value>,
    ) -> anyhow::Result<serde_json::Value>;

    /// Model identifier this backend serves.
    fn model_id(&self) -> &str;
}

/// Adapts one backend's raw output shape into the canonical record.
pub trait ResultNormalizer: Send + Sync {
    fn normalize(&self, output: &serde_json::Value, text: &str) -> Result<AddressRecord>;
}
