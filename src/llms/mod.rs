pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use kuvend_core::{KuvendError, PersonaKey, Result};

use crate::config::ProviderConfig;

pub use openai::OpenAiGenerator;

/// External text generation collaborator.
///
/// Implementations own their timeout and retry policy. Every failure that
/// stems from configuration or transport must be reported as
/// [`KuvendError::ServiceUnavailable`].
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        personas: &[PersonaKey],
        mode: Option<&str>,
    ) -> Result<String>;
}

/// Stand-in used when no provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl Generator for UnconfiguredGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _personas: &[PersonaKey],
        _mode: Option<&str>,
    ) -> Result<String> {
        Err(KuvendError::service_unavailable(
            "no generation provider configured",
        ))
    }
}

/// Pick the generator `[provider]` describes.
pub fn generator_from_config(config: &ProviderConfig) -> Arc<dyn Generator> {
    if config.base_url.is_some() {
        Arc::new(OpenAiGenerator::from_config(config))
    } else {
        tracing::debug!("No provider base_url configured, generation is unavailable");
        Arc::new(UnconfiguredGenerator)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
