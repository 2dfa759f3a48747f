use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use kuvend_core::{KuvendError, PersonaKey, Result};

use super::{ChatMessage, Generator};
use crate::config::ProviderConfig;

/// Chat-completions client speaking the OpenAI wire format.
pub struct OpenAiGenerator {
    pub model: String,
    pub base_url: Option<String>,
    api_key: Option<String>,
    client: Client,
}

impl OpenAiGenerator {
    pub fn new(model: String, base_url: Option<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            Client::new()
        });

        Self {
            model,
            base_url,
            api_key,
            client,
        }
    }

    /// Build from `[provider]` settings, reading the key from `api_key_env`.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self::new(
            config.model.clone(),
            config.base_url.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }

    async fn make_request(&self, messages: Vec<ChatMessage>) -> Result<String> {
        #[derive(Serialize)]
        struct Request {
            model: String,
            messages: Vec<ChatMessage>,
        }

        #[derive(Deserialize)]
        struct Response {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ChatMessage,
        }

        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| KuvendError::service_unavailable("provider base_url is not set"))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| KuvendError::service_unavailable("provider API key is not set"))?;

        let request = Request {
            model: self.model.clone(),
            messages,
        };

        tracing::debug!("Requesting generation from {} ({})", base_url, self.model);

        let response = self
            .client
            .post(base_url)
            .header("Content-Type", "application/json")
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| KuvendError::service_unavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KuvendError::service_unavailable(format!(
                "provider returned {}",
                status
            )));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| KuvendError::service_unavailable(format!("read failed: {}", e)))?;

        let parsed: Response = serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!("Failed to parse response: {}", response_text);
            KuvendError::service_unavailable(format!("malformed response: {}", e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| KuvendError::service_unavailable("no choices in response"))
    }
}

/// System prompt describing the selected panel.
pub fn system_prompt(personas: &[PersonaKey], mode: Option<&str>) -> String {
    let mut prompt = String::from("You answer as the following panel of personas:\n");
    for key in personas {
        let profile = key.profile();
        prompt.push_str(&format!(
            "- {} ({}): expertise in {}; tone {}; {} level\n",
            profile.name,
            profile.key,
            profile.expertise_tags.join(", "),
            profile.tone,
            profile.complexity_level.as_str(),
        ));
    }
    if let Some(mode) = mode {
        prompt.push_str(&format!("Mode: {}\n", mode));
    }
    prompt
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(
        &self,
        prompt: &str,
        personas: &[PersonaKey],
        mode: Option<&str>,
    ) -> Result<String> {
        let messages = vec![
            ChatMessage::system(system_prompt(personas, mode)),
            ChatMessage::user(prompt),
        ];

        self.make_request(messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(base_url: Option<&str>, api_key: Option<&str>) -> OpenAiGenerator {
        OpenAiGenerator::new(
            "test-model".to_string(),
            base_url.map(str::to_string),
            api_key.map(str::to_string),
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn test_missing_base_url_is_unavailable() {
        let err = generator(None, Some("key"))
            .generate("hi", &[PersonaKey::Alba], None)
            .await
            .unwrap_err();
        assert!(matches!(err, KuvendError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_unavailable() {
        let generator = generator(Some("http://127.0.0.1:9/v1/chat/completions"), None);
        assert!(!generator.is_configured());

        let err = generator
            .generate("hi", &[PersonaKey::Alba], None)
            .await
            .unwrap_err();
        assert!(matches!(err, KuvendError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_unavailable() {
        let err = generator(Some("http://127.0.0.1:9/v1/chat/completions"), Some("key"))
            .generate("hi", &[PersonaKey::Alba], Some("brief"))
            .await
            .unwrap_err();
        assert!(matches!(err, KuvendError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_system_prompt_lists_personas() {
        let prompt = system_prompt(&[PersonaKey::Jona, PersonaKey::Asi], Some("brief"));
        assert!(prompt.contains("Jona (jona)"));
        assert!(prompt.contains("ASI (asi)"));
        assert!(prompt.contains("visionary"));
        assert!(prompt.ends_with("Mode: brief\n"));
        assert!(!prompt.contains("Alba"));
    }
}
