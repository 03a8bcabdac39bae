//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for single-turn chat completion: the
//! prompt is sent as the only message, no conversation history is forwarded.
//! Provides token masking for safe logging.

use async_openai::{
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use std::sync::Arc;
use tracing::info;

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If the token has <= 11 chars, returns "***" to avoid leaking any part of the key.
/// Operates on chars, not bytes, so multibyte tokens never split a code point.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        "***".to_string()
    } else {
        let head: String = chars[..7].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    }
}

/// OpenAI chat client. Wraps the async-openai client and a fixed model name.
#[derive(Clone)]
pub struct OpenAIClient {
    /// Shared async-openai client used for all API calls.
    client: Arc<Client<async_openai::config::OpenAIConfig>>,
    model: String,
    /// API key stored only for logging (masked).
    api_key_for_logging: Option<String>,
}

impl OpenAIClient {
    /// Builds a client using the given API key and default API base URL.
    pub fn new(api_key: String, model: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);
        Self {
            client: Arc::new(client),
            model,
            api_key_for_logging,
        }
    }

    /// Builds a client with a custom base URL (OpenAI-compatible gateways).
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = async_openai::config::OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        let client = Client::with_config(config);
        Self {
            client: Arc::new(client),
            model,
            api_key_for_logging,
        }
    }

    /// Single-turn completion: sends the prompt as the only user message and
    /// returns the first choice's content.
    pub async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let masked = self
            .api_key_for_logging
            .as_deref()
            .map(mask_token)
            .unwrap_or_else(|| "***".to_string());

        info!(
            model = %self.model,
            prompt_preview = %prompt.chars().take(100).collect::<String>(),
            api_key = %masked,
            "OpenAI chat completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into()])
            .build()?;

        let response = self.client.chat().create(request).await?;

        if let Some(choice) = response.choices.first() {
            Ok(choice.message.content.clone().unwrap_or_default())
        } else {
            anyhow::bail!("No response from OpenAI");
        }
    }
}
