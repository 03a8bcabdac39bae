//! Generation provider seams.
//!
//! The message service talks to providers through these traits; the real
//! implementations live in the client crates, tests plug in fakes.

use async_trait::async_trait;
use imagekit_client::ImageKitClient;
use openai_client::OpenAIClient;

/// Single-turn text completion.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Image generation ending in a hosted URL.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_hosted(&self, prompt: &str) -> anyhow::Result<String>;
}

#[async_trait]
impl TextGenerator for OpenAIClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        OpenAIClient::complete(self, prompt).await
    }
}

#[async_trait]
impl ImageGenerator for ImageKitClient {
    async fn generate_hosted(&self, prompt: &str) -> anyhow::Result<String> {
        self.generate_and_upload(prompt).await
    }
}
