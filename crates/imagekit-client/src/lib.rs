//! # ImageKit client
//!
//! Image generation and media-library upload against an ImageKit-style host.
//!
//! Generation is triggered by fetching a URL that embeds the URL-encoded
//! prompt and a millisecond timestamp as a uniqueness token. The fetched PNG
//! is re-encoded as a base64 data URI and uploaded to the media library; the
//! hosted URL is what ends up in the chat message.

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

const DEFAULT_UPLOAD_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// ImageKit client: generation endpoint plus authenticated media upload.
#[derive(Clone)]
pub struct ImageKitClient {
    http: Arc<reqwest::Client>,
    /// Delivery endpoint, e.g. `https://ik.imagekit.io/yourid`.
    url_endpoint: String,
    /// Private API key; sent as basic-auth username on uploads.
    private_key: String,
    upload_url: String,
    folder: String,
}

impl ImageKitClient {
    pub fn new(url_endpoint: String, private_key: String, folder: String) -> Self {
        Self {
            http: Arc::new(reqwest::Client::new()),
            url_endpoint: url_endpoint.trim_end_matches('/').to_string(),
            private_key,
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            folder,
        }
    }

    /// Overrides the upload endpoint (self-hosted or test servers).
    pub fn with_upload_url(mut self, upload_url: String) -> Self {
        self.upload_url = upload_url;
        self
    }

    /// Builds the generation URL for a prompt and uniqueness token: the
    /// prompt is URL-encoded into the path, the token keeps repeated prompts
    /// from hitting the delivery cache, and the transform pins 800x800.
    pub fn generation_url(&self, prompt: &str, token_millis: i64) -> String {
        let encoded_prompt = urlencoding::encode(prompt);
        format!(
            "{}/ik-genimg-prompt-{}/{}/{}.png?tr=w-800,h-800",
            self.url_endpoint, encoded_prompt, self.folder, token_millis
        )
    }

    /// Triggers generation by fetching the generation URL; returns the PNG bytes.
    pub async fn generate(&self, prompt: &str) -> anyhow::Result<Vec<u8>> {
        let url = self.generation_url(prompt, chrono::Utc::now().timestamp_millis());

        info!(
            prompt_preview = %prompt.chars().take(100).collect::<String>(),
            "ImageKit generation request"
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("image generation request failed")?
            .error_for_status()
            .context("image generation returned an error status")?;

        let bytes = response.bytes().await.context("reading generated image")?;
        Ok(bytes.to_vec())
    }

    /// Uploads PNG bytes to the media library; returns the hosted URL.
    pub async fn upload(&self, file_name: &str, png: &[u8]) -> anyhow::Result<String> {
        let data_uri = format!("data:image/png;base64,{}", STANDARD.encode(png));

        let form = reqwest::multipart::Form::new()
            .text("file", data_uri)
            .text("fileName", file_name.to_string())
            .text("folder", self.folder.clone());

        let response = self
            .http
            .post(&self.upload_url)
            .basic_auth(&self.private_key, Some(""))
            .multipart(form)
            .send()
            .await
            .context("media upload request failed")?
            .error_for_status()
            .context("media upload returned an error status")?;

        let uploaded: UploadResponse = response.json().await.context("parsing upload response")?;

        info!(file_name = %file_name, url = %uploaded.url, "Uploaded generated image");
        Ok(uploaded.url)
    }

    /// Generates an image for the prompt and uploads it; returns the hosted URL.
    pub async fn generate_and_upload(&self, prompt: &str) -> anyhow::Result<String> {
        let png = self.generate(prompt).await?;
        let file_name = format!("{}.png", chrono::Utc::now().timestamp_millis());
        self.upload(&file_name, &png).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ImageKitClient {
        ImageKitClient::new(
            "https://ik.imagekit.io/demo/".to_string(),
            "private_key".to_string(),
            "quillgpt".to_string(),
        )
    }

    #[test]
    fn generation_url_encodes_prompt_and_token() {
        let url = client().generation_url("a red fox, watercolor", 1700000000000);
        assert_eq!(
            url,
            "https://ik.imagekit.io/demo/ik-genimg-prompt-a%20red%20fox%2C%20watercolor/quillgpt/1700000000000.png?tr=w-800,h-800"
        );
    }

    #[test]
    fn generation_url_strips_trailing_slash_once() {
        let url = client().generation_url("x", 1);
        assert!(!url.contains("demo//"));
    }
}
