//! Server config: bind address, database, secrets, provider endpoints.
//! Loaded from environment variables.

use anyhow::{Context, Result};
use std::env;

/// All env-driven settings consumed by the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// BIND_ADDR, default `0.0.0.0:8080`
    pub bind_addr: String,
    /// DATABASE_URL, default `sqlite://quillgpt.db`
    pub database_url: String,
    /// LOG_FILE, default `logs/quillgpt.log`
    pub log_file: String,
    /// JWT_SECRET: signing secret for auth tokens
    pub jwt_secret: String,
    /// APP_ID: tag filtering payment events belonging to this app, default `quillgpt`
    pub app_id: String,
    /// OPENAI_API_KEY
    pub openai_api_key: String,
    /// OPENAI_BASE_URL: optional OpenAI-compatible gateway
    pub openai_base_url: Option<String>,
    /// CHAT_MODEL, default `gemini-2.0-flash`
    pub chat_model: String,
    /// IMAGEKIT_URL_ENDPOINT: delivery endpoint used to build generation URLs
    pub imagekit_url_endpoint: String,
    /// IMAGEKIT_PRIVATE_KEY
    pub imagekit_private_key: String,
    /// IMAGEKIT_UPLOAD_URL: optional override of the media upload endpoint
    pub imagekit_upload_url: Option<String>,
    /// IMAGEKIT_FOLDER, default `quillgpt`
    pub imagekit_folder: String,
    /// STRIPE_SECRET_KEY
    pub stripe_secret_key: String,
    /// STRIPE_WEBHOOK_SECRET: signing secret for payment webhooks
    pub stripe_webhook_secret: String,
    /// CHECKOUT_SUCCESS_URL, default `http://localhost:5173/loading`
    pub checkout_success_url: String,
    /// CHECKOUT_CANCEL_URL, default `http://localhost:5173/credits`
    pub checkout_cancel_url: String,
}

impl ServerConfig {
    /// Load from environment variables; call after `dotenvy::dotenv()`.
    pub fn load() -> Result<Self> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://quillgpt.db".to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/quillgpt.log".to_string());
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;
        let app_id = env::var("APP_ID").unwrap_or_else(|_| "quillgpt".to_string());
        let openai_api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?;
        let openai_base_url = env::var("OPENAI_BASE_URL").ok();
        let chat_model =
            env::var("CHAT_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());
        let imagekit_url_endpoint =
            env::var("IMAGEKIT_URL_ENDPOINT").context("IMAGEKIT_URL_ENDPOINT not set")?;
        let imagekit_private_key =
            env::var("IMAGEKIT_PRIVATE_KEY").context("IMAGEKIT_PRIVATE_KEY not set")?;
        let imagekit_upload_url = env::var("IMAGEKIT_UPLOAD_URL").ok();
        let imagekit_folder =
            env::var("IMAGEKIT_FOLDER").unwrap_or_else(|_| "quillgpt".to_string());
        let stripe_secret_key =
            env::var("STRIPE_SECRET_KEY").context("STRIPE_SECRET_KEY not set")?;
        let stripe_webhook_secret =
            env::var("STRIPE_WEBHOOK_SECRET").context("STRIPE_WEBHOOK_SECRET not set")?;
        let checkout_success_url = env::var("CHECKOUT_SUCCESS_URL")
            .unwrap_or_else(|_| "http://localhost:5173/loading".to_string());
        let checkout_cancel_url = env::var("CHECKOUT_CANCEL_URL")
            .unwrap_or_else(|_| "http://localhost:5173/credits".to_string());

        Ok(Self {
            bind_addr,
            database_url,
            log_file,
            jwt_secret,
            app_id,
            openai_api_key,
            openai_base_url,
            chat_model,
            imagekit_url_endpoint,
            imagekit_private_key,
            imagekit_upload_url,
            imagekit_folder,
            stripe_secret_key,
            stripe_webhook_secret,
            checkout_success_url,
            checkout_cancel_url,
        })
    }

    /// Validate config (URL-shaped settings must parse).
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("IMAGEKIT_URL_ENDPOINT", Some(&self.imagekit_url_endpoint)),
            ("OPENAI_BASE_URL", self.openai_base_url.as_ref()),
            ("IMAGEKIT_UPLOAD_URL", self.imagekit_upload_url.as_ref()),
        ] {
            if let Some(url_str) = value {
                if reqwest::Url::parse(url_str).is_err() {
                    anyhow::bail!("{} is set but not a valid URL: {}", name, url_str);
                }
            }
        }
        Ok(())
    }
}
