//! Application state: repositories, services, and provider clients, wired
//! once at startup and cloned into handlers.

use std::sync::Arc;

use anyhow::Result;
use imagekit_client::ImageKitClient;
use openai_client::OpenAIClient;
use storage::{ChatRepository, SqlitePoolManager, TransactionRepository, UserRepository};

use crate::config::ServerConfig;
use crate::services::{MessageService, ReconcileService};
use crate::stripe::{CheckoutGateway, StripeClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub users: UserRepository,
    pub chats: ChatRepository,
    pub transactions: TransactionRepository,
    pub messages: MessageService,
    pub reconcile: ReconcileService,
    pub checkout: Arc<dyn CheckoutGateway>,
}

impl AppState {
    /// Connects the database, runs table init, and wires services to the real
    /// provider clients.
    pub async fn build(config: ServerConfig) -> Result<Self> {
        let manager = SqlitePoolManager::new(&config.database_url).await?;
        let users = UserRepository::new(manager.clone()).await?;
        let chats = ChatRepository::new(manager.clone()).await?;
        let transactions = TransactionRepository::new(manager).await?;

        let text = match &config.openai_base_url {
            Some(base_url) => OpenAIClient::with_base_url(
                config.openai_api_key.clone(),
                base_url.clone(),
                config.chat_model.clone(),
            ),
            None => OpenAIClient::new(config.openai_api_key.clone(), config.chat_model.clone()),
        };

        let mut image = ImageKitClient::new(
            config.imagekit_url_endpoint.clone(),
            config.imagekit_private_key.clone(),
            config.imagekit_folder.clone(),
        );
        if let Some(upload_url) = &config.imagekit_upload_url {
            image = image.with_upload_url(upload_url.clone());
        }

        let checkout: Arc<dyn CheckoutGateway> =
            Arc::new(StripeClient::new(config.stripe_secret_key.clone()));

        let messages = MessageService::new(
            users.clone(),
            chats.clone(),
            Arc::new(text),
            Arc::new(image),
        );
        let reconcile = ReconcileService::new(
            transactions.clone(),
            checkout.clone(),
            config.app_id.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            users,
            chats,
            transactions,
            messages,
            reconcile,
            checkout,
        })
    }
}
