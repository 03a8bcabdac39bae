use thiserror::Error;

/// Application errors shared by the message service and webhook handling.
///
/// The Display strings for the validation variants are the exact messages
/// returned to API clients in `{success: false, message}` responses.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Account is not active")]
    AccountNotActive,

    #[error("Chat not found")]
    ChatNotFound,

    #[error("you don't have enough credits to use this feature")]
    InsufficientCredits,

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
