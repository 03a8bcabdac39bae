//! Storage crate: SQLite persistence for users, chats, messages, transactions.
//!
//! ## Modules
//!
//! - [`error`] – StorageError
//! - [`models`] – UserRecord, ChatRecord, MessageRecord, TransactionRecord
//! - [`user_repo`] – UserRepository (the credit ledger: debit/credit)
//! - [`chat_repo`] – ChatRepository (chats and their messages)
//! - [`transaction_repo`] – TransactionRepository (pending → paid settlement)
//! - [`sqlite_pool`] – SqlitePoolManager

mod chat_repo;
mod error;
mod models;
mod sqlite_pool;
mod transaction_repo;
mod user_repo;

pub use chat_repo::ChatRepository;
pub use error::StorageError;
pub use models::{ChatRecord, MessageRecord, TransactionRecord, TransactionState, UserRecord};
pub use sqlite_pool::SqlitePoolManager;
pub use transaction_repo::{SettledCredit, TransactionRepository};
pub use user_repo::UserRepository;
