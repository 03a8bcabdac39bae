//! Persistence models, one per table.

mod chat;
mod message;
mod transaction;
mod user;

pub use chat::ChatRecord;
pub use message::MessageRecord;
pub use transaction::{TransactionRecord, TransactionState};
pub use user::UserRecord;
