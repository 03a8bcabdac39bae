//! Integration tests for the credit ledger: [`storage::UserRepository`]
//! debit/credit and [`storage::TransactionRepository::settle`].
//!
//! All tests run against an in-memory SQLite database.

use storage::{
    SqlitePoolManager, TransactionRecord, TransactionRepository, TransactionState, UserRecord,
    UserRepository,
};

async fn setup() -> (UserRepository, TransactionRepository) {
    let manager = SqlitePoolManager::new("sqlite::memory:")
        .await
        .expect("Failed to create pool");
    let users = UserRepository::new(manager.clone())
        .await
        .expect("Failed to create user repository");
    let transactions = TransactionRepository::new(manager)
        .await
        .expect("Failed to create transaction repository");
    (users, transactions)
}

/// **Test: Debit succeeds when the balance covers the amount.**
///
/// **Setup:** User with 5 credits.
/// **Action:** `debit(user, 2, "image generation")`.
/// **Expected:** Returns `true`; balance becomes 3.
#[tokio::test]
async fn test_debit_with_sufficient_balance() {
    let (users, _) = setup().await;

    let user = UserRecord::new("Alice".to_string(), "alice@example.com".to_string(), 5);
    users.save(&user).await.expect("Failed to save user");

    let debited = users
        .debit(&user.id, 2, "image generation")
        .await
        .expect("Failed to debit");
    assert!(debited);

    let reloaded = users.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.credits, 3);
}

/// **Test: Debit is refused when the balance is short, with no mutation.**
///
/// **Setup:** User with 1 credit.
/// **Action:** `debit(user, 2, "image generation")`.
/// **Expected:** Returns `false`; balance stays 1.
#[tokio::test]
async fn test_debit_refused_on_insufficient_balance() {
    let (users, _) = setup().await;

    let user = UserRecord::new("Bob".to_string(), "bob@example.com".to_string(), 1);
    users.save(&user).await.expect("Failed to save user");

    let debited = users
        .debit(&user.id, 2, "image generation")
        .await
        .expect("Failed to debit");
    assert!(!debited);

    let reloaded = users.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.credits, 1);
}

/// **Test: Credit increments the balance.**
///
/// **Setup:** User with 0 credits.
/// **Action:** `credit(user, 100, "purchase")`.
/// **Expected:** Balance becomes 100.
#[tokio::test]
async fn test_credit_increments_balance() {
    let (users, _) = setup().await;

    let user = UserRecord::new("Carol".to_string(), "carol@example.com".to_string(), 0);
    users.save(&user).await.expect("Failed to save user");

    users
        .credit(&user.id, 100, "purchase")
        .await
        .expect("Failed to credit");

    let reloaded = users.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.credits, 100);
}

/// **Test: Credit for an unknown user is an error.**
///
/// **Setup:** Empty users table.
/// **Action:** `credit("missing", 10, "purchase")`.
/// **Expected:** Returns `Err(StorageError::NotFound)`.
#[tokio::test]
async fn test_credit_unknown_user_fails() {
    let (users, _) = setup().await;

    let result = users.credit("missing", 10, "purchase").await;
    assert!(result.is_err());
}

/// **Test: Settling a pending transaction grants credits and marks it paid.**
///
/// **Setup:** User with 0 credits; pending transaction for 100 credits.
/// **Action:** `settle(tx.id)`.
/// **Expected:** Returns `Some` with the user id and 100 credits; user balance
/// is 100; transaction row has `is_paid = true`.
#[tokio::test]
async fn test_settle_pending_transaction() {
    let (users, transactions) = setup().await;

    let user = UserRecord::new("Dave".to_string(), "dave@example.com".to_string(), 0);
    users.save(&user).await.expect("Failed to save user");

    let transaction =
        TransactionRecord::pending(user.id.clone(), "pro".to_string(), 20.0, 100);
    transactions
        .save(&transaction)
        .await
        .expect("Failed to save transaction");

    let settled = transactions
        .settle(&transaction.id)
        .await
        .expect("Failed to settle");

    let settled = settled.expect("Expected a settlement");
    assert_eq!(settled.user_id, user.id);
    assert_eq!(settled.credits, 100);

    let reloaded_user = users.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(reloaded_user.credits, 100);

    let reloaded_tx = transactions
        .find_by_id(&transaction.id)
        .await
        .unwrap()
        .unwrap();
    assert!(reloaded_tx.is_paid);
    assert_eq!(reloaded_tx.state(), TransactionState::Paid);
}

/// **Test: Settling the same transaction twice credits exactly once.**
///
/// **Setup:** User with 0 credits; pending transaction for 100 credits.
/// **Action:** `settle(tx.id)` twice (redelivered payment event).
/// **Expected:** First call returns `Some`, second returns `None`; balance is
/// 100, not 200.
#[tokio::test]
async fn test_settle_is_idempotent() {
    let (users, transactions) = setup().await;

    let user = UserRecord::new("Erin".to_string(), "erin@example.com".to_string(), 0);
    users.save(&user).await.expect("Failed to save user");

    let transaction =
        TransactionRecord::pending(user.id.clone(), "pro".to_string(), 20.0, 100);
    transactions
        .save(&transaction)
        .await
        .expect("Failed to save transaction");

    let first = transactions.settle(&transaction.id).await.unwrap();
    assert!(first.is_some());

    let second = transactions.settle(&transaction.id).await.unwrap();
    assert!(second.is_none());

    let reloaded = users.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.credits, 100);
}

/// **Test: Settling a transaction whose user is gone rolls back.**
///
/// **Setup:** Pending transaction pointing at a user id that was never saved.
/// **Action:** `settle(tx.id)`.
/// **Expected:** Returns `Err`; the transaction stays pending so a later
/// retry can still observe the fault.
#[tokio::test]
async fn test_settle_missing_user_leaves_transaction_pending() {
    let (_, transactions) = setup().await;

    let transaction =
        TransactionRecord::pending("ghost".to_string(), "pro".to_string(), 20.0, 100);
    transactions
        .save(&transaction)
        .await
        .expect("Failed to save transaction");

    let result = transactions.settle(&transaction.id).await;
    assert!(result.is_err());

    let reloaded = transactions
        .find_by_id(&transaction.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!reloaded.is_paid);
    assert_eq!(reloaded.state(), TransactionState::Pending);
}

/// **Test: Settling an unknown transaction id is a no-op.**
///
/// **Setup:** Empty transactions table.
/// **Action:** `settle("missing")`.
/// **Expected:** Returns `None`, no error.
#[tokio::test]
async fn test_settle_unknown_transaction() {
    let (_, transactions) = setup().await;

    let settled = transactions.settle("missing").await.unwrap();
    assert!(settled.is_none());
}
