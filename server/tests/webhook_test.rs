//! Endpoint tests for `POST /api/stripe`: the webhook signature is the only
//! authentication on this route, so the HTTP surface itself is exercised —
//! bad signatures must be rejected before any transaction lookup, and
//! verified deliveries must always be acknowledged. In-memory SQLite, fake
//! providers and checkout gateway, requests driven through the real router.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower::ServiceExt;

use server::config::ServerConfig;
use server::routes::router;
use server::services::{ImageGenerator, MessageService, ReconcileService, TextGenerator};
use server::state::AppState;
use server::stripe::{CheckoutGateway, SessionMetadata};
use storage::{
    ChatRepository, SqlitePoolManager, TransactionRecord, TransactionRepository, UserRecord,
    UserRepository,
};

const WEBHOOK_SECRET: &str = "whsec_endpoint_test";

struct FakeText;

#[async_trait]
impl TextGenerator for FakeText {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok("unused".to_string())
    }
}

struct FakeImage;

#[async_trait]
impl ImageGenerator for FakeImage {
    async fn generate_hosted(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok("unused".to_string())
    }
}

struct FakeGateway {
    sessions: HashMap<String, SessionMetadata>,
}

#[async_trait]
impl CheckoutGateway for FakeGateway {
    async fn session_metadata(
        &self,
        payment_intent_id: &str,
    ) -> anyhow::Result<Option<SessionMetadata>> {
        Ok(self.sessions.get(payment_intent_id).cloned())
    }

    async fn create_checkout_session(
        &self,
        _transaction: &TransactionRecord,
        _app_id: &str,
        _plan_name: &str,
        _success_url: &str,
        _cancel_url: &str,
    ) -> anyhow::Result<String> {
        Ok("https://checkout.example.com/session".to_string())
    }
}

fn test_config() -> ServerConfig {
    ServerConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        database_url: "sqlite::memory:".to_string(),
        log_file: "logs/test.log".to_string(),
        jwt_secret: "jwt-test-secret".to_string(),
        app_id: "quillgpt".to_string(),
        openai_api_key: "sk-test".to_string(),
        openai_base_url: None,
        chat_model: "gemini-2.0-flash".to_string(),
        imagekit_url_endpoint: "https://ik.example.com/acct".to_string(),
        imagekit_private_key: "private_test".to_string(),
        imagekit_upload_url: None,
        imagekit_folder: "quillgpt".to_string(),
        stripe_secret_key: "sk_test".to_string(),
        stripe_webhook_secret: WEBHOOK_SECRET.to_string(),
        checkout_success_url: "http://localhost:5173/loading".to_string(),
        checkout_cancel_url: "http://localhost:5173/credits".to_string(),
    }
}

struct Fixture {
    state: AppState,
    user: UserRecord,
    transaction: TransactionRecord,
}

/// One user at 0 credits, one pending 100-credit transaction, and a gateway
/// mapping `pi_ok` to that transaction's checkout session.
async fn setup() -> Fixture {
    let manager = SqlitePoolManager::new("sqlite::memory:")
        .await
        .expect("Failed to create pool");
    let users = UserRepository::new(manager.clone())
        .await
        .expect("Failed to create user repository");
    let chats = ChatRepository::new(manager.clone())
        .await
        .expect("Failed to create chat repository");
    let transactions = TransactionRepository::new(manager)
        .await
        .expect("Failed to create transaction repository");

    let user = UserRecord::new("Webb".to_string(), "webb@example.com".to_string(), 0);
    users.save(&user).await.expect("Failed to save user");

    let transaction = TransactionRecord::pending(user.id.clone(), "basic".to_string(), 10.0, 100);
    transactions
        .save(&transaction)
        .await
        .expect("Failed to save transaction");

    let mut sessions = HashMap::new();
    sessions.insert(
        "pi_ok".to_string(),
        SessionMetadata {
            transaction_id: Some(transaction.id.clone()),
            app_id: Some("quillgpt".to_string()),
        },
    );
    let checkout: Arc<dyn CheckoutGateway> = Arc::new(FakeGateway { sessions });

    let messages = MessageService::new(
        users.clone(),
        chats.clone(),
        Arc::new(FakeText),
        Arc::new(FakeImage),
    );
    let reconcile = ReconcileService::new(
        transactions.clone(),
        checkout.clone(),
        "quillgpt".to_string(),
    );

    let state = AppState {
        config: Arc::new(test_config()),
        users,
        chats,
        transactions,
        messages,
        reconcile,
        checkout,
    };

    Fixture {
        state,
        user,
        transaction,
    }
}

fn succeeded_payload(payment_intent_id: &str) -> String {
    format!(
        r#"{{"type":"payment_intent.succeeded","data":{{"object":{{"id":"{}"}}}}}}"#,
        payment_intent_id
    )
}

/// Signs `payload` the way the provider does: HMAC-SHA256 over `"{t}.{body}"`
/// rendered as a `t=...,v1=...` header.
fn sign(secret: &str, payload: &str, timestamp: i64) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    )
}

async fn deliver(fixture: &Fixture, payload: &str, signature: &str) -> (StatusCode, String) {
    let response = router(fixture.state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/stripe")
                .header("stripe-signature", signature)
                .body(Body::from(payload.to_string()))
                .expect("Failed to build request"),
        )
        .await
        .expect("Router never fails");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, String::from_utf8_lossy(&body).into_owned())
}

/// **Test: An invalid signature is rejected with 400 and mutates nothing.**
///
/// **Setup:** Pending 100-credit transaction, user at 0.
/// **Action:** POST a well-formed succeeded event signed with the wrong secret.
/// **Expected:** 400; transaction still pending; balance still 0.
#[tokio::test]
async fn test_invalid_signature_rejected_before_lookup() {
    let fixture = setup().await;

    let payload = succeeded_payload("pi_ok");
    let signature = sign("whsec_wrong", &payload, Utc::now().timestamp());
    let (status, body) = deliver(&fixture, &payload, &signature).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("invalid signature"));

    let transaction = fixture
        .state
        .transactions
        .find_by_id(&fixture.transaction.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!transaction.is_paid);

    let user = fixture
        .state
        .users
        .find_by_id(&fixture.user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.credits, 0);
}

/// **Test: A missing signature header is also a 400.**
///
/// **Setup:** Default fixture.
/// **Action:** POST a succeeded event with no `stripe-signature` header.
/// **Expected:** 400; transaction still pending.
#[tokio::test]
async fn test_missing_signature_header_rejected() {
    let fixture = setup().await;

    let payload = succeeded_payload("pi_ok");
    let response = router(fixture.state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/stripe")
                .body(Body::from(payload))
                .expect("Failed to build request"),
        )
        .await
        .expect("Router never fails");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let transaction = fixture
        .state
        .transactions
        .find_by_id(&fixture.transaction.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!transaction.is_paid);
}

/// **Test: A verified delivery settles and acknowledges; a replay only
/// acknowledges.**
///
/// **Setup:** Pending 100-credit transaction, user at 0.
/// **Action:** POST the same correctly signed succeeded event twice.
/// **Expected:** Both deliveries return 200 `{"received": true}`; the balance
/// is 100 after both, not 200.
#[tokio::test]
async fn test_verified_delivery_acknowledged_and_replay_safe() {
    let fixture = setup().await;

    let payload = succeeded_payload("pi_ok");
    let signature = sign(WEBHOOK_SECRET, &payload, Utc::now().timestamp());

    let (status, body) = deliver(&fixture, &payload, &signature).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&body).unwrap(),
        serde_json::json!({"received": true})
    );

    let (status, body) = deliver(&fixture, &payload, &signature).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&body).unwrap(),
        serde_json::json!({"received": true})
    );

    let user = fixture
        .state
        .users
        .find_by_id(&fixture.user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.credits, 100);

    let transaction = fixture
        .state
        .transactions
        .find_by_id(&fixture.transaction.id)
        .await
        .unwrap()
        .unwrap();
    assert!(transaction.is_paid);
}

/// **Test: A correctly signed but malformed payload is a 400.**
///
/// **Setup:** Default fixture.
/// **Action:** POST a non-JSON body with a valid signature over those bytes.
/// **Expected:** 400; nothing settled.
#[tokio::test]
async fn test_signed_garbage_payload_rejected() {
    let fixture = setup().await;

    let payload = "not json";
    let signature = sign(WEBHOOK_SECRET, payload, Utc::now().timestamp());
    let (status, _) = deliver(&fixture, payload, &signature).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let transaction = fixture
        .state
        .transactions
        .find_by_id(&fixture.transaction.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!transaction.is_paid);
}

/// **Test: A processing fault maps to 500 and preserves the pending row.**
///
/// **Setup:** Transaction whose user id does not exist, so settlement errors.
/// **Action:** POST a correctly signed succeeded event for it.
/// **Expected:** 500; the transaction is still pending for a retry.
#[tokio::test]
async fn test_processing_fault_returns_500_and_stays_pending() {
    let fixture = setup().await;

    let orphan =
        TransactionRecord::pending("ghost".to_string(), "basic".to_string(), 10.0, 100);
    fixture
        .state
        .transactions
        .save(&orphan)
        .await
        .expect("Failed to save transaction");

    let mut sessions = HashMap::new();
    sessions.insert(
        "pi_orphan".to_string(),
        SessionMetadata {
            transaction_id: Some(orphan.id.clone()),
            app_id: Some("quillgpt".to_string()),
        },
    );
    let mut state = fixture.state.clone();
    state.reconcile = ReconcileService::new(
        state.transactions.clone(),
        Arc::new(FakeGateway { sessions }),
        "quillgpt".to_string(),
    );
    let fixture = Fixture { state, ..fixture };

    let payload = succeeded_payload("pi_orphan");
    let signature = sign(WEBHOOK_SECRET, &payload, Utc::now().timestamp());
    let (status, _) = deliver(&fixture, &payload, &signature).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let reloaded = fixture
        .state
        .transactions
        .find_by_id(&orphan.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!reloaded.is_paid);
}
