//! Credit endpoints: the static plan table and checkout-session creation.
//!
//! Purchase creates the *pending* transaction; only the webhook in
//! [`crate::routes::webhook`] can flip it to paid.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use storage::{TransactionRecord, UserRecord};
use tracing::error;

use crate::state::AppState;

/// A purchasable credit pack.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub credits: i64,
}

pub const PLANS: &[Plan] = &[
    Plan {
        id: "basic",
        name: "Basic",
        price: 10.0,
        credits: 100,
    },
    Plan {
        id: "pro",
        name: "Pro",
        price: 20.0,
        credits: 500,
    },
    Plan {
        id: "premium",
        name: "Premium",
        price: 30.0,
        credits: 1000,
    },
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub plan_id: String,
}

pub async fn plans() -> Json<Value> {
    Json(json!({"success": true, "plans": PLANS}))
}

pub async fn purchase(
    State(state): State<AppState>,
    Extension(user): Extension<UserRecord>,
    Json(req): Json<PurchaseRequest>,
) -> Json<Value> {
    let Some(plan) = PLANS.iter().find(|p| p.id == req.plan_id) else {
        return Json(json!({"success": false, "message": "Invalid plan"}));
    };

    let transaction = TransactionRecord::pending(
        user.id.clone(),
        plan.id.to_string(),
        plan.price,
        plan.credits,
    );

    if let Err(e) = state.transactions.save(&transaction).await {
        error!(error = %e, user_id = %user.id, "Failed to create transaction");
        return Json(json!({"success": false, "message": e.to_string()}));
    }

    match state
        .checkout
        .create_checkout_session(
            &transaction,
            &state.config.app_id,
            plan.name,
            &state.config.checkout_success_url,
            &state.config.checkout_cancel_url,
        )
        .await
    {
        Ok(url) => Json(json!({"success": true, "url": url})),
        Err(e) => {
            error!(error = %e, transaction_id = %transaction.id, "Checkout session creation failed");
            Json(json!({"success": false, "message": e.to_string()}))
        }
    }
}
