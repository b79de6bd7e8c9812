use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub plan: Option<String>,
    pub interval: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// The subset of a Stripe event this service reacts to.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}
