use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::Json,
    Extension,
};
use serde_json::{json, Value as JsonValue};
use url::Url;

use crate::{
    dto::billing_dto::{CheckoutRequest, CheckoutResponse},
    error::{Error, Result},
    middleware::auth::Claims,
    utils::extract::ApiJson,
    AppState,
};

#[axum::debug_handler]
pub async fn checkout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let plan = payload.plan.as_deref().unwrap_or("premium");
    if plan == "free" {
        return Err(Error::BadRequest(
            "Free plan does not require payment".into(),
        ));
    }

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Url::parse(v).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(|u| u.origin().ascii_serialization())
        .unwrap_or_else(|| state.checkout_service.site_url().to_string());

    let url = state
        .checkout_service
        .create_checkout_session(&claims.sub, plan, payload.interval.as_deref(), &origin)
        .await
        .map_err(|e| {
            tracing::error!("Stripe checkout error: {}", e);
            Error::Internal("Failed to create checkout session".into())
        })?;

    tracing::info!(user_id = %claims.sub, plan, "Checkout session created");
    Ok(Json(CheckoutResponse { url }))
}

#[axum::debug_handler]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<JsonValue>> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok());

    let event = state.checkout_service.verify_event(signature, &body)?;
    tracing::info!(event_type = %event.event_type, "Stripe webhook received");

    state
        .checkout_service
        .apply_event(&state.user_service, &event)
        .await?;

    Ok(Json(json!({ "received": true })))
}
