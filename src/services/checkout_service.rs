use crate::config::Config;
use crate::dto::billing_dto::StripeEvent;
use crate::error::{Error, ProviderError, Result};
use crate::models::user::SubscriptionStatus;
use crate::services::user_service::UserService;
use crate::utils::crypto::verify_stripe_signature;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;

const STRIPE_API: &str = "https://api.stripe.com/v1";
const PRODUCT_DESCRIPTION: &str = "PandaAI Premium - AI-powered learning platform";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    pub unit_amount: u32,
    pub interval: &'static str,
    pub product_name: &'static str,
}

/// Monthly billing is opt-in; every other interval is charged yearly.
pub fn price_for(interval: Option<&str>) -> Price {
    match interval {
        Some("monthly") => Price {
            unit_amount: 700,
            interval: "month",
            product_name: "PandaAI Premium - Monthly",
        },
        _ => Price {
            unit_amount: 6700,
            interval: "year",
            product_name: "PandaAI Premium - Yearly",
        },
    }
}

pub struct CheckoutParams<'a> {
    pub user_id: &'a str,
    pub plan: &'a str,
    pub interval: Option<&'a str>,
    pub origin: &'a str,
    pub logo_url: String,
}

/// Form body for `POST /v1/checkout/sessions`, in Stripe's bracket notation.
pub fn checkout_form(params: &CheckoutParams<'_>) -> Vec<(String, String)> {
    let price = price_for(params.interval);
    let origin = params.origin.trim_end_matches('/');
    let pairs: Vec<(&str, String)> = vec![
        ("mode", "subscription".into()),
        ("payment_method_types[0]", "card".into()),
        ("line_items[0][quantity]", "1".into()),
        ("line_items[0][price_data][currency]", "eur".into()),
        ("line_items[0][price_data][unit_amount]", price.unit_amount.to_string()),
        ("line_items[0][price_data][recurring][interval]", price.interval.into()),
        ("line_items[0][price_data][product_data][name]", price.product_name.into()),
        (
            "line_items[0][price_data][product_data][description]",
            PRODUCT_DESCRIPTION.into(),
        ),
        (
            "line_items[0][price_data][product_data][images][0]",
            params.logo_url.clone(),
        ),
        (
            "success_url",
            format!("{}/success?session_id={{CHECKOUT_SESSION_ID}}", origin),
        ),
        ("cancel_url", format!("{}/cancel", origin)),
        ("client_reference_id", params.user_id.into()),
        ("metadata[plan]", params.plan.into()),
        ("metadata[interval]", params.interval.unwrap_or_default().into()),
        ("metadata[user_id]", params.user_id.into()),
    ];
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[derive(Clone)]
pub struct CheckoutService {
    http: Client,
    secret_key: Option<String>,
    webhook_secret: Option<String>,
    site_url: String,
    api_base: String,
}

impl CheckoutService {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            secret_key: config.stripe_secret_key.clone(),
            webhook_secret: config.stripe_webhook_secret.clone(),
            site_url: config.site_url.clone(),
            api_base: STRIPE_API.to_string(),
        }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub async fn create_checkout_session(
        &self,
        user_id: &str,
        plan: &str,
        interval: Option<&str>,
        origin: &str,
    ) -> std::result::Result<String, ProviderError> {
        let secret = self.secret_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let form = checkout_form(&CheckoutParams {
            user_id,
            plan,
            interval,
            origin,
            logo_url: format!("{}/logo-pandaai.svg", self.site_url.trim_end_matches('/')),
        });

        let res = self
            .http
            .post(format!("{}/checkout/sessions", self.api_base))
            .basic_auth(secret, Option::<&str>::None)
            .form(&form)
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        let status = res.status().as_u16();
        if !(200..300).contains(&status) {
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let body: JsonValue = res.json().await?;
        body.get("url")
            .and_then(|u| u.as_str())
            .map(|u| u.to_string())
            .ok_or_else(|| ProviderError::InvalidResponse("checkout session without url".into()))
    }

    /// Authenticates a webhook delivery and parses the event.
    pub fn verify_event(&self, signature: Option<&str>, payload: &[u8]) -> Result<StripeEvent> {
        let secret = self.webhook_secret.as_deref().ok_or_else(|| {
            Error::Unauthorized("Stripe webhook secret is not configured".into())
        })?;
        let signature =
            signature.ok_or_else(|| Error::Unauthorized("Missing Stripe-Signature".into()))?;

        if !verify_stripe_signature(signature, payload, secret, Utc::now().timestamp()) {
            return Err(Error::Unauthorized("Invalid Stripe signature".into()));
        }

        Ok(serde_json::from_slice(payload)?)
    }

    pub async fn apply_event(&self, users: &UserService, event: &StripeEvent) -> Result<()> {
        let object = &event.data.object;
        let customer = object.get("customer").and_then(|c| c.as_str());

        match event.event_type.as_str() {
            "checkout.session.completed" => {
                let Some(user_id) = object
                    .get("client_reference_id")
                    .and_then(|v| v.as_str())
                    .or_else(|| object.pointer("/metadata/user_id").and_then(|v| v.as_str()))
                else {
                    tracing::warn!("Checkout session completed without a user reference");
                    return Ok(());
                };
                let updated = users
                    .update_subscription(user_id, customer, SubscriptionStatus::Active, None)
                    .await?;
                tracing::info!(user_id, updated, "Subscription activated");
            }
            "customer.subscription.deleted" => {
                let Some(customer) = customer else {
                    tracing::warn!("Subscription deleted without a customer id");
                    return Ok(());
                };
                let ended_at = object
                    .get("ended_at")
                    .and_then(|v| v.as_i64())
                    .and_then(|ts| Utc.timestamp_opt(ts, 0).single());
                let updated = users
                    .update_subscription_by_customer(
                        customer,
                        SubscriptionStatus::Cancelled,
                        ended_at,
                    )
                    .await?;
                tracing::info!(customer, updated, "Subscription cancelled");
            }
            other => tracing::debug!("Ignoring Stripe event {}", other),
        }
        Ok(())
    }
}
