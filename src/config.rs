use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_SITE_URL: &str = "https://pandaai.vercel.app";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub openai_api_key: Option<String>,
    pub site_url: String,
    pub stripe_secret_key: Option<String>,
    pub stripe_webhook_secret: Option<String>,
    pub ai_rps: u32,
    pub upload_tmp_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:8080"),
            database_url: get_env("DATABASE_URL")?,
            jwt_secret: get_env("JWT_SECRET")?,
            openrouter_api_key: get_optional_key("OPENROUTER_API_KEY"),
            openrouter_base_url: get_env_or("OPENROUTER_BASE_URL", DEFAULT_OPENROUTER_BASE_URL),
            openai_api_key: get_optional_key("OPENAI_API_KEY"),
            site_url: get_env_or("SITE_URL", DEFAULT_SITE_URL),
            stripe_secret_key: get_optional_key("STRIPE_SECRET_KEY"),
            stripe_webhook_secret: get_optional_key("STRIPE_WEBHOOK_SECRET"),
            ai_rps: match env::var("AI_RPS") {
                Ok(_) => get_env_parse("AI_RPS")?,
                Err(_) => 10,
            },
            upload_tmp_dir: get_env_or(
                "UPLOAD_TMP_DIR",
                &env::temp_dir().to_string_lossy(),
            ),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Reads an API key, treating blanks and the `.env.example` placeholder as unset.
fn get_optional_key(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.starts_with("your_"))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}
