use serde::Deserialize;
use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::ProxyError;

pub const DEFAULT_AI_ENDPOINT: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "google/gemini-2.5-flash";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";

#[derive(Clone, Deserialize)]
pub struct AiConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl AiConfig {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: DEFAULT_AI_MODEL.to_string(),
            timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// The key must never end up in logs.
impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub ai: AiConfig,
    pub bind_addr: String,
    pub metrics_auth: String,
}

impl Config {
    pub fn new(ai: AiConfig) -> Self {
        Self {
            ai,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            metrics_auth: "admin:changeme".to_string(),
        }
    }

    pub fn load() -> Result<Self, ProxyError> {
        // Load environment variables from root .env file (two levels up)
        // Try root .env first, then fallback to local .env
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        // Determine environment (defaults to dev)
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let api_key = settings
            .get_string("ai.api_key")
            .or_else(|_| env::var("AI_GATEWAY_API_KEY"))
            // Name used by existing gateway deployments
            .or_else(|_| env::var("LOVABLE_API_KEY"))
            .unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(ProxyError::Configuration(
                "AI_GATEWAY_API_KEY (or LOVABLE_API_KEY) is not configured".to_string(),
            ));
        }

        let endpoint = settings
            .get_string("ai.endpoint")
            .or_else(|_| env::var("AI_GATEWAY_URL"))
            .unwrap_or_else(|_| DEFAULT_AI_ENDPOINT.to_string());

        let model = settings
            .get_string("ai.model")
            .or_else(|_| env::var("AI_MODEL"))
            .unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string());

        let timeout_secs = match settings.get_int("ai.timeout_secs") {
            Ok(value) => u64::try_from(value).map_err(|_| {
                ProxyError::Configuration(format!("ai.timeout_secs must be positive, got {value}"))
            })?,
            Err(_) => match env::var("AI_TIMEOUT_SECS") {
                Ok(raw) => raw.parse().map_err(|_| {
                    ProxyError::Configuration(format!("AI_TIMEOUT_SECS is not a number: {raw}"))
                })?,
                Err(_) => DEFAULT_AI_TIMEOUT_SECS,
            },
        };

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let metrics_auth = settings
            .get_string("metrics.auth")
            .or_else(|_| env::var("METRICS_AUTH"))
            .unwrap_or_else(|_| {
                if app_env == "prod" {
                    tracing::warn!("METRICS_AUTH not set in production, using default credentials");
                }
                "admin:changeme".to_string()
            });

        Ok(Config {
            ai: AiConfig {
                api_key,
                endpoint,
                model,
                timeout_secs,
            },
            bind_addr,
            metrics_auth,
        })
    }
}
