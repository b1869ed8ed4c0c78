//! Configuration module

use std::env;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Model provider API key (empty = dry-run only)
    pub openai_api_key: String,

    /// Model identifier sent to the provider
    pub model: String,

    /// Provider base URL
    pub openai_base_url: String,

    /// Upstream request timeout in seconds
    pub request_timeout_secs: u64,

    /// Include cause traces in 500 responses
    pub debug_errors: bool,

    /// Server port
    pub port: u16,

    /// Request body cap in bytes; `None` = unlimited
    pub max_body_bytes: Option<usize>,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string());

        // Traces leak internals, so production flips the default off.
        let debug_default = if environment == "production" { "off" } else { "on" };

        Self {
            openai_api_key: lookup("OPENAI_API_KEY")
                .map(|k| k.trim().to_string())
                .unwrap_or_default(),

            model: lookup("OPENAI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),

            openai_base_url: lookup("OPENAI_BASE_URL")
                .filter(|u| !u.trim().is_empty())
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),

            request_timeout_secs: lookup("OPENAI_TIMEOUT_SECS")
                .and_then(|t| t.trim().parse().ok())
                .filter(|t| *t > 0)
                .unwrap_or(60),

            debug_errors: lookup("DEBUG_ERRORS")
                .unwrap_or_else(|| debug_default.to_string())
                .trim()
                .eq_ignore_ascii_case("on"),

            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(8080),

            max_body_bytes: lookup("MAX_BODY_BYTES")
                .and_then(|b| b.trim().parse().ok())
                .filter(|b| *b > 0),

            environment,
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether a provider credential is configured
    pub fn has_credentials(&self) -> bool {
        !self.openai_api_key.is_empty()
    }
}
