use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Origin used to build share links.
    pub public_origin: String,
    /// When unset the assistant runs on canned replies.
    pub anthropic_api_key: Option<String>,
    pub raster_scale: f32,
    pub ai_max_input_chars: usize,
    pub ai_max_output_tokens: u32,
    pub stats_tick_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            public_origin: std::env::var("PUBLIC_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            raster_scale: parse_env("RASTER_SCALE", 2.0)?,
            ai_max_input_chars: parse_env("AI_MAX_INPUT_CHARS", 8000)?,
            ai_max_output_tokens: parse_env("AI_MAX_OUTPUT_TOKENS", 500)?,
            stats_tick_secs: parse_env("STATS_TICK_SECS", 30)?,
        };

        anyhow::ensure!(
            config.raster_scale.is_finite() && config.raster_scale > 0.0,
            "RASTER_SCALE must be a positive number"
        );
        anyhow::ensure!(config.stats_tick_secs > 0, "STATS_TICK_SECS must be at least 1");

        Ok(config)
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: u32 = parse_env("EDITOR_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("EDITOR_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("EDITOR_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::set_var("EDITOR_TEST_GOOD_SCALE", " 1.5 ");
        let scale: f32 = parse_env("EDITOR_TEST_GOOD_SCALE", 2.0).unwrap();
        assert_eq!(scale, 1.5);
    }
}
