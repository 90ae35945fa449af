use anyhow::{Context as AnyhowContext, Result};
use lecture_dates_annotator::DriverConfig;
use lecture_dates_client::ClientConfig;
use serde::Deserialize;
use std::path::Path;

pub const ENV_API_BASE: &str = "LECTURE_DATES_API_BASE";
pub const ENV_ACCESS_TOKEN: &str = "LECTURE_DATES_ACCESS_TOKEN";
pub const ENV_DEBOUNCE_MS: &str = "LECTURE_DATES_DEBOUNCE_MS";

/// File-backed settings; every section is optional.
///
/// ```toml
/// [client]
/// base_url = "https://www.udemy.com"
/// page_size = 200
///
/// [driver]
/// debounce_ms = 300
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub driver: DriverConfig,
}

impl AppConfig {
    /// Defaults, then the TOML file (if any), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                toml::from_str(&raw).with_context(|| format!("Invalid {}", path.display()))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(base) = var(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            self.client.base_url = base.trim().to_string();
        }
        if let Some(token) = var(ENV_ACCESS_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.client.access_token = Some(token.trim().to_string());
        }
        if let Some(raw) = var(ENV_DEBOUNCE_MS) {
            self.driver.debounce_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_DEBOUNCE_MS} must be milliseconds, got {raw:?}"))?;
        }
        Ok(())
    }
}
