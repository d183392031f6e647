use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Gemini API key. May be left empty; advice requests then degrade to
    /// the configuration-error message instead of contacting the API.
    #[serde(default)]
    pub gemini_api_key: String,
    #[serde(default = "default_model")]
    pub gemini_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Fixed display conversion rate, 1 EUR = 1.95583 BGN.
    #[serde(default = "default_eur_to_bgn")]
    pub eur_to_bgn: f64,
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_eur_to_bgn() -> f64 {
    1.95583
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
