use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub base_url: String,
    pub pages: u32,
    pub config_dir: String,
    pub db_path: String,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    if config.min_delay_ms > config.max_delay_ms {
        return Err(format!(
            "min_delay_ms ({}) must not exceed max_delay_ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )
        .into());
    }
    Ok(config)
}
