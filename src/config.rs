/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::TradingError;
use crate::exchange::binance_futures::TESTNET_BASE_URL;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub logging: LoggingConfig,
    pub sentiment: SentimentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub base_url: String,
    pub recv_window_ms: u64,
    /// 개별 게이트웨이 호출 제한 시간
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    pub csv_path: String,
    pub fear_threshold: u8,
    pub greed_threshold: u8,
}

impl Config {
    /// Load configuration from a file, falling back to defaults when it is absent
    pub fn load(path: Option<&Path>) -> Result<Self, TradingError> {
        let config_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));

        let mut cfg = if config_path.exists() {
            let mut file = File::open(config_path)
                .map_err(|e| TradingError::ConfigError(format!("Failed to open config file: {}", e)))?;

            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| TradingError::ConfigError(format!("Failed to read config file: {}", e)))?;

            serde_json::from_str::<Config>(&contents)
                .map_err(|e| TradingError::ConfigError(format!("Failed to parse config file: {}", e)))?
        } else if path.is_some() {
            return Err(TradingError::ConfigError(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        } else {
            Config::default()
        };

        // environment overrides
        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply environment variable overrides for sensitive/runtime fields
    fn apply_env_overrides<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| get(key).filter(|v| !v.is_empty());

        if let Some(v) = var("BINANCE_API_KEY") { self.exchange.api_key = Some(v); }
        if let Some(v) = var("BINANCE_API_SECRET") { self.exchange.api_secret = Some(v); }
        if let Some(v) = var("EXCHANGE_BASE_URL") { self.exchange.base_url = v; }
        if let Some(v) = var("LOG_LEVEL") { self.logging.level = v; }
        if let Some(v) = var("LOG_FILE") { self.logging.file_path = v; }
        if let Some(v) = var("SENTIMENT_CSV") { self.sentiment.csv_path = v; }
    }

    fn validate(&self) -> Result<(), TradingError> {
        if self.sentiment.fear_threshold >= self.sentiment.greed_threshold || self.sentiment.greed_threshold > 100 {
            return Err(TradingError::ConfigError(format!(
                "Sentiment thresholds must satisfy fear < greed <= 100, got {} / {}",
                self.sentiment.fear_threshold, self.sentiment.greed_threshold
            )));
        }
        if self.exchange.request_timeout_ms == 0 {
            return Err(TradingError::ConfigError("request_timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            exchange: ExchangeConfig {
                api_key: None,
                api_secret: None,
                base_url: TESTNET_BASE_URL.to_string(),
                recv_window_ms: 5000,
                request_timeout_ms: 10_000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "bot.log".to_string(),
            },
            sentiment: SentimentConfig {
                csv_path: "fear_and_greed_index.csv".to_string(),
                fear_threshold: 25,
                greed_threshold: 75,
            },
        }
    }
}
