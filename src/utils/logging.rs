//! 로깅 유틸리티
//!
//! 프로세스 전역 append-only 로그 파일 초기화

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;

use crate::config::LoggingConfig;
use crate::error::TradingError;

/// 로그 라인 타임스탬프 형식 (`2025-05-08 12:00:00 - INFO - message`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 로그 레벨 파싱
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 로깅 시스템 초기화
pub fn init(config: &LoggingConfig) -> Result<(), TradingError> {
    // RUST_LOG 환경변수가 설정 파일보다 우선
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file_path)?;

    Builder::new()
        .filter_level(parse_level(&log_level))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format(TIMESTAMP_FORMAT),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| TradingError::ConfigError(format!("Logger already initialized: {}", e)))?;

    log::debug!("Logging initialized: level = {}, file = {}", log_level, config.file_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }
}
