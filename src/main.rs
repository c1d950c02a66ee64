/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description: 주문 봇 명령줄 진입점
**/

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use order_bot::config::{Config, LoggingConfig};
use order_bot::core::{OrderPlacement, SentimentTrader, TwapRequest, TwapScheduler};
use order_bot::exchange::binance_futures::BinanceFuturesExchange;
use order_bot::exchange::dry_run::DryRunExchange;
use order_bot::exchange::traits::Exchange;
use order_bot::signals::{CsvSentimentSource, SentimentThresholds};
use order_bot::utils::logging;
use order_bot::utils::report::{ConsoleReporter, Reporter};
use order_bot::TradingError;

#[derive(Parser)]
#[command(name = "order-bot")]
#[command(about = "Place market, limit, TWAP and sentiment-triggered orders on the futures testnet", long_about = None)]
#[command(version)]
struct Cli {
    /// 주문을 보내지 않고 로그만 남김 (자격 증명 불필요)
    #[arg(long, global = true)]
    dry_run: bool,

    /// 설정 파일 경로 (기본: config.json, 없으면 기본값)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 시장가 주문
    Market {
        /// Trading symbol (e.g. BTCUSDT)
        symbol: String,
        /// BUY or SELL
        side: String,
        /// Order quantity (e.g. 0.01)
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },

    /// 지정가 주문 (GTC)
    Limit {
        symbol: String,
        side: String,
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        /// Price at which to place the order
        #[arg(allow_hyphen_values = true)]
        price: String,
    },

    /// 시간 가중 평균 가격 분할 주문
    Twap {
        symbol: String,
        side: String,
        /// Total quantity to trade
        #[arg(allow_hyphen_values = true)]
        total_quantity: String,
        /// Total duration in minutes for the execution
        #[arg(allow_hyphen_values = true)]
        duration_minutes: String,
        /// Interval in seconds between each order
        #[arg(allow_hyphen_values = true)]
        interval_seconds: String,
    },

    /// 공포/탐욕 지수 기반 시장가 주문
    Sentiment {
        symbol: String,
        /// Order quantity to use if a trade is triggered
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        /// Sentiment CSV (기본: 설정의 sentiment.csv_path)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Market { .. } => "market",
            Commands::Limit { .. } => "limit",
            Commands::Twap { .. } => "twap",
            Commands::Sentiment { .. } => "sentiment",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, anyhow::Error> {
    let config = load_config(cli.config.as_deref(), &Config::default().logging)?;
    logging::init(&config.logging)?;
    log::info!("Command started: {}{}", cli.command.name(), if cli.dry_run { " (dry-run)" } else { "" });

    let exchange: Arc<RwLock<dyn Exchange>> = if cli.dry_run {
        Arc::new(RwLock::new(DryRunExchange::new()))
    } else {
        match BinanceFuturesExchange::from_config(&config.exchange) {
            Ok(exchange) => Arc::new(RwLock::new(exchange)),
            Err(e) => {
                log::error!("CRITICAL: {}", e);
                return Err(e.into());
            }
        }
    };
    log::info!("Client initialized: {}", if cli.dry_run { "dry-run" } else { config.exchange.base_url.as_str() });

    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter);
    reporter.say(&format!("Client initialized successfully. Check {} for details.", config.logging.file_path));

    // 개별 명령의 실패는 각 컴포넌트가 이미 보고했으므로 종료 코드만 결정
    let code = match cli.command {
        Commands::Market { symbol, side, quantity } => {
            let placement = OrderPlacement::new(exchange, reporter);
            exit_code(placement.place_market(&symbol, &side, &quantity).await.is_ok())
        }
        Commands::Limit { symbol, side, quantity, price } => {
            let placement = OrderPlacement::new(exchange, reporter);
            exit_code(placement.place_limit(&symbol, &side, &quantity, &price).await.is_ok())
        }
        Commands::Twap { symbol, side, total_quantity, duration_minutes, interval_seconds } => {
            let request = match TwapRequest::from_raw(&symbol, &side, &total_quantity, &duration_minutes, &interval_seconds) {
                Ok(request) => request,
                Err(e) => {
                    reporter.error(&format!("Rejected TWAP order for {}: {}", symbol, e));
                    return Ok(ExitCode::FAILURE);
                }
            };

            let cancel = CancellationToken::new();
            spawn_interrupt_handler(cancel.clone());

            let scheduler = TwapScheduler::new(exchange, reporter);
            match scheduler.run(request, &cancel).await {
                Ok(report) if report.cancelled => ExitCode::from(130),
                Ok(_) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
        Commands::Sentiment { symbol, quantity, file } => {
            let path = file.unwrap_or_else(|| PathBuf::from(&config.sentiment.csv_path));
            let thresholds = SentimentThresholds {
                fear: config.sentiment.fear_threshold,
                greed: config.sentiment.greed_threshold,
            };
            let trader = SentimentTrader::new(exchange, Box::new(CsvSentimentSource::new(path)), reporter)
                .with_thresholds(thresholds);
            exit_code(trader.execute(&symbol, &quantity).await.is_ok())
        }
    };

    Ok(code)
}

/// 설정 로드. 실패 원인은 기본 로그 파일에 남긴 뒤 반환
fn load_config(path: Option<&Path>, fallback: &LoggingConfig) -> Result<Config, TradingError> {
    Config::load(path).map_err(|e| {
        if logging::init(fallback).is_ok() {
            log::error!("CRITICAL: {}", e);
        }
        e
    })
}

fn exit_code(success: bool) -> ExitCode {
    if success { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Ctrl+C 수신 시 스케줄 취소 (분할 사이에서 멈춤)
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Received Ctrl+C, stopping TWAP schedule after the current chunk");
            cancel.cancel();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_failure_written_to_fallback_log() {
        let dir = std::env::temp_dir();
        let log_path = dir.join(format!("order-bot-bootstrap-{}.log", uuid::Uuid::new_v4()));
        let fallback = LoggingConfig {
            level: "info".to_string(),
            file_path: log_path.to_string_lossy().into_owned(),
        };
        let missing = dir.join(format!("missing-{}.json", uuid::Uuid::new_v4()));

        let err = load_config(Some(&missing), &fallback).unwrap_err();

        assert!(matches!(err, TradingError::ConfigError(_)));
        let written = std::fs::read_to_string(&log_path).unwrap();
        assert!(written.contains("ERROR - CRITICAL: Configuration error: Config file not found"));
        std::fs::remove_file(&log_path).ok();
    }
}
