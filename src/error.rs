/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description: 주문 봇 오류 분류
**/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TradingError {
    /// 네트워크 호출 전에 걸러지는 잘못된 입력
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// 거래소 메타데이터에 없는 심볼
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Schedule infeasible: {0}")]
    ScheduleInfeasible(String),

    #[error("Chunk too small: {0}")]
    ChunkTooSmall(String),

    /// 단일 주문 제출 실패 (원인 포함)
    #[error("Order submission failed: {0}")]
    OrderSubmissionFailed(#[source] Box<TradingError>),

    #[error("Sentiment data unavailable: {0}")]
    SentimentUnavailable(String),

    #[error("Exchange error: {0}")]
    ExchangeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl TradingError {
    /// 제출 실패를 원인과 함께 감싼다
    pub fn submission_failed(cause: TradingError) -> Self {
        TradingError::OrderSubmissionFailed(Box::new(cause))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_submission_failed_keeps_cause() {
        let err = TradingError::submission_failed(TradingError::ExchangeError("-2019 Margin is insufficient.".into()));

        assert!(err.to_string().contains("Margin is insufficient"));
        let source = err.source().expect("cause");
        assert!(source.to_string().starts_with("Exchange error"));
    }
}
