//! 선물 테스트넷 주문 봇 라이브러리
//!
//! 시장가, 지정가, TWAP, 심리 지수 기반 주문을 검증하고 거래소 게이트웨이로 전송합니다.

pub mod config;
pub mod core;
pub mod error;
pub mod exchange;
pub mod models;
pub mod order_core;
pub mod signals;
pub mod utils;

// 핵심 타입 재노출
pub use crate::error::TradingError;
pub use crate::exchange::traits::Exchange;
pub use crate::models::order::{OrderId, OrderRequest, OrderResult, OrderSide, OrderType, TimeInForce};
pub use crate::models::symbol::{ExchangeInfo, SymbolPrecision};

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, TradingError>;
