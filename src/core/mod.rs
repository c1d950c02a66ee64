//! 주문 실행 흐름의 핵심 구현체

pub mod placement;
pub mod sentiment_trader;
pub mod twap_scheduler;

pub use placement::OrderPlacement;
pub use sentiment_trader::{SentimentOutcome, SentimentTrader};
pub use twap_scheduler::{ChunkOutcome, TwapPlan, TwapReport, TwapRequest, TwapScheduler};
