//! 거래소 게이트웨이 구현체

pub mod binance_futures;
pub mod dry_run;
pub mod mocks;
pub mod traits;
