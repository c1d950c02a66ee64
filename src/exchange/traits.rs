use async_trait::async_trait;

use crate::error::TradingError;
use crate::models::order::{OrderRequest, OrderResult};
use crate::models::symbol::ExchangeInfo;

/// The `Exchange` trait is the gateway to the futures order-entry API.
/// Authentication and endpoint selection belong to the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Submit a single order and return the exchange's normalized result
    async fn create_order(&mut self, request: OrderRequest) -> Result<OrderResult, TradingError>;

    /// Fetch symbol metadata (quantity precision per symbol)
    async fn get_exchange_info(&self) -> Result<ExchangeInfo, TradingError>;
}
