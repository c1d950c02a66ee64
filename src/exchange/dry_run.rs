use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::TradingError;
use crate::exchange::traits::Exchange;
use crate::models::order::{OrderId, OrderRequest, OrderResult};
use crate::models::symbol::{ExchangeInfo, SymbolPrecision};

/// A no-op exchange connector that acknowledges orders without sending them
pub struct DryRunExchange {
  symbols: Vec<SymbolPrecision>,
  counter: u64,
}

impl DryRunExchange {
  pub fn new() -> Self {
    DryRunExchange {
      symbols: vec![
        SymbolPrecision::new("BTCUSDT", 3),
        SymbolPrecision::new("ETHUSDT", 3),
        SymbolPrecision::new("BNBUSDT", 2),
        SymbolPrecision::new("XRPUSDT", 1),
        SymbolPrecision::new("SOLUSDT", 0),
        SymbolPrecision::new("DOGEUSDT", 0),
      ],
      counter: 0,
    }
  }

  pub fn with_symbol(mut self, symbol: impl Into<String>, quantity_decimal_places: u32) -> Self {
    self.symbols.push(SymbolPrecision::new(symbol, quantity_decimal_places));
    self
  }
}

impl Default for DryRunExchange {
  fn default() -> Self { Self::new() }
}

#[async_trait]
impl Exchange for DryRunExchange {
  async fn create_order(&mut self, request: OrderRequest) -> Result<OrderResult, TradingError> {
    self.counter += 1;
    let id = OrderId(format!("dry-{}-{}", request.symbol, self.counter));
    log::info!("[dry-run] {} {} {} {}", request.order_type, request.side, request.quantity, request.symbol);
    Ok(OrderResult {
      order_id: id,
      client_order_id: request.client_order_id,
      symbol: request.symbol,
      side: request.side,
      order_type: request.order_type,
      requested_quantity: request.quantity,
      executed_quantity: Decimal::ZERO,
      price: request.price,
      average_price: None,
      status: "NEW".to_string(),
    })
  }

  async fn get_exchange_info(&self) -> Result<ExchangeInfo, TradingError> {
    Ok(ExchangeInfo { symbols: self.symbols.clone() })
  }
}
