use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TradingError;
use crate::exchange::traits::Exchange;
use crate::models::symbol::SymbolPrecision;

/// 거래소 메타데이터에서 심볼 수량 정밀도 조회 (캐시 없음)
pub struct PrecisionResolver {
    exchange: Arc<RwLock<dyn Exchange>>,
}

impl PrecisionResolver {
    pub fn new(exchange: Arc<RwLock<dyn Exchange>>) -> Self {
        PrecisionResolver { exchange }
    }

    pub async fn resolve(&self, symbol: &str) -> Result<SymbolPrecision, TradingError> {
        let info = {
            let exchange = self.exchange.read().await;
            exchange.get_exchange_info().await?
        };

        let precision = info
            .find(symbol)
            .cloned()
            .ok_or_else(|| TradingError::UnknownSymbol(symbol.to_string()))?;

        log::debug!("{} quantity precision: {}", symbol, precision.quantity_decimal_places);
        Ok(precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::mocks::ScriptedExchange;

    #[tokio::test]
    async fn test_resolve_known_symbol() {
        let exchange = Arc::new(RwLock::new(ScriptedExchange::new().with_symbol("BTCUSDT", 3).with_symbol("XRPUSDT", 1)));
        let resolver = PrecisionResolver::new(exchange.clone());

        let precision = resolver.resolve("XRPUSDT").await.unwrap();
        assert_eq!(precision, SymbolPrecision::new("XRPUSDT", 1));
        assert_eq!(exchange.read().await.info_calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let exchange = Arc::new(RwLock::new(ScriptedExchange::new().with_symbol("BTCUSDT", 3)));
        let resolver = PrecisionResolver::new(exchange);

        let err = resolver.resolve("NOPEUSDT").await.unwrap_err();
        assert!(matches!(err, TradingError::UnknownSymbol(s) if s == "NOPEUSDT"));
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let exchange = Arc::new(RwLock::new(ScriptedExchange::new().failing_exchange_info("timeout")));
        let resolver = PrecisionResolver::new(exchange);

        assert!(matches!(resolver.resolve("BTCUSDT").await, Err(TradingError::ExchangeError(_))));
    }
}
