use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TradingError;
use crate::exchange::traits::Exchange;
use crate::core::placement::OrderPlacement;
use crate::models::order::{OrderRequest, OrderResult};
use crate::order_core::validator::{normalize_symbol, parse_positive_decimal};
use crate::signals::sentiment::{SentimentDecision, SentimentReading, SentimentSource, SentimentThresholds};
use crate::utils::report::Reporter;

#[derive(Debug)]
pub enum SentimentOutcome {
    Traded {
        reading: SentimentReading,
        decision: SentimentDecision,
        result: OrderResult,
    },
    NoAction {
        reading: SentimentReading,
    },
}

/// 심리 지수 기반 시장가 주문
pub struct SentimentTrader {
    placement: OrderPlacement,
    source: Box<dyn SentimentSource>,
    thresholds: SentimentThresholds,
    reporter: Arc<dyn Reporter>,
}

impl SentimentTrader {
    pub fn new(
        exchange: Arc<RwLock<dyn Exchange>>,
        source: Box<dyn SentimentSource>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        SentimentTrader {
            placement: OrderPlacement::new(exchange, reporter.clone()),
            source,
            thresholds: SentimentThresholds::default(),
            reporter,
        }
    }

    pub fn with_thresholds(mut self, thresholds: SentimentThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub async fn execute(&self, symbol: &str, quantity: &str) -> Result<SentimentOutcome, TradingError> {
        self.reporter.say("--- Starting Smart Sentiment Trader ---");

        let (symbol, quantity) = match normalize_symbol(symbol)
            .and_then(|s| parse_positive_decimal(quantity, "Quantity").map(|q| (s, q)))
        {
            Ok(v) => v,
            Err(e) => {
                self.reporter.error(&format!("Rejected sentiment trade: {}", e));
                return Err(e);
            }
        };

        let reading = match self.source.latest() {
            Ok(reading) => reading,
            Err(e) => {
                self.reporter.error(&format!("Could not retrieve sentiment data: {}. No trade executed.", e));
                return Err(e);
            }
        };
        self.reporter.info(&format!("Current Fear & Greed Index: {}", reading.index_value));

        let decision = self.thresholds.decide(reading);
        let side = match decision.side() {
            Some(side) => side,
            None => {
                self.reporter.info(&format!(
                    "Sentiment is '{}' ({}). No action will be taken.",
                    decision.label(),
                    reading.index_value
                ));
                return Ok(SentimentOutcome::NoAction { reading });
            }
        };

        self.reporter.info(&format!(
            "Sentiment is '{}' ({}). Sentiment trigger: {} {} {}.",
            decision.label(),
            reading.index_value,
            side,
            quantity,
            symbol
        ));

        let result = self.placement.place(OrderRequest::market(symbol, side, quantity)).await?;
        Ok(SentimentOutcome::Traded { reading, decision, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::mocks::ScriptedExchange;
    use crate::models::order::{OrderSide, OrderType};
    use crate::utils::report::RecordingReporter;
    use rust_decimal_macros::dec;

    struct FixedSource(Result<u8, String>);

    impl SentimentSource for FixedSource {
        fn latest(&self) -> Result<SentimentReading, TradingError> {
            match &self.0 {
                Ok(v) => SentimentReading::new(*v as i64),
                Err(m) => Err(TradingError::SentimentUnavailable(m.clone())),
            }
        }
    }

    fn trader(exchange: Arc<RwLock<ScriptedExchange>>, source: FixedSource) -> SentimentTrader {
        SentimentTrader::new(exchange, Box::new(source), Arc::new(RecordingReporter::new()))
    }

    #[tokio::test]
    async fn test_extreme_fear_buys() {
        let exchange = Arc::new(RwLock::new(ScriptedExchange::new()));
        let outcome = trader(exchange.clone(), FixedSource(Ok(20))).execute("BTCUSDT", "0.01").await.unwrap();

        assert!(matches!(outcome, SentimentOutcome::Traded { decision: SentimentDecision::Buy, .. }));
        let ex = exchange.read().await;
        assert_eq!(ex.order_calls(), 1);
        assert_eq!(ex.submitted()[0].side, OrderSide::Buy);
        assert_eq!(ex.submitted()[0].order_type, OrderType::Market);
        assert_eq!(ex.submitted()[0].quantity, dec!(0.01));
    }

    #[tokio::test]
    async fn test_extreme_greed_sells() {
        let exchange = Arc::new(RwLock::new(ScriptedExchange::new()));
        let outcome = trader(exchange.clone(), FixedSource(Ok(80))).execute("BTCUSDT", "0.01").await.unwrap();

        assert!(matches!(outcome, SentimentOutcome::Traded { decision: SentimentDecision::Sell, .. }));
        assert_eq!(exchange.read().await.submitted()[0].side, OrderSide::Sell);
    }

    #[tokio::test]
    async fn test_neutral_takes_no_action() {
        let exchange = Arc::new(RwLock::new(ScriptedExchange::new()));
        let outcome = trader(exchange.clone(), FixedSource(Ok(50))).execute("BTCUSDT", "0.01").await.unwrap();

        assert!(matches!(outcome, SentimentOutcome::NoAction { reading } if reading.index_value == 50));
        assert_eq!(exchange.read().await.order_calls(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_source_takes_no_action() {
        let exchange = Arc::new(RwLock::new(ScriptedExchange::new()));
        let err = trader(exchange.clone(), FixedSource(Err("missing".into())))
            .execute("BTCUSDT", "0.01")
            .await
            .unwrap_err();

        assert!(matches!(err, TradingError::SentimentUnavailable(_)));
        assert_eq!(exchange.read().await.order_calls(), 0);
    }

    #[tokio::test]
    async fn test_custom_thresholds() {
        let exchange = Arc::new(RwLock::new(ScriptedExchange::new()));
        let trader = trader(exchange.clone(), FixedSource(Ok(30)))
            .with_thresholds(SentimentThresholds { fear: 30, greed: 70 });

        let outcome = trader.execute("ETHUSDT", "1").await.unwrap();
        assert!(matches!(outcome, SentimentOutcome::Traded { decision: SentimentDecision::Buy, .. }));
    }

    #[tokio::test]
    async fn test_invalid_quantity_rejected_before_reading() {
        let exchange = Arc::new(RwLock::new(ScriptedExchange::new()));
        let err = trader(exchange.clone(), FixedSource(Ok(10)))
            .execute("BTCUSDT", "-1")
            .await
            .unwrap_err();

        assert!(matches!(err, TradingError::InvalidParameter(_)));
        assert_eq!(exchange.read().await.order_calls(), 0);
    }
}
