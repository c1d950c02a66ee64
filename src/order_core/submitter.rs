use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TradingError;
use crate::exchange::traits::Exchange;
use crate::models::order::{OrderRequest, OrderResult};
use crate::order_core::validator::{BasicOrderValidator, OrderValidator};

/// 단일 주문 제출기 - 주문 하나를 검증 후 정확히 한 번 전송
pub struct OrderSubmitter {
    exchange: Arc<RwLock<dyn Exchange>>,
    validators: Vec<Box<dyn OrderValidator>>,
}

impl OrderSubmitter {
    pub fn new(exchange: Arc<RwLock<dyn Exchange>>) -> Self {
        OrderSubmitter {
            exchange,
            validators: vec![Box::new(BasicOrderValidator)],
        }
    }

    /// 주문 제출. 재시도 없음, 재시도 정책은 호출자 몫
    pub async fn submit(&self, request: OrderRequest) -> Result<OrderResult, TradingError> {
        // 주문 검증
        for validator in &self.validators {
            validator.validate(&request)?;
        }

        log::debug!(
            "Submitting {} {} {} {}{}",
            request.order_type,
            request.side,
            request.quantity,
            request.symbol,
            request.price.map(|p| format!(" @ {}", p)).unwrap_or_default()
        );

        let mut exchange = self.exchange.write().await;
        exchange
            .create_order(request)
            .await
            .map_err(TradingError::submission_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::traits::MockExchange;
    use crate::models::order::{OrderId, OrderSide, OrderType};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn filled(request: &OrderRequest) -> OrderResult {
        OrderResult {
            order_id: OrderId("1".into()),
            client_order_id: None,
            symbol: request.symbol.clone(),
            side: request.side,
            order_type: request.order_type,
            requested_quantity: request.quantity,
            executed_quantity: request.quantity,
            price: request.price,
            average_price: None,
            status: "FILLED".into(),
        }
    }

    #[tokio::test]
    async fn test_submits_exactly_once() {
        let mut mock = MockExchange::new();
        mock.expect_create_order()
            .withf(|r| r.symbol == "BTCUSDT" && r.order_type == OrderType::Market)
            .times(1)
            .returning(|r| Ok(filled(&r)));
        let submitter = OrderSubmitter::new(Arc::new(RwLock::new(mock)));

        let result = submitter
            .submit(OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(0.01)))
            .await
            .unwrap();
        assert_eq!(result.executed_quantity, dec!(0.01));
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_gateway() {
        let mut mock = MockExchange::new();
        mock.expect_create_order().never();
        let submitter = OrderSubmitter::new(Arc::new(RwLock::new(mock)));

        let mut request = OrderRequest::limit("BTCUSDT", OrderSide::Buy, dec!(0.01), dec!(100));
        request.price = Some(Decimal::ZERO);
        let err = submitter.submit(request).await.unwrap_err();
        assert!(matches!(err, TradingError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_gateway_error_wrapped_as_submission_failure() {
        let mut mock = MockExchange::new();
        mock.expect_create_order()
            .times(1)
            .returning(|_| Err(TradingError::ExchangeError("rate limited".into())));
        let submitter = OrderSubmitter::new(Arc::new(RwLock::new(mock)));

        let err = submitter
            .submit(OrderRequest::market("BTCUSDT", OrderSide::Sell, dec!(1)))
            .await
            .unwrap_err();
        match err {
            TradingError::OrderSubmissionFailed(cause) => assert!(cause.to_string().contains("rate limited")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
