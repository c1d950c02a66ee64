use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TradingError;
use crate::exchange::traits::Exchange;
use crate::models::order::{OrderRequest, OrderResult, OrderType};
use crate::order_core::submitter::OrderSubmitter;
use crate::order_core::validator::{limit_order_from_raw, market_order_from_raw};
use crate::utils::report::Reporter;

/// 단발성 시장가/지정가 주문. 재시도 없음, 실패는 해당 호출의 종료
pub struct OrderPlacement {
    submitter: OrderSubmitter,
    reporter: Arc<dyn Reporter>,
}

impl OrderPlacement {
    pub fn new(exchange: Arc<RwLock<dyn Exchange>>, reporter: Arc<dyn Reporter>) -> Self {
        OrderPlacement {
            submitter: OrderSubmitter::new(exchange),
            reporter,
        }
    }

    pub async fn place_market(&self, symbol: &str, side: &str, quantity: &str) -> Result<OrderResult, TradingError> {
        let request = market_order_from_raw(symbol, side, quantity)
            .map_err(|e| self.report_invalid(OrderType::Market, symbol, e))?;
        self.place(request).await
    }

    pub async fn place_limit(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
        price: &str,
    ) -> Result<OrderResult, TradingError> {
        let request = limit_order_from_raw(symbol, side, quantity, price)
            .map_err(|e| self.report_invalid(OrderType::Limit, symbol, e))?;
        self.place(request).await
    }

    /// 검증된 요청을 한 번 제출하고 결과를 보고
    pub async fn place(&self, request: OrderRequest) -> Result<OrderResult, TradingError> {
        let kind = request.order_type;
        let symbol = request.symbol.clone();
        let at_price = request.price.map(|p| format!(" at price {}", p)).unwrap_or_default();

        self.reporter.info(&format!(
            "Placing {} {} order for {} {}{}...",
            kind, request.side, request.quantity, symbol, at_price
        ));

        match self.submitter.submit(request).await {
            Ok(result) => {
                log::info!("SUCCESS: {} order placed. Response: {:?}", kind, result);
                self.reporter.say(&format!("Successfully placed {} order!", kind.as_str().to_lowercase()));
                self.reporter.say(&format!("--- {} ---", result));
                Ok(result)
            }
            Err(e) => {
                self.reporter.error(&format!(
                    "Failed placing {} order for {}: {}",
                    kind.as_str().to_lowercase(),
                    symbol,
                    e
                ));
                Err(e)
            }
        }
    }

    fn report_invalid(&self, kind: OrderType, symbol: &str, error: TradingError) -> TradingError {
        self.reporter.error(&format!(
            "Rejected {} order for {}: {}",
            kind.as_str().to_lowercase(),
            symbol,
            error
        ));
        error
    }
}
