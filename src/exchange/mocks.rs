use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::TradingError;
use crate::exchange::traits::Exchange;
use crate::models::order::{OrderId, OrderRequest, OrderResult};
use crate::models::symbol::{ExchangeInfo, SymbolPrecision};

/// A scripted implementation of the Exchange trait for testing.
/// Records every order call and fails the calls it was told to fail.
pub struct ScriptedExchange {
    info: ExchangeInfo,
    info_error: Option<String>,
    failing_calls: HashSet<usize>,
    submitted: Vec<OrderRequest>,
    submitted_at: Vec<Instant>,
    info_calls: AtomicUsize,
}

impl ScriptedExchange {
    pub fn new() -> Self {
        Self {
            info: ExchangeInfo::default(),
            info_error: None,
            failing_calls: HashSet::new(),
            submitted: Vec::new(),
            submitted_at: Vec::new(),
            info_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>, quantity_decimal_places: u32) -> Self {
        self.info.symbols.push(SymbolPrecision::new(symbol, quantity_decimal_places));
        self
    }

    /// 1부터 시작하는 호출 번호 기준으로 실패시킬 주문 호출
    pub fn failing_calls(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.failing_calls.extend(calls);
        self
    }

    pub fn failing_exchange_info(mut self, message: impl Into<String>) -> Self {
        self.info_error = Some(message.into());
        self
    }

    /// 성공/실패 관계없이 시도된 모든 주문
    pub fn submitted(&self) -> &[OrderRequest] {
        &self.submitted
    }

    pub fn submitted_at(&self) -> &[Instant] {
        &self.submitted_at
    }

    pub fn order_calls(&self) -> usize {
        self.submitted.len()
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Exchange for ScriptedExchange {
    async fn create_order(&mut self, request: OrderRequest) -> Result<OrderResult, TradingError> {
        self.submitted.push(request.clone());
        self.submitted_at.push(Instant::now());
        let call = self.submitted.len();

        if self.failing_calls.contains(&call) {
            return Err(TradingError::ExchangeError(format!(
                "scripted failure on call {}: (code -2019) Margin is insufficient.",
                call
            )));
        }

        Ok(OrderResult {
            order_id: OrderId(format!("mock-{}", call)),
            client_order_id: request.client_order_id,
            symbol: request.symbol,
            side: request.side,
            order_type: request.order_type,
            requested_quantity: request.quantity,
            executed_quantity: request.quantity,
            price: request.price,
            average_price: None,
            status: "FILLED".to_string(),
        })
    }

    async fn get_exchange_info(&self) -> Result<ExchangeInfo, TradingError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        match &self.info_error {
            Some(message) => Err(TradingError::ExchangeError(message.clone())),
            None => Ok(self.info.clone()),
        }
    }
}
