use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha256;
use std::str::FromStr;
use std::time::Duration;

use crate::config::ExchangeConfig;
use crate::error::TradingError;
use crate::exchange::traits::Exchange;
use crate::models::order::{OrderId, OrderRequest, OrderResult, OrderType};
use crate::models::symbol::{ExchangeInfo, SymbolPrecision};

type HmacSha256 = Hmac<Sha256>;

pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

/// Binance USDT-M Futures REST connector (order entry + exchange info)
pub struct BinanceFuturesExchange {
  pub base_url: String,
  pub api_key: String,
  pub api_secret: String,
  pub recv_window_ms: u64,
  pub http: reqwest::Client,
}

impl BinanceFuturesExchange {
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
    BinanceFuturesExchange {
      base_url: base_url.into(),
      api_key: api_key.into(),
      api_secret: api_secret.into(),
      recv_window_ms: 5000,
      http: reqwest::Client::new(),
    }
  }

  /// 설정으로부터 커넥터 생성. 자격 증명이 없으면 ConfigError
  pub fn from_config(config: &ExchangeConfig) -> Result<Self, TradingError> {
    let (api_key, api_secret) = match (&config.api_key, &config.api_secret) {
      (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => (key.clone(), secret.clone()),
      _ => {
        return Err(TradingError::ConfigError(
          "API key and/or secret not found. Set BINANCE_API_KEY and BINANCE_API_SECRET".to_string(),
        ))
      }
    };

    let http = reqwest::Client::builder()
      .timeout(Duration::from_millis(config.request_timeout_ms))
      .build()
      .map_err(|e| TradingError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

    Ok(BinanceFuturesExchange {
      base_url: config.base_url.clone(),
      api_key,
      api_secret,
      recv_window_ms: config.recv_window_ms,
      http,
    })
  }

  fn timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
  }

  fn sign(&self, query: &str) -> Result<String, TradingError> {
    let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
      .map_err(|e| TradingError::ConfigError(format!("Invalid API secret: {}", e)))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
  }

  /// 주문 요청을 서명 전 쿼리 문자열로 변환
  fn order_query(request: &OrderRequest, timestamp: i64, recv_window_ms: u64) -> String {
    let mut params = vec![
      format!("symbol={}", request.symbol),
      format!("side={}", request.side.as_str()),
      format!("type={}", request.order_type.as_str()),
      format!("quantity={}", request.quantity.normalize()),
    ];
    if let Some(price) = request.price {
      params.push(format!("price={}", price.normalize()));
    }
    if let Some(tif) = request.time_in_force {
      params.push(format!("timeInForce={}", tif.as_str()));
    }
    if let Some(client_id) = &request.client_order_id {
      params.push(format!("newClientOrderId={}", client_id));
    }
    params.push(format!("recvWindow={}", recv_window_ms));
    params.push(format!("timestamp={}", timestamp));
    params.join("&")
  }

  async fn error_from_response(context: &str, res: reqwest::Response) -> TradingError {
    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiErrorBody>(&body) {
      Ok(api) => TradingError::ExchangeError(format!("{} failed: {} (code {}): {}", context, status, api.code, api.msg)),
      Err(_) => TradingError::ExchangeError(format!("{} failed: {} {}", context, status, body)),
    }
  }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
  code: i64,
  msg: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderResponse {
  order_id: i64,
  symbol: String,
  status: String,
  client_order_id: Option<String>,
  price: Option<String>,
  avg_price: Option<String>,
  orig_qty: String,
  executed_qty: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExchangeInfoResponse {
  symbols: Vec<SymbolEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolEntry {
  symbol: String,
  quantity_precision: u32,
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, TradingError> {
  Decimal::from_str(raw).map_err(|e| TradingError::ParseError(format!("{} '{}': {}", field, raw, e)))
}

/// 0 가격은 시장가 주문의 "가격 없음"
fn non_zero(field: &str, raw: Option<&str>) -> Result<Option<Decimal>, TradingError> {
  match raw {
    Some(s) => {
      let value = parse_decimal(field, s)?;
      Ok(if value.is_zero() { None } else { Some(value) })
    }
    None => Ok(None),
  }
}

fn order_result_from_response(request: &OrderRequest, res: OrderResponse) -> Result<OrderResult, TradingError> {
  let price = match request.order_type {
    OrderType::Market => None,
    OrderType::Limit => non_zero("price", res.price.as_deref())?,
  };
  Ok(OrderResult {
    order_id: OrderId(res.order_id.to_string()),
    client_order_id: res.client_order_id,
    symbol: res.symbol,
    side: request.side,
    order_type: request.order_type,
    requested_quantity: parse_decimal("origQty", &res.orig_qty)?,
    executed_quantity: match res.executed_qty.as_deref() {
      Some(q) => parse_decimal("executedQty", q)?,
      None => Decimal::ZERO,
    },
    price,
    average_price: non_zero("avgPrice", res.avg_price.as_deref())?,
    status: res.status,
  })
}

#[async_trait]
impl Exchange for BinanceFuturesExchange {
  async fn create_order(&mut self, request: OrderRequest) -> Result<OrderResult, TradingError> {
    let query = Self::order_query(&request, Self::timestamp_ms(), self.recv_window_ms);
    let signature = self.sign(&query)?;
    let url = format!("{}/fapi/v1/order?{}&signature={}", self.base_url, query, signature);
    log::debug!("POST /fapi/v1/order {}", query);

    let res = self.http
      .post(url)
      .header("X-MBX-APIKEY", &self.api_key)
      .send().await
      .map_err(|e| TradingError::ExchangeError(format!("create_order http error: {}", e)))?;
    if !res.status().is_success() {
      return Err(Self::error_from_response("create_order", res).await);
    }

    let body = res.json::<OrderResponse>().await
      .map_err(|e| TradingError::ExchangeError(format!("create_order parse error: {}", e)))?;
    order_result_from_response(&request, body)
  }

  async fn get_exchange_info(&self) -> Result<ExchangeInfo, TradingError> {
    let url = format!("{}/fapi/v1/exchangeInfo", self.base_url);
    let res = self.http.get(url)
      .send().await
      .map_err(|e| TradingError::ExchangeError(format!("exchange_info http error: {}", e)))?;
    if !res.status().is_success() {
      return Err(Self::error_from_response("exchange_info", res).await);
    }

    let body = res.json::<ExchangeInfoResponse>().await
      .map_err(|e| TradingError::ExchangeError(format!("exchange_info parse error: {}", e)))?;
    Ok(ExchangeInfo {
      symbols: body.symbols
        .into_iter()
        .map(|s| SymbolPrecision::new(s.symbol, s.quantity_precision))
        .collect(),
    })
  }
}
