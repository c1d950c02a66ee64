use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::TradingError;
use crate::models::order::{OrderRequest, OrderSide, OrderType};

/// 주문 검증기 인터페이스
pub trait OrderValidator: Send + Sync {
    /// 주문 검증
    fn validate(&self, order: &OrderRequest) -> Result<(), TradingError>;
}

/// 기본 주문 검증기: 수량 양수, LIMIT 주문에만 양수 가격
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicOrderValidator;

impl OrderValidator for BasicOrderValidator {
    fn validate(&self, order: &OrderRequest) -> Result<(), TradingError> {
        if order.symbol.trim().is_empty() {
            return Err(TradingError::InvalidParameter("Symbol must not be empty".to_string()));
        }

        // 주문 수량 검증
        if order.quantity <= Decimal::ZERO {
            return Err(TradingError::InvalidParameter(format!(
                "Order quantity must be positive, got {}",
                order.quantity
            )));
        }

        // 가격 검증
        match (order.order_type, order.price) {
            (OrderType::Limit, None) => Err(TradingError::InvalidParameter(
                "Limit order requires a price".to_string(),
            )),
            (OrderType::Limit, Some(price)) if price <= Decimal::ZERO => Err(TradingError::InvalidParameter(
                format!("Limit price must be positive, got {}", price),
            )),
            (OrderType::Market, Some(_)) => Err(TradingError::InvalidParameter(
                "Market order must not carry a price".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// 문자열 수치를 Decimal로 변환 (지수 표기 허용)
pub fn parse_decimal(raw: &str, field: &str) -> Result<Decimal, TradingError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| TradingError::InvalidParameter(format!("{} must be a number, got '{}'", field, raw)))
}

pub fn parse_positive_decimal(raw: &str, field: &str) -> Result<Decimal, TradingError> {
    let value = parse_decimal(raw, field)?;
    require_positive_decimal(value, field)
}

pub fn require_positive_decimal(value: Decimal, field: &str) -> Result<Decimal, TradingError> {
    if value <= Decimal::ZERO {
        return Err(TradingError::InvalidParameter(format!("{} must be positive, got {}", field, value)));
    }
    Ok(value)
}

/// 문자열 정수를 양의 정수로 변환
pub fn parse_positive_int(raw: &str, field: &str) -> Result<u64, TradingError> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| TradingError::InvalidParameter(format!("{} must be an integer, got '{}'", field, raw)))?;
    require_positive_int(value, field)
}

pub fn require_positive_int(value: i64, field: &str) -> Result<u64, TradingError> {
    if value <= 0 {
        return Err(TradingError::InvalidParameter(format!("{} must be positive, got {}", field, value)));
    }
    Ok(value as u64)
}

/// 심볼 정규화 (공백 제거, 대문자)
pub fn normalize_symbol(raw: &str) -> Result<String, TradingError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TradingError::InvalidParameter(format!("Invalid symbol '{}'", raw)));
    }
    Ok(symbol)
}

/// 시장가 주문 입력 검증
pub fn market_order_from_raw(symbol: &str, side: &str, quantity: &str) -> Result<OrderRequest, TradingError> {
    let symbol = normalize_symbol(symbol)?;
    let side = side.parse::<OrderSide>()?;
    let quantity = parse_positive_decimal(quantity, "Quantity")?;
    Ok(OrderRequest::market(symbol, side, quantity))
}

/// 지정가 주문 입력 검증
pub fn limit_order_from_raw(symbol: &str, side: &str, quantity: &str, price: &str) -> Result<OrderRequest, TradingError> {
    let symbol = normalize_symbol(symbol)?;
    let side = side.parse::<OrderSide>()?;
    let quantity = parse_positive_decimal(quantity, "Quantity")?;
    let price = parse_positive_decimal(price, "Price")?;
    Ok(OrderRequest::limit(symbol, side, quantity, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("0.01", dec!(0.01))]
    #[case(" 2 ", dec!(2))]
    #[case("1e-3", dec!(0.001))]
    fn test_parse_positive_decimal_accepts(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_positive_decimal(raw, "Quantity").unwrap(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-0.5")]
    #[case("abc")]
    #[case("")]
    fn test_parse_positive_decimal_rejects(#[case] raw: &str) {
        assert!(matches!(
            parse_positive_decimal(raw, "Quantity"),
            Err(TradingError::InvalidParameter(_))
        ));
    }

    #[rstest]
    #[case("5", Some(5))]
    #[case("0", None)]
    #[case("-60", None)]
    #[case("1.5", None)]
    fn test_parse_positive_int(#[case] raw: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_positive_int(raw, "Interval").ok(), expected);
    }

    #[test]
    fn test_limit_order_rejects_non_positive_price() {
        let err = limit_order_from_raw("BTCUSDT", "BUY", "0.01", "0").unwrap_err();
        assert!(err.to_string().contains("Price must be positive"));
    }

    #[test]
    fn test_market_order_normalizes_input() {
        let order = market_order_from_raw(" btcusdt ", "sell", "0.5").unwrap();
        assert_eq!(order.symbol, "BTCUSDT");
        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(order.quantity, dec!(0.5));
    }

    #[test]
    fn test_symbol_rejects_garbage() {
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("BTC/USDT").is_err());
    }

    #[test]
    fn test_basic_validator_price_iff_limit() {
        let validator = BasicOrderValidator;

        let mut limit = OrderRequest::limit("BTCUSDT", OrderSide::Buy, dec!(1), dec!(100));
        assert!(validator.validate(&limit).is_ok());
        limit.price = None;
        assert!(validator.validate(&limit).is_err());

        let mut market = OrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(1));
        assert!(validator.validate(&market).is_ok());
        market.price = Some(dec!(100));
        assert!(validator.validate(&market).is_err());
        market.price = None;
        market.quantity = Decimal::ZERO;
        assert!(validator.validate(&market).is_err());
    }
}
