//! 수량 계산 유틸리티
//!
//! 거래소 정밀도 규칙에 맞춘 수량 반올림

use rust_decimal::{Decimal, RoundingStrategy};

/// 수량 단위 반올림 (거래소 정밀도 자릿수 기준, 중간값은 짝수 쪽으로)
pub fn round_quantity(quantity: Decimal, decimal_places: u32) -> Decimal {
  quantity.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

/// 주어진 정밀도에서 표현 가능한 최소 수량
pub fn rounding_unit(decimal_places: u32) -> Decimal {
  Decimal::new(1, decimal_places)
}
