use serde::{Deserialize, Serialize};

/// 심볼별 수량 정밀도
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolPrecision {
    pub symbol: String,
    pub quantity_decimal_places: u32,
}

impl SymbolPrecision {
    pub fn new(symbol: impl Into<String>, quantity_decimal_places: u32) -> Self {
        SymbolPrecision {
            symbol: symbol.into(),
            quantity_decimal_places,
        }
    }
}

/// 거래소 메타데이터 중 이 봇이 사용하는 부분
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolPrecision>,
}

impl ExchangeInfo {
    pub fn find(&self, symbol: &str) -> Option<&SymbolPrecision> {
        self.symbols.iter().find(|s| s.symbol == symbol)
    }
}
