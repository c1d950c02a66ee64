/**
* filename : sentiment
* author : HAMA
* date: 2025. 5. 11.
* description: 공포/탐욕 지수 읽기 및 매매 결정
**/

use std::path::PathBuf;

use crate::error::TradingError;
use crate::models::order::OrderSide;

/// 최신 심리 지수 (0 ~ 100)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentReading {
  pub index_value: u8,
}

impl SentimentReading {
  pub fn new(index_value: i64) -> Result<Self, TradingError> {
    if !(0..=100).contains(&index_value) {
      return Err(TradingError::SentimentUnavailable(format!(
        "Sentiment value {} is outside [0, 100]",
        index_value
      )));
    }
    Ok(SentimentReading { index_value: index_value as u8 })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentDecision {
  Buy,   // Extreme Fear
  Sell,  // Extreme Greed
  Hold,  // Neutral
}

impl SentimentDecision {
  pub fn side(&self) -> Option<OrderSide> {
    match self {
      SentimentDecision::Buy => Some(OrderSide::Buy),
      SentimentDecision::Sell => Some(OrderSide::Sell),
      SentimentDecision::Hold => None,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      SentimentDecision::Buy => "Extreme Fear",
      SentimentDecision::Sell => "Extreme Greed",
      SentimentDecision::Hold => "Neutral",
    }
  }
}

/// 지수 → 결정 임계값 (이하 매수, 이상 매도)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentThresholds {
  pub fear: u8,
  pub greed: u8,
}

impl Default for SentimentThresholds {
  fn default() -> Self {
    SentimentThresholds { fear: 25, greed: 75 }
  }
}

impl SentimentThresholds {
  pub fn decide(&self, reading: SentimentReading) -> SentimentDecision {
    match reading.index_value {
      v if v <= self.fear => SentimentDecision::Buy,
      v if v >= self.greed => SentimentDecision::Sell,
      _ => SentimentDecision::Hold,
    }
  }
}

/// 심리 지수 데이터 소스
pub trait SentimentSource: Send + Sync {
  fn latest(&self) -> Result<SentimentReading, TradingError>;
}

/// 마지막 행의 `value` 컬럼을 최신 값으로 읽는 CSV 소스
pub struct CsvSentimentSource {
  path: PathBuf,
}

impl CsvSentimentSource {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    CsvSentimentSource { path: path.into() }
  }
}

impl SentimentSource for CsvSentimentSource {
  fn latest(&self) -> Result<SentimentReading, TradingError> {
    if !self.path.exists() {
      return Err(TradingError::SentimentUnavailable(format!(
        "{} not found",
        self.path.display()
      )));
    }

    let unavailable = |e: csv::Error| TradingError::SentimentUnavailable(format!("{}: {}", self.path.display(), e));

    let mut rdr = csv::ReaderBuilder::new()
      .has_headers(true)
      .trim(csv::Trim::All)
      .from_path(&self.path)
      .map_err(unavailable)?;

    let column = rdr
      .headers()
      .map_err(unavailable)?
      .iter()
      .position(|h| h == "value")
      .ok_or_else(|| TradingError::SentimentUnavailable(format!(
        "{} has no 'value' column",
        self.path.display()
      )))?;

    let mut last = None;
    for record in rdr.records() {
      last = Some(record.map_err(unavailable)?);
    }
    let record = last.ok_or_else(|| TradingError::SentimentUnavailable(format!(
      "{} has no data rows",
      self.path.display()
    )))?;

    let raw = record.get(column).unwrap_or_default();
    let value = raw.parse::<i64>().map_err(|_| {
      TradingError::SentimentUnavailable(format!("Latest sentiment value '{}' is not an integer", raw))
    })?;
    SentimentReading::new(value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::rstest;

  fn write_csv(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("fng-{}.csv", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[rstest]
  #[case(0, SentimentDecision::Buy)]
  #[case(20, SentimentDecision::Buy)]
  #[case(25, SentimentDecision::Buy)]
  #[case(26, SentimentDecision::Hold)]
  #[case(50, SentimentDecision::Hold)]
  #[case(74, SentimentDecision::Hold)]
  #[case(75, SentimentDecision::Sell)]
  #[case(80, SentimentDecision::Sell)]
  #[case(100, SentimentDecision::Sell)]
  fn test_default_thresholds(#[case] value: i64, #[case] expected: SentimentDecision) {
    let reading = SentimentReading::new(value).unwrap();
    assert_eq!(SentimentThresholds::default().decide(reading), expected);
  }

  #[test]
  fn test_reading_range() {
    assert!(SentimentReading::new(-1).is_err());
    assert!(SentimentReading::new(101).is_err());
  }

  #[test]
  fn test_reads_last_row_value() {
    let path = write_csv("timestamp,value,classification\n1700000000,55,Greed\n1700086400, 18 ,Extreme Fear\n");
    let reading = CsvSentimentSource::new(&path).latest().unwrap();
    assert_eq!(reading.index_value, 18);
    std::fs::remove_file(path).ok();
  }

  #[test]
  fn test_missing_file() {
    let source = CsvSentimentSource::new(std::env::temp_dir().join(format!("absent-{}.csv", uuid::Uuid::new_v4())));
    let err = source.latest().unwrap_err();
    assert!(matches!(err, TradingError::SentimentUnavailable(ref m) if m.contains("not found")));
  }

  #[rstest]
  #[case("value\n")]
  #[case("timestamp,score\n1,20\n")]
  #[case("value\nabc\n")]
  #[case("value\n250\n")]
  fn test_malformed_files(#[case] contents: &str) {
    let path = write_csv(contents);
    let err = CsvSentimentSource::new(&path).latest().unwrap_err();
    assert!(matches!(err, TradingError::SentimentUnavailable(_)));
    std::fs::remove_file(path).ok();
  }
}
