//! 외부 매매 신호

pub mod sentiment;

pub use sentiment::{CsvSentimentSource, SentimentDecision, SentimentReading, SentimentSource, SentimentThresholds};
