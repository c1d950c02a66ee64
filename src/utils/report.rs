//! 운영자 보고
//!
//! 진행 상황과 실패를 콘솔에 출력하면서 동시에 로그 파일에 남긴다.

use std::sync::Mutex;

/// Operator-visible narrative. Every `info`/`warn`/`error` is also logged;
/// `say` is console-only (banners, separators).
pub trait Reporter: Send + Sync {
    fn say(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// 표준 출력/표준 오류로 보고
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn say(&self, message: &str) {
        println!("{}", message);
    }

    fn info(&self, message: &str) {
        log::info!("{}", message);
        println!("{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
        println!("Warning: {}", message);
    }

    fn error(&self, message: &str) {
        log::error!("{}", message);
        eprintln!("Error: {}", message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Say,
    Info,
    Warn,
    Error,
}

/// 테스트용: 보고된 메시지를 메모리에 기록
#[derive(Debug, Default)]
pub struct RecordingReporter {
    entries: Mutex<Vec<(ReportLevel, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(ReportLevel, String)> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn messages(&self, level: ReportLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|(_, m)| m.contains(needle))
    }

    fn push(&self, level: ReportLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

impl Reporter for RecordingReporter {
    fn say(&self, message: &str) {
        self.push(ReportLevel::Say, message);
    }

    fn info(&self, message: &str) {
        log::info!("{}", message);
        self.push(ReportLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
        self.push(ReportLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        log::error!("{}", message);
        self.push(ReportLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_filters_by_level() {
        let reporter = RecordingReporter::new();
        reporter.say("--- banner ---");
        reporter.info("placed");
        reporter.error("chunk 2 failed");

        assert_eq!(reporter.entries().len(), 3);
        assert_eq!(reporter.messages(ReportLevel::Error), vec!["chunk 2 failed".to_string()]);
        assert!(reporter.contains("banner"));
        assert!(!reporter.contains("cancelled"));
    }
}
