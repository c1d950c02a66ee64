/**
* filename : twap_scheduler
* author : HAMA
* date: 2025. 5. 8.
* description: TWAP 주문 계획 및 실행
**/

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::TradingError;
use crate::exchange::traits::Exchange;
use crate::models::order::{OrderRequest, OrderResult, OrderSide};
use crate::models::symbol::SymbolPrecision;
use crate::order_core::precision::PrecisionResolver;
use crate::order_core::submitter::OrderSubmitter;
use crate::order_core::validator::{
  normalize_symbol, parse_decimal, parse_positive_int, require_positive_decimal, require_positive_int,
};
use crate::utils::math::round_quantity;
use crate::utils::report::Reporter;

/// 실행 결과 벡터 선할당 상한
const MAX_PREALLOCATED_OUTCOMES: u64 = 1024;

/// 검증된 TWAP 입력
#[derive(Debug, Clone, PartialEq)]
pub struct TwapRequest {
  pub symbol: String,
  pub side: OrderSide,
  pub total_quantity: Decimal,
  pub duration_minutes: u64,
  pub interval_seconds: u64,
}

impl TwapRequest {
  pub fn new(
    symbol: &str,
    side: OrderSide,
    total_quantity: Decimal,
    duration_minutes: i64,
    interval_seconds: i64,
  ) -> Result<Self, TradingError> {
    Ok(TwapRequest {
      symbol: normalize_symbol(symbol)?,
      side,
      total_quantity: require_positive_decimal(total_quantity, "Total quantity")?,
      duration_minutes: require_positive_int(duration_minutes, "Duration minutes")?,
      interval_seconds: require_positive_int(interval_seconds, "Interval seconds")?,
    })
  }

  /// 명령줄 문자열 입력을 검증하여 생성
  pub fn from_raw(
    symbol: &str,
    side: &str,
    total_quantity: &str,
    duration_minutes: &str,
    interval_seconds: &str,
  ) -> Result<Self, TradingError> {
    let side = side.parse::<OrderSide>()?;
    let total_quantity = parse_decimal(total_quantity, "Total quantity")?;
    let duration_minutes = parse_positive_int(duration_minutes, "Duration minutes")?;
    let interval_seconds = parse_positive_int(interval_seconds, "Interval seconds")?;
    let to_i64 = |v: u64, field: &str| {
      i64::try_from(v).map_err(|_| TradingError::InvalidParameter(format!("{} is out of range", field)))
    };
    Self::new(
      symbol,
      side,
      total_quantity,
      to_i64(duration_minutes, "Duration minutes")?,
      to_i64(interval_seconds, "Interval seconds")?,
    )
  }

  pub fn duration_seconds(&self) -> Result<u64, TradingError> {
    self.duration_minutes
      .checked_mul(60)
      .ok_or_else(|| TradingError::InvalidParameter("Duration is out of range".to_string()))
  }
}

/// 불변 TWAP 실행 계획
#[derive(Debug, Clone, PartialEq)]
pub struct TwapPlan {
  pub symbol: String,
  pub side: OrderSide,
  pub total_quantity: Decimal,
  pub chunk_quantity: Decimal,
  pub chunk_count: u64,
  pub interval_seconds: u64,
  pub duration_seconds: u64,
  pub quantity_decimal_places: u32,
}

impl TwapPlan {
  /// 분할 수 = floor(총 초 / 간격). 나머지 시간은 사용하지 않는다
  pub fn chunk_count_for(request: &TwapRequest) -> Result<u64, TradingError> {
    let duration_seconds = request.duration_seconds()?;
    if duration_seconds < request.interval_seconds {
      return Err(TradingError::ScheduleInfeasible(format!(
        "Total duration ({}s) cannot be less than the interval ({}s)",
        duration_seconds, request.interval_seconds
      )));
    }
    Ok(duration_seconds / request.interval_seconds)
  }

  pub fn build(request: &TwapRequest, precision: &SymbolPrecision) -> Result<Self, TradingError> {
    let chunk_count = Self::chunk_count_for(request)?;
    let raw_chunk = request.total_quantity / Decimal::from(chunk_count);
    let chunk_quantity = round_quantity(raw_chunk, precision.quantity_decimal_places);

    if chunk_quantity.is_zero() {
      return Err(TradingError::ChunkTooSmall(format!(
        "Total quantity {} is too small to split into {} chunks at {} decimal places",
        request.total_quantity, chunk_count, precision.quantity_decimal_places
      )));
    }

    Ok(TwapPlan {
      symbol: request.symbol.clone(),
      side: request.side,
      total_quantity: request.total_quantity,
      chunk_quantity,
      chunk_count,
      interval_seconds: request.interval_seconds,
      duration_seconds: request.duration_seconds()?,
      quantity_decimal_places: precision.quantity_decimal_places,
    })
  }

  /// 모든 분할이 체결될 경우의 총 수량 (반올림 때문에 total_quantity와 다를 수 있음)
  pub fn planned_quantity(&self) -> Decimal {
    self.chunk_quantity * Decimal::from(self.chunk_count)
  }

  pub fn interval(&self) -> Duration {
    Duration::from_secs(self.interval_seconds)
  }
}

#[derive(Debug)]
pub enum ChunkOutcome {
  Placed { index: u64, result: OrderResult },
  Failed { index: u64, error: TradingError },
}

impl ChunkOutcome {
  pub fn index(&self) -> u64 {
    match self {
      ChunkOutcome::Placed { index, .. } | ChunkOutcome::Failed { index, .. } => *index,
    }
  }

  pub fn is_placed(&self) -> bool {
    matches!(self, ChunkOutcome::Placed { .. })
  }
}

/// 실행 결과 요약
#[derive(Debug)]
pub struct TwapReport {
  pub plan: TwapPlan,
  pub outcomes: Vec<ChunkOutcome>,
  pub cancelled: bool,
}

impl TwapReport {
  pub fn attempted(&self) -> usize {
    self.outcomes.len()
  }

  pub fn succeeded(&self) -> usize {
    self.outcomes.iter().filter(|o| o.is_placed()).count()
  }

  pub fn failed(&self) -> usize {
    self.attempted() - self.succeeded()
  }

  pub fn failed_indices(&self) -> Vec<u64> {
    self.outcomes.iter().filter(|o| !o.is_placed()).map(|o| o.index()).collect()
  }

  /// 성공한 분할의 요청 수량 합계
  pub fn placed_quantity(&self) -> Decimal {
    self.outcomes
      .iter()
      .filter_map(|o| match o {
        ChunkOutcome::Placed { result, .. } => Some(result.requested_quantity),
        ChunkOutcome::Failed { .. } => None,
      })
      .sum()
  }

  pub fn summary(&self) -> String {
    let status = if self.cancelled { "cancelled" } else { "completed" };
    format!(
      "TWAP execution {}: {} succeeded, {} failed, {} attempted of {} planned; placed {} of {} {}",
      status,
      self.succeeded(),
      self.failed(),
      self.attempted(),
      self.plan.chunk_count,
      self.placed_quantity(),
      self.plan.total_quantity,
      self.plan.symbol
    )
  }
}

/// TWAP 스케줄러 - 계획 수립 후 간격을 두고 분할 주문을 순차 제출
pub struct TwapScheduler {
  resolver: PrecisionResolver,
  submitter: OrderSubmitter,
  reporter: Arc<dyn Reporter>,
}

impl TwapScheduler {
  pub fn new(exchange: Arc<RwLock<dyn Exchange>>, reporter: Arc<dyn Reporter>) -> Self {
    TwapScheduler {
      resolver: PrecisionResolver::new(exchange.clone()),
      submitter: OrderSubmitter::new(exchange),
      reporter,
    }
  }

  /// 계획 수립. 실행 가능성은 네트워크 조회 전에 확인
  pub async fn plan(&self, request: &TwapRequest) -> Result<TwapPlan, TradingError> {
    TwapPlan::chunk_count_for(request)?;
    let precision = self.resolver.resolve(&request.symbol).await?;
    TwapPlan::build(request, &precision)
  }

  /// 계획 수립 + 실행. 계획 단계 오류는 주문 없이 즉시 반환
  pub async fn run(&self, request: TwapRequest, cancel: &CancellationToken) -> Result<TwapReport, TradingError> {
    let plan = match self.plan(&request).await {
      Ok(plan) => plan,
      Err(e) => {
        self.reporter.error(&format!("TWAP planning failed for {}: {}", request.symbol, e));
        return Err(e);
      }
    };
    Ok(self.execute(plan, cancel).await)
  }

  /// 분할 주문 실행. 개별 분할 실패는 기록 후 다음 분할로 진행
  pub async fn execute(&self, plan: TwapPlan, cancel: &CancellationToken) -> TwapReport {
    let run_id = Uuid::new_v4().simple().to_string()[..8].to_string();
    let total = plan.chunk_count;

    log::info!(
      "Starting TWAP {} order for {} {} over {} minutes (run {})",
      plan.side, plan.total_quantity, plan.symbol, plan.duration_seconds / 60, run_id
    );
    self.reporter.say("--- Starting TWAP Execution ---");
    self.reporter.say(&format!("Total Quantity: {} {}", plan.total_quantity, plan.symbol));
    self.reporter.say(&format!("Total Duration: {} minutes", plan.duration_seconds / 60));
    self.reporter.say(&format!(
      "Executing {} orders of {} {} every {} seconds.",
      total, plan.chunk_quantity, plan.symbol, plan.interval_seconds
    ));
    self.reporter.say("-----------------------------");

    // chunk_count는 상한이 없으므로 선할당은 제한
    let mut outcomes = Vec::with_capacity(total.min(MAX_PREALLOCATED_OUTCOMES) as usize);
    let mut cancelled = false;

    for index in 1..=total {
      if cancel.is_cancelled() {
        cancelled = true;
        break;
      }

      self.reporter.info(&format!(
        "TWAP chunk {}/{}: placing MARKET {} order for {} {}",
        index, total, plan.side, plan.chunk_quantity, plan.symbol
      ));
      let request = OrderRequest::market(plan.symbol.clone(), plan.side, plan.chunk_quantity)
        .with_client_order_id(format!("twap-{}-{}", run_id, index));

      match self.submitter.submit(request).await {
        Ok(result) => {
          self.reporter.info(&format!("TWAP chunk {}/{} placed: {}", index, total, result));
          outcomes.push(ChunkOutcome::Placed { index, result });
        }
        Err(error) => {
          self.reporter.error(&format!(
            "TWAP chunk {}/{} failed: {}. Continuing with next chunk.",
            index, total, error
          ));
          outcomes.push(ChunkOutcome::Failed { index, error });
        }
      }

      if index < total {
        self.reporter.say(&format!("Waiting {} seconds for next chunk...", plan.interval_seconds));
        tokio::select! {
          _ = tokio::time::sleep(plan.interval()) => {}
          _ = cancel.cancelled() => {
            cancelled = true;
            break;
          }
        }
      }
    }

    let report = TwapReport { plan, outcomes, cancelled };
    if report.cancelled {
      self.reporter.warn(&report.summary());
    } else if report.failed() > 0 {
      self.reporter.warn(&report.summary());
      self.reporter.warn(&format!("Failed chunks: {:?}", report.failed_indices()));
    } else {
      self.reporter.info(&report.summary());
    }
    self.reporter.say("--- TWAP Execution Complete ---");
    report
  }
}
