//! 주문 봇 데이터 모델

pub mod order;
pub mod symbol;
