//! 주문 검증, 정밀도 조회, 단일 주문 제출

pub mod precision;
pub mod submitter;
pub mod validator;
