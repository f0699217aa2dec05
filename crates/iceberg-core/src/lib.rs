//! # Iceberg Core
//!
//! Iceberg 점수 엔진의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 엔진 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일봉 가격 데이터 (`PriceBar`, `PriceHistory`)
//! - 점수 유형 정의 (Trade / Investment)
//! - 가격 데이터 검증 에러
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
