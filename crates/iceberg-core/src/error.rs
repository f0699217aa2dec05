//! Iceberg 엔진의 에러 타입.
//!
//! 이 모듈은 엔진 전반에서 사용되는 에러 타입을 정의합니다.
//! 데이터가 "부족한" 경우는 에러가 아니라 `None`으로 표현되며,
//! 여기 정의된 에러는 "잘못된" 입력에만 사용됩니다.

use chrono::NaiveDate;
use thiserror::Error;

/// 가격 데이터 검증 에러.
///
/// 가격 이력이 엔진 입력 계약을 위반할 때 발생합니다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// 빈 가격 이력
    #[error("가격 이력이 비어 있습니다")]
    Empty,

    /// 0 이하의 가격
    #[error("{date}: 0 이하의 가격 ({field} = {value})")]
    NonPositivePrice {
        date: NaiveDate,
        field: &'static str,
        value: String,
    },

    /// 날짜가 오름차순이 아니거나 중복됨
    #[error("날짜 순서 위반: {previous} 다음에 {current}")]
    NonMonotonicDate {
        previous: NaiveDate,
        current: NaiveDate,
    },

    /// 유한하지 않은 값 (NaN, 무한대)
    #[error("{date}: 유한하지 않은 값 ({field})")]
    NonFinite { date: NaiveDate, field: &'static str },

    /// 음수 거래량
    #[error("{date}: 음수 거래량 ({value})")]
    NegativeVolume { date: NaiveDate, value: String },

    /// 종가 시퀀스의 잘못된 값 (0 이하, NaN, 무한대)
    #[error("{index}번째 종가가 잘못되었습니다: {value}")]
    InvalidClose { index: usize, value: f64 },

    /// 파싱 실패
    #[error("{line}행 파싱 실패: {message}")]
    Parse { line: usize, message: String },
}

/// 핵심 엔진 에러.
#[derive(Debug, Error)]
pub enum IcebergError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(#[from] DataError),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 엔진 작업을 위한 Result 타입.
pub type IcebergResult<T> = Result<T, IcebergError>;

impl IcebergError {
    /// 입력 데이터 문제로 인한 에러인지 확인합니다.
    ///
    /// 표시 계층은 이 경우 "데이터 부족/오류" 상태를 보여줍니다.
    pub fn is_data_error(&self) -> bool {
        matches!(self, IcebergError::Data(_) | IcebergError::InvalidInput(_))
    }
}

impl From<serde_json::Error> for IcebergError {
    fn from(err: serde_json::Error) -> Self {
        IcebergError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for IcebergError {
    fn from(err: toml::de::Error) -> Self {
        IcebergError::Config(err.to_string())
    }
}

impl From<config::ConfigError> for IcebergError {
    fn from(err: config::ConfigError) -> Self {
        IcebergError::Config(err.to_string())
    }
}
