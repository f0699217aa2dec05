//! 분석 파이프라인 에러.

use chrono::NaiveDate;
use iceberg_core::{DataError, IcebergError};

/// 분석 작업 오류.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// 잘못된 입력 데이터
    #[error("데이터 오류: {0}")]
    Data(#[from] DataError),

    /// 기준일 이전 데이터 없음
    #[error("{ticker}: {as_of} 이전 가격 데이터가 없습니다")]
    NoData { ticker: String, as_of: NaiveDate },

    /// 백테스트 구간 데이터 부족
    #[error("데이터 부족: 필요 {required}개, 제공 {provided}개")]
    InsufficientHistory { required: usize, provided: usize },

    /// 가중치 프로파일 오류
    #[error("프로파일 오류: {0}")]
    Profile(String),

    /// 작업 취소됨
    #[error("작업이 취소되었습니다")]
    Cancelled,

    /// 백그라운드 작업 실패
    #[error("작업 실행 실패: {0}")]
    Task(String),
}

/// 분석 결과 타입.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl AnalysisError {
    /// 표시 계층이 "데이터 부족/오류" 상태로 보여줘야 하는 에러인지 확인.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::Data(_)
                | AnalysisError::NoData { .. }
                | AnalysisError::InsufficientHistory { .. }
        )
    }
}

impl From<toml::de::Error> for AnalysisError {
    fn from(err: toml::de::Error) -> Self {
        AnalysisError::Profile(err.to_string())
    }
}

impl From<AnalysisError> for IcebergError {
    fn from(err: AnalysisError) -> Self {
        let message = err.to_string();
        match err {
            AnalysisError::Data(data) => IcebergError::Data(data),
            AnalysisError::NoData { .. } => IcebergError::NotFound(message),
            AnalysisError::InsufficientHistory { .. } => IcebergError::InvalidInput(message),
            AnalysisError::Profile(msg) => IcebergError::Config(msg),
            AnalysisError::Cancelled | AnalysisError::Task(_) => IcebergError::Internal(message),
        }
    }
}
