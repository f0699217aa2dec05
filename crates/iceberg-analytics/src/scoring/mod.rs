//! 점수 계산 모듈.
//!
//! - [`profile`]: 버전별 가중치 프로파일 (설정 데이터)
//! - [`scorer`]: 기본 성분 + 회복력 보너스 → Turnaround / BAU 이중 원점수

pub mod profile;
pub mod scorer;

pub use profile::{
    BonusWeights, ResilienceLevel, ResilienceScaling, ScoreWeights, ScoringProfile,
    PRODUCTION_VERSION,
};
pub use scorer::{
    normalize, BonusContribution, ComponentContribution, ScoreBreakdown, ScoreResult, Scorer,
};
