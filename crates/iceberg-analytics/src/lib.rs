//! 지표, 패턴 감지, 이중 점수 계산 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 라이브러리 (MACD, RSI, SMA, 변동성, 구조적 지표)
//! - 패턴 감지 (Recovery, Post-Shock, Cheap-on-Winner, Capitulation)
//! - Trade / Investment 점수 (Turnaround / BAU 이중 계산)
//! - 등급 분류
//! - 진단 리포트, 백테스트
//! - 결과 캐시 및 취소 가능한 점수 서비스
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use iceberg_analytics::Evaluator;
//!
//! let evaluation = Evaluator::default().evaluate(&history, as_of)?;
//! println!(
//!     "Trade {:.0} ({}), Investment {:.0} ({})",
//!     evaluation.trade.display_score,
//!     evaluation.trade.rating_label,
//!     evaluation.investment.display_score,
//!     evaluation.investment.rating_label,
//! );
//! ```

pub mod backtest;
pub mod cache;
pub mod diagnose;
pub mod error;
pub mod evaluator;
pub mod indicators;
pub mod patterns;
pub mod rating;
pub mod scoring;
pub mod service;

pub use backtest::{
    AccuracyStats, BacktestConfig, BacktestPoint, BacktestReport, Backtester, HorizonStats,
    ScoreTypeSummary,
};
pub use cache::{CacheKey, ScoreCache};
pub use diagnose::DiagnosticReport;
pub use error::{AnalysisError, AnalysisResult};
pub use evaluator::{Evaluation, Evaluator};
pub use indicators::IndicatorSet;
pub use patterns::{Criterion, PatternConfig, PatternDetector, PatternFlags};
pub use rating::{score_bar, RatingLabel, RatingThresholds};
pub use scoring::{
    normalize, ScoreBreakdown, ScoreResult, ScoreWeights, Scorer, ScoringProfile,
};
pub use service::ScoreService;
