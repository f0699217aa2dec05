//! 기술적 지표 모듈.
//!
//! 점수 계산에 사용되는 모든 지표를 순수 함수로 제공합니다.
//! 이력이 부족한 지표는 에러가 아니라 `None`(미정의)을 반환합니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표
//! - **SMA / EMA / MACD**
//! - **추세 방향**: SMA 대비 ±2% 밴드
//! - **추세 기울기 (100일)**, **1년 성장률**
//!
//! ## 모멘텀 지표
//! - **RSI(14)**: Wilder 평활
//!
//! ## 변동성 지표
//! - **변동성**: 20일 일간 수익률 표본 표준편차
//!
//! ## 구조적 지표
//! - **랠리 크기 (90일)**, **고점 대비 거리 (20일)**
//! - **회복력 카운트 (6개월)**, **고점 복귀 빈도**
//!
//! # 사용 예시
//!
//! ```ignore
//! use iceberg_analytics::indicators::IndicatorSet;
//!
//! let set = IndicatorSet::compute(&closes)?;
//! if let Some(rsi) = set.rsi {
//!     println!("RSI: {:.1}", rsi.value);
//! }
//! ```

pub mod momentum;
pub mod set;
pub mod structural;
pub mod trend;
pub mod volatility;

pub use momentum::{rsi, RsiBias, RsiParams, RsiResult};
pub use set::IndicatorSet;
pub use structural::{
    above_sma_at, distance_from_high, is_new_low, rally_magnitude, resilience_count,
    return_to_highs_frequency, was_above_sma_within, RallyWindow,
};
pub use trend::{
    ema, ema_series, growth_rate, macd, sma, trend, trend_slope, MacdBias, MacdParams,
    MacdResult, TrendBias, TrendSummary,
};
pub use volatility::{volatility, VolatilitySummary, VolatilityTier, VOLATILITY_WINDOW};

/// 연간 거래일 수.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// 추세 기울기 구간.
pub const TREND_SLOPE_WINDOW: usize = 100;

/// 랠리 탐색 구간.
pub const RALLY_WINDOW: usize = 90;

/// 최근 고점 구간.
pub const HIGH_WINDOW: usize = 20;

/// 회복력 카운트 구간 (약 6개월).
pub const RESILIENCE_WINDOW: usize = 126;

/// 고점 복귀 빈도 구간.
pub const RETURN_TO_HIGHS_WINDOW: usize = 126;

/// 고점 복귀 빈도의 롤링 고점 구간.
pub const RETURN_TO_HIGHS_LOOKBACK: usize = 60;

/// 고점 복귀로 간주하는 밴드 (5%).
pub const RETURN_TO_HIGHS_BAND: f64 = 0.05;
