//! 변동성 지표 (Volatility Indicators).
//!
//! 일간 수익률의 표본 표준편차로 변동성 구간을 판정합니다.

use serde::{Deserialize, Serialize};

/// 변동성 계산 기본 구간 (거래일).
pub const VOLATILITY_WINDOW: usize = 20;

/// 변동성 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityTier {
    /// σ < 1%
    Calm,
    /// 1% ≤ σ < 3%
    Choppy,
    /// σ ≥ 3%
    Wild,
}

impl VolatilityTier {
    pub fn from_sigma(sigma_pct: f64) -> Self {
        if sigma_pct < 1.0 {
            VolatilityTier::Calm
        } else if sigma_pct < 3.0 {
            VolatilityTier::Choppy
        } else {
            VolatilityTier::Wild
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VolatilityTier::Calm => "calm",
            VolatilityTier::Choppy => "choppy",
            VolatilityTier::Wild => "wild",
        }
    }
}

/// 변동성 요약.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilitySummary {
    /// 일간 수익률 표준편차 (%)
    pub sigma_pct: f64,
    /// 구간
    pub tier: VolatilityTier,
}

/// 변동성 계산.
///
/// 최근 `window`개의 일간 수익률(%)에 대한 표본 표준편차(n − 1).
/// `window + 1`개 미만의 종가에서는 `None`.
pub fn volatility(closes: &[f64], window: usize) -> Option<VolatilitySummary> {
    if window < 2 || closes.len() < window + 1 {
        return None;
    }

    let recent = &closes[closes.len() - window - 1..];
    let returns: Vec<f64> = recent
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / pair[0] * 100.0)
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let sigma_pct = variance.sqrt();

    Some(VolatilitySummary {
        sigma_pct,
        tier: VolatilityTier::from_sigma(sigma_pct),
    })
}
