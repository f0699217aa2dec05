//! 모멘텀 지표 (Momentum Indicators).
//!
//! 과매수/과매도 상태를 측정하는 RSI를 제공합니다.

use serde::{Deserialize, Serialize};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// RSI 강도 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiBias {
    /// 70 이상
    Overbought,
    /// 55 이상
    Strong,
    /// 45 이상
    Neutral,
    /// 30 이상
    Weak,
    /// 30 미만
    Oversold,
}

impl RsiBias {
    pub fn from_value(rsi: f64) -> Self {
        if rsi >= 70.0 {
            RsiBias::Overbought
        } else if rsi >= 55.0 {
            RsiBias::Strong
        } else if rsi >= 45.0 {
            RsiBias::Neutral
        } else if rsi >= 30.0 {
            RsiBias::Weak
        } else {
            RsiBias::Oversold
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RsiBias::Overbought => "overbought",
            RsiBias::Strong => "strong",
            RsiBias::Neutral => "neutral",
            RsiBias::Weak => "weak",
            RsiBias::Oversold => "oversold",
        }
    }
}

/// RSI 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiResult {
    /// 0-100 사이의 RSI 값
    pub value: f64,
    /// 강도 구간
    pub bias: RsiBias,
}

/// RSI (Relative Strength Index) 계산.
///
/// RSI = 100 - (100 / (1 + RS)), RS = 평균 상승폭 / 평균 하락폭
///
/// 첫 평균은 처음 `period`개 변화량의 단순 평균이고, 이후에는 Wilder 평활
/// `avg = (prev × (period − 1) + 현재) / period`을 적용합니다.
///
/// - 평균 하락폭 = 0, 평균 상승폭 > 0 → 100
/// - 둘 다 0 (가격 변화 없음) → 50
///
/// `period + 1`개 미만의 종가에서는 `None`.
pub fn rsi(closes: &[f64], params: RsiParams) -> Option<RsiResult> {
    let period = params.period;
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for pair in closes[..=period].windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    let smoothing = (period - 1) as f64;
    for pair in closes[period..].windows(2) {
        let change = pair[1] - pair[0];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * smoothing + gain) / period as f64;
        avg_loss = (avg_loss * smoothing + loss) / period as f64;
    }

    let value = if avg_loss == 0.0 {
        if avg_gain > 0.0 {
            100.0
        } else {
            50.0
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    Some(RsiResult {
        value,
        bias: RsiBias::from_value(value),
    })
}
