//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)
//! - 추세 방향 (SMA 대비 ±2% 밴드)
//! - 추세 기울기 / 1년 성장률

use serde::{Deserialize, Serialize};

use super::TRADING_DAYS_PER_YEAR;

/// MACD 히스토그램의 중립 밴드 (가격 단위).
///
/// |히스토그램| ≤ 0.01 이면 Neutral.
pub const MACD_NEUTRAL_BAND: f64 = 0.01;

/// 추세 판정 밴드 (SMA 대비 ±2%).
pub const TREND_BAND: f64 = 0.02;

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdBias {
    Bull,
    Bear,
    Neutral,
}

impl MacdBias {
    /// 히스토그램 값으로 방향을 분류합니다.
    pub fn from_histogram(histogram: f64) -> Self {
        if histogram > MACD_NEUTRAL_BAND {
            MacdBias::Bull
        } else if histogram < -MACD_NEUTRAL_BAND {
            MacdBias::Bear
        } else {
            MacdBias::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MacdBias::Bull => "bull",
            MacdBias::Bear => "bear",
            MacdBias::Neutral => "neutral",
        }
    }
}

/// MACD 결과 (마지막 시점 기준).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: f64,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: f64,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: f64,
    /// 방향
    pub bias: MacdBias,
}

/// 추세 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendBias {
    Up,
    Down,
    Sideways,
}

impl TrendBias {
    /// 가격과 이동평균을 비교해 방향을 판정합니다.
    ///
    /// UP: 가격 > SMA × 1.02, DOWN: 가격 < SMA × 0.98, 그 외 SIDEWAYS.
    pub fn classify(price: f64, sma: f64) -> Self {
        if price > sma * (1.0 + TREND_BAND) {
            TrendBias::Up
        } else if price < sma * (1.0 - TREND_BAND) {
            TrendBias::Down
        } else {
            TrendBias::Sideways
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendBias::Up => "up",
            TrendBias::Down => "down",
            TrendBias::Sideways => "sideways",
        }
    }
}

/// 기간별 추세 요약.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// 이동평균 기간
    pub period: usize,
    /// 이동평균 값
    pub sma: f64,
    /// 현재가의 이동평균 대비 괴리율 (%)
    pub delta_pct: f64,
    /// 방향
    pub bias: TrendBias,
}

/// 단순 이동평균 (SMA).
///
/// 마지막 `period`개 종가의 산술 평균. 데이터가 부족하면 `None`.
pub fn sma(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }
    let window = &closes[closes.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// 지수 이동평균 (EMA) 시계열.
///
/// 처음 `period`개 값의 단순 평균으로 시작한 뒤 α = 2/(period+1)로 평활합니다.
/// 처음 `period - 1`개 위치는 `None`입니다.
pub fn ema_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut ema = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = Some(ema);

    for i in period..values.len() {
        ema = values[i] * alpha + ema * (1.0 - alpha);
        result[i] = Some(ema);
    }

    result
}

/// 마지막 시점의 EMA.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    ema_series(values, period).last().copied().flatten()
}

/// MACD 계산.
///
/// macd = EMA(fast) − EMA(slow), signal = EMA(signal)(macd), histogram = macd − signal.
/// 시그널 라인까지 정의되려면 `slow + signal − 1`개의 종가가 필요합니다.
pub fn macd(closes: &[f64], params: MacdParams) -> Option<MacdResult> {
    let fast = ema_series(closes, params.fast_period);
    let slow = ema_series(closes, params.slow_period);

    let macd_line: Vec<f64> = fast
        .iter()
        .zip(&slow)
        .filter_map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let signal = ema(&macd_line, params.signal_period)?;
    let macd_value = *macd_line.last()?;
    let histogram = macd_value - signal;

    Some(MacdResult {
        macd: macd_value,
        signal,
        histogram,
        bias: MacdBias::from_histogram(histogram),
    })
}

/// 기간별 추세 요약 계산.
pub fn trend(closes: &[f64], period: usize) -> Option<TrendSummary> {
    let sma_value = sma(closes, period)?;
    let price = *closes.last()?;
    if sma_value <= 0.0 {
        return None;
    }

    Some(TrendSummary {
        period,
        sma: sma_value,
        delta_pct: (price - sma_value) / sma_value * 100.0,
        bias: TrendBias::classify(price, sma_value),
    })
}

/// 추세 기울기 (연율화 %).
///
/// 최근 `period`개 종가의 선형 회귀 기울기를 평균 가격으로 정규화하고
/// 연간 거래일 수를 곱해 연율 백분율로 환산합니다.
pub fn trend_slope(closes: &[f64], period: usize) -> Option<f64> {
    if period < 2 || closes.len() < period {
        return None;
    }

    // 선형 회귀: y = mx + b
    let window = &closes[closes.len() - period..];
    let n = period as f64;
    let sum_x: f64 = (0..period).map(|i| i as f64).sum();
    let sum_y: f64 = window.iter().sum();
    let sum_xy: f64 = window.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_x2: f64 = (0..period).map(|i| (i as f64).powi(2)).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    let mean = sum_y / n;
    if denominator == 0.0 || mean <= 0.0 {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    Some(slope / mean * TRADING_DAYS_PER_YEAR as f64 * 100.0)
}

/// 1년 성장률 (%).
///
/// 약 252 거래일 전 종가 대비 최신 종가의 변화율. 이력이 부족하면 `None`.
pub fn growth_rate(closes: &[f64], lookback: usize) -> Option<f64> {
    if closes.len() <= lookback {
        return None;
    }
    let then = closes[closes.len() - 1 - lookback];
    let now = *closes.last()?;
    if then <= 0.0 {
        return None;
    }
    Some((now / then - 1.0) * 100.0)
}
