//! 기준일별 지표 묶음.

use iceberg_core::DataError;
use serde::{Deserialize, Serialize};

use super::{
    distance_from_high, ema, growth_rate, macd, rally_magnitude, resilience_count,
    return_to_highs_frequency, rsi, trend, trend_slope, volatility, MacdBias, MacdParams,
    MacdResult, RallyWindow, RsiParams, RsiResult, TrendBias, TrendSummary, VolatilitySummary,
    HIGH_WINDOW, RALLY_WINDOW, RESILIENCE_WINDOW, RETURN_TO_HIGHS_BAND,
    RETURN_TO_HIGHS_LOOKBACK, RETURN_TO_HIGHS_WINDOW, TRADING_DAYS_PER_YEAR, TREND_SLOPE_WINDOW,
    VOLATILITY_WINDOW,
};

/// 한 기준일의 전체 지표.
///
/// 이력이 부족한 필드는 `None`입니다. 같은 종가 시퀀스로 계산하면 항상 같은 값이 나옵니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// 기준일 종가
    pub price: f64,
    pub ema12: Option<f64>,
    pub ema26: Option<f64>,
    /// MACD(12, 26, 9)
    pub macd: Option<MacdResult>,
    /// RSI(14)
    pub rsi: Option<RsiResult>,
    pub sma10: Option<f64>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub sma100: Option<f64>,
    pub trend10: Option<TrendSummary>,
    pub trend20: Option<TrendSummary>,
    pub trend50: Option<TrendSummary>,
    pub trend100: Option<TrendSummary>,
    /// 20일 변동성
    pub volatility: Option<VolatilitySummary>,
    /// 1년 성장률 (%)
    pub growth_rate_1y_pct: Option<f64>,
    /// 100일 추세 기울기 (연율 %)
    pub trend_slope_100d_pct: Option<f64>,
    /// 90일 랠리 구간
    pub rally_90d: Option<RallyWindow>,
    /// 20일 고점 대비 거리 (%, 0 이하)
    pub distance_from_high_20d_pct: Option<f64>,
    /// 6개월 Recovery 패턴 발생 횟수
    pub resilience_count: usize,
    /// 고점 복귀 빈도 (0.0 ~ 1.0)
    pub return_to_highs_frequency: Option<f64>,
}

impl IndicatorSet {
    /// 종가 시퀀스(오래된 순)로 전체 지표를 계산합니다.
    ///
    /// # 에러
    ///
    /// 빈 시퀀스, 0 이하 가격, NaN/무한대가 있으면 `DataError`.
    pub fn compute(closes: &[f64]) -> Result<Self, DataError> {
        validate_closes(closes)?;
        let price = closes[closes.len() - 1];

        Ok(Self {
            price,
            ema12: ema(closes, 12),
            ema26: ema(closes, 26),
            macd: macd(closes, MacdParams::default()),
            rsi: rsi(closes, RsiParams::default()),
            sma10: super::sma(closes, 10),
            sma20: super::sma(closes, 20),
            sma50: super::sma(closes, 50),
            sma100: super::sma(closes, 100),
            trend10: trend(closes, 10),
            trend20: trend(closes, 20),
            trend50: trend(closes, 50),
            trend100: trend(closes, 100),
            volatility: volatility(closes, VOLATILITY_WINDOW),
            growth_rate_1y_pct: growth_rate(closes, TRADING_DAYS_PER_YEAR),
            trend_slope_100d_pct: trend_slope(closes, TREND_SLOPE_WINDOW),
            rally_90d: rally_magnitude(closes, RALLY_WINDOW),
            distance_from_high_20d_pct: distance_from_high(closes, HIGH_WINDOW),
            resilience_count: resilience_count(closes, RESILIENCE_WINDOW),
            return_to_highs_frequency: return_to_highs_frequency(
                closes,
                RETURN_TO_HIGHS_WINDOW,
                RETURN_TO_HIGHS_LOOKBACK,
                RETURN_TO_HIGHS_BAND,
            ),
        })
    }

    /// RSI 값
    pub fn rsi_value(&self) -> Option<f64> {
        self.rsi.map(|r| r.value)
    }

    /// MACD 방향
    pub fn macd_bias(&self) -> Option<MacdBias> {
        self.macd.map(|m| m.bias)
    }

    /// 기간별 SMA (10, 20, 50, 100만 지원)
    pub fn sma(&self, period: usize) -> Option<f64> {
        match period {
            10 => self.sma10,
            20 => self.sma20,
            50 => self.sma50,
            100 => self.sma100,
            _ => None,
        }
    }

    /// 기간별 추세 방향 (10, 20, 50, 100만 지원)
    pub fn trend_bias(&self, period: usize) -> Option<TrendBias> {
        let summary = match period {
            10 => self.trend10,
            20 => self.trend20,
            50 => self.trend50,
            100 => self.trend100,
            _ => None,
        };
        summary.map(|t| t.bias)
    }

    /// 현재가의 SMA 대비 괴리율 (%)
    pub fn distance_from_sma_pct(&self, period: usize) -> Option<f64> {
        let sma = self.sma(period)?;
        if sma <= 0.0 {
            return None;
        }
        Some((self.price - sma) / sma * 100.0)
    }
}

fn validate_closes(closes: &[f64]) -> Result<(), DataError> {
    if closes.is_empty() {
        return Err(DataError::Empty);
    }
    match closes
        .iter()
        .enumerate()
        .find(|(_, c)| !c.is_finite() || **c <= 0.0)
    {
        Some((index, &value)) => Err(DataError::InvalidClose { index, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{MacdBias, VolatilityTier};

    #[test]
    fn test_constant_series_properties() {
        let set = IndicatorSet::compute(&vec![25.0; 300]).unwrap();

        assert!(set.macd.unwrap().histogram.abs() < 1e-12);
        assert_eq!(set.macd_bias(), Some(MacdBias::Neutral));
        assert_eq!(set.rsi_value(), Some(50.0));
        assert_eq!(set.volatility.unwrap().sigma_pct, 0.0);
        assert_eq!(set.volatility.unwrap().tier, VolatilityTier::Calm);
        for period in [10, 20, 50, 100] {
            assert_eq!(set.trend_bias(period), Some(TrendBias::Sideways));
        }
        assert_eq!(set.distance_from_high_20d_pct, Some(0.0));
        assert_eq!(set.resilience_count, 0);
    }

    #[test]
    fn test_short_history_is_undefined_not_error() {
        let set = IndicatorSet::compute(&[10.0, 10.5, 11.0]).unwrap();

        assert_eq!(set.price, 11.0);
        assert!(set.macd.is_none());
        assert!(set.rsi.is_none());
        assert!(set.sma10.is_none());
        assert!(set.trend100.is_none());
        assert!(set.volatility.is_none());
        assert!(set.growth_rate_1y_pct.is_none());
        assert!(set.rally_90d.is_none());
        assert!(set.distance_from_high_20d_pct.is_none());
        assert!(set.return_to_highs_frequency.is_none());
    }

    #[test]
    fn test_malformed_input_is_data_error() {
        assert_eq!(IndicatorSet::compute(&[]), Err(DataError::Empty));
        assert!(matches!(
            IndicatorSet::compute(&[10.0, f64::NAN, 11.0]),
            Err(DataError::InvalidClose { index: 1, .. })
        ));
        assert!(matches!(
            IndicatorSet::compute(&[10.0, 0.0]),
            Err(DataError::InvalidClose { index: 1, .. })
        ));
        assert!(IndicatorSet::compute(&[-1.0]).is_err());
    }

    #[test]
    fn test_rising_series_rsi_trends_to_hundred() {
        let closes: Vec<f64> = (0..260).map(|i| 50.0 * 1.005_f64.powi(i)).collect();
        let set = IndicatorSet::compute(&closes).unwrap();

        assert_eq!(set.rsi_value(), Some(100.0));
        assert!(set.macd.unwrap().histogram > 0.0);
        assert!(set.growth_rate_1y_pct.unwrap() > 0.0);
        assert!(set.trend_slope_100d_pct.unwrap() > 0.0);
        assert_eq!(set.trend_bias(10), Some(TrendBias::Up));
    }

    #[test]
    fn test_distance_from_sma() {
        let mut closes = vec![100.0; 60];
        closes.push(90.0);
        let set = IndicatorSet::compute(&closes).unwrap();
        let expected_sma50 = (49.0 * 100.0 + 90.0) / 50.0;
        let expected = (90.0 - expected_sma50) / expected_sma50 * 100.0;
        assert!((set.distance_from_sma_pct(50).unwrap() - expected).abs() < 1e-9);
        assert!(set.distance_from_sma_pct(100).is_none());
    }
}
