//! 패턴 감지 (Pattern Detector).
//!
//! 지표 묶음과 종가 시퀀스로부터 네 가지 불리언 패턴을 판정합니다.
//! 필요한 지표가 미정의이면 해당 패턴은 에러 없이 `false`입니다.
//!
//! | 패턴 | 조건 |
//! |------|------|
//! | Recovery | 가격 < SMA50, 가격 > SMA10, 10일 추세 UP, 50일 구조 UP |
//! | Post-Shock Recovery | 20일 고점 대비 −10% 미만, 60일 내 SMA100 상회 이력, (RSI > 20 또는 5일 신저가 아님) |
//! | Cheap-on-Winner | 가격 < SMA20, 가격 > SMA100, 100일 추세 UP, RSI < 50 |
//! | Proven-Winner Capitulation | 아래 5개 기준 모두 충족 |
//!
//! # Capitulation 기준
//!
//! 1. RSI < 20
//! 2. 20일 고점 대비 −30% 이하
//! 3. 90일 랠리 상승폭 ≥ 40%
//! 4. 현재가 ≤ 랠리 저점 × 1.10
//! 5. 랠리 고점 시점에 종가가 당시 SMA100 위

use serde::{Deserialize, Serialize};

use crate::indicators::{
    above_sma_at, is_new_low, rally_magnitude, sma, was_above_sma_within, IndicatorSet,
    TrendBias, RALLY_WINDOW,
};

/// 감지된 패턴 플래그.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFlags {
    pub recovery: bool,
    pub post_shock_recovery: bool,
    pub cheap_on_winner: bool,
    pub proven_winner_capitulation: bool,
}

/// 패턴 임계값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Post-Shock: 20일 고점 대비 하락률 상한 (%)
    pub post_shock_drawdown_pct: f64,
    /// Post-Shock: SMA100 상회 이력 탐색 구간
    pub post_shock_lookback: usize,
    /// Post-Shock: RSI 하한
    pub post_shock_rsi_floor: f64,
    /// Post-Shock: 신저가 판정 기간
    pub new_low_days: usize,
    /// Cheap-on-Winner: RSI 상한
    pub cheap_rsi_ceiling: f64,
    /// Capitulation: RSI 상한 (미만)
    pub capitulation_rsi: f64,
    /// Capitulation: 20일 고점 대비 하락률 (이하, %)
    pub capitulation_drawdown_pct: f64,
    /// Capitulation: 최소 랠리 상승폭 (%)
    pub capitulation_min_rally_pct: f64,
    /// Capitulation: 랠리 저점 대비 복귀 비율
    pub round_trip_ratio: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            post_shock_drawdown_pct: -10.0,
            post_shock_lookback: 60,
            post_shock_rsi_floor: 20.0,
            new_low_days: 5,
            cheap_rsi_ceiling: 50.0,
            capitulation_rsi: 20.0,
            capitulation_drawdown_pct: -30.0,
            capitulation_min_rally_pct: 40.0,
            round_trip_ratio: 1.10,
        }
    }
}

/// 개별 판정 기준의 결과 (진단용).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl Criterion {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed,
            detail: detail.into(),
        }
    }
}

/// 패턴 감지기.
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    config: PatternConfig,
}

impl PatternDetector {
    /// 새로운 PatternDetector 생성.
    pub fn new(config: PatternConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// 네 가지 패턴을 모두 판정합니다.
    ///
    /// `closes`는 `set`을 계산한 것과 같은 종가 시퀀스여야 합니다.
    pub fn detect(&self, set: &IndicatorSet, closes: &[f64]) -> PatternFlags {
        PatternFlags {
            recovery: recovery(set),
            post_shock_recovery: self.post_shock_recovery(set, closes),
            cheap_on_winner: self.cheap_on_winner(set),
            proven_winner_capitulation: self.capitulation(set, closes),
        }
    }

    /// Post-Shock Recovery 판정.
    pub fn post_shock_recovery(&self, set: &IndicatorSet, closes: &[f64]) -> bool {
        self.post_shock_criteria(set, closes).iter().all(|c| c.passed)
    }

    /// Cheap-on-Winner 판정.
    pub fn cheap_on_winner(&self, set: &IndicatorSet) -> bool {
        let (Some(sma20), Some(sma100), Some(rsi)) = (set.sma20, set.sma100, set.rsi_value())
        else {
            return false;
        };
        set.price < sma20
            && set.price > sma100
            && set.trend_bias(100) == Some(TrendBias::Up)
            && rsi < self.config.cheap_rsi_ceiling
    }

    /// Proven-Winner Capitulation 판정.
    pub fn capitulation(&self, set: &IndicatorSet, closes: &[f64]) -> bool {
        self.capitulation_criteria(set, closes)
            .iter()
            .all(|c| c.passed)
    }

    /// Post-Shock Recovery의 세부 기준.
    pub fn post_shock_criteria(&self, set: &IndicatorSet, closes: &[f64]) -> Vec<Criterion> {
        let cfg = &self.config;

        let drawdown = match set.distance_from_high_20d_pct {
            Some(d) => Criterion::new(
                "drawdown",
                d < cfg.post_shock_drawdown_pct,
                format!("{:.2}% vs < {:.0}%", d, cfg.post_shock_drawdown_pct),
            ),
            None => Criterion::new("drawdown", false, "20일 고점 미정의"),
        };

        let was_above = was_above_sma_within(closes, cfg.post_shock_lookback, 100);
        let prior_strength = Criterion::new(
            "prior_strength",
            was_above,
            format!(
                "최근 {}일 내 SMA100 상회 {}",
                cfg.post_shock_lookback,
                if was_above { "있음" } else { "없음" }
            ),
        );

        let rsi_ok = set
            .rsi_value()
            .is_some_and(|rsi| rsi > cfg.post_shock_rsi_floor);
        let stabilizing = is_new_low(closes, cfg.new_low_days) == Some(false);
        let early_signal = Criterion::new(
            "early_signal",
            rsi_ok || stabilizing,
            format!(
                "RSI {} (> {:.0} 필요), {}일 신저가 {}",
                fmt_opt(set.rsi_value(), 1),
                cfg.post_shock_rsi_floor,
                cfg.new_low_days,
                if stabilizing { "아님" } else { "또는 미정의" }
            ),
        );

        vec![drawdown, prior_strength, early_signal]
    }

    /// Proven-Winner Capitulation의 5개 세부 기준.
    pub fn capitulation_criteria(&self, set: &IndicatorSet, closes: &[f64]) -> Vec<Criterion> {
        let cfg = &self.config;
        let rally = set
            .rally_90d
            .or_else(|| rally_magnitude(closes, RALLY_WINDOW));

        let rsi = match set.rsi_value() {
            Some(v) => Criterion::new(
                "rsi",
                v < cfg.capitulation_rsi,
                format!("{:.1} vs < {:.0}", v, cfg.capitulation_rsi),
            ),
            None => Criterion::new("rsi", false, "RSI 미정의"),
        };

        let drawdown = match set.distance_from_high_20d_pct {
            Some(d) => Criterion::new(
                "drawdown",
                d <= cfg.capitulation_drawdown_pct,
                format!("{:.2}% vs <= {:.0}%", d, cfg.capitulation_drawdown_pct),
            ),
            None => Criterion::new("drawdown", false, "20일 고점 미정의"),
        };

        let (rally_size, round_trip, prior_trend) = match rally {
            Some(r) => {
                let ceiling = r.trough * cfg.round_trip_ratio;
                let above = above_sma_at(closes, r.peak_index, 100);
                (
                    Criterion::new(
                        "rally",
                        r.gain_pct >= cfg.capitulation_min_rally_pct,
                        format!(
                            "{:.2} → {:.2} (+{:.1}%) vs >= {:.0}%",
                            r.trough, r.peak, r.gain_pct, cfg.capitulation_min_rally_pct
                        ),
                    ),
                    Criterion::new(
                        "round_trip",
                        set.price <= ceiling,
                        format!("{:.2} vs <= {:.2}", set.price, ceiling),
                    ),
                    Criterion::new(
                        "prior_trend",
                        above == Some(true),
                        match above {
                            Some(true) => "랠리 고점이 SMA100 위".to_string(),
                            Some(false) => "랠리 고점이 SMA100 아래".to_string(),
                            None => "랠리 고점 시점 SMA100 미정의".to_string(),
                        },
                    ),
                )
            }
            None => (
                Criterion::new("rally", false, "90일 랠리 미정의"),
                Criterion::new("round_trip", false, "90일 랠리 미정의"),
                Criterion::new("prior_trend", false, "90일 랠리 미정의"),
            ),
        };

        vec![rsi, drawdown, rally_size, round_trip, prior_trend]
    }
}

/// Recovery 판정.
///
/// 50일 구조는 가격이 아니라 SMA50이 SMA100 대비 +2% 밴드 위에 있는지로 판정합니다.
pub fn recovery(set: &IndicatorSet) -> bool {
    let (Some(sma10), Some(sma50), Some(sma100)) = (set.sma10, set.sma50, set.sma100) else {
        return false;
    };
    recovery_conditions(set.price, sma10, sma50, sma100)
}

/// 종가 시퀀스만으로 Recovery를 판정합니다 (회복력 카운트 재평가용).
pub fn recovery_from_closes(closes: &[f64]) -> bool {
    let Some(&price) = closes.last() else {
        return false;
    };
    let (Some(sma10), Some(sma50), Some(sma100)) =
        (sma(closes, 10), sma(closes, 50), sma(closes, 100))
    else {
        return false;
    };
    recovery_conditions(price, sma10, sma50, sma100)
}

fn recovery_conditions(price: f64, sma10: f64, sma50: f64, sma100: f64) -> bool {
    price < sma50
        && price > sma10
        && TrendBias::classify(price, sma10) == TrendBias::Up
        && TrendBias::classify(sma50, sma100) == TrendBias::Up
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{RallyWindow, RsiBias, RsiResult, TrendSummary};

    /// 모든 필드가 미정의인 지표 묶음.
    fn empty_set(price: f64) -> IndicatorSet {
        IndicatorSet::compute(&[price]).unwrap()
    }

    fn trend_summary(period: usize, price: f64, sma: f64) -> TrendSummary {
        TrendSummary {
            period,
            sma,
            delta_pct: (price - sma) / sma * 100.0,
            bias: TrendBias::classify(price, sma),
        }
    }

    /// 랠리(40 → 80) 이후 42까지 폭락한 종가 시퀀스.
    ///
    /// 0..100: 40 근처 횡보, 100..150: 40 → 80 상승, 150..165: 80 → 42 급락.
    fn capitulation_closes() -> Vec<f64> {
        let mut closes = vec![40.0; 100];
        closes.extend((1..=50).map(|i| 40.0 + 0.8 * i as f64));
        closes.extend((1..=15).map(|i| 80.0 - 38.0 * i as f64 / 15.0));
        closes
    }

    fn set_with_rsi(closes: &[f64], rsi: f64) -> IndicatorSet {
        let mut set = IndicatorSet::compute(closes).unwrap();
        set.rsi = Some(RsiResult {
            value: rsi,
            bias: RsiBias::from_value(rsi),
        });
        set
    }

    #[test]
    fn test_undefined_indicators_never_trigger() {
        let detector = PatternDetector::default();
        let set = empty_set(10.0);
        let flags = detector.detect(&set, &[10.0]);
        assert_eq!(flags, PatternFlags::default());
    }

    #[test]
    fn test_capitulation_rsi_boundary() {
        let closes = capitulation_closes();
        let detector = PatternDetector::default();

        let at_boundary = set_with_rsi(&closes, 20.0);
        let criteria = detector.capitulation_criteria(&at_boundary, &closes);
        assert!(criteria[1..].iter().all(|c| c.passed), "{criteria:?}");
        assert!(!detector.capitulation(&at_boundary, &closes));

        let below = set_with_rsi(&closes, 19.999);
        assert!(detector.capitulation(&below, &closes));
        assert!(detector.detect(&below, &closes).proven_winner_capitulation);
    }

    #[test]
    fn test_capitulation_fails_when_single_criterion_fails() {
        let closes = capitulation_closes();
        let detector = PatternDetector::default();

        // 4번 기준: 랠리 저점 40 × 1.10 = 44 초과
        let mut lifted = set_with_rsi(&closes, 12.0);
        lifted.price = 45.0;
        assert!(!detector.capitulation(&lifted, &closes));

        // 3번 기준: 랠리 상승폭 부족
        let mut small_rally = set_with_rsi(&closes, 12.0);
        small_rally.rally_90d = Some(RallyWindow {
            trough: 40.0,
            trough_index: 100,
            peak: 52.0,
            peak_index: 149,
            gain_pct: 30.0,
        });
        assert!(!detector.capitulation(&small_rally, &closes));

        // 2번 기준: 하락폭 부족
        let mut shallow = set_with_rsi(&closes, 12.0);
        shallow.distance_from_high_20d_pct = Some(-29.9);
        assert!(!detector.capitulation(&shallow, &closes));
    }

    #[test]
    fn test_capitulation_requires_prior_trend_above_sma100() {
        // 랠리 고점 시점에 SMA100 계산 이력이 없으면 실패
        let mut closes = vec![40.0; 30];
        closes.extend((1..=50).map(|i| 40.0 + 0.8 * i as f64));
        closes.extend((1..=15).map(|i| 80.0 - 38.0 * i as f64 / 15.0));
        let set = set_with_rsi(&closes, 12.0);

        let detector = PatternDetector::default();
        let criteria = detector.capitulation_criteria(&set, &closes);
        assert!(!criteria[4].passed);
        assert!(!detector.capitulation(&set, &closes));
    }

    #[test]
    fn test_round_trip_ratio_is_configurable() {
        let closes = capitulation_closes();
        let mut set = set_with_rsi(&closes, 12.0);
        set.price = 45.0;

        let strict = PatternDetector::default();
        assert!(!strict.capitulation(&set, &closes));

        let loose = PatternDetector::new(PatternConfig {
            round_trip_ratio: 1.20,
            ..PatternConfig::default()
        });
        assert!(loose.capitulation(&set, &closes));
    }

    #[test]
    fn test_recovery_pullback_in_uptrend() {
        // SMA100 < SMA50, 가격은 SMA50 아래이면서 SMA10 대비 +2% 초과
        let mut set = empty_set(96.0);
        set.sma10 = Some(93.0);
        set.sma50 = Some(100.0);
        set.sma100 = Some(90.0);
        assert!(recovery(&set));

        set.sma100 = Some(99.0);
        assert!(!recovery(&set));

        set.sma100 = Some(90.0);
        set.price = 101.0;
        assert!(!recovery(&set));
    }

    #[test]
    fn test_recovery_from_closes_matches_indicator_set() {
        let mut closes: Vec<f64> = (0..150).map(|i| 50.0 + i as f64 * 0.5).collect();
        closes.extend((1..=12).map(|i| 124.5 - i as f64 * 1.5));
        closes.extend([108.0, 110.0, 112.0]);

        let set = IndicatorSet::compute(&closes).unwrap();
        assert_eq!(recovery(&set), recovery_from_closes(&closes));
    }

    #[test]
    fn test_cheap_on_winner() {
        let detector = PatternDetector::default();
        let mut set = empty_set(105.0);
        set.sma20 = Some(110.0);
        set.sma100 = Some(100.0);
        set.trend100 = Some(trend_summary(100, 105.0, 100.0));
        set.rsi = Some(RsiResult {
            value: 42.0,
            bias: RsiBias::Weak,
        });
        assert!(detector.cheap_on_winner(&set));

        set.rsi = Some(RsiResult {
            value: 50.0,
            bias: RsiBias::Neutral,
        });
        assert!(!detector.cheap_on_winner(&set));
    }

    #[test]
    fn test_post_shock_recovery() {
        // 100 근처에서 상승 후 고점 대비 약 15% 하락
        let mut closes: Vec<f64> = (0..150).map(|i| 80.0 + i as f64 * 0.2).collect();
        closes.extend((1..=10).map(|i| 110.0 - i as f64 * 1.8));
        let set = IndicatorSet::compute(&closes).unwrap();
        let detector = PatternDetector::default();

        let criteria = detector.post_shock_criteria(&set, &closes);
        assert!(criteria[0].passed, "{criteria:?}");
        assert!(criteria[1].passed, "{criteria:?}");

        let flat = vec![100.0; 200];
        let flat_set = IndicatorSet::compute(&flat).unwrap();
        assert!(!detector.post_shock_recovery(&flat_set, &flat));
    }

    /// 80 → 109.8 상승 150바 후 10바 연속 하락해 92에서 5일 신저가.
    fn post_shock_closes() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..150).map(|i| 80.0 + i as f64 * 0.2).collect();
        closes.extend((1..=10).map(|i| 110.0 - i as f64 * 1.8));
        closes
    }

    #[test]
    fn test_post_shock_passes_on_rsi_above_floor() {
        let closes = post_shock_closes();
        let detector = PatternDetector::default();
        assert_eq!(is_new_low(&closes, 5), Some(true));

        let set = set_with_rsi(&closes, 35.0);
        let criteria = detector.post_shock_criteria(&set, &closes);
        assert!(criteria.iter().all(|c| c.passed), "{criteria:?}");
        assert!(detector.post_shock_recovery(&set, &closes));
        assert!(detector.detect(&set, &closes).post_shock_recovery);
    }

    #[test]
    fn test_post_shock_early_signal_fails_on_low_rsi_at_new_low() {
        let closes = post_shock_closes();
        let detector = PatternDetector::default();

        for rsi in [15.0, 20.0] {
            let set = set_with_rsi(&closes, rsi);
            let criteria = detector.post_shock_criteria(&set, &closes);
            assert!(criteria[0].passed && criteria[1].passed, "{criteria:?}");
            assert!(!criteria[2].passed, "rsi {rsi}");
            assert!(!detector.post_shock_recovery(&set, &closes));
        }
    }

    #[test]
    fn test_post_shock_passes_on_low_rsi_without_new_low() {
        let mut closes = post_shock_closes();
        // 92 → 93 반등, 직전 4일 최저가 92보다 높음
        closes.push(93.0);
        assert_eq!(is_new_low(&closes, 5), Some(false));
        let detector = PatternDetector::default();

        let set = set_with_rsi(&closes, 15.0);
        let criteria = detector.post_shock_criteria(&set, &closes);
        assert!(criteria.iter().all(|c| c.passed), "{criteria:?}");
        assert!(detector.post_shock_recovery(&set, &closes));

        // RSI 미정의여도 신저가가 아니면 통과
        let mut no_rsi = set.clone();
        no_rsi.rsi = None;
        assert!(detector.post_shock_recovery(&no_rsi, &closes));
    }

    #[test]
    fn test_post_shock_drawdown_is_strict() {
        let closes = post_shock_closes();
        let detector = PatternDetector::default();

        let mut set = set_with_rsi(&closes, 35.0);
        set.distance_from_high_20d_pct = Some(-10.0);
        assert!(!detector.post_shock_criteria(&set, &closes)[0].passed);
        assert!(!detector.post_shock_recovery(&set, &closes));

        set.distance_from_high_20d_pct = Some(-10.01);
        assert!(detector.post_shock_recovery(&set, &closes));

        set.distance_from_high_20d_pct = None;
        assert!(!detector.post_shock_recovery(&set, &closes));
    }

    #[test]
    fn test_post_shock_requires_recent_strength() {
        // 계속 하락해 최근 60일 동안 SMA100 위에 선 적이 없음
        let closes: Vec<f64> = (0..200).map(|i| 200.0 - i as f64 * 0.5).collect();
        let detector = PatternDetector::default();

        let mut set = set_with_rsi(&closes, 35.0);
        set.distance_from_high_20d_pct = Some(-15.0);
        let criteria = detector.post_shock_criteria(&set, &closes);
        assert!(criteria[0].passed && criteria[2].passed, "{criteria:?}");
        assert!(!criteria[1].passed);
        assert!(!detector.post_shock_recovery(&set, &closes));
    }

    #[test]
    fn test_capitulation_round_trip_threshold_is_inclusive() {
        let closes = capitulation_closes();
        let detector = PatternDetector::default();

        // 랠리 저점 40 × 1.10 = 44
        let mut at_ceiling = set_with_rsi(&closes, 12.0);
        at_ceiling.price = 44.0;
        let criteria = detector.capitulation_criteria(&at_ceiling, &closes);
        assert_eq!(criteria[3].name, "round_trip");
        assert!(criteria[3].passed, "{criteria:?}");
        assert!(detector.capitulation(&at_ceiling, &closes));

        let mut above = at_ceiling.clone();
        above.price = 44.01;
        let criteria = detector.capitulation_criteria(&above, &closes);
        assert!(!criteria[3].passed);
        assert!(criteria.iter().enumerate().all(|(i, c)| i == 3 || c.passed));
        assert!(!detector.capitulation(&above, &closes));
    }
}
