//! 구조적 지표 (Structural Indicators).
//!
//! 가격 경로의 모양을 요약하는 지표들입니다.
//!
//! 1. **rally_magnitude**: 최근 구간의 "저점 → 고점" 상승폭
//! 2. **distance_from_high**: 최근 고점 대비 하락률
//! 3. **return_to_highs_frequency**: 고점 부근 복귀 빈도
//! 4. **resilience_count**: 과거 Recovery 패턴 발생 횟수
//! 5. 과거 시점 SMA 비교 / 신저가 판정 보조 함수

use serde::{Deserialize, Serialize};

use super::trend::sma;
use crate::patterns;

/// 랠리 구간 (저점 → 고점).
///
/// 인덱스는 입력 종가 시퀀스 기준의 절대 위치입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RallyWindow {
    /// 고점 이전(포함) 최저 종가
    pub trough: f64,
    /// 저점 인덱스
    pub trough_index: usize,
    /// 구간 최고 종가
    pub peak: f64,
    /// 고점 인덱스
    pub peak_index: usize,
    /// (고점 − 저점) / 저점 (%)
    pub gain_pct: f64,
}

/// 랠리 크기 계산.
///
/// 최근 `window`개 종가에서 최고 종가(동률이면 가장 이른 인덱스)를 고점으로,
/// 고점 이전(포함) 구간의 최저 종가(동률이면 가장 이른 인덱스)를 저점으로 잡습니다.
/// 이력이 `window`보다 짧거나 저점이 0 이하이면 `None`.
pub fn rally_magnitude(closes: &[f64], window: usize) -> Option<RallyWindow> {
    if window == 0 || closes.len() < window {
        return None;
    }
    let start = closes.len() - window;
    let slice = &closes[start..];

    let mut peak_offset = 0;
    for (i, &close) in slice.iter().enumerate() {
        if close > slice[peak_offset] {
            peak_offset = i;
        }
    }

    let mut trough_offset = 0;
    for (i, &close) in slice[..=peak_offset].iter().enumerate() {
        if close < slice[trough_offset] {
            trough_offset = i;
        }
    }

    let peak = slice[peak_offset];
    let trough = slice[trough_offset];
    if trough <= 0.0 {
        return None;
    }

    Some(RallyWindow {
        trough,
        trough_index: start + trough_offset,
        peak,
        peak_index: start + peak_offset,
        gain_pct: (peak - trough) / trough * 100.0,
    })
}

/// 최근 고점 대비 거리 (%).
///
/// (현재가 − 최근 `window`개 종가의 최고가) / 최고가 × 100. 항상 0 이하입니다.
pub fn distance_from_high(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window {
        return None;
    }
    let high = closes[closes.len() - window..]
        .iter()
        .copied()
        .fold(f64::MIN, f64::max);
    let price = *closes.last()?;
    if high <= 0.0 {
        return None;
    }
    Some((price - high) / high * 100.0)
}

/// 고점 복귀 빈도 (0.0 ~ 1.0).
///
/// 최근 `window`개 바 중 종가가 직전 `high_lookback`개(자신 포함) 롤링 고점의
/// `band` 이내에 있었던 바의 비율.
pub fn return_to_highs_frequency(
    closes: &[f64],
    window: usize,
    high_lookback: usize,
    band: f64,
) -> Option<f64> {
    if window == 0 || high_lookback == 0 || closes.len() < window + high_lookback - 1 {
        return None;
    }

    let start = closes.len() - window;
    let near_high = (start..closes.len())
        .filter(|&i| {
            let rolling_high = closes[i + 1 - high_lookback..=i]
                .iter()
                .copied()
                .fold(f64::MIN, f64::max);
            closes[i] >= rolling_high * (1.0 - band)
        })
        .count();

    Some(near_high as f64 / window as f64)
}

/// 회복력 카운트.
///
/// 최근 `window`개 바 각각에서 Recovery 패턴을 다시 평가하고,
/// 연속으로 발생한 구간은 한 번으로 셉니다. 이력이 짧으면 가능한 구간만 봅니다.
pub fn resilience_count(closes: &[f64], window: usize) -> usize {
    let start = closes.len().saturating_sub(window);
    let mut count = 0;
    let mut in_occurrence = false;

    for end in start..closes.len() {
        let detected = patterns::recovery_from_closes(&closes[..=end]);
        if detected && !in_occurrence {
            count += 1;
        }
        in_occurrence = detected;
    }

    count
}

/// 특정 시점의 종가가 그 시점의 SMA보다 높았는지 여부.
///
/// 해당 시점에 SMA를 계산할 이력이 없으면 `None`.
pub fn above_sma_at(closes: &[f64], index: usize, period: usize) -> Option<bool> {
    let history = closes.get(..=index)?;
    let sma_value = sma(history, period)?;
    Some(history[index] > sma_value)
}

/// 최근 `lookback`개 바 중 한 번이라도 종가가 당시 SMA 위에 있었는지 여부.
pub fn was_above_sma_within(closes: &[f64], lookback: usize, period: usize) -> bool {
    let start = closes.len().saturating_sub(lookback);
    (start..closes.len()).any(|i| above_sma_at(closes, i, period) == Some(true))
}

/// 현재 종가가 최근 `days`일 신저가인지 여부.
///
/// 직전 `days − 1`개 종가의 최저가보다 낮으면 신저가입니다.
pub fn is_new_low(closes: &[f64], days: usize) -> Option<bool> {
    if days < 2 || closes.len() < days {
        return None;
    }
    let price = *closes.last()?;
    let prior_low = closes[closes.len() - days..closes.len() - 1]
        .iter()
        .copied()
        .fold(f64::MAX, f64::min);
    Some(price < prior_low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rally_trough_before_peak() {
        // 저점 8 이후 고점 20, 그 뒤의 5는 고점 이후라 저점이 아님
        let closes = vec![10.0, 8.0, 12.0, 20.0, 15.0, 5.0];
        let rally = rally_magnitude(&closes, 6).unwrap();

        assert_eq!(rally.peak, 20.0);
        assert_eq!(rally.peak_index, 3);
        assert_eq!(rally.trough, 8.0);
        assert_eq!(rally.trough_index, 1);
        assert!((rally.gain_pct - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_rally_ties_take_earliest_index() {
        let closes = vec![5.0, 9.0, 4.0, 4.0, 9.0, 9.0];
        let rally = rally_magnitude(&closes, 6).unwrap();

        assert_eq!(rally.peak_index, 1);
        assert_eq!(rally.trough_index, 0);

        let closes = vec![9.0, 4.0, 4.0, 12.0];
        let rally = rally_magnitude(&closes, 4).unwrap();
        assert_eq!(rally.trough_index, 1);
    }

    #[test]
    fn test_rally_window_offsets() {
        let mut closes = vec![1.0; 10];
        closes.extend([3.0, 2.0, 6.0]);
        let rally = rally_magnitude(&closes, 3).unwrap();

        assert_eq!(rally.trough_index, 11);
        assert_eq!(rally.peak_index, 12);
        assert!(rally_magnitude(&closes, 14).is_none());
    }

    #[test]
    fn test_distance_from_high_non_positive() {
        let closes = vec![100.0, 120.0, 90.0];
        let distance = distance_from_high(&closes, 3).unwrap();
        assert!((distance + 25.0).abs() < 1e-9);

        let at_high = vec![1.0, 2.0, 3.0];
        assert_eq!(distance_from_high(&at_high, 3), Some(0.0));
        assert!(distance_from_high(&at_high, 4).is_none());
    }

    #[test]
    fn test_return_to_highs_frequency() {
        let rising: Vec<f64> = (1..=200).map(|i| i as f64).collect();
        assert_eq!(return_to_highs_frequency(&rising, 126, 60, 0.05), Some(1.0));

        let falling: Vec<f64> = rising.iter().rev().copied().collect();
        let freq = return_to_highs_frequency(&falling, 126, 60, 0.05).unwrap();
        assert!(freq < 0.1);

        assert!(return_to_highs_frequency(&rising[..100], 126, 60, 0.05).is_none());
    }

    #[test]
    fn test_new_low() {
        assert_eq!(is_new_low(&[10.0, 9.0, 9.5, 9.2, 8.0], 5), Some(true));
        assert_eq!(is_new_low(&[10.0, 9.0, 9.5, 9.2, 9.0], 5), Some(false));
        assert_eq!(is_new_low(&[10.0, 9.0], 5), None);
    }

    #[test]
    fn test_above_sma_at() {
        let closes = vec![1.0, 1.0, 1.0, 5.0, 1.0];
        assert_eq!(above_sma_at(&closes, 3, 3), Some(true));
        assert_eq!(above_sma_at(&closes, 4, 3), Some(false));
        assert_eq!(above_sma_at(&closes, 1, 3), None);
        assert!(was_above_sma_within(&closes, 2, 3));
        assert!(!was_above_sma_within(&closes, 1, 3));
    }

    #[test]
    fn test_resilience_count_flat_series_is_zero() {
        assert_eq!(resilience_count(&vec![10.0; 300], 126), 0);
    }

    /// 50 → 199 상승 150바.
    fn uptrend() -> Vec<f64> {
        (0..150).map(|i| 50.0 + i as f64).collect()
    }

    /// 120으로 급락해 10바 횡보한 뒤 130으로 반등 (3바).
    fn dip_and_bounce(closes: &mut Vec<f64>) {
        closes.extend([120.0; 10]);
        closes.extend([130.0; 3]);
    }

    fn recovery_bars(closes: &[f64]) -> Vec<usize> {
        (0..closes.len())
            .filter(|&end| patterns::recovery_from_closes(&closes[..=end]))
            .collect()
    }

    #[test]
    fn test_resilience_counts_contiguous_episode_once() {
        let mut closes = uptrend();
        dip_and_bounce(&mut closes);
        closes.extend([120.0; 10]);

        assert_eq!(recovery_bars(&closes), vec![160, 161, 162]);
        assert_eq!(resilience_count(&closes, 126), 1);
    }

    #[test]
    fn test_resilience_counts_separated_episodes() {
        let mut closes = uptrend();
        dip_and_bounce(&mut closes);
        closes.extend([120.0; 10]);
        closes.extend([130.0; 3]);
        closes.extend([120.0; 10]);

        assert_eq!(recovery_bars(&closes), vec![160, 161, 162, 173]);
        assert_eq!(resilience_count(&closes, 126), 2);
    }

    #[test]
    fn test_resilience_ignores_episodes_outside_window() {
        let mut closes = uptrend();
        dip_and_bounce(&mut closes);
        closes.extend([120.0; 140]);

        // 에피소드는 160 ~ 162바, 최근 126바는 177바부터
        assert_eq!(closes.len(), 303);
        assert_eq!(resilience_count(&closes, 126), 0);
        assert_eq!(resilience_count(&closes, closes.len()), 1);
    }
}
