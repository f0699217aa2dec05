//! 점수 백테스트.
//!
//! 과거 기준일마다 표시 점수를 다시 계산하고, 이후 실현된 선행 수익률과
//! 비교하여 등급별 적중률을 측정합니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use iceberg_analytics::backtest::{BacktestConfig, Backtester};
//!
//! let config = BacktestConfig::default().with_interval_days(7);
//! let report = Backtester::new(Evaluator::default(), config).run(&history)?;
//! println!("{}", report.summary());
//! ```

use chrono::{Duration, NaiveDate};
use iceberg_core::{PriceHistory, ScoreType};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AnalysisError, AnalysisResult};
use crate::evaluator::Evaluator;
use crate::rating::RatingLabel;

/// 기본 테스트 기간 상한 (개월).
pub const MAX_MONTHS: u32 = 1200;

/// 평가 간격과 선행 수익률 기간의 상한 (달력일).
pub const MAX_SPAN_DAYS: i64 = 36_500;

/// 백테스트 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// 평가 간격 (달력일)
    pub interval_days: i64,
    /// 시작일 (None이면 종료일 − months × 30일)
    pub start: Option<NaiveDate>,
    /// 종료일 (None이면 마지막 거래일)
    pub end: Option<NaiveDate>,
    /// 기본 테스트 기간 (개월)
    pub months: u32,
    /// 선행 수익률 기간 (달력일)
    pub horizons_days: Vec<i64>,
    /// 평가에 필요한 최소 일봉 수
    pub min_bars: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            interval_days: 7,
            start: None,
            end: None,
            months: 6,
            horizons_days: vec![14, 30, 90],
            min_bars: 50,
        }
    }
}

impl BacktestConfig {
    pub fn with_interval_days(mut self, days: i64) -> Self {
        self.interval_days = days;
        self
    }

    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn with_months(mut self, months: u32) -> Self {
        self.months = months;
        self
    }

    pub fn with_horizons(mut self, horizons_days: Vec<i64>) -> Self {
        self.horizons_days = horizons_days;
        self
    }

    pub fn with_min_bars(mut self, min_bars: usize) -> Self {
        self.min_bars = min_bars;
        self
    }

    /// 설정 검증
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(1..=MAX_SPAN_DAYS).contains(&self.interval_days) {
            return Err(AnalysisError::Profile(format!(
                "평가 간격은 1 ~ {MAX_SPAN_DAYS}일이어야 합니다"
            )));
        }
        if self.months == 0 || self.months > MAX_MONTHS {
            return Err(AnalysisError::Profile(format!(
                "테스트 기간은 1 ~ {MAX_MONTHS}개월이어야 합니다"
            )));
        }
        if self.horizons_days.is_empty()
            || self
                .horizons_days
                .iter()
                .any(|h| !(1..=MAX_SPAN_DAYS).contains(h))
        {
            return Err(AnalysisError::Profile(format!(
                "선행 수익률 기간은 1 ~ {MAX_SPAN_DAYS}일이어야 합니다"
            )));
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(AnalysisError::Profile(format!(
                    "시작일 {start}이 종료일 {end}보다 늦습니다"
                )));
            }
        }
        Ok(())
    }
}

/// 한 기준일의 백테스트 데이터 포인트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestPoint {
    /// 평가 기준일
    pub date: NaiveDate,
    /// 실제 평가에 사용된 일봉 날짜 (기준일 당일 또는 직전 거래일)
    pub bar_date: NaiveDate,
    pub price: f64,
    pub trade_score: f64,
    pub trade_rating: RatingLabel,
    pub trade_turnaround: bool,
    pub investment_score: f64,
    pub investment_rating: RatingLabel,
    pub investment_turnaround: bool,
    /// 기간별 선행 수익률 (%), `horizons_days`와 같은 순서
    pub forward_returns: Vec<Option<f64>>,
}

impl BacktestPoint {
    pub fn rating(&self, score_type: ScoreType) -> RatingLabel {
        match score_type {
            ScoreType::Trade => self.trade_rating,
            ScoreType::Investment => self.investment_rating,
        }
    }

    pub fn score(&self, score_type: ScoreType) -> f64 {
        match score_type {
            ScoreType::Trade => self.trade_score,
            ScoreType::Investment => self.investment_score,
        }
    }
}

/// 한 기간의 수익률 통계.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonStats {
    pub days: i64,
    /// 수익률이 존재하는 표본 수
    pub samples: usize,
    /// 양수 수익률 비율 (0.0 ~ 1.0)
    pub positive_rate: f64,
    /// 평균 수익률 (%)
    pub avg_return_pct: f64,
}

/// 등급별 적중 통계.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyStats {
    pub rating: RatingLabel,
    pub count: usize,
    pub horizons: Vec<HorizonStats>,
}

impl AccuracyStats {
    pub fn horizon(&self, days: i64) -> Option<&HorizonStats> {
        self.horizons.iter().find(|h| h.days == days)
    }
}

/// 점수 유형별 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTypeSummary {
    pub score_type: ScoreType,
    /// 높은 등급부터 (표본이 있는 등급만)
    pub tiers: Vec<AccuracyStats>,
    /// 보정 기간 (Trade 30일, Investment 90일)
    pub calibration_horizon_days: i64,
    /// 높은 등급일수록 보정 기간 평균 수익률이 높거나 같은지 여부.
    ///
    /// 보정 기간이 `horizons_days`에 없거나 표본이 있는 등급이 둘 미만이면 `None`.
    pub calibration_monotonic: Option<bool>,
}

/// 백테스트 결과 리포트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval_days: i64,
    pub horizons_days: Vec<i64>,
    pub points: Vec<BacktestPoint>,
    pub trade: ScoreTypeSummary,
    pub investment: ScoreTypeSummary,
    /// 기간별 전체 평균 수익률 (%)
    pub overall_avg_return_pct: Vec<Option<f64>>,
    /// 가장 긴 기간 기준 최고 수익 시점
    pub best_call: Option<BacktestPoint>,
    /// 가장 긴 기간 기준 최저 수익 시점
    pub worst_call: Option<BacktestPoint>,
}

impl BacktestReport {
    pub fn summary_for(&self, score_type: ScoreType) -> &ScoreTypeSummary {
        match score_type {
            ScoreType::Trade => &self.trade,
            ScoreType::Investment => &self.investment,
        }
    }

    /// 요약 문자열 반환
    pub fn summary(&self) -> String {
        let rule = "=".repeat(70);
        let thin = "-".repeat(70);

        if self.points.is_empty() {
            return format!("\n{} Back-Test: No data available\n", self.ticker);
        }

        let mut out = format!(
            "{rule}\n{} Back-Test Report\n{rule}\n\
             Period: {} to {}\n\
             Test Points: {} ({}-day intervals)\n{rule}\n",
            self.ticker,
            self.start,
            self.end,
            self.points.len(),
            self.interval_days,
        );

        for summary in [&self.trade, &self.investment] {
            out.push_str(&format!(
                "\n{} Analysis\n{thin}\n{:<15} {:<8}",
                summary.score_type.display_name(),
                "Rating",
                "Count"
            ));
            for days in &self.horizons_days {
                out.push_str(&format!(" {:<20}", format!("{}-Day", days)));
            }
            out.push_str(&format!("\n{thin}\n"));

            for tier in &summary.tiers {
                out.push_str(&format!("{:<15} {:<8}", tier.rating.as_str(), tier.count));
                for h in &tier.horizons {
                    let cell = if h.samples == 0 {
                        "N/A".to_string()
                    } else {
                        format!(
                            "{:>5.1}% ({:+.1}%)",
                            h.positive_rate * 100.0,
                            h.avg_return_pct
                        )
                    };
                    out.push_str(&format!(" {:<20}", cell));
                }
                out.push('\n');
            }
            out.push_str(&format!(
                "Calibration ({}-day): {}\n",
                summary.calibration_horizon_days,
                match summary.calibration_monotonic {
                    Some(true) => "higher tiers outperform",
                    Some(false) => "NOT monotonic",
                    None => "not evaluated",
                }
            ));
        }

        out.push_str(&format!("\n{rule}\nSummary Statistics\n{thin}\n"));
        for (days, avg) in self.horizons_days.iter().zip(&self.overall_avg_return_pct) {
            match avg {
                Some(v) => out.push_str(&format!("Average {}-Day Return: {:+6.2}%\n", days, v)),
                None => out.push_str(&format!("Average {}-Day Return: N/A\n", days)),
            }
        }

        let longest = self.horizons_days.len().saturating_sub(1);
        for (title, call) in [("Best", &self.best_call), ("Worst", &self.worst_call)] {
            if let Some(p) = call {
                out.push_str(&format!(
                    "\n{} Call ({}-day):\n  Date: {}, Price: ${:.2}\n  \
                     Trade: {} ({:.0}), Investment: {} ({:.0})\n  Return: {:+.2}%\n",
                    title,
                    self.horizons_days.get(longest).copied().unwrap_or_default(),
                    p.date,
                    p.price,
                    p.trade_rating,
                    p.trade_score,
                    p.investment_rating,
                    p.investment_score,
                    p.forward_returns.get(longest).copied().flatten().unwrap_or_default(),
                ));
            }
        }
        out.push_str(&format!("\n{rule}\n"));
        out
    }
}

/// 점수 백테스터.
pub struct Backtester {
    evaluator: Evaluator,
    config: BacktestConfig,
}

impl Backtester {
    /// 새로운 백테스터를 생성합니다.
    pub fn new(evaluator: Evaluator, config: BacktestConfig) -> Self {
        Self { evaluator, config }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// 평가 기준일 목록.
    ///
    /// 날짜 범위를 표현할 수 없으면 빈 목록을 반환합니다.
    pub fn schedule(&self, history: &PriceHistory) -> Vec<NaiveDate> {
        let Some(last) = history.last_date() else {
            return Vec::new();
        };
        let end = self.config.end.unwrap_or(last);
        let start = match self.config.start {
            Some(start) => start,
            None => {
                let span = Duration::days(i64::from(self.config.months.min(MAX_MONTHS)) * 30);
                match end.checked_sub_signed(span) {
                    Some(start) => start,
                    None => return Vec::new(),
                }
            }
        };

        let step = Duration::days(self.config.interval_days.clamp(1, MAX_SPAN_DAYS));
        let mut dates = Vec::new();
        let mut current = start;
        while current <= end {
            dates.push(current);
            match current.checked_add_signed(step) {
                Some(next) => current = next,
                None => break,
            }
        }
        dates
    }

    /// 백테스트를 실행합니다.
    pub fn run(&self, history: &PriceHistory) -> AnalysisResult<BacktestReport> {
        self.run_with_progress(history, |_, _| {})
    }

    /// 진행 콜백 `(완료, 전체)`과 함께 백테스트를 실행합니다.
    pub fn run_with_progress<F>(
        &self,
        history: &PriceHistory,
        mut on_progress: F,
    ) -> AnalysisResult<BacktestReport>
    where
        F: FnMut(usize, usize),
    {
        self.config.validate()?;
        let dates = self.schedule(history);
        let (Some(&start), Some(&end)) = (dates.first(), dates.last()) else {
            return Err(AnalysisError::InsufficientHistory {
                required: 1,
                provided: 0,
            });
        };

        info!(
            ticker = history.ticker(),
            %start,
            %end,
            test_points = dates.len(),
            "백테스트 시작"
        );

        let mut points = Vec::with_capacity(dates.len());
        for (i, date) in dates.iter().enumerate() {
            if let Some(point) = self.point_at(history, *date)? {
                points.push(point);
            }
            on_progress(i + 1, dates.len());
        }

        let report = self.build_report(history.ticker(), start, end, points);
        info!(
            ticker = history.ticker(),
            points = report.points.len(),
            trade_monotonic = ?report.trade.calibration_monotonic,
            investment_monotonic = ?report.investment.calibration_monotonic,
            "백테스트 완료"
        );
        Ok(report)
    }

    fn point_at(
        &self,
        history: &PriceHistory,
        date: NaiveDate,
    ) -> AnalysisResult<Option<BacktestPoint>> {
        if history.up_to(date).len() < self.config.min_bars {
            debug!(%date, "데이터 부족으로 건너뜀");
            return Ok(None);
        }
        let eval = match self.evaluator.evaluate(history, date) {
            Ok(eval) => eval,
            Err(AnalysisError::NoData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let forward_returns = self
            .config
            .horizons_days
            .iter()
            .map(|days| forward_return(history, eval.bar_date, eval.price, *days))
            .collect();

        Ok(Some(BacktestPoint {
            date,
            bar_date: eval.bar_date,
            price: eval.price,
            trade_score: eval.trade.display_score,
            trade_rating: eval.trade.rating_label,
            trade_turnaround: eval.trade.turnaround_active,
            investment_score: eval.investment.display_score,
            investment_rating: eval.investment.rating_label,
            investment_turnaround: eval.investment.turnaround_active,
            forward_returns,
        }))
    }

    fn build_report(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        points: Vec<BacktestPoint>,
    ) -> BacktestReport {
        let horizons = &self.config.horizons_days;
        let overall_avg_return_pct = (0..horizons.len())
            .map(|i| mean(points.iter().filter_map(|p| p.forward_returns[i])))
            .collect();

        let longest = horizons.len().saturating_sub(1);
        let with_longest = || {
            points
                .iter()
                .filter_map(move |p| p.forward_returns[longest].map(|r| (p, r)))
        };
        let best_call = with_longest()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| p.clone());
        let worst_call = with_longest()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| p.clone());

        BacktestReport {
            ticker: ticker.to_string(),
            start,
            end,
            interval_days: self.config.interval_days,
            horizons_days: horizons.clone(),
            trade: summarize(&points, horizons, ScoreType::Trade),
            investment: summarize(&points, horizons, ScoreType::Investment),
            overall_avg_return_pct,
            best_call,
            worst_call,
            points,
        }
    }
}

/// 기준일 종가 대비 `days`일 후(당일 또는 직전 거래일) 종가 수익률 (%).
///
/// `from`은 평가에 사용된 일봉 날짜입니다.
/// 목표일이 이력의 마지막 거래일 이후이면 `None`.
pub fn forward_return(
    history: &PriceHistory,
    from: NaiveDate,
    from_price: f64,
    days: i64,
) -> Option<f64> {
    if !(0..=MAX_SPAN_DAYS).contains(&days) || from_price <= 0.0 {
        return None;
    }
    let target = from.checked_add_signed(Duration::days(days))?;
    if history.last_date()? < target {
        return None;
    }
    let to_price = history.bar_on_or_before(target)?.close_f64();
    Some((to_price - from_price) / from_price * 100.0)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn summarize(points: &[BacktestPoint], horizons: &[i64], score_type: ScoreType) -> ScoreTypeSummary {
    let tiers: Vec<AccuracyStats> = RatingLabel::BEST_TO_WORST
        .iter()
        .filter_map(|&rating| {
            let group: Vec<&BacktestPoint> = points
                .iter()
                .filter(|p| p.rating(score_type) == rating)
                .collect();
            if group.is_empty() {
                return None;
            }
            let horizons = horizons
                .iter()
                .enumerate()
                .map(|(i, &days)| {
                    let returns: Vec<f64> =
                        group.iter().filter_map(|p| p.forward_returns[i]).collect();
                    let samples = returns.len();
                    let positive = returns.iter().filter(|r| **r > 0.0).count();
                    HorizonStats {
                        days,
                        samples,
                        positive_rate: if samples == 0 {
                            0.0
                        } else {
                            positive as f64 / samples as f64
                        },
                        avg_return_pct: mean(returns.into_iter()).unwrap_or(0.0),
                    }
                })
                .collect();
            Some(AccuracyStats {
                rating,
                count: group.len(),
                horizons,
            })
        })
        .collect();

    let calibration_horizon_days = score_type.calibration_horizon_days();
    let calibration_means: Vec<f64> = tiers
        .iter()
        .filter_map(|t| t.horizon(calibration_horizon_days))
        .filter(|h| h.samples > 0)
        .map(|h| h.avg_return_pct)
        .collect();
    let calibration_monotonic = (calibration_means.len() >= 2)
        .then(|| calibration_means.windows(2).all(|w| w[0] >= w[1]));

    ScoreTypeSummary {
        score_type,
        tiers,
        calibration_horizon_days,
        calibration_monotonic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iceberg_core::PriceBar;
    use rust_decimal::Decimal;

    fn history(closes: &[f64]) -> PriceHistory {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, c)| {
                PriceBar::from_close(
                    start + Duration::days(i as i64),
                    Decimal::try_from(*c).unwrap(),
                )
            })
            .collect();
        PriceHistory::new("bt", bars).unwrap()
    }

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n)
    }

    #[test]
    fn test_forward_return_uses_on_or_before_and_rejects_missing_future() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let h = history(&closes);

        let r = forward_return(&h, day(10), 110.0, 14).unwrap();
        assert!((r - (124.0 - 110.0) / 110.0 * 100.0).abs() < 1e-9);

        assert!(forward_return(&h, day(90), 190.0, 14).is_none());
        assert!(forward_return(&h, day(85), 185.0, 14).is_some());
    }

    #[test]
    fn test_schedule_defaults_to_months_before_last_bar() {
        let h = history(&vec![100.0; 400]);
        let bt = Backtester::new(Evaluator::default(), BacktestConfig::default());
        let dates = bt.schedule(&h);

        let last = h.last_date().unwrap();
        assert_eq!(dates.first().copied(), Some(last - Duration::days(180)));
        assert!(dates.windows(2).all(|w| (w[1] - w[0]).num_days() == 7));
        assert!(*dates.last().unwrap() <= last);
    }

    #[test]
    fn test_run_groups_by_rating_best_to_worst() {
        let closes: Vec<f64> = (0..400)
            .map(|i| 100.0 + 10.0 * (i as f64 / 15.0).sin() + i as f64 * 0.05)
            .collect();
        let h = history(&closes);
        let config = BacktestConfig::default().with_range(day(150), day(380));
        let report = Backtester::new(Evaluator::default(), config)
            .run(&h)
            .unwrap();

        assert!(!report.points.is_empty());
        for summary in [&report.trade, &report.investment] {
            let total: usize = summary.tiers.iter().map(|t| t.count).sum();
            assert_eq!(total, report.points.len());
            assert!(summary.tiers.windows(2).all(|w| w[0].rating > w[1].rating));
        }
        assert_eq!(report.trade.calibration_horizon_days, 30);
        assert_eq!(report.investment.calibration_horizon_days, 90);

        // 마지막 포인트는 90일 이후 데이터가 없음
        let last = report.points.last().unwrap();
        assert!(last.forward_returns[2].is_none());
        assert!(report.best_call.is_some());
        assert!(report.summary().contains("Back-Test Report"));
    }

    #[test]
    fn test_points_skip_dates_with_too_few_bars() {
        let h = history(&vec![100.0; 120]);
        let config = BacktestConfig::default()
            .with_range(day(0), day(119))
            .with_interval_days(10);
        let report = Backtester::new(Evaluator::default(), config)
            .run(&h)
            .unwrap();

        assert!(report.points.iter().all(|p| p.date >= day(49)));
        assert_eq!(report.points.len(), 7);
    }

    #[test]
    fn test_invalid_config() {
        assert!(BacktestConfig::default().with_interval_days(0).validate().is_err());
        assert!(BacktestConfig::default()
            .with_horizons(vec![])
            .validate()
            .is_err());
        assert!(BacktestConfig::default()
            .with_range(day(10), day(5))
            .validate()
            .is_err());
        assert!(BacktestConfig::default()
            .with_horizons(vec![14, i64::MAX])
            .validate()
            .is_err());
        assert!(BacktestConfig::default()
            .with_interval_days(i64::MAX)
            .validate()
            .is_err());
        assert!(BacktestConfig::default()
            .with_months(MAX_MONTHS)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_oversized_months_is_rejected_without_panic() {
        let h = history(&vec![100.0; 300]);
        let config = BacktestConfig::default().with_months(u32::MAX);
        assert!(config.validate().is_err());

        let bt = Backtester::new(Evaluator::default(), config);
        assert!(matches!(bt.run(&h), Err(AnalysisError::Profile(_))));
        // 검증 없이 호출해도 날짜 계산은 패닉 없이 끝남
        assert!(!bt.schedule(&h).is_empty());
    }

    #[test]
    fn test_schedule_stops_at_date_range_limit() {
        let h = history(&vec![100.0; 60]);
        let config = BacktestConfig::default()
            .with_range(NaiveDate::MAX - Duration::days(20), NaiveDate::MAX)
            .with_interval_days(7);
        let dates = Backtester::new(Evaluator::default(), config).schedule(&h);
        assert_eq!(dates.len(), 3);
        assert_eq!(forward_return(&h, NaiveDate::MAX, 100.0, 14), None);
    }

    #[test]
    fn test_forward_return_anchors_on_evaluated_bar() {
        // 50, 51일차 휴장
        let bars = (0..120)
            .filter(|i| *i != 50 && *i != 51)
            .map(|i| PriceBar::from_close(day(i), Decimal::from(100 + i)))
            .collect();
        let h = PriceHistory::new("gap", bars).unwrap();

        let config = BacktestConfig::default()
            .with_range(day(51), day(51))
            .with_horizons(vec![14]);
        let report = Backtester::new(Evaluator::default(), config)
            .run(&h)
            .unwrap();

        assert_eq!(report.points.len(), 1);
        let point = &report.points[0];
        assert_eq!(point.date, day(51));
        assert_eq!(point.bar_date, day(49));
        assert!((point.price - 149.0).abs() < 1e-9);

        // 49일차 + 14일 = 63일차 종가 163
        let expected = (163.0 - 149.0) / 149.0 * 100.0;
        assert!((point.forward_returns[0].unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_calibration_not_evaluated_without_its_horizon() {
        let closes: Vec<f64> = (0..400)
            .map(|i| 100.0 + 10.0 * (i as f64 / 15.0).sin() + i as f64 * 0.05)
            .collect();
        let h = history(&closes);
        let config = BacktestConfig::default()
            .with_range(day(150), day(380))
            .with_horizons(vec![14]);
        let report = Backtester::new(Evaluator::default(), config)
            .run(&h)
            .unwrap();

        assert!(!report.points.is_empty());
        assert_eq!(report.trade.calibration_monotonic, None);
        assert_eq!(report.investment.calibration_monotonic, None);
        assert!(report.summary().contains("not evaluated"));
    }

    #[test]
    fn test_calibration_flags_inverted_tiers() {
        let point = |rating: RatingLabel, ret: f64| BacktestPoint {
            date: day(0),
            bar_date: day(0),
            price: 100.0,
            trade_score: 50.0,
            trade_rating: rating,
            trade_turnaround: false,
            investment_score: 50.0,
            investment_rating: rating,
            investment_turnaround: false,
            forward_returns: vec![Some(ret), Some(ret)],
        };
        let points = vec![
            point(RatingLabel::Buy, -4.0),
            point(RatingLabel::Hold, 1.0),
            point(RatingLabel::Sell, 6.0),
        ];

        let trade = summarize(&points, &[30, 90], ScoreType::Trade);
        assert_eq!(trade.calibration_monotonic, Some(false));

        let single = summarize(&points[..1], &[30, 90], ScoreType::Trade);
        assert_eq!(single.calibration_monotonic, None);
    }
}
