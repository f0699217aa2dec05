//! 평가 파이프라인.
//!
//! 가격 이력 → 지표 → 패턴 → 점수 → 등급을 한 번에 실행합니다.
//! 모든 단계는 순수 함수이며, 같은 (이력, 기준일, 프로파일)이면 같은 결과를 냅니다.

use chrono::NaiveDate;
use iceberg_core::{evaluation_span, PriceHistory, ScoreType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalysisError, AnalysisResult};
use crate::indicators::IndicatorSet;
use crate::patterns::{PatternDetector, PatternFlags};
use crate::scoring::{ScoreBreakdown, ScoreResult, Scorer, ScoringProfile};

/// 한 종목, 한 기준일의 평가 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub ticker: String,
    /// 요청 기준일
    pub as_of: NaiveDate,
    /// 실제 사용된 마지막 거래일
    pub bar_date: NaiveDate,
    pub bars_used: usize,
    pub price: f64,
    pub profile_version: String,
    pub indicators: IndicatorSet,
    pub patterns: PatternFlags,
    pub trade: ScoreResult,
    pub investment: ScoreResult,
}

impl Evaluation {
    pub fn score(&self, score_type: ScoreType) -> &ScoreResult {
        match score_type {
            ScoreType::Trade => &self.trade,
            ScoreType::Investment => &self.investment,
        }
    }

    /// 어느 한쪽이라도 Turnaround 모드인지 여부 (⚡ 표시).
    pub fn any_turnaround_active(&self) -> bool {
        self.trade.turnaround_active || self.investment.turnaround_active
    }
}

/// 기준일까지 잘라낸 평가 입력.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    pub first_date: NaiveDate,
    pub bar_date: NaiveDate,
    pub closes: Vec<f64>,
    pub indicators: IndicatorSet,
    pub patterns: PatternFlags,
}

/// 평가기.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    detector: PatternDetector,
    scorer: Scorer,
    lookback: Option<usize>,
}

impl Evaluator {
    /// 프로파일로 평가기 생성.
    pub fn new(profile: ScoringProfile) -> Self {
        Self {
            detector: PatternDetector::new(profile.patterns),
            scorer: Scorer::new(profile),
            lookback: None,
        }
    }

    /// 기준일 이전 최근 `bars`개만 사용하도록 제한합니다.
    pub fn with_lookback(mut self, bars: usize) -> Self {
        self.lookback = Some(bars.max(1));
        self
    }

    pub fn profile(&self) -> &ScoringProfile {
        self.scorer.profile()
    }

    pub fn detector(&self) -> &PatternDetector {
        &self.detector
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// 기준일(포함)까지의 이력으로 두 점수를 모두 계산합니다.
    ///
    /// # 에러
    ///
    /// 기준일 이전 거래일이 없으면 `AnalysisError::NoData`.
    pub fn evaluate(&self, history: &PriceHistory, as_of: NaiveDate) -> AnalysisResult<Evaluation> {
        let span = evaluation_span!("evaluate", history.ticker(), as_of);
        let _guard = span.enter();

        let snapshot = self.snapshot(history, as_of)?;
        let trade = self
            .scorer
            .score(ScoreType::Trade, &snapshot.indicators, &snapshot.patterns);
        let investment =
            self.scorer
                .score(ScoreType::Investment, &snapshot.indicators, &snapshot.patterns);

        debug!(
            bars = snapshot.closes.len(),
            trade = trade.display_score,
            investment = investment.display_score,
            trade_turnaround = trade.turnaround_active,
            investment_turnaround = investment.turnaround_active,
            "evaluation complete"
        );

        Ok(Evaluation {
            ticker: history.ticker().to_string(),
            as_of,
            bar_date: snapshot.bar_date,
            bars_used: snapshot.closes.len(),
            price: snapshot.indicators.price,
            profile_version: self.profile().version.clone(),
            indicators: snapshot.indicators,
            patterns: snapshot.patterns,
            trade,
            investment,
        })
    }

    /// 점수 유형별 분해 내역 (진단용).
    pub fn breakdown(
        &self,
        history: &PriceHistory,
        as_of: NaiveDate,
        score_type: ScoreType,
    ) -> AnalysisResult<ScoreBreakdown> {
        let snapshot = self.snapshot(history, as_of)?;
        Ok(self
            .scorer
            .breakdown(score_type, &snapshot.indicators, &snapshot.patterns))
    }

    pub(crate) fn snapshot(
        &self,
        history: &PriceHistory,
        as_of: NaiveDate,
    ) -> AnalysisResult<Snapshot> {
        let bars = history.up_to(as_of);
        let Some(last) = bars.last() else {
            return Err(AnalysisError::NoData {
                ticker: history.ticker().to_string(),
                as_of,
            });
        };
        let start = self
            .lookback
            .map_or(0, |n| bars.len().saturating_sub(n));

        let window = &bars[start..];
        let first_date = window.first().map_or(last.date, |b| b.date);
        let closes = PriceHistory::closes(window);
        let indicators = IndicatorSet::compute(&closes)?;
        let patterns = self.detector.detect(&indicators, &closes);

        Ok(Snapshot {
            first_date,
            bar_date: last.date,
            closes,
            indicators,
            patterns,
        })
    }
}
