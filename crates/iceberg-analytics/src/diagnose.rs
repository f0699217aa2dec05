//! 진단 리포트.
//!
//! 특정 종목/기준일에 대해 지표, 패턴 판정(실패 사유 포함), 점수 유형별
//! Turnaround/BAU 분해 내역을 텍스트로 출력합니다.

use std::fmt::{self, Write as _};

use chrono::NaiveDate;
use iceberg_core::{PriceHistory, ScoreType};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisResult;
use crate::evaluator::Evaluator;
use crate::indicators::IndicatorSet;
use crate::patterns::{Criterion, PatternFlags};
use crate::scoring::{BonusContribution, ScoreBreakdown};

const RULE_WIDTH: usize = 70;

/// 진단 리포트.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub ticker: String,
    pub as_of: NaiveDate,
    pub first_date: NaiveDate,
    pub bar_date: NaiveDate,
    pub bars_used: usize,
    pub previous_close: Option<f64>,
    pub profile_version: String,
    pub indicators: IndicatorSet,
    pub patterns: PatternFlags,
    pub post_shock_criteria: Vec<Criterion>,
    pub capitulation_criteria: Vec<Criterion>,
    pub trade: ScoreBreakdown,
    pub investment: ScoreBreakdown,
}

impl DiagnosticReport {
    /// 평가기로 진단 리포트를 생성합니다.
    pub fn build(
        evaluator: &Evaluator,
        history: &PriceHistory,
        as_of: NaiveDate,
    ) -> AnalysisResult<Self> {
        let snapshot = evaluator.snapshot(history, as_of)?;
        let detector = evaluator.detector();
        let scorer = evaluator.scorer();
        let set = &snapshot.indicators;
        let closes = &snapshot.closes;

        Ok(Self {
            ticker: history.ticker().to_string(),
            as_of,
            first_date: snapshot.first_date,
            bar_date: snapshot.bar_date,
            bars_used: closes.len(),
            previous_close: closes.len().checked_sub(2).map(|i| closes[i]),
            profile_version: evaluator.profile().version.clone(),
            post_shock_criteria: detector.post_shock_criteria(set, closes),
            capitulation_criteria: detector.capitulation_criteria(set, closes),
            trade: scorer.breakdown(ScoreType::Trade, set, &snapshot.patterns),
            investment: scorer.breakdown(ScoreType::Investment, set, &snapshot.patterns),
            patterns: snapshot.patterns,
            indicators: snapshot.indicators,
        })
    }

    /// 텍스트 리포트를 생성합니다.
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn write_price(&self, out: &mut String) -> fmt::Result {
        let price = self.indicators.price;
        section(out, "PRICE DATA")?;
        writeln!(out, "Current price: ${:.2}", price)?;
        if let Some(prev) = self.previous_close {
            let change = price - prev;
            writeln!(out, "Previous price: ${:.2}", prev)?;
            writeln!(
                out,
                "1-day change: ${:+.2} ({:+.2}%)",
                change,
                change / prev * 100.0
            )?;
        }
        Ok(())
    }

    fn write_indicators(&self, out: &mut String) -> fmt::Result {
        let set = &self.indicators;
        section(out, "INDICATORS")?;

        match set.macd {
            Some(m) => writeln!(
                out,
                "MACD: {:.2}, Signal: {:.2}, Hist: {:.2}, Bias: {}",
                m.macd,
                m.signal,
                m.histogram,
                m.bias.as_str()
            )?,
            None => writeln!(out, "MACD: N/A")?,
        }
        match set.rsi {
            Some(r) => writeln!(out, "RSI(14): {:.1}, Bias: {}", r.value, r.bias.as_str())?,
            None => writeln!(out, "RSI(14): N/A")?,
        }

        writeln!(out)?;
        for period in [10, 20, 50, 100] {
            match (set.sma(period), set.distance_from_sma_pct(period)) {
                (Some(sma), Some(dist)) => {
                    writeln!(out, "SMA({}): ${:.2}  Distance: {:+.2}%", period, sma, dist)?
                }
                _ => writeln!(out, "SMA({}): N/A", period)?,
            }
        }

        writeln!(out)?;
        for trend in [set.trend10, set.trend20, set.trend50, set.trend100]
            .into_iter()
            .flatten()
        {
            writeln!(
                out,
                "Trend({}): {}, Delta: {:+.2}%",
                trend.period,
                trend.bias.as_str(),
                trend.delta_pct
            )?;
        }

        if let Some(vol) = set.volatility {
            writeln!(
                out,
                "\nVolatility: {}, Sigma: {:.2}%",
                vol.tier.as_str(),
                vol.sigma_pct
            )?;
        }
        writeln!(out)?;
        writeln!(
            out,
            "Distance from 20d high: {}",
            fmt_pct(set.distance_from_high_20d_pct)
        )?;
        if let Some(rally) = set.rally_90d {
            writeln!(
                out,
                "90d rally: ${:.2} -> ${:.2} ({:+.1}%)",
                rally.trough, rally.peak, rally.gain_pct
            )?;
        }
        writeln!(out, "Growth (1y): {}", fmt_pct(set.growth_rate_1y_pct))?;
        writeln!(out, "Trend slope (100d): {}", fmt_pct(set.trend_slope_100d_pct))?;
        if let Some(freq) = set.return_to_highs_frequency {
            writeln!(out, "Return-to-highs frequency: {:.0}%", freq * 100.0)?;
        }
        writeln!(
            out,
            "Resilience count (6mo): {} recoveries",
            set.resilience_count
        )
    }

    fn write_patterns(&self, out: &mut String) -> fmt::Result {
        section(out, "PATTERN DETECTION")?;
        let multiplier = self.trade.resilience_multiplier;

        detected_line(out, "Recovery Pattern", self.patterns.recovery)?;
        if self.patterns.recovery {
            writeln!(
                out,
                "  -> Bonus: +{:.0} (x {:.1} resilience)",
                self.trade.recovery.nominal, multiplier
            )?;
        }

        detected_line(out, "Post-Shock Recovery", self.patterns.post_shock_recovery)?;
        if self.patterns.post_shock_recovery {
            writeln!(
                out,
                "  -> Bonus: +{:.0} (x {:.1} resilience)",
                self.trade.post_shock.nominal, multiplier
            )?;
        } else {
            write_failures(out, &self.post_shock_criteria)?;
        }

        detected_line(
            out,
            "Proven Winner Capitulation",
            self.patterns.proven_winner_capitulation,
        )?;
        if self.patterns.proven_winner_capitulation {
            writeln!(
                out,
                "  -> Trade Bonus: +{:.0} (x {:.1} resilience)",
                self.trade.capitulation.nominal, multiplier
            )?;
            writeln!(
                out,
                "  -> Investment Bonus: +{:.0} (x {:.1} resilience)",
                self.investment.capitulation.nominal, self.investment.resilience_multiplier
            )?;
            if let Some(sma50) = self.indicators.sma50.filter(|s| self.indicators.price < *s) {
                writeln!(
                    out,
                    "  -> Turnaround mode ACTIVE until price crosses ${:.2} (SMA 50)",
                    sma50
                )?;
            }
        } else {
            write_failures(out, &self.capitulation_criteria)?;
        }

        detected_line(out, "Cheap on a Winner", self.patterns.cheap_on_winner)?;
        if self.patterns.cheap_on_winner {
            writeln!(out, "  -> Bonus: +{:.0}", self.trade.cheap_on_winner.nominal)?;
        }
        Ok(())
    }

    fn write_scores(&self, out: &mut String) -> fmt::Result {
        section(out, "SCORING")?;
        if self.trade.turnaround_active || self.investment.turnaround_active {
            if let Some(sma50) = self.indicators.sma50 {
                writeln!(
                    out,
                    "🔥 TURNAROUND MODE ACTIVE (price below SMA(50): ${:.2})",
                    sma50
                )?;
            }
        }
        write_breakdown(out, &self.trade)?;
        writeln!(out)?;
        write_breakdown(out, &self.investment)
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        writeln!(
            out,
            "Diagnosing {} as of {} (profile v{})",
            self.ticker, self.as_of, self.profile_version
        )?;
        writeln!(out, "Data points available: {}", self.bars_used)?;
        writeln!(out, "Date range: {} to {}", self.first_date, self.bar_date)?;
        self.write_price(&mut out)?;
        self.write_indicators(&mut out)?;
        self.write_patterns(&mut out)?;
        self.write_scores(&mut out)?;
        writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
        f.write_str(&out)
    }
}

fn section(out: &mut String, title: &str) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "\n{rule}\n{title}\n{rule}")
}

fn detected_line(out: &mut String, name: &str, detected: bool) -> fmt::Result {
    writeln!(
        out,
        "{}: {}",
        name,
        if detected { "✓ DETECTED" } else { "✗ Not detected" }
    )
}

fn write_failures(out: &mut String, criteria: &[Criterion]) -> fmt::Result {
    for c in criteria.iter().filter(|c| !c.passed) {
        writeln!(out, "  -> Failed: {} ({})", c.name, c.detail)?;
    }
    Ok(())
}

fn write_bonus(out: &mut String, bonus: &BonusContribution) -> fmt::Result {
    if bonus.detected {
        writeln!(
            out,
            "    + {:<18} {:>8.2}  (nominal {:.0})",
            bonus.name, bonus.points, bonus.nominal
        )?;
    }
    Ok(())
}

fn write_breakdown(out: &mut String, b: &ScoreBreakdown) -> fmt::Result {
    writeln!(out, "{}:", b.score_type.display_name())?;
    for c in &b.components {
        writeln!(out, "    {:<20} {:>8.2}  [{}]", c.name, c.points, c.input)?;
    }
    writeln!(out, "    {:<20} {:>8.2}", "base", b.base)?;
    writeln!(
        out,
        "  Resilience: {} recoveries (x {:.1})",
        b.resilience_count, b.resilience_multiplier
    )?;
    for bonus in [&b.recovery, &b.post_shock, &b.cheap_on_winner, &b.capitulation] {
        write_bonus(out, bonus)?;
    }

    let marker = if b.turnaround_active { " ⚡" } else { "" };
    writeln!(
        out,
        "  Turnaround: {:.0}/100 ({}){}  raw {:.2}",
        b.turnaround_score, b.turnaround_label, marker, b.turnaround_raw
    )?;
    writeln!(
        out,
        "  BAU:        {:.0}/100 ({})  raw {:.2}",
        b.bau_score, b.bau_label, b.bau_raw
    )?;
    let result = b.result();
    writeln!(
        out,
        "  Display:    {:.0}/100 ({})",
        result.display_score, result.rating_label
    )
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:+.2}%", v))
}
