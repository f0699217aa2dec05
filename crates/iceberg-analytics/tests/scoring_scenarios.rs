//! End-to-end scoring scenarios.
//!
//! 1. Capitulation setup scored through the Scorer with hand-built indicators
//! 2. Full pipeline on a rally-then-crash price path (turnaround on/off)
//! 3. Independence of the Trade and Investment weight tables

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use iceberg_analytics::indicators::{
    MacdBias, MacdResult, RallyWindow, RsiBias, RsiResult, TrendBias, TrendSummary,
    VolatilitySummary, VolatilityTier,
};
use iceberg_analytics::{
    Evaluator, IndicatorSet, PatternFlags, RatingLabel, Scorer, ScoringProfile,
};
use iceberg_core::{PriceBar, PriceHistory, ScoreType};

fn summary(period: usize, price: f64, sma: f64) -> TrendSummary {
    TrendSummary {
        period,
        sma,
        delta_pct: (price - sma) / sma * 100.0,
        bias: TrendBias::classify(price, sma),
    }
}

/// Price 39.48 after a 33.36 → 66.13 rally, RSI 11.9, 40% below the 20-day high.
fn capitulation_indicators() -> IndicatorSet {
    let price = 39.48;
    let mut set = IndicatorSet::compute(&[price]).unwrap();
    set.macd = Some(MacdResult {
        macd: -3.42,
        signal: -1.87,
        histogram: -1.55,
        bias: MacdBias::Bear,
    });
    set.rsi = Some(RsiResult {
        value: 11.9,
        bias: RsiBias::Oversold,
    });
    set.sma10 = Some(40.50);
    set.sma20 = Some(52.10);
    set.sma50 = Some(55.34);
    set.sma100 = Some(50.20);
    set.trend10 = Some(summary(10, price, 40.50));
    set.trend20 = Some(summary(20, price, 52.10));
    set.trend50 = Some(summary(50, price, 55.34));
    set.trend100 = Some(summary(100, price, 50.20));
    set.volatility = Some(VolatilitySummary {
        sigma_pct: 5.6,
        tier: VolatilityTier::Wild,
    });
    set.distance_from_high_20d_pct = Some(-40.33);
    set.rally_90d = Some(RallyWindow {
        trough: 33.36,
        trough_index: 180,
        peak: 66.13,
        peak_index: 236,
        gain_pct: 98.23,
    });
    set.resilience_count = 1;
    set
}

fn capitulation_flags() -> PatternFlags {
    PatternFlags {
        proven_winner_capitulation: true,
        ..PatternFlags::default()
    }
}

fn history(closes: &[f64]) -> PriceHistory {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let close = Decimal::try_from(*c).unwrap().round_dp(4);
            PriceBar::from_close(start + Duration::days(i as i64), close)
        })
        .collect();
    PriceHistory::new("CRASH", bars).unwrap()
}

/// Flat at 40, rally to 80 over 50 bars, then a 15-bar crash to 42.
fn rally_then_crash() -> Vec<f64> {
    let mut closes = vec![40.0; 100];
    closes.extend((1..=50).map(|i| 40.0 + 0.8 * i as f64));
    closes.extend((1..=15).map(|i| 80.0 - 38.0 * i as f64 / 15.0));
    closes
}

#[test]
fn capitulation_scenario_trade_lands_near_buy_boundary() {
    let scorer = Scorer::default();
    let b = scorer.breakdown(
        ScoreType::Trade,
        &capitulation_indicators(),
        &capitulation_flags(),
    );

    assert!(b.turnaround_active);
    assert!(
        (150.0..160.0).contains(&b.turnaround_raw),
        "raw {}",
        b.turnaround_raw
    );
    assert!(
        (68.0..72.0).contains(&b.turnaround_score),
        "score {}",
        b.turnaround_score
    );
    assert!(matches!(
        b.turnaround_label,
        RatingLabel::Outperform | RatingLabel::Buy
    ));

    // BAU never includes the capitulation bonus
    assert!((b.bau_raw - b.base).abs() < 1e-9);
    let result = b.result();
    assert_eq!(result.display_score, result.turnaround_score);
}

#[test]
fn capitulation_scenario_investment_is_hold() {
    let scorer = Scorer::default();
    let b = scorer.breakdown(
        ScoreType::Investment,
        &capitulation_indicators(),
        &capitulation_flags(),
    );

    assert!(b.turnaround_active);
    assert!((b.base + 77.0).abs() < 1e-9, "base {}", b.base);
    assert!(
        (-25.0..-12.0).contains(&b.turnaround_raw),
        "raw {}",
        b.turnaround_raw
    );
    assert!(
        (44.0..49.0).contains(&b.turnaround_score),
        "score {}",
        b.turnaround_score
    );
    assert_eq!(b.result().rating_label, RatingLabel::Hold);
}

#[test]
fn turnaround_turns_off_once_price_crosses_sma50() {
    let scorer = Scorer::default();
    let mut set = capitulation_indicators();
    set.price = 55.40;

    for score_type in ScoreType::ALL {
        let result = scorer.score(score_type, &set, &capitulation_flags());
        assert!(!result.turnaround_active);
        assert_eq!(result.display_score, result.bau_score);
    }
}

#[test]
fn pipeline_detects_capitulation_on_crash() {
    let closes = rally_then_crash();
    let h = history(&closes);
    let as_of = h.last_date().unwrap();

    let eval = Evaluator::default().evaluate(&h, as_of).unwrap();

    assert!(eval.indicators.rsi_value().unwrap() < 20.0);
    assert!(eval.patterns.proven_winner_capitulation);
    assert!(eval.trade.turnaround_active);
    assert!(eval.investment.turnaround_active);
    assert!(eval.trade.turnaround_raw > eval.trade.bau_raw);
    assert_eq!(eval.trade.display_score, eval.trade.turnaround_score);
}

#[test]
fn pipeline_turnaround_turns_off_when_a_criterion_fails() {
    let mut closes = rally_then_crash();
    // bounce above trough × 1.10
    closes.push(48.0);
    let h = history(&closes);
    let as_of = h.last_date().unwrap();

    let eval = Evaluator::default().evaluate(&h, as_of).unwrap();

    assert!(!eval.patterns.proven_winner_capitulation);
    for score_type in ScoreType::ALL {
        let result = eval.score(score_type);
        assert!(!result.turnaround_active);
        assert_eq!(result.turnaround_raw, result.bau_raw);
        assert_eq!(result.display_score, result.bau_score);
    }
}

#[test]
fn weight_tables_are_independent() {
    let set = capitulation_indicators();
    let flags = PatternFlags {
        recovery: true,
        cheap_on_winner: true,
        ..capitulation_flags()
    };

    let baseline = Scorer::default();
    let mut altered = ScoringProfile::production();
    altered.trade.macd = 40.0;
    altered.trade.max_points = 500.0;
    altered.trade.bonuses.capitulation = 300.0;
    let altered = Scorer::new(altered);

    assert_eq!(
        baseline.score(ScoreType::Investment, &set, &flags),
        altered.score(ScoreType::Investment, &set, &flags)
    );
    assert_ne!(
        baseline.score(ScoreType::Trade, &set, &flags),
        altered.score(ScoreType::Trade, &set, &flags)
    );
}

#[test]
fn identical_inputs_yield_identical_evaluations() {
    let closes: Vec<f64> = (0..300)
        .map(|i| 50.0 + 8.0 * (i as f64 / 11.0).sin() + i as f64 * 0.03)
        .collect();
    let h = history(&closes);
    let as_of = h.last_date().unwrap();
    let evaluator = Evaluator::default();

    let first = evaluator.evaluate(&h, as_of).unwrap();
    let second = evaluator.evaluate(&h, as_of).unwrap();
    assert_eq!(first, second);

    // evaluating one score type never disturbs the other
    let trade_only = evaluator
        .breakdown(&h, as_of, ScoreType::Trade)
        .unwrap()
        .result();
    assert_eq!(trade_only, first.trade);
}

#[test]
fn bundled_aggressive_profile_only_moves_thresholds() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/profiles/aggressive.toml");
    let profile = ScoringProfile::load(path).unwrap();
    let production = ScoringProfile::production();

    assert_eq!(profile.version, "1.3-aggressive");
    assert_eq!(profile.patterns, production.patterns);
    assert_eq!(
        profile.trade.thresholds,
        iceberg_analytics::RatingThresholds::aggressive()
    );
    assert_eq!(
        profile.investment.thresholds,
        iceberg_analytics::RatingThresholds::selective()
    );

    // 69.8 is OUTPERFORM in production but BUY on the aggressive table
    let set = capitulation_indicators();
    let flags = capitulation_flags();
    let prod = Scorer::default().score(ScoreType::Trade, &set, &flags);
    let aggr = Scorer::new(profile).score(ScoreType::Trade, &set, &flags);
    assert_eq!(prod.display_score, aggr.display_score);
    assert_eq!(prod.rating_label, RatingLabel::Outperform);
    assert_eq!(aggr.rating_label, RatingLabel::Buy);
}
