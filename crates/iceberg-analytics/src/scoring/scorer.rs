//! 이중 원점수 계산기 (Turnaround / BAU).
//!
//! 기본 가중 성분을 합산한 뒤, 회복력 배수를 적용한 패턴 보너스를 더해
//! 점수 유형별로 두 개의 원점수를 만듭니다.
//!
//! ```text
//! base           = Σ 기본 성분
//! bau_raw        = base + recovery + post_shock + cheap_on_winner
//! turnaround_raw = base + capitulation   (capitulation 감지 시)
//!                = bau_raw               (그 외)
//! active         = capitulation && price < SMA50
//! ```
//!
//! Trade와 Investment는 각자의 [`ScoreWeights`]만 읽으며 상태를 공유하지 않습니다.

use iceberg_core::ScoreType;
use serde::{Deserialize, Serialize};

use super::profile::{ScoreWeights, ScoringProfile};
use crate::indicators::{IndicatorSet, MacdBias, RsiBias, TrendBias, VolatilityTier};
use crate::patterns::PatternFlags;
use crate::rating::RatingLabel;

/// 원점수를 0~100으로 정규화합니다.
///
/// `((raw + max_points) / (2 × max_points)) × 100`을 [0, 100]으로 자릅니다.
pub fn normalize(raw: f64, max_points: f64) -> f64 {
    if max_points <= 0.0 || !raw.is_finite() {
        return 50.0;
    }
    ((raw + max_points) / (max_points * 2.0) * 100.0).clamp(0.0, 100.0)
}

/// 점수 유형별 최종 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score_type: ScoreType,
    pub turnaround_raw: f64,
    pub turnaround_score: f64,
    pub bau_raw: f64,
    pub bau_score: f64,
    pub turnaround_active: bool,
    /// active이면 turnaround_score, 아니면 bau_score
    pub display_score: f64,
    pub rating_label: RatingLabel,
}

impl ScoreResult {
    /// 표시 점수 (반올림 정수).
    pub fn display_rounded(&self) -> u8 {
        self.display_score.round().clamp(0.0, 100.0) as u8
    }
}

/// 기본 성분 하나의 기여도.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentContribution {
    pub name: String,
    /// 입력 상태 설명 (예: "bear", "11.9 (oversold)")
    pub input: String,
    pub points: f64,
}

/// 패턴 보너스 하나의 기여도.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusContribution {
    pub name: String,
    pub detected: bool,
    /// 배수 적용 전 크기
    pub nominal: f64,
    /// 감지 시 배수 적용 후 점수, 아니면 0
    pub points: f64,
}

/// 진단용 전체 분해 내역.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score_type: ScoreType,
    pub components: Vec<ComponentContribution>,
    pub base: f64,
    pub resilience_count: usize,
    pub resilience_multiplier: f64,
    pub recovery: BonusContribution,
    pub post_shock: BonusContribution,
    pub cheap_on_winner: BonusContribution,
    pub capitulation: BonusContribution,
    pub max_points: f64,
    pub bau_raw: f64,
    pub bau_score: f64,
    pub bau_label: RatingLabel,
    pub turnaround_raw: f64,
    pub turnaround_score: f64,
    pub turnaround_label: RatingLabel,
    pub turnaround_active: bool,
}

impl ScoreBreakdown {
    /// 분해 내역에서 최종 결과를 만듭니다.
    pub fn result(&self) -> ScoreResult {
        let (display_score, rating_label) = if self.turnaround_active {
            (self.turnaround_score, self.turnaround_label)
        } else {
            (self.bau_score, self.bau_label)
        };
        ScoreResult {
            score_type: self.score_type,
            turnaround_raw: self.turnaround_raw,
            turnaround_score: self.turnaround_score,
            bau_raw: self.bau_raw,
            bau_score: self.bau_score,
            turnaround_active: self.turnaround_active,
            display_score,
            rating_label,
        }
    }
}

/// 점수 계산기.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    profile: ScoringProfile,
}

impl Scorer {
    /// 새로운 Scorer 생성.
    pub fn new(profile: ScoringProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    /// 점수 유형 하나의 결과.
    pub fn score(
        &self,
        score_type: ScoreType,
        set: &IndicatorSet,
        flags: &PatternFlags,
    ) -> ScoreResult {
        self.breakdown(score_type, set, flags).result()
    }

    /// 점수 유형 하나의 전체 분해 내역.
    pub fn breakdown(
        &self,
        score_type: ScoreType,
        set: &IndicatorSet,
        flags: &PatternFlags,
    ) -> ScoreBreakdown {
        let weights = self.profile.weights(score_type);
        let components = base_components(weights, set);
        let base: f64 = components.iter().map(|c| c.points).sum();

        let resilience_count = set.resilience_count;
        let multiplier = weights.resilience.bonus_multiplier(resilience_count);
        let bonus = |name: &str, detected: bool, nominal: f64| BonusContribution {
            name: name.to_string(),
            detected,
            nominal,
            points: if detected { nominal * multiplier } else { 0.0 },
        };

        let recovery = bonus("recovery", flags.recovery, weights.bonuses.recovery);
        let post_shock = bonus(
            "post_shock",
            flags.post_shock_recovery,
            weights.bonuses.post_shock,
        );
        let cheap_on_winner = bonus(
            "cheap_on_winner",
            flags.cheap_on_winner,
            weights.bonuses.cheap_on_winner,
        );
        let capitulation = bonus(
            "capitulation",
            flags.proven_winner_capitulation,
            weights.bonuses.capitulation,
        );

        let bau_raw = base + recovery.points + post_shock.points + cheap_on_winner.points;
        let turnaround_raw = if flags.proven_winner_capitulation {
            base + capitulation.points
        } else {
            bau_raw
        };
        let turnaround_active = flags.proven_winner_capitulation
            && set.sma50.is_some_and(|sma50| set.price < sma50);

        let bau_score = normalize(bau_raw, weights.max_points);
        let turnaround_score = normalize(turnaround_raw, weights.max_points);

        ScoreBreakdown {
            score_type,
            components,
            base,
            resilience_count,
            resilience_multiplier: multiplier,
            recovery,
            post_shock,
            cheap_on_winner,
            capitulation,
            max_points: weights.max_points,
            bau_raw,
            bau_score,
            bau_label: weights.thresholds.classify(bau_score),
            turnaround_raw,
            turnaround_score,
            turnaround_label: weights.thresholds.classify(turnaround_score),
            turnaround_active,
        }
    }
}

// ==================== 기본 성분 ====================

fn base_components(weights: &ScoreWeights, set: &IndicatorSet) -> Vec<ComponentContribution> {
    let mut components = vec![
        macd_component(weights, set),
        rsi_component(weights, set),
        sma_position_component(weights, set),
        trend_component(weights, set),
    ];
    if weights.sma50_distance > 0.0 {
        components.push(sma50_distance_component(weights, set));
    }
    components.push(volatility_component(weights, set));
    components
}

fn component(name: &str, input: impl Into<String>, points: f64) -> ComponentContribution {
    ComponentContribution {
        name: name.to_string(),
        input: input.into(),
        points,
    }
}

fn undefined(name: &str) -> ComponentContribution {
    component(name, "N/A", 0.0)
}

fn macd_component(weights: &ScoreWeights, set: &IndicatorSet) -> ComponentContribution {
    let Some(bias) = set.macd_bias() else {
        return undefined("macd");
    };
    let points = match bias {
        MacdBias::Bull => weights.macd,
        MacdBias::Bear => -weights.macd,
        MacdBias::Neutral => 0.0,
    };
    component("macd", bias.as_str(), points)
}

/// RSI 성분.
///
/// 과매도(< 30)에서 100일 추세가 UP이면 보너스를 더하고,
/// DOWN이면 falling-knife 배수로 줄입니다.
fn rsi_component(weights: &ScoreWeights, set: &IndicatorSet) -> ComponentContribution {
    let Some(rsi) = set.rsi else {
        return undefined("rsi");
    };
    let mut points = match rsi.bias {
        RsiBias::Oversold => weights.rsi,
        RsiBias::Weak => weights.rsi * 0.5,
        RsiBias::Neutral => 0.0,
        RsiBias::Strong => -weights.rsi * 0.5,
        RsiBias::Overbought => -weights.rsi,
    };

    let mut context = "";
    if rsi.bias == RsiBias::Oversold {
        match set.trend_bias(100) {
            Some(TrendBias::Up) => {
                points += weights.rsi_uptrend_bonus;
                context = ", 100d up";
            }
            Some(TrendBias::Down) => {
                points *= weights.rsi_falling_knife_factor;
                context = ", 100d down";
            }
            _ => {}
        }
    }

    component(
        "rsi",
        format!("{:.1} ({}{})", rsi.value, rsi.bias.as_str(), context),
        points,
    )
}

fn sma_position_component(weights: &ScoreWeights, set: &IndicatorSet) -> ComponentContribution {
    let name = format!("sma{}_position", weights.sma_period);
    let Some(pct) = set.distance_from_sma_pct(weights.sma_period) else {
        return undefined(&name);
    };
    let cap = weights.sma_position;
    component(
        &name,
        format!("{:+.2}%", pct),
        (pct * weights.sma_position_scale).clamp(-cap, cap),
    )
}

fn trend_component(weights: &ScoreWeights, set: &IndicatorSet) -> ComponentContribution {
    let name = format!("trend{}", weights.sma_period);
    let Some(bias) = set.trend_bias(weights.sma_period) else {
        return undefined(&name);
    };
    let points = match bias {
        TrendBias::Up => weights.trend,
        TrendBias::Down => -weights.trend,
        TrendBias::Sideways => 0.0,
    };
    component(&name, bias.as_str(), points)
}

fn sma50_distance_component(weights: &ScoreWeights, set: &IndicatorSet) -> ComponentContribution {
    let Some(pct) = set.distance_from_sma_pct(50) else {
        return undefined("sma50_distance");
    };
    let cap = weights.sma50_distance;
    component(
        "sma50_distance",
        format!("{:+.2}%", pct),
        (pct * weights.sma50_distance_scale).clamp(-cap, cap),
    )
}

/// 변동성 성분. WILD의 크기만 회복력 구간에 따라 조정합니다.
fn volatility_component(weights: &ScoreWeights, set: &IndicatorSet) -> ComponentContribution {
    let Some(vol) = set.volatility else {
        return undefined("volatility");
    };
    let points = match vol.tier {
        VolatilityTier::Calm => weights.volatility,
        VolatilityTier::Choppy => 0.0,
        VolatilityTier::Wild => {
            -weights.volatility * weights.resilience.wild_multiplier(set.resilience_count)
        }
    };
    component(
        "volatility",
        format!("{:.2}% ({})", vol.sigma_pct, vol.tier.as_str()),
        points,
    )
}
