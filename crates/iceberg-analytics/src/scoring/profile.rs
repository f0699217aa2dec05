//! 버전별 가중치 프로파일.
//!
//! 점수 유형별 가중치, 보너스 크기, `max_points`, 등급 테이블을 데이터로 정의합니다.
//! 과거 버전이나 대안 설계를 같은 엔진에 교체 가능한 설정으로 주입할 수 있습니다.
//!
//! # TOML 예시
//!
//! ```toml
//! version = "1.3"
//!
//! [trade]
//! macd = 25.0
//! rsi = 15.0
//! max_points = 390.0
//! # ...
//!
//! [investment]
//! macd = 15.0
//! # ...
//! ```

use std::path::Path;

use iceberg_core::ScoreType;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::patterns::PatternConfig;
use crate::rating::RatingThresholds;

/// 기본 프로파일 버전.
pub const PRODUCTION_VERSION: &str = "1.3";

/// 패턴 보너스 크기 (회복력 배수 적용 전).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusWeights {
    pub recovery: f64,
    pub post_shock: f64,
    pub cheap_on_winner: f64,
    pub capitulation: f64,
}

/// 회복력 카운트에 따른 배수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResilienceScaling {
    /// 이 값 이상이면 HIGH
    pub high_threshold: usize,
    /// 보너스 배수: LOW (0회)
    pub bonus_low: f64,
    /// 보너스 배수: MEDIUM
    pub bonus_medium: f64,
    /// 보너스 배수: HIGH
    pub bonus_high: f64,
    /// WILD 변동성 배수: LOW
    pub wild_low: f64,
    /// WILD 변동성 배수: HIGH
    pub wild_high: f64,
}

impl Default for ResilienceScaling {
    fn default() -> Self {
        Self {
            high_threshold: 3,
            bonus_low: 0.8,
            bonus_medium: 1.0,
            bonus_high: 1.2,
            wild_low: 1.5,
            wild_high: 0.5,
        }
    }
}

/// 회복력 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResilienceLevel {
    Low,
    Medium,
    High,
}

impl ResilienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResilienceLevel::Low => "LOW",
            ResilienceLevel::Medium => "MEDIUM",
            ResilienceLevel::High => "HIGH",
        }
    }
}

impl ResilienceScaling {
    pub fn level(&self, count: usize) -> ResilienceLevel {
        if count == 0 {
            ResilienceLevel::Low
        } else if count >= self.high_threshold {
            ResilienceLevel::High
        } else {
            ResilienceLevel::Medium
        }
    }

    /// 보너스 배수 (0.8 / 1.0 / 1.2).
    pub fn bonus_multiplier(&self, count: usize) -> f64 {
        match self.level(count) {
            ResilienceLevel::Low => self.bonus_low,
            ResilienceLevel::Medium => self.bonus_medium,
            ResilienceLevel::High => self.bonus_high,
        }
    }

    /// WILD 변동성 기여도 배수 (1.5 / 1.0 / 0.5).
    pub fn wild_multiplier(&self, count: usize) -> f64 {
        match self.level(count) {
            ResilienceLevel::Low => self.wild_low,
            ResilienceLevel::Medium => 1.0,
            ResilienceLevel::High => self.wild_high,
        }
    }
}

/// 한 점수 유형의 가중치 테이블.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// MACD 방향 (±)
    pub macd: f64,
    /// RSI 기본 기여도 (±)
    pub rsi: f64,
    /// 과매도 + 100일 상승 추세일 때 추가 점수
    pub rsi_uptrend_bonus: f64,
    /// 과매도 + 100일 하락 추세일 때 RSI 기여도 배수
    pub rsi_falling_knife_factor: f64,
    /// SMA 위치/추세 판정 기간
    pub sma_period: usize,
    /// SMA 대비 위치 상한 (±)
    pub sma_position: f64,
    /// SMA 대비 괴리율(%) → 점수 환산 배율
    pub sma_position_scale: f64,
    /// 같은 기간 추세 방향 (±)
    pub trend: f64,
    /// SMA50 대비 거리 상한 (±, 0이면 미사용)
    pub sma50_distance: f64,
    /// SMA50 대비 괴리율(%) → 점수 환산 배율
    pub sma50_distance_scale: f64,
    /// 변동성 구간 (±)
    pub volatility: f64,
    /// 보너스 포함 원점수의 최대 크기
    pub max_points: f64,
    pub bonuses: BonusWeights,
    #[serde(default)]
    pub resilience: ResilienceScaling,
    #[serde(default)]
    pub thresholds: RatingThresholds,
}

impl ScoreWeights {
    /// 단기 Trade 가중치 (v1.3).
    pub fn trade() -> Self {
        Self {
            macd: 25.0,
            rsi: 15.0,
            rsi_uptrend_bonus: 10.0,
            rsi_falling_knife_factor: 0.3,
            sma_period: 10,
            sma_position: 20.0,
            sma_position_scale: 2.0,
            trend: 20.0,
            sma50_distance: 0.0,
            sma50_distance_scale: 1.0,
            volatility: 5.0,
            bonuses: BonusWeights {
                recovery: 20.0,
                post_shock: 60.0,
                cheap_on_winner: 15.0,
                capitulation: 205.0,
            },
            resilience: ResilienceScaling::default(),
            max_points: 390.0,
            thresholds: RatingThresholds::default(),
        }
    }

    /// 장기 Investment 가중치 (v1.3).
    pub fn investment() -> Self {
        Self {
            macd: 15.0,
            rsi: 10.0,
            rsi_uptrend_bonus: 0.0,
            rsi_falling_knife_factor: 0.3,
            sma_period: 50,
            sma_position: 20.0,
            sma_position_scale: 2.0,
            trend: 20.0,
            sma50_distance: 15.0,
            sma50_distance_scale: 1.0,
            volatility: 10.0,
            bonuses: BonusWeights {
                recovery: 20.0,
                post_shock: 60.0,
                cheap_on_winner: 15.0,
                capitulation: 60.0,
            },
            resilience: ResilienceScaling::default(),
            max_points: 275.0,
            thresholds: RatingThresholds::default(),
        }
    }

    fn validate(&self, label: &str) -> AnalysisResult<()> {
        if !self.max_points.is_finite() || self.max_points <= 0.0 {
            return Err(AnalysisError::Profile(format!(
                "{label}: max_points는 양수여야 합니다 ({})",
                self.max_points
            )));
        }
        if !matches!(self.sma_period, 10 | 20 | 50 | 100) {
            return Err(AnalysisError::Profile(format!(
                "{label}: sma_period는 10/20/50/100 중 하나여야 합니다 ({})",
                self.sma_period
            )));
        }

        let weights = [
            ("macd", self.macd),
            ("rsi", self.rsi),
            ("rsi_uptrend_bonus", self.rsi_uptrend_bonus),
            ("rsi_falling_knife_factor", self.rsi_falling_knife_factor),
            ("sma_position", self.sma_position),
            ("sma_position_scale", self.sma_position_scale),
            ("trend", self.trend),
            ("sma50_distance", self.sma50_distance),
            ("sma50_distance_scale", self.sma50_distance_scale),
            ("volatility", self.volatility),
            ("bonuses.recovery", self.bonuses.recovery),
            ("bonuses.post_shock", self.bonuses.post_shock),
            ("bonuses.cheap_on_winner", self.bonuses.cheap_on_winner),
            ("bonuses.capitulation", self.bonuses.capitulation),
            ("resilience.bonus_low", self.resilience.bonus_low),
            ("resilience.bonus_medium", self.resilience.bonus_medium),
            ("resilience.bonus_high", self.resilience.bonus_high),
            ("resilience.wild_low", self.resilience.wild_low),
            ("resilience.wild_high", self.resilience.wild_high),
        ];
        if let Some((name, value)) = weights
            .iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(AnalysisError::Profile(format!(
                "{label}: {name}는 0 이상이어야 합니다 ({value})"
            )));
        }

        self.thresholds.validate()
    }
}

/// 버전이 붙은 전체 가중치 프로파일.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfile {
    pub version: String,
    #[serde(default)]
    pub patterns: PatternConfig,
    pub trade: ScoreWeights,
    pub investment: ScoreWeights,
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::production()
    }
}

impl ScoringProfile {
    /// 운영 프로파일 (v1.3).
    pub fn production() -> Self {
        Self {
            version: PRODUCTION_VERSION.to_string(),
            patterns: PatternConfig::default(),
            trade: ScoreWeights::trade(),
            investment: ScoreWeights::investment(),
        }
    }

    /// 점수 유형별 가중치.
    pub fn weights(&self, score_type: ScoreType) -> &ScoreWeights {
        match score_type {
            ScoreType::Trade => &self.trade,
            ScoreType::Investment => &self.investment,
        }
    }

    /// TOML 문자열에서 프로파일을 읽고 검증합니다.
    pub fn from_toml_str(content: &str) -> AnalysisResult<Self> {
        let profile: Self = toml::from_str(content)?;
        profile.validate()?;
        Ok(profile)
    }

    /// TOML 파일에서 프로파일을 읽습니다.
    pub fn load(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::Profile(format!("{} 읽기 실패: {}", path.display(), e))
        })?;
        let profile = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), version = %profile.version, "가중치 프로파일 로드");
        Ok(profile)
    }

    /// TOML 문자열로 직렬화합니다.
    pub fn to_toml_string(&self) -> AnalysisResult<String> {
        toml::to_string_pretty(self).map_err(|e| AnalysisError::Profile(e.to_string()))
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        if self.version.trim().is_empty() {
            return Err(AnalysisError::Profile("version이 비어 있습니다".to_string()));
        }
        self.trade.validate("trade")?;
        self.investment.validate("investment")?;
        Ok(())
    }
}
