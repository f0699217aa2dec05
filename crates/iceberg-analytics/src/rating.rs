//! 등급 분류 (Rating Classifier).
//!
//! 정규화 점수(0~100)를 범주형 등급으로 변환합니다.
//! 각 구간은 하한을 포함합니다 (85.0 → STRONG BUY).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// 투자 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatingLabel {
    Sell,
    Underperform,
    Hold,
    Outperform,
    Buy,
    StrongBuy,
}

impl RatingLabel {
    /// 높은 등급부터 낮은 등급 순서.
    pub const BEST_TO_WORST: [RatingLabel; 6] = [
        RatingLabel::StrongBuy,
        RatingLabel::Buy,
        RatingLabel::Outperform,
        RatingLabel::Hold,
        RatingLabel::Underperform,
        RatingLabel::Sell,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingLabel::StrongBuy => "STRONG BUY",
            RatingLabel::Buy => "BUY",
            RatingLabel::Outperform => "OUTPERFORM",
            RatingLabel::Hold => "HOLD",
            RatingLabel::Underperform => "UNDERPERFORM",
            RatingLabel::Sell => "SELL",
        }
    }

    /// 표시용 색상 (HEX).
    pub fn color_hex(&self) -> &'static str {
        match self {
            RatingLabel::StrongBuy => "#00ff00",
            RatingLabel::Buy => "#88ff00",
            RatingLabel::Outperform => "#ccff00",
            RatingLabel::Hold => "#888888",
            RatingLabel::Underperform => "#ffaa00",
            RatingLabel::Sell => "#ff0000",
        }
    }
}

impl fmt::Display for RatingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 등급별 하한 점수 테이블.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingThresholds {
    pub strong_buy: f64,
    pub buy: f64,
    pub outperform: f64,
    pub hold: f64,
    pub underperform: f64,
}

impl Default for RatingThresholds {
    /// 기본 테이블: 85 / 70 / 55 / 45 / 30.
    fn default() -> Self {
        Self {
            strong_buy: 85.0,
            buy: 70.0,
            outperform: 55.0,
            hold: 45.0,
            underperform: 30.0,
        }
    }
}

impl RatingThresholds {
    /// 진입 시점 중심의 공격적 변형 (75 / 65 / 55 / 45 / 30).
    pub fn aggressive() -> Self {
        Self {
            strong_buy: 75.0,
            buy: 65.0,
            ..Self::default()
        }
    }

    /// 장기 보유 중심의 선별적 변형 (80 / 70 / 60 / 45 / 30).
    pub fn selective() -> Self {
        Self {
            strong_buy: 80.0,
            outperform: 60.0,
            ..Self::default()
        }
    }

    /// 점수를 등급으로 변환합니다.
    pub fn classify(&self, score: f64) -> RatingLabel {
        if score >= self.strong_buy {
            RatingLabel::StrongBuy
        } else if score >= self.buy {
            RatingLabel::Buy
        } else if score >= self.outperform {
            RatingLabel::Outperform
        } else if score >= self.hold {
            RatingLabel::Hold
        } else if score >= self.underperform {
            RatingLabel::Underperform
        } else {
            RatingLabel::Sell
        }
    }

    /// 하한이 0~100 범위에서 엄격하게 내림차순인지 검증.
    pub fn validate(&self) -> AnalysisResult<()> {
        let bounds = [
            self.strong_buy,
            self.buy,
            self.outperform,
            self.hold,
            self.underperform,
        ];
        if bounds.iter().any(|b| !b.is_finite() || *b < 0.0 || *b > 100.0) {
            return Err(AnalysisError::Profile(format!(
                "등급 하한은 0~100 범위여야 합니다: {bounds:?}"
            )));
        }
        if bounds.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(AnalysisError::Profile(format!(
                "등급 하한은 내림차순이어야 합니다: {bounds:?}"
            )));
        }
        Ok(())
    }
}

/// `█`/`░` 막대로 점수를 표시합니다.
pub fn score_bar(score: f64, width: usize) -> String {
    let ratio = (score / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64) as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
