//! 점수 유형 정의.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 점수 유형.
///
/// 두 점수는 같은 지표 입력을 공유하지만 가중치 테이블과 계산 파이프라인은
/// 완전히 독립적입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreType {
    /// 단기(수일~수주) 진입 타이밍 점수
    Trade,
    /// 장기(수개월~수년) 보유 품질 점수
    Investment,
}

impl ScoreType {
    /// 모든 점수 유형
    pub const ALL: [ScoreType; 2] = [ScoreType::Trade, ScoreType::Investment];

    /// 백테스트 보정에 사용하는 선행 수익률 기간 (달력일).
    ///
    /// Trade는 1개월, Investment는 3개월.
    pub fn calibration_horizon_days(&self) -> i64 {
        match self {
            ScoreType::Trade => 30,
            ScoreType::Investment => 90,
        }
    }

    /// 표시용 이름
    pub fn display_name(&self) -> &'static str {
        match self {
            ScoreType::Trade => "Trade Score",
            ScoreType::Investment => "Investment Score",
        }
    }
}

impl fmt::Display for ScoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreType::Trade => write!(f, "trade"),
            ScoreType::Investment => write!(f, "investment"),
        }
    }
}

impl std::str::FromStr for ScoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trade" => Ok(Self::Trade),
            "investment" | "invest" => Ok(Self::Investment),
            _ => Err(format!("Unknown score type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_type_parse() {
        assert_eq!("Trade".parse::<ScoreType>().unwrap(), ScoreType::Trade);
        assert_eq!("invest".parse::<ScoreType>().unwrap(), ScoreType::Investment);
        assert!("swing".parse::<ScoreType>().is_err());
    }

    #[test]
    fn test_calibration_horizon() {
        assert_eq!(ScoreType::Trade.calibration_horizon_days(), 30);
        assert_eq!(ScoreType::Investment.calibration_horizon_days(), 90);
    }
}
