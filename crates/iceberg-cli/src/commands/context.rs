//! 명령어 공통 실행 컨텍스트.
//!
//! 설정 로드, 가중치 프로파일 선택, 가격 CSV 로드를 한 곳에서 처리합니다.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

use iceberg_analytics::{Evaluator, ScoringProfile};
use iceberg_core::{AppConfig, PriceHistory};

/// 설정과 평가기를 묶은 실행 컨텍스트.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub config: AppConfig,
    pub evaluator: Evaluator,
}

impl CliContext {
    /// 설정 파일(없으면 기본값)과 환경 변수에서 컨텍스트를 생성합니다.
    pub fn load(config_path: &str) -> Result<Self> {
        let config = AppConfig::load(config_path)
            .with_context(|| format!("설정 로드 실패: {}", config_path))?;

        let profile = match &config.scoring.profile_path {
            Some(path) => ScoringProfile::load(path)
                .with_context(|| format!("가중치 프로파일 로드 실패: {}", path.display()))?,
            None => ScoringProfile::production(),
        };

        let evaluator = Evaluator::new(profile).with_lookback(config.data.lookback_bars);
        Ok(Self { config, evaluator })
    }

    /// 종목의 가격 CSV를 로드합니다.
    pub fn load_history(&self, ticker: &str) -> Result<PriceHistory> {
        let path = self.config.data.price_file(ticker);
        load_history_file(ticker, &path)
    }

    /// 기준일을 확정합니다 (미지정 시 마지막 거래일).
    pub fn resolve_as_of(
        &self,
        history: &PriceHistory,
        as_of: Option<NaiveDate>,
    ) -> Result<NaiveDate> {
        match as_of {
            Some(date) => Ok(date),
            None => history
                .last_date()
                .with_context(|| format!("{}: 가격 데이터가 없습니다", history.ticker())),
        }
    }

    /// 기준일까지의 일봉 수가 설정된 최소치보다 적은지 여부.
    pub fn is_short_history(&self, history: &PriceHistory, as_of: NaiveDate) -> bool {
        history.up_to(as_of).len() < self.config.data.min_bars
    }
}

/// CSV 파일에서 가격 이력을 로드합니다.
pub fn load_history_file(ticker: &str, path: &Path) -> Result<PriceHistory> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("가격 파일을 읽을 수 없습니다: {}", path.display()))?;
    let history = PriceHistory::from_csv_str(ticker, &content)
        .with_context(|| format!("가격 파일 형식 오류: {}", path.display()))?;

    debug!(
        ticker = history.ticker(),
        bars = history.len(),
        first = ?history.first_date(),
        last = ?history.last_date(),
        "가격 이력 로드"
    );
    info!("Loaded {} bars for {}", history.len(), history.ticker());
    Ok(history)
}

/// 날짜 문자열 파싱 (YYYY-MM-DD).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {}. Expected YYYY-MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-08-05").unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 5).unwrap()
        );
        assert!(parse_date("08/05/2024").is_err());
    }

    #[test]
    fn test_load_history_file() {
        let dir = std::env::temp_dir().join("iceberg-cli-context-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ABC.csv");
        std::fs::write(&path, "date,close\n2024-01-02,10.5\n2024-01-03,10.8\n").unwrap();

        let history = load_history_file("abc", &path).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.ticker(), "ABC");

        assert!(load_history_file("abc", &dir.join("missing.csv")).is_err());
    }
}
