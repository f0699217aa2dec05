//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 점수 가중치 테이블 자체는 `iceberg-analytics`의 `ScoringProfile`이 정의하며,
//! 여기서는 그 프로파일 파일의 위치만 다룹니다.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{IcebergError, IcebergResult};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 가격 데이터 설정
    #[serde(default)]
    pub data: DataConfig,
    /// 백테스트 설정
    #[serde(default)]
    pub backtest: BacktestSettings,
    /// 점수 프로파일 설정
    #[serde(default)]
    pub scoring: ScoringSettings,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// 가격 데이터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// 종목별 CSV 파일이 있는 디렉토리 (`<TICKER>.csv`)
    pub price_dir: PathBuf,
    /// 평가 시 사용할 최대 일봉 수 (기준일 이전)
    pub lookback_bars: usize,
    /// 평가에 필요한 최소 일봉 수 (미만이면 "데이터 부족")
    pub min_bars: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            price_dir: PathBuf::from("data/prices"),
            lookback_bars: 365,
            min_bars: 50,
        }
    }
}

impl DataConfig {
    /// 종목의 가격 CSV 경로를 반환합니다.
    pub fn price_file(&self, ticker: &str) -> PathBuf {
        self.price_dir.join(format!("{}.csv", ticker.to_uppercase()))
    }
}

/// 백테스트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BacktestSettings {
    /// 평가 간격 (달력일)
    pub interval_days: i64,
    /// 기본 테스트 기간 (개월)
    pub months: u32,
    /// 선행 수익률 기간 (달력일)
    pub horizons_days: Vec<i64>,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            interval_days: 7,
            months: 6,
            horizons_days: vec![14, 30, 90],
        }
    }
}

/// 점수 프로파일 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScoringSettings {
    /// 가중치 프로파일 TOML 경로 (없으면 내장 프로덕션 프로파일)
    #[serde(default)]
    pub profile_path: Option<PathBuf>,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> IcebergResult<Self> {
        let defaults = AppConfig::default();

        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("logging.level", defaults.logging.level.clone())?
            .set_default("logging.format", defaults.logging.format.clone())?
            .set_default(
                "data.price_dir",
                defaults.data.price_dir.to_string_lossy().to_string(),
            )?
            .set_default("data.lookback_bars", defaults.data.lookback_bars as i64)?
            .set_default("data.min_bars", defaults.data.min_bars as i64)?
            .set_default("backtest.interval_days", defaults.backtest.interval_days)?
            .set_default("backtest.months", defaults.backtest.months as i64)?
            .set_default("backtest.horizons_days", defaults.backtest.horizons_days.clone())?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("ICEBERG")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> IcebergResult<Self> {
        Self::load("config/iceberg.toml")
    }

    /// 설정 값의 유효성을 검사합니다.
    pub fn validate(&self) -> IcebergResult<()> {
        if self.backtest.interval_days <= 0 {
            return Err(IcebergError::Config(
                "backtest.interval_days는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.backtest.horizons_days.iter().any(|h| *h <= 0) {
            return Err(IcebergError::Config(
                "backtest.horizons_days는 모두 양수여야 합니다".to_string(),
            ));
        }
        if self.data.min_bars == 0 || self.data.lookback_bars < self.data.min_bars {
            return Err(IcebergError::Config(
                "data.lookback_bars는 data.min_bars 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}
