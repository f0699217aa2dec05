//! 백테스트 명령어.
//!
//! 저장된 일봉 CSV로 과거 기준일마다 점수를 재계산하고
//! 등급별 선행 수익률을 집계합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 최근 6개월, 7일 간격
//! iceberg backtest META
//!
//! # 기간 지정, JSON 저장
//! iceberg backtest META -f 2024-01-01 -t 2024-12-31 -o reports/meta.json
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use iceberg_analytics::{BacktestConfig, BacktestReport, Backtester};

use super::context::CliContext;

/// 백테스트 CLI 설정
#[derive(Debug, Clone, Default)]
pub struct BacktestCliConfig {
    /// 종목 심볼
    pub ticker: String,
    /// 평가 간격 (None이면 설정값)
    pub interval_days: Option<i64>,
    /// 테스트 기간 개월 수 (None이면 설정값)
    pub months: Option<u32>,
    /// 시작일 (옵션)
    pub start_date: Option<NaiveDate>,
    /// 종료일 (옵션)
    pub end_date: Option<NaiveDate>,
    /// 결과 저장 경로 (옵션)
    pub output_path: Option<String>,
    /// JSON 출력 여부
    pub json: bool,
}

/// 앱 설정과 CLI 인자를 합쳐 엔진 백테스트 설정을 만듭니다.
pub fn build_config(ctx: &CliContext, cli: &BacktestCliConfig) -> BacktestConfig {
    let settings = &ctx.config.backtest;
    let mut config = BacktestConfig::default()
        .with_interval_days(cli.interval_days.unwrap_or(settings.interval_days))
        .with_months(cli.months.unwrap_or(settings.months))
        .with_horizons(settings.horizons_days.clone())
        .with_min_bars(ctx.config.data.min_bars);
    config.start = cli.start_date;
    config.end = cli.end_date;
    config
}

/// 백테스트 실행
pub fn run_backtest(ctx: &CliContext, cli: BacktestCliConfig) -> Result<BacktestReport> {
    let history = ctx.load_history(&cli.ticker)?;
    let config = build_config(ctx, &cli);

    info!(
        "Running backtest for {} (interval {}d, horizons {:?})",
        history.ticker(),
        config.interval_days,
        config.horizons_days
    );

    let backtester = Backtester::new(ctx.evaluator.clone(), config);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let report = backtester.run_with_progress(&history, |done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    })?;
    pb.finish_and_clear();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n{}", report.summary());
    }

    if let Some(output_path) = &cli.output_path {
        save_report(&report, output_path)?;
        info!("Report saved to: {}", output_path);
    }

    Ok(report)
}

/// 결과 저장 (.json이면 JSON, 그 외 텍스트 요약)
fn save_report(report: &BacktestReport, path: &str) -> Result<()> {
    let path = Path::new(path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("디렉토리 생성 실패: {}", parent.display()))?;
    }

    let content = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::to_string_pretty(report)?
    } else {
        report.summary()
    };

    std::fs::write(path, content).with_context(|| format!("저장 실패: {}", path.display()))?;
    Ok(())
}
