//! 진단 명령어.
//!
//! 한 종목/기준일의 지표, 패턴 판정 근거, 성분별 점수 기여도를 출력합니다.

use anyhow::Result;
use chrono::NaiveDate;
use tracing::warn;

use iceberg_analytics::DiagnosticReport;

use super::context::CliContext;

/// 진단 실행
pub fn run_diagnose(
    ctx: &CliContext,
    ticker: &str,
    as_of: Option<NaiveDate>,
    json: bool,
) -> Result<DiagnosticReport> {
    let history = ctx.load_history(ticker)?;
    let as_of = ctx.resolve_as_of(&history, as_of)?;

    if ctx.is_short_history(&history, as_of) {
        warn!(
            ticker = history.ticker(),
            %as_of,
            "데이터 부족: 최소 {}개 일봉 필요",
            ctx.config.data.min_bars
        );
    }

    let report = DiagnosticReport::build(&ctx.evaluator, &history, as_of)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render());
    }

    Ok(report)
}
