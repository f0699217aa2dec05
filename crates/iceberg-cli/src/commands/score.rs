//! 점수 명령어.
//!
//! 종목별 Trade / Investment 점수를 계산해 표로 출력합니다.
//! Turnaround 모드가 활성화된 점수에는 ⚡ 표시가 붙습니다.
//!
//! # 사용 예시
//!
//! ```bash
//! iceberg score META NVDA
//! iceberg score META --as-of 2024-08-05 --json
//! ```

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{info, warn};

use iceberg_analytics::{score_bar, Evaluation, ScoreCache, ScoreResult, ScoreService};

use super::context::CliContext;

const BAR_WIDTH: usize = 20;

/// 점수 CLI 설정
#[derive(Debug, Clone)]
pub struct ScoreCliConfig {
    /// 종목 심볼 목록
    pub tickers: Vec<String>,
    /// 기준일 (None이면 종목별 마지막 거래일)
    pub as_of: Option<NaiveDate>,
    /// JSON 출력 여부
    pub json: bool,
}

/// 점수 계산 실행
pub async fn run_score(ctx: &CliContext, config: ScoreCliConfig) -> Result<Vec<Arc<Evaluation>>> {
    let service = ScoreService::new(ctx.evaluator.clone(), ScoreCache::new());
    let mut evaluations = Vec::with_capacity(config.tickers.len());

    for ticker in &config.tickers {
        let history = Arc::new(ctx.load_history(ticker)?);
        let as_of = ctx.resolve_as_of(&history, config.as_of)?;

        if ctx.is_short_history(&history, as_of) {
            warn!(
                ticker = history.ticker(),
                %as_of,
                min_bars = ctx.config.data.min_bars,
                "데이터 부족: 일부 지표가 미정의 상태로 계산됩니다"
            );
        }

        match service.select(history, as_of).await? {
            Some(evaluation) => evaluations.push(evaluation),
            None => warn!(%ticker, "평가가 대체되어 결과를 건너뜁니다"),
        }
    }

    info!("Scored {} tickers", evaluations.len());

    if config.json {
        let plain: Vec<&Evaluation> = evaluations.iter().map(Arc::as_ref).collect();
        println!("{}", serde_json::to_string_pretty(&plain)?);
    } else {
        print_table(&evaluations);
    }

    Ok(evaluations)
}

fn print_table(evaluations: &[Arc<Evaluation>]) {
    println!(
        "\n{:<8} {:<10} {:>10}  {:<38} {:<38}",
        "TICKER", "DATE", "PRICE", "TRADE", "INVESTMENT"
    );
    println!("{}", "-".repeat(108));

    for eval in evaluations {
        println!(
            "{:<8} {:<10} {:>10.2}  {:<38} {:<38}",
            eval.ticker,
            eval.bar_date,
            eval.price,
            format_cell(&eval.trade),
            format_cell(&eval.investment),
        );
    }

    if evaluations.iter().any(|e| e.any_turnaround_active()) {
        println!("\n⚡ Turnaround 모드: 가격이 SMA50 아래인 동안 Capitulation 점수를 표시합니다");
    }
}

fn format_cell(result: &ScoreResult) -> String {
    let marker = if result.turnaround_active { "⚡" } else { "" };
    format!(
        "{:>3} {} {}{}",
        result.display_rounded(),
        score_bar(result.display_score, BAR_WIDTH),
        result.rating_label,
        marker
    )
}
