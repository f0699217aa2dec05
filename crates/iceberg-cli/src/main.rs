//! Iceberg 점수 엔진 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 마지막 거래일 기준 점수
//! iceberg score META NVDA
//!
//! # 특정 기준일 점수 (JSON 출력)
//! iceberg score META --as-of 2024-08-05 --json
//!
//! # 점수 계산 과정 진단
//! iceberg diagnose META --as-of 2024-08-05
//!
//! # 최근 6개월, 7일 간격 백테스트
//! iceberg backtest META -i 7 --months 6 -o reports/meta.json
//!
//! # 현재 설정과 가중치 프로파일 출력
//! iceberg show-config
//! ```

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use iceberg_core::logging::{init_logging, LogConfig, LogFormat};

mod commands;

use commands::backtest::{run_backtest, BacktestCliConfig};
use commands::context::{parse_date, CliContext};
use commands::diagnose::run_diagnose;
use commands::score::{run_score, ScoreCliConfig};
use commands::show_config::run_show_config;

#[derive(Parser)]
#[command(name = "iceberg")]
#[command(about = "Iceberg - 결정적 Trade/Investment 점수 엔진", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = "config/iceberg.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 종목 점수 계산 (Trade / Investment)
    Score {
        /// 종목 심볼 (여러 개 지정 가능, 예: META NVDA)
        #[arg(required = true)]
        tickers: Vec<String>,

        /// 기준일 (YYYY-MM-DD, 기본: 마지막 거래일)
        #[arg(long)]
        as_of: Option<String>,

        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 점수 계산 과정 진단 (지표, 패턴, 성분별 기여도)
    Diagnose {
        /// 종목 심볼
        ticker: String,

        /// 기준일 (YYYY-MM-DD, 기본: 마지막 거래일)
        #[arg(long)]
        as_of: Option<String>,

        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 과거 점수 재생 및 선행 수익률 검증
    Backtest {
        /// 종목 심볼
        ticker: String,

        /// 평가 간격 (달력일, 기본: 설정값)
        #[arg(short, long)]
        interval: Option<i64>,

        /// 테스트 기간 (개월, 기본: 설정값)
        #[arg(long)]
        months: Option<u32>,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 종료 날짜 (YYYY-MM-DD)
        #[arg(short, long)]
        to: Option<String>,

        /// 결과 저장 경로 (.json이면 JSON, 그 외 텍스트 요약)
        #[arg(short, long)]
        output: Option<String>,

        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 현재 설정과 가중치 프로파일 출력
    ShowConfig {
        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일은 없어도 됨
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let ctx = CliContext::load(&cli.config)?;

    let log_config = LogConfig::new(ctx.config.logging.level.clone()).with_format(
        ctx.config
            .logging
            .format
            .parse::<LogFormat>()
            .unwrap_or(LogFormat::Compact),
    );
    init_logging(log_config).map_err(|e| anyhow!("로깅 초기화 실패: {}", e))?;

    info!(
        config = %cli.config,
        profile = %ctx.evaluator.profile().version,
        "Iceberg CLI 시작"
    );

    let result = match cli.command {
        Commands::Score {
            tickers,
            as_of,
            json,
        } => {
            let as_of = as_of.as_deref().map(parse_date).transpose()?;
            run_score(&ctx, ScoreCliConfig { tickers, as_of, json })
                .await
                .map(|_| ())
        }

        Commands::Diagnose {
            ticker,
            as_of,
            json,
        } => {
            let as_of = as_of.as_deref().map(parse_date).transpose()?;
            run_diagnose(&ctx, &ticker, as_of, json).map(|_| ())
        }

        Commands::Backtest {
            ticker,
            interval,
            months,
            from,
            to,
            output,
            json,
        } => {
            let config = BacktestCliConfig {
                ticker,
                interval_days: interval,
                months,
                start_date: from.as_deref().map(parse_date).transpose()?,
                end_date: to.as_deref().map(parse_date).transpose()?,
                output_path: output,
                json,
            };
            run_backtest(&ctx, config).map(|_| ())
        }

        Commands::ShowConfig { json } => run_show_config(&ctx, json),
    };

    if let Err(e) = &result {
        error!("명령 실패: {:#}", e);
    }
    result
}
