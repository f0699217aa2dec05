//! 설정 출력 명령어.

use anyhow::Result;
use serde_json::json;

use super::context::CliContext;

/// 현재 설정과 가중치 프로파일 출력
pub fn run_show_config(ctx: &CliContext, json: bool) -> Result<()> {
    let profile = ctx.evaluator.profile();

    if json {
        let value = json!({
            "config": ctx.config,
            "profile": profile,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("# 앱 설정");
    println!("{}", serde_json::to_string_pretty(&ctx.config)?);
    println!();
    println!("# 가중치 프로파일 (v{})", profile.version);
    println!("{}", profile.to_toml_string()?);
    Ok(())
}
