//! CLI 명령어 구현 모듈.

pub mod backtest;
pub mod context;
pub mod diagnose;
pub mod score;
pub mod show_config;
