//! # 图片处理工具 — 应用入口
//!
//! 本文件仅负责日志初始化与命令分发。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use clap::Parser;
use image_processor::cli::{self, Cli};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("命令行参数: {:?}", cli);

    if let Err(err) = cli::run(cli) {
        log::error!("❌ 执行失败 [{}]: {}", err.code(), err);
        std::process::exit(1);
    }
}
