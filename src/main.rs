use std::path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use kingdom_files::cli::Cli;
use kingdom_files::finder::Finder;

fn main() -> Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 初始化日志
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .init();

    cli.validate().context("参数无效")?;

    info!("开始查找 {}", cli.name);
    let start_time = Instant::now();

    let finder = Finder::new(cli.build_options());

    // 为每个指定的路径执行搜索
    for root in &cli.paths {
        debug!("在路径中搜索: {}", root);

        let report = finder
            .search(&cli.name, root)
            .with_context(|| format!("无法搜索 {}", root))?;

        for found in report.matches {
            let found = if cli.absolute {
                path::absolute(&found)
                    .with_context(|| format!("无法转换为绝对路径: {}", found.display()))?
            } else {
                found
            };
            println!("{}", found.display());
        }
    }

    let elapsed = start_time.elapsed();
    info!("搜索完成，耗时 {:.2?}", elapsed);

    Ok(())
}
