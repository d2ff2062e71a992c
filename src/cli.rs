//! kingdom-files 的命令行接口
//!
//! 本模块提供了命令行参数的解析和验证功能。

use std::path::Path;

use clap::Parser;

use crate::errors::FindError;
use crate::finder::filter::NameFilter;
use crate::finder::options::FindOptions;

/// 在目录树中按文件名查找文件
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 要查找的文件名（精确匹配）
    pub name: String,

    /// 搜索路径（默认：当前目录）
    #[arg(default_value = ".")]
    pub paths: Vec<String>,

    /// 最大搜索深度
    #[arg(long, value_name = "NUM")]
    pub max_depth: Option<usize>,

    /// 跟随符号链接
    #[arg(short = 'L', long)]
    pub follow_links: bool,

    /// 不区分大小写的文件名匹配
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// 并行搜索
    #[arg(short = 'p', long)]
    pub parallel: bool,

    /// 并行搜索使用固定的线程数（隐含 --parallel）
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,

    /// 输出绝对路径
    #[arg(long)]
    pub absolute: bool,

    /// 启用调试日志
    #[arg(short, long, conflicts_with = "quiet")]
    pub debug: bool,

    /// 不输出被跳过目录的警告
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// 构建查找选项
    pub fn build_options(&self) -> FindOptions {
        FindOptions::from_cli(self)
    }

    /// 日志级别
    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Info
        }
    }

    /// 验证命令行参数
    pub fn validate(&self) -> Result<(), FindError> {
        NameFilter::new(&self.name)?;

        for path in &self.paths {
            let path = Path::new(path);
            if !path.exists() {
                return Err(FindError::invalid_root(path, "路径不存在"));
            }
        }

        if self.max_depth == Some(0) {
            return Err(FindError::InvalidArgument(
                "Maximum depth must be greater than 0".to_string(),
            ));
        }

        if self.threads == Some(0) {
            return Err(FindError::InvalidArgument(
                "Thread count must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
