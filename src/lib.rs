//! 在目录树中按文件名查找文件的库
//!
//! 本库是 kingdom 服务端项目共用的文件查找工具，提供：
//! - 精确的文件名匹配（不支持通配符或正则表达式）
//! - 确定的遍历顺序（深度优先，同级按文件名排序）
//! - 子目录不可读时跳过并记录警告，不会中断搜索
//! - 可选的并行遍历与可取消的搜索
//!
//! # 示例
//!
//! 基本用法：
//! ```no_run
//! let paths = kingdom_files::files::find("orm.py", "/").unwrap();
//! for path in paths {
//!     println!("找到文件: {}", path.display());
//! }
//! ```
//!
//! 需要警告信息或自定义选项时：
//! ```no_run
//! use kingdom_files::finder::{Finder, FindOptions};
//!
//! let options = FindOptions::new()
//!     .with_max_depth(Some(3))   // 最大搜索深度
//!     .with_follow_links(false)  // 不跟随符号链接
//!     .with_parallel(true);      // 并行遍历子目录
//!
//! let report = Finder::new(options).search("orm.py", ".").unwrap();
//! for warning in &report.warnings {
//!     eprintln!("跳过: {}", warning);
//! }
//! ```

pub mod cli;
pub mod errors;
pub mod files;
pub mod finder;

// Re-export main types for convenience
pub use errors::{FindError, FindResult, TraversalWarning, WarningKind};
pub use finder::{CancellationToken, FindOptions, FindReport, Finder};
