//! 线程池大小计算
//!
//! 根据顶层子目录数量和 CPU 核心数决定并行搜索使用的线程数量。

use log::{debug, info};

use super::options::FindOptions;
use crate::errors::{FindError, FindResult};

/// 线程池配置选项
#[derive(Debug, Clone)]
pub struct ThreadPoolConfig {
    /// 最小线程数
    pub min_threads: usize,
    /// 最大线程数
    pub max_threads: usize,
    /// 每个线程处理的子目录数量
    pub dirs_per_thread: usize,
    /// 是否根据目录数量调整线程数；关闭时固定使用最小线程数
    pub auto_adjust: bool,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self::from(&FindOptions::default())
    }
}

impl From<&FindOptions> for ThreadPoolConfig {
    fn from(options: &FindOptions) -> Self {
        Self {
            min_threads: options.min_threads.max(1),
            max_threads: options.max_threads.max(options.min_threads.max(1)),
            dirs_per_thread: options.dirs_per_thread.max(1),
            auto_adjust: options.auto_adjust,
        }
    }
}

impl ThreadPoolConfig {
    /// 计算处理 `dir_count` 个子目录所需的线程数
    pub fn thread_count(&self, dir_count: usize) -> usize {
        if !self.auto_adjust {
            debug!("Auto-adjust disabled, using {} threads", self.min_threads);
            return self.min_threads;
        }

        let cpu_count = num_cpus::get();
        debug!(
            "Sizing thread pool - dirs: {}, min: {}, max: {}, per_thread: {}, cpus: {}",
            dir_count, self.min_threads, self.max_threads, self.dirs_per_thread, cpu_count
        );

        if dir_count == 0 {
            return self.min_threads;
        }

        dir_count
            .div_ceil(self.dirs_per_thread)
            .max(self.min_threads)
            .min(self.max_threads)
            .min(cpu_count.max(self.min_threads))
    }

    /// 创建处理 `dir_count` 个子目录的 rayon 线程池
    pub fn build(&self, dir_count: usize) -> FindResult<rayon::ThreadPool> {
        let threads = self.thread_count(dir_count).max(1);
        info!("Using {} threads for {} directories", threads, dir_count);

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("kingdom-files-{i}"))
            .build()
            .map_err(|e| FindError::ThreadPool(e.to_string()))
    }
}
