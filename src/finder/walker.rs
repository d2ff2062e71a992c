//! 文件系统遍历功能
//!
//! 本模块封装 walkdir，把遍历过程中的条目和错误转换为 [`WalkItem`]，
//! 子目录级别的错误只产生警告，不会中断遍历。

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::cancel::CancellationToken;
use super::options::FindOptions;
use crate::errors::{FindError, FindResult, TraversalWarning};

/// 遍历产生的单个结果
#[derive(Debug)]
pub enum WalkItem {
    /// 一个目录条目
    Entry(DirEntry),
    /// 被跳过的子树
    Warning(TraversalWarning),
}

/// 使用给定选项处理文件系统遍历
pub struct FileWalker<'a> {
    options: &'a FindOptions,
    cancel: &'a CancellationToken,
}

impl<'a> FileWalker<'a> {
    /// 使用给定选项创建新的 FileWalker
    pub fn new(options: &'a FindOptions, cancel: &'a CancellationToken) -> Self {
        Self { options, cancel }
    }

    /// 检查根目录是否存在、是目录并且可以读取
    pub fn validate_root(path: &Path) -> FindResult<()> {
        let metadata = fs::metadata(path)
            .map_err(|e| FindError::invalid_root(path, e.to_string()))?;

        if !metadata.is_dir() {
            return Err(FindError::invalid_root(path, "不是目录"));
        }

        fs::read_dir(path)
            .map(|_| ())
            .map_err(|e| FindError::invalid_root(path, e.to_string()))
    }

    /// 从给定路径开始遍历整个目录树
    pub fn walk<P: AsRef<Path>>(&self, path: P) -> FileWalkerIterator<'a> {
        self.walk_from(path, 0)
    }

    /// 遍历位于 `base_depth` 层的子目录，深度限制按整棵树计算
    pub fn walk_from<P: AsRef<Path>>(&self, path: P, base_depth: usize) -> FileWalkerIterator<'a> {
        let root_path = path.as_ref().to_path_buf();
        debug!("遍历目录: {} (起始深度 {})", root_path.display(), base_depth);

        let mut walker = WalkDir::new(&root_path)
            .follow_links(self.options.follow_links)
            .sort_by_file_name();

        if let Some(depth) = self.options.max_depth {
            walker = walker.max_depth(depth.saturating_sub(base_depth));
        }

        FileWalkerIterator {
            inner: walker.into_iter(),
            cancel: self.cancel,
            cancelled: false,
            root_path,
        }
    }

    /// 列出根目录的直接子项，按文件名排序
    pub fn children<P: AsRef<Path>>(&self, path: P) -> Vec<WalkItem> {
        let walker = WalkDir::new(path.as_ref())
            .follow_links(self.options.follow_links)
            .sort_by_file_name()
            .min_depth(1)
            .max_depth(1);

        walker
            .into_iter()
            .map(|entry| match entry {
                Ok(entry) => WalkItem::Entry(entry),
                Err(err) => WalkItem::Warning(to_warning(err)),
            })
            .collect()
    }
}

/// 基于迭代器的文件系统遍历器
pub struct FileWalkerIterator<'a> {
    inner: walkdir::IntoIter,
    cancel: &'a CancellationToken,
    cancelled: bool,
    root_path: PathBuf,
}

impl<'a> FileWalkerIterator<'a> {
    /// 遍历是否因取消而提前结束
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// 遍历的起点
    pub fn root(&self) -> &Path {
        &self.root_path
    }
}

impl<'a> Iterator for FileWalkerIterator<'a> {
    type Item = WalkItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cancelled {
            return None;
        }

        match self.inner.next()? {
            Ok(entry) => {
                // walkdir 在返回目录条目之后才会进入该目录
                if entry.file_type().is_dir() && self.cancel.is_cancelled() {
                    debug!("搜索已取消，停止于 {}", entry.path().display());
                    self.cancelled = true;
                    return None;
                }
                Some(WalkItem::Entry(entry))
            }
            Err(err) => Some(WalkItem::Warning(to_warning(err))),
        }
    }
}

fn to_warning(err: walkdir::Error) -> TraversalWarning {
    let warning = TraversalWarning::from(err);
    warn!("跳过 {}", warning);
    warning
}
