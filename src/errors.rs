use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for operations that can produce FindError
pub type FindResult<T> = Result<T, FindError>;

/// kingdom-files 的错误类型
///
/// 只有整个搜索无法进行时才返回错误；子目录级别的问题记录为 [`TraversalWarning`]。
#[derive(Debug, Error)]
pub enum FindError {
    /// 根目录不存在、不是目录或无法读取
    #[error("无效的根目录 {}: {reason}", .path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    /// 目标文件名无法匹配任何路径的最后一段
    #[error("无效的文件名: '{0}'")]
    InvalidName(String),

    /// 选项取值无效
    #[error("无效的参数: {0}")]
    InvalidArgument(String),

    /// 无法创建工作线程池
    #[error("线程池错误: {0}")]
    ThreadPool(String),
}

impl FindError {
    pub(crate) fn invalid_root(path: &Path, reason: impl Into<String>) -> Self {
        FindError::InvalidRoot {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Category of a non-fatal traversal problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A directory could not be listed due to permissions
    PermissionDenied,
    /// A followed symbolic link points back to one of its ancestors
    SymlinkLoop,
    /// A followed symbolic link points nowhere
    BrokenLink,
    /// Any other I/O failure
    Io,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WarningKind::PermissionDenied => "权限不足",
            WarningKind::SymlinkLoop => "符号链接循环",
            WarningKind::BrokenLink => "符号链接失效",
            WarningKind::Io => "IO 错误",
        };
        f.write_str(label)
    }
}

/// A part of the tree that was skipped while the search carried on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalWarning {
    pub path: PathBuf,
    pub kind: WarningKind,
    pub message: String,
}

impl TraversalWarning {
    pub fn new(path: impl Into<PathBuf>, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TraversalWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.path.display(), self.message)
    }
}

impl From<walkdir::Error> for TraversalWarning {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        let message = err.to_string();

        if err.loop_ancestor().is_some() {
            return TraversalWarning::new(path, WarningKind::SymlinkLoop, message);
        }

        let kind = match err.io_error().map(io::Error::kind) {
            Some(io::ErrorKind::PermissionDenied) => WarningKind::PermissionDenied,
            Some(io::ErrorKind::NotFound) if is_symlink(&path) => WarningKind::BrokenLink,
            _ => WarningKind::Io,
        };
        TraversalWarning::new(path, kind, message)
    }
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
}
