//! 文件查找模块
//!
//! 这个模块提供按文件名在目录树中查找文件的功能，
//! 包括顺序遍历、可选的并行遍历以及可取消的搜索。

pub mod cancel;
pub mod filter;
pub mod options;
mod thread_pool;
pub mod walker;

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

pub use self::cancel::CancellationToken;
pub use self::filter::{FileFilter, NameFilter};
pub use self::options::FindOptions;
pub use thread_pool::ThreadPoolConfig;

use self::walker::{FileWalker, WalkItem};
use crate::errors::{FindResult, TraversalWarning};

/// 一次搜索的结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FindReport {
    /// 匹配的文件路径，按遍历顺序排列
    pub matches: Vec<PathBuf>,
    /// 被跳过的子树
    pub warnings: Vec<TraversalWarning>,
    /// 搜索是否被取消；取消时 `matches` 只包含已找到的部分
    pub cancelled: bool,
}

impl FindReport {
    fn merge(&mut self, other: FindReport) {
        self.matches.extend(other.matches);
        self.warnings.extend(other.warnings);
        self.cancelled |= other.cancelled;
    }

    fn record<F: FileFilter>(&mut self, item: WalkItem, filter: &F) {
        match item {
            WalkItem::Entry(entry) => {
                if filter.matches(&entry) {
                    debug!("匹配: {}", entry.path().display());
                    self.matches.push(entry.into_path());
                }
            }
            WalkItem::Warning(warning) => self.warnings.push(warning),
        }
    }
}

/// 文件查找器
///
/// 每次调用都是独立的：不缓存结果，不保留任何状态。
#[derive(Debug, Clone, Default)]
pub struct Finder {
    options: FindOptions,
}

impl Finder {
    /// 创建新的文件查找器实例
    pub fn new(options: FindOptions) -> Self {
        Self { options }
    }

    /// 查找器使用的选项
    pub fn options(&self) -> &FindOptions {
        &self.options
    }

    /// 在 `root` 下查找名为 `name` 的文件，只返回匹配的路径
    pub fn find<P: AsRef<Path>>(&self, name: &str, root: P) -> FindResult<Vec<PathBuf>> {
        Ok(self.search(name, root)?.matches)
    }

    /// 在 `root` 下查找名为 `name` 的文件，同时返回遍历中的警告
    pub fn search<P: AsRef<Path>>(&self, name: &str, root: P) -> FindResult<FindReport> {
        self.search_with_cancel(name, root, &CancellationToken::new())
    }

    /// 可取消的搜索
    pub fn search_with_cancel<P: AsRef<Path>>(
        &self,
        name: &str,
        root: P,
        cancel: &CancellationToken,
    ) -> FindResult<FindReport> {
        let filter = if self.options.ignore_case {
            NameFilter::new_ignore_case(name)?
        } else {
            NameFilter::new(name)?
        };
        self.find_with(root, &filter, cancel)
    }

    /// 使用任意过滤器在指定目录中查找
    pub fn find_with<P, F>(&self, root: P, filter: &F, cancel: &CancellationToken) -> FindResult<FindReport>
    where
        P: AsRef<Path>,
        F: FileFilter + Sync,
    {
        let root = root.as_ref();
        FileWalker::validate_root(root)?;

        info!("Starting search in {}: {}", root.display(), filter.description());
        let start = Instant::now();

        let report = if self.options.parallel && !self.options.follow_links {
            self.find_parallel(root, filter, cancel)?
        } else {
            if self.options.parallel {
                debug!("跟随符号链接时无法并行检测循环，改为顺序遍历");
            }
            self.find_sequential(root, filter, cancel)
        };

        info!(
            "Search finished in {:.2?}: {} match(es), {} skipped{}",
            start.elapsed(),
            report.matches.len(),
            report.warnings.len(),
            if report.cancelled { ", cancelled" } else { "" }
        );
        Ok(report)
    }

    fn find_sequential<F: FileFilter>(&self, root: &Path, filter: &F, cancel: &CancellationToken) -> FindReport {
        let walker = FileWalker::new(&self.options, cancel);
        let mut iter = walker.walk(root);
        let mut report = FindReport::default();

        for item in iter.by_ref() {
            report.record(item, filter);
        }
        report.cancelled = iter.was_cancelled();
        report
    }

    /// 并行查找文件
    ///
    /// 根目录的直接子目录分别在线程池中遍历，结果按子目录的排序顺序拼接，
    /// 因此与顺序遍历的结果相同。
    fn find_parallel<F>(&self, root: &Path, filter: &F, cancel: &CancellationToken) -> FindResult<FindReport>
    where
        F: FileFilter + Sync,
    {
        if self.options.max_depth == Some(0) {
            return Ok(FindReport::default());
        }
        if cancel.is_cancelled() {
            return Ok(FindReport {
                cancelled: true,
                ..FindReport::default()
            });
        }

        let children = FileWalker::new(&self.options, cancel).children(root);
        let dir_count = children
            .iter()
            .filter(|item| matches!(item, WalkItem::Entry(e) if e.file_type().is_dir()))
            .count();

        let pool = ThreadPoolConfig::from(&self.options).build(dir_count)?;

        let descend = self.options.max_depth.map_or(true, |depth| depth > 1);
        let partials: Vec<FindReport> = pool.install(|| {
            children
                .into_par_iter()
                .map(|item| {
                    let mut partial = FindReport::default();
                    match item {
                        WalkItem::Entry(entry) if entry.file_type().is_dir() => {
                            if descend {
                                let walker = FileWalker::new(&self.options, cancel);
                                let mut iter = walker.walk_from(entry.path(), 1);
                                for item in iter.by_ref() {
                                    partial.record(item, filter);
                                }
                                partial.cancelled = iter.was_cancelled();
                            }
                        }
                        item => partial.record(item, filter),
                    }
                    partial
                })
                .collect()
        });

        let mut report = FindReport::default();
        for partial in partials {
            report.merge(partial);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap().write_all(b"test content").unwrap();
    }

    #[test]
    fn test_finder_basic() {
        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();
        touch(&base_path.join("kingdom_core/orm.py"));
        touch(&base_path.join("kingdom_core/models.py"));

        let finder = Finder::new(FindOptions::default());
        let results = finder.find("orm.py", base_path).unwrap();

        assert_eq!(results, vec![base_path.join("kingdom_core/orm.py")]);
    }

    #[test]
    fn test_finder_sibling_order() {
        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();
        touch(&base_path.join("b/orm.py"));
        touch(&base_path.join("a/orm.py"));
        touch(&base_path.join("orm.py"));

        let finder = Finder::new(FindOptions::default());
        let results = finder.find("orm.py", base_path).unwrap();

        assert_eq!(
            results,
            vec![
                base_path.join("a/orm.py"),
                base_path.join("b/orm.py"),
                base_path.join("orm.py"),
            ]
        );
    }

    #[test]
    fn test_finder_parallel_matches_sequential() {
        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();
        for dir in ["a", "b/c", "b/d/e", "f", "g/h"] {
            touch(&base_path.join(dir).join("orm.py"));
            touch(&base_path.join(dir).join("other.py"));
        }
        touch(&base_path.join("orm.py"));

        let sequential = Finder::new(FindOptions::default()).search("orm.py", base_path).unwrap();
        let parallel = Finder::new(FindOptions::default().with_parallel(true))
            .search("orm.py", base_path)
            .unwrap();

        assert_eq!(sequential.matches.len(), 6);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_finder_parallel_respects_max_depth() {
        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();
        touch(&base_path.join("orm.py"));
        touch(&base_path.join("a/orm.py"));
        touch(&base_path.join("a/b/orm.py"));

        for parallel in [false, true] {
            let options = FindOptions::default().with_parallel(parallel);

            let finder = Finder::new(options.clone().with_max_depth(Some(1)));
            assert_eq!(finder.find("orm.py", base_path).unwrap(), vec![base_path.join("orm.py")]);

            let finder = Finder::new(options.clone().with_max_depth(Some(2)));
            assert_eq!(finder.find("orm.py", base_path).unwrap().len(), 2);

            let finder = Finder::new(options.with_max_depth(Some(0)));
            assert!(finder.find("orm.py", base_path).unwrap().is_empty());
        }
    }

    #[test]
    fn test_finder_ignore_case() {
        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();
        touch(&base_path.join("src/ORM.py"));

        let finder = Finder::new(FindOptions::default());
        assert!(finder.find("orm.py", base_path).unwrap().is_empty());

        let finder = Finder::new(FindOptions::default().with_ignore_case(true));
        assert_eq!(finder.find("orm.py", base_path).unwrap(), vec![base_path.join("src/ORM.py")]);
    }

    #[test]
    fn test_finder_cancelled() {
        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();
        touch(&base_path.join("a/orm.py"));

        let cancel = CancellationToken::new();
        cancel.cancel();

        for parallel in [false, true] {
            let finder = Finder::new(FindOptions::default().with_parallel(parallel));
            let report = finder.search_with_cancel("orm.py", base_path, &cancel).unwrap();
            assert!(report.cancelled);
            assert!(report.matches.is_empty());
        }
    }

    /// Cancels the search as soon as it sees its first match
    struct CancelOnMatch {
        inner: NameFilter,
        cancel: CancellationToken,
    }

    impl FileFilter for CancelOnMatch {
        fn matches(&self, entry: &walkdir::DirEntry) -> bool {
            let matched = self.inner.matches(entry);
            if matched {
                self.cancel.cancel();
            }
            matched
        }

        fn description(&self) -> String {
            format!("{}, then cancel", self.inner.description())
        }
    }

    #[test]
    fn test_finder_cancelled_midway_keeps_partial_matches() {
        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();
        for dir in ["a", "b", "c"] {
            touch(&base_path.join(dir).join("orm.py"));
        }

        let cancel = CancellationToken::new();
        let filter = CancelOnMatch {
            inner: NameFilter::new("orm.py").unwrap(),
            cancel: cancel.clone(),
        };

        let finder = Finder::new(FindOptions::default());
        let report = finder.find_with(base_path, &filter, &cancel).unwrap();

        assert!(report.cancelled);
        assert_eq!(report.matches, vec![base_path.join("a/orm.py")]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_finder_is_idempotent() {
        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();
        touch(&base_path.join("x/orm.py"));
        touch(&base_path.join("y/z/orm.py"));

        let finder = Finder::new(FindOptions::default());
        let first = finder.search("orm.py", base_path).unwrap();
        let second = finder.search("orm.py", base_path).unwrap();
        assert_eq!(first, second);
    }

    #[cfg(unix)]
    #[test]
    fn test_finder_skips_unreadable_dir() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();
        touch(&base_path.join("orm.py"));
        let locked = base_path.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root can list anything
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            eprintln!("skipped test_finder_skips_unreadable_dir: running with privileges that bypass 0o000");
            return;
        }

        for parallel in [false, true] {
            let finder = Finder::new(FindOptions::default().with_parallel(parallel));
            let report = finder.search("orm.py", base_path).unwrap();

            assert_eq!(report.matches, vec![base_path.join("orm.py")]);
            assert_eq!(report.warnings.len(), 1);
            assert_eq!(report.warnings[0].kind, crate::errors::WarningKind::PermissionDenied);
            assert_eq!(report.warnings[0].path, locked);
        }

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_finder_symlink_loop_terminates() {
        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();
        touch(&base_path.join("a/orm.py"));
        std::os::unix::fs::symlink(base_path, base_path.join("a/loop")).unwrap();

        let finder = Finder::new(FindOptions::default().with_follow_links(true));
        let report = finder.search("orm.py", base_path).unwrap();

        assert_eq!(report.matches, vec![base_path.join("a/orm.py")]);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.kind == crate::errors::WarningKind::SymlinkLoop));
    }

    #[cfg(unix)]
    #[test]
    fn test_finder_symlinked_dir_not_followed_by_default() {
        let temp_dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        touch(&outside.path().join("orm.py"));
        let base_path = temp_dir.path();
        std::os::unix::fs::symlink(outside.path(), base_path.join("linked")).unwrap();

        let finder = Finder::new(FindOptions::default());
        assert!(finder.find("orm.py", base_path).unwrap().is_empty());

        let finder = Finder::new(FindOptions::default().with_follow_links(true));
        assert_eq!(finder.find("orm.py", base_path).unwrap(), vec![base_path.join("linked/orm.py")]);
    }
}
