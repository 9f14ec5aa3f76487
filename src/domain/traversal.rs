use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded, Sender};
use ignore::WalkBuilder;

use super::directory_worker;
use super::error::SearchError;
use super::matcher::SearchTerm;
use super::search::ResultSet;
use crate::infrastructure::{ErrorLogger, ErrorType, LoggerTrait};

/// 默认并发工作线程数
pub const DEFAULT_POOL_SIZE: usize = 8;

/// 每个工作线程可排队的目录任务数
const QUEUE_DEPTH_PER_WORKER: usize = 4;

/// 取消标志，可在线程之间共享
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// 单个目录的直接内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    /// 原始文件名（不含路径）
    pub files: Vec<OsString>,
    /// 需要继续枚举的子目录完整路径
    pub subdirectories: Vec<PathBuf>,
}

/// 目录枚举来源
pub trait DirectorySource: Send + Sync {
    fn list(&self, dir: &Path) -> io::Result<DirectoryListing>;
}

/// 基于 `ignore` 遍历器的本地目录枚举
///
/// 每次只读取一层，不跟随符号链接，不应用任何忽略规则；
/// `excluded_dirs` 中的目录名不会被返回。
#[derive(Debug, Clone, Default)]
pub struct FsDirectorySource {
    excluded_dirs: Arc<HashSet<OsString>>,
}

impl FsDirectorySource {
    pub fn new(excluded_dirs: impl IntoIterator<Item = String>) -> Self {
        Self {
            excluded_dirs: Arc::new(excluded_dirs.into_iter().map(OsString::from).collect()),
        }
    }

    fn build_walk(&self, dir: &Path) -> WalkBuilder {
        let mut walker = WalkBuilder::new(dir);
        walker
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .max_depth(Some(1));

        if !self.excluded_dirs.is_empty() {
            let excluded = Arc::clone(&self.excluded_dirs);
            walker.filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir && excluded.contains(entry.file_name()))
            });
        }

        walker
    }
}

impl DirectorySource for FsDirectorySource {
    fn list(&self, dir: &Path) -> io::Result<DirectoryListing> {
        let mut listing = DirectoryListing::default();

        for result in self.build_walk(dir).build() {
            let entry = match result {
                Ok(entry) => entry,
                // 深度 0 的错误表示目录本身无法打开或读取
                Err(err) if err.depth().unwrap_or(0) == 0 => return Err(into_io_error(err)),
                // 单个条目读取失败只跳过该条目
                Err(_) => continue,
            };

            if entry.depth() == 0 {
                continue;
            }
            let Some(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                listing.subdirectories.push(entry.into_path());
            } else if !(entry.path_is_symlink() && entry.path().is_dir()) {
                // 指向目录的链接既不进入也不算作文件
                listing.files.push(entry.file_name().to_os_string());
            }
        }

        Ok(listing)
    }
}

fn into_io_error(err: ignore::Error) -> io::Error {
    let message = err.to_string();
    err.into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message))
}

/// 遍历统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub directories_scanned: u64,
    pub directories_failed: u64,
    pub files_seen: u64,
    pub duration: Duration,
}

/// 一次遍历的完整结果
#[derive(Debug, Clone)]
pub struct TraversalReport {
    pub results: ResultSet,
    pub stats: TraversalStats,
}

struct DirectoryTask {
    directory: PathBuf,
    files: Vec<OsString>,
}

/// 遍历目录树并把每个目录的匹配工作分发到固定大小的工作线程池
///
/// 所有目录 I/O 都在协调线程上串行进行（可能逐目录失败），线程池只并行
/// 内存中的文件名匹配，并不并行化磁盘读取。所有任务在
/// [`TraversalScheduler::run`] 返回之前都会完成。
pub struct TraversalScheduler {
    pool_size: usize,
    source: Arc<dyn DirectorySource>,
    logger: Arc<dyn LoggerTrait>,
    errors: Arc<ErrorLogger>,
}

impl TraversalScheduler {
    /// 创建新的调度器，使用本地文件系统作为目录来源
    pub fn new(pool_size: usize, logger: Arc<dyn LoggerTrait>, errors: Arc<ErrorLogger>) -> Self {
        Self {
            pool_size: pool_size.max(1),
            source: Arc::new(FsDirectorySource::default()),
            logger,
            errors,
        }
    }

    /// 替换目录来源
    pub fn with_source(mut self, source: Arc<dyn DirectorySource>) -> Self {
        self.source = source;
        self
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// 在 `root` 下搜索文件名包含 `term` 的文件
    ///
    /// 只有根目录本身无法访问时才返回 [`SearchError::Traversal`]，
    /// 子目录的错误被记录后按“无匹配”处理。
    pub fn run(&self, root: &Path, term: &SearchTerm) -> Result<TraversalReport, SearchError> {
        self.run_with_cancel(root, term, &CancelToken::new())
    }

    /// 与 [`TraversalScheduler::run`] 相同，但可通过 `cancel` 中止
    ///
    /// 枚举过程中发现取消后不再分发新任务，已排队的任务被丢弃，线程池排空后
    /// 返回 [`SearchError::Cancelled`]，不会返回部分结果。枚举结束后才到达的
    /// 取消不影响已经完整的结果。
    pub fn run_with_cancel(
        &self,
        root: &Path,
        term: &SearchTerm,
        cancel: &CancelToken,
    ) -> Result<TraversalReport, SearchError> {
        let started = Instant::now();
        let root = std::path::absolute(root).map_err(|err| self.root_failure(root, err))?;
        let root_listing = self.open_root(&root)?;

        let _ = self.logger.log_message(&format!(
            "开始搜索: {} | 根目录: {} | 工作线程: {}",
            term,
            root.display(),
            self.pool_size
        ));

        let aborted = AtomicBool::new(false);
        let (mut stats, stopped_early, paths) = thread::scope(|scope| {
            let (task_tx, task_rx) = bounded::<DirectoryTask>(self.pool_size * QUEUE_DEPTH_PER_WORKER);
            let (result_tx, result_rx) = unbounded::<Vec<PathBuf>>();

            for _ in 0..self.pool_size {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                let aborted = &aborted;
                scope.spawn(move || {
                    for task in task_rx.iter() {
                        if aborted.load(Ordering::Relaxed) {
                            continue;
                        }
                        let matches = directory_worker::scan(&task.directory, &task.files, term);
                        if result_tx.send(matches).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(task_rx);
            drop(result_tx);

            let (stats, stopped_early) = self.dispatch(root.clone(), root_listing, &task_tx, cancel);
            if stopped_early {
                aborted.store(true, Ordering::Relaxed);
            }
            drop(task_tx);

            // 按任务完成顺序合并
            let mut paths = Vec::new();
            for batch in result_rx.iter() {
                paths.extend(batch);
            }
            (stats, stopped_early, paths)
        });

        stats.duration = started.elapsed();

        if stopped_early {
            let _ = self.logger.log_message(&format!("搜索已取消: {}", term));
            return Err(SearchError::Cancelled);
        }

        let _ = self
            .logger
            .finalize(term.as_str(), stats.directories_scanned, paths.len(), stats.duration);

        Ok(TraversalReport {
            results: ResultSet::new(paths),
            stats,
        })
    }

    fn open_root(&self, root: &Path) -> Result<DirectoryListing, SearchError> {
        fs::metadata(root)
            .and_then(|metadata| {
                if metadata.is_dir() {
                    Ok(())
                } else {
                    Err(io::Error::new(io::ErrorKind::InvalidInput, "not a directory"))
                }
            })
            .and_then(|_| self.source.list(root))
            .map_err(|err| self.root_failure(root, err))
    }

    fn root_failure(&self, root: &Path, err: io::Error) -> SearchError {
        let _ = self.errors.log_error(
            ErrorType::RootAccess,
            Some(root),
            "无法访问搜索根目录",
            Some(err.to_string().as_str()),
        );
        let _ = self
            .logger
            .log_message(&format!("无法访问搜索根目录 {}: {}", root.display(), err));
        SearchError::traversal(root, err)
    }

    /// 深度优先枚举目录树，每个目录提交一个任务
    ///
    /// 返回统计信息，以及是否因取消而提前停止。
    fn dispatch(
        &self,
        root: PathBuf,
        root_listing: DirectoryListing,
        tasks: &Sender<DirectoryTask>,
        cancel: &CancelToken,
    ) -> (TraversalStats, bool) {
        let mut stats = TraversalStats::default();
        let mut pending = Vec::new();

        if !self.submit(root, root_listing, tasks, &mut pending, &mut stats) {
            return (stats, false);
        }

        while let Some(dir) = pending.pop() {
            if cancel.is_cancelled() {
                return (stats, true);
            }

            match self.source.list(&dir) {
                Ok(listing) => {
                    if !self.submit(dir, listing, tasks, &mut pending, &mut stats) {
                        break;
                    }
                }
                Err(err) => {
                    stats.directories_failed += 1;
                    let _ = self.errors.log_error(
                        ErrorType::DirectoryRead,
                        Some(dir.as_path()),
                        "无法读取目录，已跳过",
                        Some(err.to_string().as_str()),
                    );
                    let _ = self.logger.log_directory(&dir, 0, &format!("已跳过: {}", err));
                }
            }
        }

        (stats, false)
    }

    fn submit(
        &self,
        directory: PathBuf,
        listing: DirectoryListing,
        tasks: &Sender<DirectoryTask>,
        pending: &mut Vec<PathBuf>,
        stats: &mut TraversalStats,
    ) -> bool {
        let DirectoryListing {
            files,
            subdirectories,
        } = listing;

        stats.directories_scanned += 1;
        stats.files_seen += files.len() as u64;
        let _ = self.logger.log_directory(&directory, files.len(), "已提交");

        // 逆序入栈，保持自上而下的枚举顺序
        pending.extend(subdirectories.into_iter().rev());
        tasks.send(DirectoryTask { directory, files }).is_ok()
    }
}
