use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::cache::QueryCache;
use super::config::Config;
use super::history::SearchHistory;
use crate::domain::{
    CancelToken, FsDirectorySource, ResultSet, SearchError, SearchTerm, TraversalScheduler,
};
use crate::infrastructure::{ErrorLogger, LoggerTrait};

/// 遍历期间持有的忙碌标志，释放时自动清除
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// 一次会话：缓存查询结果、记录搜索历史，并在缓存未命中时执行遍历
///
/// 同一时间最多进行一次遍历；缓存和历史只在遍历完整结束后写入。
pub struct SearchSession {
    root: PathBuf,
    sort_results: bool,
    scheduler: TraversalScheduler,
    cache: Mutex<QueryCache>,
    history: Mutex<SearchHistory>,
    busy: AtomicBool,
    active: Mutex<Option<CancelToken>>,
    traversals: AtomicU64,
    logger: Arc<dyn LoggerTrait>,
}

impl SearchSession {
    /// 根据配置创建会话
    pub fn new(config: &Config, logger: Arc<dyn LoggerTrait>, errors: Arc<ErrorLogger>) -> Self {
        let source = FsDirectorySource::new(config.exclude.dirs.iter().cloned());
        let scheduler =
            TraversalScheduler::new(config.effective_pool_size(), Arc::clone(&logger), errors)
                .with_source(Arc::new(source));

        Self::with_scheduler(config, scheduler, logger)
    }

    /// 使用自定义调度器创建会话
    pub fn with_scheduler(
        config: &Config,
        scheduler: TraversalScheduler,
        logger: Arc<dyn LoggerTrait>,
    ) -> Self {
        Self {
            root: config.search.root_path.clone(),
            sort_results: config.search.sort_results,
            scheduler,
            cache: Mutex::new(QueryCache::with_capacity(config.cache.capacity)),
            history: Mutex::new(SearchHistory::new()),
            busy: AtomicBool::new(false),
            active: Mutex::new(None),
            traversals: AtomicU64::new(0),
            logger,
        }
    }

    /// 执行一次查询
    ///
    /// 缓存命中时直接返回；否则遍历根目录，完成后写入缓存和历史。
    /// 已有遍历进行时，未命中缓存的查询返回 [`SearchError::Busy`]。
    pub fn query(&self, raw_term: &str) -> Result<ResultSet, SearchError> {
        let term = SearchTerm::parse(raw_term)?;

        let cached = lock(&self.cache).get(term.as_str());
        if let Some(results) = cached {
            lock(&self.history).record(term.as_str());
            let _ = self
                .logger
                .log_message(&format!("缓存命中: {} ({} 个结果)", term, results.len()));
            return Ok(results);
        }

        let _busy = BusyGuard::acquire(&self.busy).ok_or(SearchError::Busy)?;

        let cancel = CancelToken::new();
        *lock(&self.active) = Some(cancel.clone());
        let outcome = self.scheduler.run_with_cancel(&self.root, &term, &cancel);
        *lock(&self.active) = None;

        let report = outcome?;
        self.traversals.fetch_add(1, Ordering::Relaxed);

        let results = if self.sort_results {
            report.results.sorted()
        } else {
            report.results
        };

        lock(&self.cache).put(term.as_str(), results.clone());
        lock(&self.history).record(term.as_str());

        Ok(results)
    }

    /// 重新执行历史记录中的搜索词
    pub fn select_from_history(&self, term: &str) -> Result<ResultSet, SearchError> {
        self.query(term)
    }

    /// 历史记录快照
    pub fn history(&self) -> Vec<String> {
        lock(&self.history).entries().to_vec()
    }

    /// 取消正在进行的遍历，返回是否有遍历被取消
    pub fn cancel(&self) -> bool {
        match lock(&self.active).as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// 已完成的遍历次数（不含缓存命中）
    pub fn traversal_count(&self) -> u64 {
        self.traversals.load(Ordering::Relaxed)
    }

    pub fn cached_terms(&self) -> usize {
        lock(&self.cache).len()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
