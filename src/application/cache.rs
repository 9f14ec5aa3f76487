use std::num::NonZeroUsize;

use lru::LruCache;

use crate::domain::ResultSet;

/// 按搜索词缓存完整的结果集
///
/// 键是去除空白后的原始搜索词，区分大小写。默认不限容量；
/// 指定容量时淘汰最久未使用的搜索词。
pub struct QueryCache {
    entries: LruCache<String, ResultSet>,
}

impl QueryCache {
    /// 不限容量的缓存
    pub fn unbounded() -> Self {
        Self {
            entries: LruCache::unbounded(),
        }
    }

    /// 最多保存 `capacity` 个搜索词，0 表示不限容量
    pub fn with_capacity(capacity: usize) -> Self {
        match NonZeroUsize::new(capacity) {
            Some(capacity) => Self {
                entries: LruCache::new(capacity),
            },
            None => Self::unbounded(),
        }
    }

    pub fn get(&mut self, term: &str) -> Option<ResultSet> {
        self.entries.get(term).cloned()
    }

    pub fn put(&mut self, term: &str, results: ResultSet) {
        self.entries.put(term.to_string(), results);
    }

    /// 不影响淘汰顺序的查询
    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains(term)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::unbounded()
    }
}
