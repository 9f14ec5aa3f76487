use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 一次完成的查询的结果集
///
/// 顺序取决于各目录任务的完成顺序，调用方不应依赖它。克隆只复制引用计数。
/// 保存原始路径，非 UTF-8 文件名也能用于打开文件；显示时再转换为文本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    paths: Arc<[PathBuf]>,
}

impl ResultSet {
    /// 创建新的结果集
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths: paths.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// 按路径排序，得到稳定的输出顺序
    pub fn sorted(&self) -> Self {
        let mut paths = self.paths.to_vec();
        paths.sort();
        Self::new(paths)
    }
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_result_set_basics() {
        let results = ResultSet::new(paths(&["/b/x.txt", "/a/x.txt"]));

        assert_eq!(results.len(), 2);
        assert!(!results.is_empty());
        assert!(results.contains(Path::new("/a/x.txt")));
        assert!(!results.contains(Path::new("/c/x.txt")));
        assert!(ResultSet::default().is_empty());
    }

    #[test]
    fn test_sorted_orders_by_path() {
        let results = ResultSet::new(paths(&["/b/x.txt", "/a/x.txt"]));
        let sorted = results.sorted();

        assert_eq!(sorted.as_slice(), paths(&["/a/x.txt", "/b/x.txt"]).as_slice());
        // 原结果集不受影响
        assert_eq!(results.as_slice()[0], Path::new("/b/x.txt"));
    }
}
