/// 按首次出现顺序记录的不重复搜索词
#[derive(Debug, Clone, Default)]
pub struct SearchHistory {
    terms: Vec<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录搜索词，已存在时不改变顺序；返回是否新增
    pub fn record(&mut self, term: &str) -> bool {
        if self.terms.iter().any(|t| t == term) {
            return false;
        }
        self.terms.push(term.to_string());
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.terms
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_first_seen_order() {
        let mut history = SearchHistory::new();
        assert!(history.record("a"));
        assert!(history.record("b"));
        assert!(!history.record("a"));

        assert_eq!(history.entries(), ["a", "b"]);
        assert_eq!(history.get(1), Some("b"));
        assert_eq!(history.get(2), None);
    }

    #[test]
    fn test_case_variants_are_distinct() {
        let mut history = SearchHistory::new();
        history.record("Photo");
        history.record("photo");
        assert_eq!(history.len(), 2);
    }
}
