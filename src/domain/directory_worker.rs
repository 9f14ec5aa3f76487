use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::matcher::{self, SearchTerm};

/// 在单个目录已枚举好的文件名列表中查找匹配项
///
/// 不做任何文件系统 I/O，返回由目录路径和原始文件名拼接而成的完整路径。
pub fn scan(directory: &Path, entries: &[OsString], term: &SearchTerm) -> Vec<PathBuf> {
    entries
        .iter()
        .filter(|entry| matcher::matches_os_name(entry, term))
        .map(|entry| directory.join(entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_scan_joins_matching_entries() {
        let dir = PathBuf::from("/home/user/docs");
        let term = SearchTerm::parse("report").unwrap();
        let entries = names(&["report.txt", "notes.md", "Q1_REPORT.xlsx", "report.lnk"]);

        let found = scan(&dir, &entries, &term);

        assert_eq!(found, vec![dir.join("report.txt"), dir.join("Q1_REPORT.xlsx")]);
    }

    #[test]
    fn test_scan_without_matches_is_empty() {
        let term = SearchTerm::parse("invoice").unwrap();
        assert!(scan(Path::new("/tmp"), &names(&["a.txt", "b.txt"]), &term).is_empty());
        assert!(scan(Path::new("/tmp"), &[], &term).is_empty());
    }

    #[test]
    fn test_scan_keeps_spaces_in_paths() {
        let dir = PathBuf::from("/data/my files");
        let term = SearchTerm::parse("plan").unwrap();
        let found = scan(&dir, &names(&["project plan.docx"]), &term);

        assert_eq!(found, vec![dir.join("project plan.docx")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_keeps_raw_bytes_of_non_utf8_names() {
        use std::os::unix::ffi::OsStringExt;

        let dir = PathBuf::from("/data");
        let raw = OsString::from_vec(b"report\xff.txt".to_vec());
        let term = SearchTerm::parse("REPORT").unwrap();

        let found = scan(&dir, &[raw.clone()], &term);

        assert_eq!(found, vec![dir.join(raw)]);
    }
}
