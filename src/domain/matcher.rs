use std::ffi::OsStr;
use std::fmt;

use super::error::SearchError;

/// 不参与匹配的文件后缀（快捷方式文件）
pub const EXCLUDED_SUFFIX: &str = ".lnk";

/// 已规范化的搜索词：去除首尾空白且非空
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTerm {
    raw: String,
    lowered: String,
}

impl SearchTerm {
    /// 从用户输入创建搜索词
    pub fn parse(input: &str) -> Result<Self, SearchError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyTerm);
        }

        Ok(Self {
            raw: trimmed.to_string(),
            lowered: trimmed.to_lowercase(),
        })
    }

    /// 用户输入的原始大小写形式，用作缓存和历史记录的键
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub(crate) fn lowered(&self) -> &str {
        &self.lowered
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// 判断文件名是否包含搜索词（忽略大小写），并排除 `.lnk` 文件
///
/// 空搜索词会匹配所有未被排除的文件，调用方需先用 [`SearchTerm::parse`] 校验。
pub fn matches(file_name: &str, term: &str) -> bool {
    matches_lowered(file_name, &term.to_lowercase())
}

/// 搜索词已经是小写时使用，避免每个文件重复转换
pub(crate) fn matches_lowered(file_name: &str, lowered_term: &str) -> bool {
    let name = file_name.to_lowercase();
    name.contains(lowered_term) && !name.ends_with(EXCLUDED_SUFFIX)
}

/// 非 UTF-8 文件名按替换字符后的形式参与匹配
pub(crate) fn matches_os_name(file_name: &OsStr, term: &SearchTerm) -> bool {
    matches_lowered(&file_name.to_string_lossy(), term.lowered())
}
