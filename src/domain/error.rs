use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 搜索过程中可能返回给调用方的错误
#[derive(Debug, Error)]
pub enum SearchError {
    /// 搜索词在去除首尾空白后为空，不会触发遍历
    #[error("search term is empty")]
    EmptyTerm,

    /// 搜索根目录无法访问（不存在、不是目录或没有权限）
    #[error("could not search {}: {source}", .root.display())]
    Traversal {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 已有遍历正在进行
    #[error("a search is already running")]
    Busy,

    /// 遍历被取消，不返回部分结果
    #[error("search was cancelled")]
    Cancelled,
}

impl SearchError {
    pub(crate) fn traversal(root: impl Into<PathBuf>, source: io::Error) -> Self {
        SearchError::Traversal {
            root: root.into(),
            source,
        }
    }
}
