use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;

/// 错误类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// 子目录读取错误（权限、遍历中被删除等），不会中断搜索
    DirectoryRead,
    /// 搜索根目录无法访问
    RootAccess,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DirectoryRead => "目录读取",
            ErrorType::RootAccess => "根目录访问",
        }
    }
}

/// 错误日志记录器
///
/// 无论是否写文件都会统计各类错误的次数。
pub struct ErrorLogger {
    error_file: Arc<Mutex<Option<File>>>,
    error_path: PathBuf,
    enabled: bool,
    error_counts: Arc<Mutex<HashMap<ErrorType, usize>>>,
}

impl ErrorLogger {
    /// 创建新的错误日志记录器，启用时错误日志写在当前目录
    pub fn new(enabled: bool) -> Result<Self> {
        if !enabled {
            return Ok(Self {
                error_file: Arc::new(Mutex::new(None)),
                error_path: PathBuf::new(),
                enabled: false,
                error_counts: Arc::new(Mutex::new(HashMap::new())),
            });
        }

        Self::create_in(Path::new("."))
    }

    /// 在指定目录创建启用的错误日志记录器
    pub fn create_in(dir: &Path) -> Result<Self> {
        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");
        let error_path = dir.join(format!("error_{}.log", timestamp));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&error_path)
            .with_context(|| format!("无法创建错误日志文件: {}", error_path.display()))?;

        file.write_all(&[0xEF, 0xBB, 0xBF])?; // UTF-8 BOM
        writeln!(file, "# findname 错误日志")?;
        writeln!(file, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file, "# ============================================")?;
        writeln!(file)?;

        Ok(Self {
            error_file: Arc::new(Mutex::new(Some(file))),
            error_path,
            enabled: true,
            error_counts: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 记录错误
    pub fn log_error(
        &self,
        error_type: ErrorType,
        path: Option<&Path>,
        message: &str,
        details: Option<&str>,
    ) -> Result<()> {
        {
            let mut counts = self.error_counts.lock().unwrap_or_else(|e| e.into_inner());
            *counts.entry(error_type).or_insert(0) += 1;
        }

        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let mut guard = self.error_file.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(file) = guard.as_mut() {
            writeln!(file, "[{}] {} - {}", timestamp, error_type.as_str(), message)?;
            if let Some(path) = path {
                writeln!(file, "  路径: {}", path.display())?;
            }
            if let Some(detail) = details {
                writeln!(file, "  详细信息: {}", detail)?;
            }
            writeln!(file)?;
            file.flush()?;
        }

        Ok(())
    }

    /// 获取错误统计信息
    pub fn get_error_summary(&self) -> HashMap<ErrorType, usize> {
        self.error_counts
            .lock()
            .map(|counts| counts.clone())
            .unwrap_or_default()
    }

    /// 获取总错误数
    pub fn get_total_errors(&self) -> usize {
        self.get_error_summary().values().sum()
    }

    pub fn has_errors(&self) -> bool {
        self.get_total_errors() > 0
    }

    /// 完成错误日志记录
    pub fn finalize(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let summary = self.get_error_summary();
        let mut guard = self.error_file.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(file) = guard.as_mut() {
            writeln!(file, "# ============================================")?;
            writeln!(file, "# 结束时间: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
            if summary.is_empty() {
                writeln!(file, "# 无错误记录")?;
            } else {
                writeln!(file, "# 错误统计:")?;
                for (error_type, count) in &summary {
                    writeln!(file, "#   {}: {} 次", error_type.as_str(), count)?;
                }
                writeln!(file, "#   总计: {} 个错误", summary.values().sum::<usize>())?;
            }
            file.flush()?;
        }

        Ok(())
    }

    /// 打印错误摘要到控制台
    pub fn print_error_summary(&self) {
        if !self.has_errors() {
            return;
        }

        println!("\n⚠️  搜索过程中有目录无法读取:");
        println!("----------------------------");
        for (error_type, count) in &self.get_error_summary() {
            println!("  {}: {} 次", error_type.as_str(), count);
        }
        println!("  总计: {} 个错误", self.get_total_errors());
        if self.enabled {
            println!("  详细错误信息请查看: {}", self.error_path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_disabled_logger_still_counts() {
        let logger = ErrorLogger::new(false).unwrap();
        assert_eq!(logger.get_total_errors(), 0);

        logger
            .log_error(ErrorType::DirectoryRead, Some(Path::new("/x")), "无法读取目录", None)
            .unwrap();

        assert!(logger.has_errors());
        assert_eq!(logger.get_error_summary().get(&ErrorType::DirectoryRead), Some(&1));
    }

    #[test]
    fn test_error_logging_to_file() {
        let dir = tempdir().unwrap();
        let logger = ErrorLogger::create_in(dir.path()).unwrap();

        logger
            .log_error(
                ErrorType::RootAccess,
                Some(Path::new("/missing")),
                "无法访问根目录",
                Some("No such file or directory"),
            )
            .unwrap();
        logger.finalize().unwrap();

        let content = fs::read_to_string(&logger.error_path).unwrap();
        assert!(content.contains("根目录访问 - 无法访问根目录"));
        assert!(content.contains("/missing"));
        assert!(content.contains("总计: 1 个错误"));
    }

    #[test]
    fn test_error_types() {
        assert_eq!(ErrorType::DirectoryRead.as_str(), "目录读取");
        assert_eq!(ErrorType::RootAccess.as_str(), "根目录访问");
    }
}
