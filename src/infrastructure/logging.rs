use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;

/// 日志记录器trait
pub trait LoggerTrait: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn log_message(&self, message: &str) -> Result<()>;
    fn log_directory(&self, path: &Path, entry_count: usize, status: &str) -> Result<()>;
    fn finalize(&self, term: &str, directories: u64, matches: usize, duration: Duration) -> Result<()>;
}

/// 调试日志记录器（记录搜索过程、目录扫描和调试信息）
pub struct Logger {
    log_file: Arc<Mutex<Option<File>>>,
    log_path: PathBuf,
    enabled: bool,
}

impl Logger {
    /// 创建新的日志记录器，启用时日志文件写在当前目录
    pub fn new(enabled: bool) -> Result<Self> {
        if !enabled {
            return Ok(Self {
                log_file: Arc::new(Mutex::new(None)),
                log_path: PathBuf::new(),
                enabled: false,
            });
        }

        Self::create_in(Path::new("."))
    }

    /// 在指定目录创建启用的日志记录器
    pub fn create_in(dir: &Path) -> Result<Self> {
        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");
        let log_path = dir.join(format!("debug_{}.log", timestamp));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("无法创建日志文件: {}", log_path.display()))?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        file.write_all(&[0xEF, 0xBB, 0xBF])?;
        writeln!(file, "# findname 调试日志")?;
        writeln!(file, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file, "# --------------------------------------------")?;

        Ok(Self {
            log_file: Arc::new(Mutex::new(Some(file))),
            log_path,
            enabled: true,
        })
    }

    /// 获取日志文件路径
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn write_line(&self, line: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let mut guard = self.log_file.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(file) = guard.as_mut() {
            writeln!(file, "[{}] {}", timestamp, line)?;
            file.flush()?;
        }
        Ok(())
    }
}

impl LoggerTrait for Logger {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_message(&self, message: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.write_line(message)
    }

    fn log_directory(&self, path: &Path, entry_count: usize, status: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.write_line(&format!(
            "目录: {} | 文件数: {} | 状态: {}",
            path.display(),
            entry_count,
            status
        ))
    }

    fn finalize(&self, term: &str, directories: u64, matches: usize, duration: Duration) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();
        let mut guard = self.log_file.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(file) = guard.as_mut() {
            writeln!(file, "# --------------------------------------------")?;
            writeln!(file, "# 搜索词: {}", term)?;
            writeln!(file, "# 完成时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
            writeln!(file, "# 总用时: {:.3}秒", duration.as_secs_f64())?;
            writeln!(file, "# 扫描目录数: {}", directories)?;
            writeln!(file, "# 匹配文件数: {}", matches)?;
            file.flush()?;
        }

        Ok(())
    }
}
