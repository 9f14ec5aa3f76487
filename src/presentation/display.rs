use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::{ResultSet, SearchError};

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 结果数量对应的状态文本
pub fn status_message(results: &ResultSet) -> String {
    count_message(results.len())
}

fn count_message(count: usize) -> String {
    match count {
        0 => "No files found".to_string(),
        1 => "1 file found".to_string(),
        n => format!("{} files found", n),
    }
}

/// 错误对应的状态文本
pub fn error_status(err: &SearchError) -> String {
    match err {
        SearchError::EmptyTerm => "Enter a file name".to_string(),
        SearchError::Traversal { .. } => format!("Could not search: {}", err),
        SearchError::Busy => "A search is already running".to_string(),
        SearchError::Cancelled => "Search cancelled".to_string(),
    }
}

/// 输出结果列表，每行一个路径
pub fn print_results(results: &ResultSet) -> Result<()> {
    let mut stdout = io::stdout().lock();

    for (index, path) in results.iter().enumerate() {
        writeln!(stdout, "\x1b[2;37m{:>5}\x1b[0m  \x1b[1;32m{}\x1b[0m", index + 1, path.display())?;
    }

    Ok(())
}

/// 输出历史记录
pub fn print_history(history: &[String]) -> Result<()> {
    let mut stdout = io::stdout().lock();

    if history.is_empty() {
        writeln!(stdout, "No previous searches")?;
        return Ok(());
    }

    for (index, term) in history.iter().enumerate() {
        writeln!(stdout, "  :{}  {}", index + 1, term)?;
    }

    Ok(())
}

/// 搜索进行中的忙碌指示器
pub struct BusyIndicator {
    progress: ProgressBar,
}

impl BusyIndicator {
    pub fn start(term: &str) -> Self {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.set_message(format!("Searching for \"{}\"...", term));
        progress.enable_steady_tick(Duration::from_millis(100));
        Self { progress }
    }

    pub fn finish(self) {
        self.progress.finish_and_clear();
    }
}

/// 搜索摘要
pub struct SearchSummary {
    pub start_time: Instant,
    pub matched_files: usize,
    pub from_cache: bool,
}

impl SearchSummary {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            matched_files: 0,
            from_cache: false,
        }
    }

    pub fn print(&self) -> Result<()> {
        let duration = self.start_time.elapsed();
        let mut stdout = io::stdout().lock();

        writeln!(stdout, "----------------------------")?;
        writeln!(
            stdout,
            "{} in {}{}",
            count_message(self.matched_files),
            format_duration(duration),
            if self.from_cache { " (cached)" } else { "" }
        )?;

        Ok(())
    }
}

impl Default for SearchSummary {
    fn default() -> Self {
        Self::new()
    }
}
