use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use findname::infrastructure::{ErrorLogger, Logger, LoggerTrait};
use findname::presentation::{
    error_status, print_history, print_results, BusyIndicator, SearchSummary,
};
use findname::{Config, SearchSession};

/// 按文件名查找文件的交互式工具
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 配置文件路径，默认为程序同级目录下的 findname.toml
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// 启用详细日志记录，日志文件将保存到当前目录
    #[clap(long)]
    log: bool,
}

/// 执行一次查询并输出结果
fn run_query(session: &SearchSession, term: &str, from_history: bool) -> Result<()> {
    let mut summary = SearchSummary::new();
    let traversals_before = session.traversal_count();

    let busy = BusyIndicator::start(term.trim());
    let outcome = if from_history {
        session.select_from_history(term)
    } else {
        session.query(term)
    };
    busy.finish();

    match outcome {
        Ok(results) => {
            print_results(&results)?;
            summary.matched_files = results.len();
            summary.from_cache = session.traversal_count() == traversals_before;
            summary.print()?;
        }
        Err(err) => println!("{}", error_status(&err)),
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => Config::default_config_path()?,
    };
    let config = Config::load_or_create(&config_path)?;
    config.validate()?;

    let logger = Arc::new(Logger::new(args.log)?);
    let errors = Arc::new(ErrorLogger::new(args.log)?);

    if logger.is_enabled() {
        println!("日志文件已创建: {}", logger.log_path().display());
        logger.log_message(&format!("配置文件: {}", config_path.display()))?;
        logger.log_message(&format!("搜索根目录: {}", config.search.root_path.display()))?;
        logger.log_message(&format!("工作线程: {}", config.effective_pool_size()))?;
        logger.log_message(&format!("缓存容量: {}", config.cache.capacity))?;
    }

    let session = SearchSession::new(&config, logger.clone(), Arc::clone(&errors));

    println!("Searching file names under {}", session.root().display());
    println!("Type a name to search, :h for history, :<n> to repeat a search, :q to quit");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            ":q" => break,
            ":h" => print_history(&session.history())?,
            command if command.starts_with(':') => {
                let history = session.history();
                let selected = command[1..]
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| history.get(index));
                match selected {
                    Some(term) => run_query(&session, term, true)?,
                    None => println!("Unknown command: {}", command),
                }
            }
            term => run_query(&session, term, false)?,
        }
    }

    errors.print_error_summary();
    errors.finalize()?;

    Ok(())
}
