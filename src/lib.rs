// 三层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{matches, ResultSet, SearchError, SearchTerm, TraversalScheduler};
pub use application::{Config, QueryCache, SearchHistory, SearchSession};
pub use infrastructure::{ErrorLogger, ErrorType, Logger, LoggerTrait};
pub use presentation::{error_status, status_message, SearchSummary};
