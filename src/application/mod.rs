pub mod cache;
pub mod config;
pub mod history;
pub mod session;

pub use cache::QueryCache;
pub use config::Config;
pub use history::SearchHistory;
pub use session::SearchSession;
