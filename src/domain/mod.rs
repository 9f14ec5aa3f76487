pub mod directory_worker;
pub mod error;
pub mod matcher;
pub mod search;
pub mod traversal;

pub use error::SearchError;
pub use matcher::{matches, SearchTerm, EXCLUDED_SUFFIX};
pub use search::ResultSet;
pub use traversal::{
    CancelToken, DirectoryListing, DirectorySource, FsDirectorySource, TraversalReport,
    TraversalScheduler, TraversalStats, DEFAULT_POOL_SIZE,
};
