pub mod display;

pub use display::{
    error_status, format_duration, print_history, print_results, status_message, BusyIndicator,
    SearchSummary,
};
