// Utility functions
pub mod query;
pub mod sanitize;

pub use query::extract_result_count;
