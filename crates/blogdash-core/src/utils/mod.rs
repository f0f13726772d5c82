//! Utility functions for string formatting and manipulation.

pub mod format;
pub mod sanitize;

// Re-export commonly used functions at module level
pub use format::{format_date, strip_tags, truncate};
pub use sanitize::{plain_text, sanitize_html};
