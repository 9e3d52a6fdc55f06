//! # Utilities
//!
//! - `url` - normalization, resolution and same-site checks
//! - `filename` - sanitization of URL-derived strings into local file names

pub mod filename;
pub mod url;

// Re-export commonly used items for convenience
pub use filename::{
    disambiguate_file_stem, html_file_name, local_file_stem, sanitize_file_name, url_file_stem,
    INDEX_FILE_STEM,
};
pub use url::{is_http_url, is_same_site, normalize_url, resolve_url, Url};
