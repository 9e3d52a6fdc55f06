//! # Sitesnap
//!
//! Saves a website for offline browsing: the base page plus the subpages it
//! links to that match a whitelist, each with its stylesheets inlined and its
//! same-site links pointing at the saved files.
//!
//! ## Module organization
//!
//! - `core` - snapshot pipeline, options, errors and the per-page report
//! - `env` - configuration through environment variables
//! - `network` - fetching pages and stylesheets
//! - `parsers` - HTML parsing, CSS inlining and link rewriting
//! - `output` - the snapshot directory and the files written into it
//! - `utils` - URL normalization and file name sanitization
//! - `whitelist` - selection of in-scope subpages

pub mod core;
pub mod env;
pub mod network;
pub mod output;
pub mod parsers;
pub mod utils;
pub mod whitelist;

// Re-export commonly used items for convenience
pub use crate::core::{
    create_snapshot, find_subpages, run, transform_page, CancellationToken, PageOutcome,
    PageRecord, PageReport, Snapshot, SnapshotError, SnapshotOptions, SnapshotReport,
};
pub use crate::network::{FetchFailure, Fetcher, Session};
pub use crate::parsers::{inline_css, rewrite_links, LinkRewriteMap};
pub use crate::utils::{normalize_url, sanitize_file_name};
pub use crate::whitelist::{is_in_scope, EmptyPolicy, MatchMode, Whitelist};
