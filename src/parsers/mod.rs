//! # Parsers
//!
//! The two page transformation passes and the DOM plumbing they share:
//!
//! - `html` - parsing, node lookup, attribute access, serialization
//! - `css` - replacing stylesheet links with inline styles
//! - `link_rewriter` - pointing same-site anchors at local files

pub mod css;
pub mod html;
pub mod link_rewriter;

// Re-export commonly used items for convenience
pub use css::{inline_css, inline_stylesheets, InlineSummary};
pub use html::{find_anchor_hrefs, html_to_dom, serialize_document};
pub use link_rewriter::{rewrite_links, rewrite_links_in_dom, LinkRewriteMap};
