//! HTML parsing and DOM helpers
//!
//! - `dom`: parsing, node lookup and attribute access
//! - `serializer`: turning a DOM back into text

pub mod dom;
pub mod serializer;

pub use dom::{
    attr_has_token, find_anchor_hrefs, find_nodes_by_name, get_node_attr, get_node_name,
    html_to_dom, set_node_attr, WHITESPACES,
};
pub use serializer::serialize_document;
