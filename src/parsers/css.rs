//! CSS inlining
//!
//! Replaces every `<link rel="stylesheet">` of a document with a `<style>`
//! element holding the fetched stylesheet verbatim. Inlining is best-effort
//! per stylesheet: a link whose href is malformed, whose stylesheet cannot be
//! fetched, or whose CSS holds a `</style>` end tag stays as it was.
//!
//! The tree is only walked to plan the replacements; they are applied once
//! the walk is over.

use html5ever::interface::{Attribute, QualName};
use html5ever::tendril::{format_tendril, StrTendril};
use html5ever::tree_builder::{create_element, NodeOrText, TreeSink};
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, RcDom};
use tracing::{debug, warn};

use crate::core::SnapshotError;
use crate::network::session::Fetcher;
use crate::parsers::html::{
    attr_has_token, find_nodes_by_name, get_node_attr, html_to_dom, serialize_document,
};
use crate::utils::url::{resolve_url, Url};

/// Attributes of a stylesheet link that still make sense on a `<style>` element
const CARRIED_OVER_ATTRS: &[&str] = &["media", "title", "nonce"];

/// Counts of what one inlining pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InlineSummary {
    pub inlined: usize,
    pub failed: usize,
}

struct StylesheetReplacement {
    link: Handle,
    css: String,
}

/// Returns `true` for `<link>` elements that reference an external stylesheet.
pub fn is_stylesheet_link(node: &Handle) -> bool {
    attr_has_token(node, "rel", "stylesheet")
        && get_node_attr(node, "href").is_some_and(|href| !href.trim().is_empty())
}

/// Inlines every stylesheet of `dom`, resolving hrefs against `document_url`.
pub fn inline_stylesheets<F: Fetcher + ?Sized>(
    dom: &RcDom,
    fetcher: &F,
    document_url: &Url,
) -> InlineSummary {
    let mut summary = InlineSummary::default();
    let mut replacements: Vec<StylesheetReplacement> = Vec::new();

    for link in find_nodes_by_name(&dom.document, "link") {
        if !is_stylesheet_link(&link) {
            continue;
        }

        let href = get_node_attr(&link, "href").unwrap_or_default();
        let Some(css_url) = resolve_url(document_url, &href) else {
            warn!(%href, "malformed stylesheet URL, keeping link");
            summary.failed += 1;
            continue;
        };

        match fetcher.fetch(&css_url) {
            Ok(css) if closes_style_element(&css) => {
                warn!(url = %css_url, "stylesheet contains </style>, keeping link");
                summary.failed += 1;
            }
            Ok(css) => {
                debug!(url = %css_url, "inlining stylesheet");
                replacements.push(StylesheetReplacement { link, css });
                summary.inlined += 1;
            }
            Err(failure) => {
                warn!(url = %css_url, %failure, "could not fetch stylesheet, keeping link");
                summary.failed += 1;
            }
        }
    }

    for replacement in replacements {
        replace_with_style(dom, &replacement.link, replacement.css);
    }

    summary
}

/// Style contents are raw text, so an end tag inside the CSS would cut the
/// element short once serialized.
fn closes_style_element(css: &str) -> bool {
    css.to_ascii_lowercase().contains("</style")
}

fn replace_with_style(dom: &RcDom, link: &Handle, css: String) {
    let attrs: Vec<Attribute> = CARRIED_OVER_ATTRS
        .iter()
        .filter_map(|attr_name| {
            get_node_attr(link, attr_name).map(|value| Attribute {
                name: QualName::new(None, ns!(), LocalName::from(*attr_name)),
                value: format_tendril!("{}", value),
            })
        })
        .collect();

    let style = create_element(
        dom,
        QualName::new(None, ns!(html), LocalName::from("style")),
        attrs,
    );
    dom.append(&style, NodeOrText::AppendText(StrTendril::from(css)));
    dom.append_before_sibling(link, NodeOrText::AppendNode(style));
    dom.remove_from_parent(link);
}

/// Text-to-text variant of [`inline_stylesheets`].
pub fn inline_css<F: Fetcher + ?Sized>(
    fetcher: &F,
    base_url: &Url,
    html: &str,
) -> Result<String, SnapshotError> {
    let dom = html_to_dom(html);
    inline_stylesheets(&dom, fetcher, base_url);

    Ok(serialize_document(&dom)?)
}
