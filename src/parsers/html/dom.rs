use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::tendril::{format_tendril, TendrilSink};
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// ASCII whitespace as defined by the HTML standard
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// Parses an already decoded HTML document into a DOM tree.
pub fn html_to_dom(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Collects every element named `node_name` below `node`, in document order.
pub fn find_nodes_by_name(node: &Handle, node_name: &str) -> Vec<Handle> {
    let mut found_nodes = Vec::new();

    if get_node_name(node) == Some(node_name) {
        found_nodes.push(node.clone());
    }

    for child_node in node.children.borrow().iter() {
        found_nodes.append(&mut find_nodes_by_name(child_node, node_name));
    }

    found_nodes
}

pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Sets, replaces or (when `attr_value` is `None`) removes an attribute.
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr: bool = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = attr_value.as_deref() {
                    attrs_mut[i].value.clear();
                    attrs_mut[i].value.push_slice(attr_value);
                } else {
                    attrs_mut.remove(i);
                    continue;
                }
            }

            i += 1;
        }

        if !found_existing_attr {
            if let Some(attr_value) = attr_value {
                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                    value: format_tendril!("{}", attr_value),
                });
            }
        }
    };
}

/// Checks whether a space-separated attribute such as `rel` holds `token`.
pub fn attr_has_token(node: &Handle, attr_name: &str, token: &str) -> bool {
    get_node_attr(node, attr_name).is_some_and(|value| {
        value
            .split(WHITESPACES)
            .any(|part| part.eq_ignore_ascii_case(token))
    })
}

/// Returns the `href` of every anchor in the document, in document order.
pub fn find_anchor_hrefs(document: &Handle) -> Vec<String> {
    find_nodes_by_name(document, "a")
        .iter()
        .filter_map(|anchor| get_node_attr(anchor, "href"))
        .collect()
}
