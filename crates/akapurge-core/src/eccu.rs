// ── ECCU request document ──
//
// Directory purges are expressed as ECCU metadata: nested
// `match:recursive-dirs` elements, one per path segment, with a
// `revalidate` instruction at every consolidated prefix. The XML travels as
// a string field of the JSON request body.

use std::borrow::Cow;

use serde::Serialize;

use crate::path_tree::{PathNode, PathTree};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const MATCH_ELEMENT: &str = "match:recursive-dirs";
const REVALIDATE_NOW: &str = "<revalidate>now</revalidate>";

/// Property type for hostname-based ECCU requests.
pub const PROPERTY_TYPE_HOST_HEADER: &str = "HOST_HEADER";

/// JSON body for `POST /eccu-api/v1/requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EccuRequest {
    pub metadata: String,
    pub property_name: String,
    pub property_name_exact_match: bool,
    pub property_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_update_emails: Option<Vec<String>>,
}

impl EccuRequest {
    pub fn new(host: &str, tree: &PathTree, notify: Option<&str>) -> Self {
        Self {
            metadata: render_metadata(tree),
            property_name: host.to_owned(),
            property_name_exact_match: true,
            property_type: PROPERTY_TYPE_HOST_HEADER,
            status_update_emails: notify.map(|mail| vec![mail.to_owned()]),
        }
    }
}

/// Serialize a consolidated tree into the `<eccu>` metadata document.
pub fn render_metadata(tree: &PathTree) -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push_str("<eccu>");
    if !tree.is_empty() {
        write_node(&mut out, tree.root());
    }
    out.push_str("</eccu>");
    out
}

fn write_node(out: &mut String, node: &PathNode) {
    if node.is_leaf() {
        out.push_str(REVALIDATE_NOW);
        return;
    }
    for (segment, child) in node.children() {
        out.push('<');
        out.push_str(MATCH_ELEMENT);
        out.push_str(r#" value=""#);
        out.push_str(&escape_attr(segment));
        out.push_str(r#"">"#);
        write_node(out, child);
        out.push_str("</");
        out.push_str(MATCH_ELEMENT);
        out.push('>');
    }
}

fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
