//! Whitespace compaction for template trees.
//!
//! Runs per children list. Adjacent text nodes are merged and trimmed first,
//! nested lists are compacted on the way, then whitespace-only text that
//! cannot affect layout is dropped. Nothing is ever merged or removed across
//! lists.

#[cfg(feature = "napi")]
use napi_derive::napi;

use crate::template::{Container, ElementNode, TemplateNode};
use crate::visitor::{walk_element, walk_root, TemplateVisitor};

/// Elements whose content is whitespace-sensitive and left as is.
const PRESERVED_ELEMENTS: [&str; 2] = ["pre", "textarea"];

/// Sibling pairs whose separating whitespace never renders.
const INSIGNIFICANT_PAIRS: [&str; 4] = ["td", "tr", "li", "div"];

pub fn compact_dom(nodes: &mut Vec<TemplateNode>) {
    walk_root(&mut Compactor, nodes);
}

struct Compactor;

impl TemplateVisitor for Compactor {
    fn visit_children(&mut self, children: &mut Vec<TemplateNode>, container: Container<'_>) {
        merge_and_trim(self, children);
        drop_insignificant(children, container);
    }

    fn visit_element(&mut self, element: &mut ElementNode) {
        if PRESERVED_ELEMENTS.contains(&element.name.as_str()) {
            return;
        }
        walk_element(self, element);
    }
}

fn merge_and_trim(compactor: &mut Compactor, children: &mut Vec<TemplateNode>) {
    let mut i = 0;
    while i < children.len() {
        let mut merged = match children[i].as_text() {
            Some(text) => text.value.clone(),
            None => {
                compactor.visit_node(&mut children[i]);
                i += 1;
                continue;
            }
        };
        while let Some(TemplateNode::Text(next)) = children.get(i + 1) {
            merged.push_str(&next.value);
            children.remove(i + 1);
        }
        if let TemplateNode::Text(text) = &mut children[i] {
            text.value = collapse_whitespace(&merged);
        }
        i += 1;
    }
}

/// Whitespace-only text becomes a single space. Otherwise each leading and
/// trailing whitespace run becomes one space and the rest is kept.
fn collapse_whitespace(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let content = value.trim();
    if content.is_empty() {
        return " ".to_string();
    }
    let mut out = String::with_capacity(content.len() + 2);
    if value.len() != value.trim_start().len() {
        out.push(' ');
    }
    out.push_str(content);
    if value.len() != value.trim_end().len() {
        out.push(' ');
    }
    out
}

fn drop_insignificant(children: &mut Vec<TemplateNode>, container: Container<'_>) {
    let mut i = 0;
    while i < children.len() {
        if children[i].is_whitespace_text() {
            let prev = if i > 0 { children.get(i - 1) } else { None };
            let next = children.get(i + 1);
            if is_removable(prev, next, container) {
                tracing::trace!(index = i, ?container, "dropping whitespace text");
                children.remove(i);
                continue;
            }
        }
        i += 1;
    }
}

/// Lists whose whitespace layout is known. Everywhere else, including the
/// root, whitespace between siblings is kept as a single space.
fn is_layout_container(container: Container<'_>) -> bool {
    matches!(
        container,
        Container::Element("tr" | "table" | "ul" | "div") | Container::Each
    )
}

fn is_removable(
    prev: Option<&TemplateNode>,
    next: Option<&TemplateNode>,
    container: Container<'_>,
) -> bool {
    if let (Some(prev), Some(next)) = (prev, next) {
        if !is_layout_container(container) {
            return false;
        }
        return match (prev.element_name(), next.element_name()) {
            (Some(p), Some(n)) => p == n && INSIGNIFICANT_PAIRS.contains(&p),
            _ => false,
        };
    }

    let neighbour = prev.or(next).and_then(TemplateNode::element_name);
    match container {
        Container::Element("tr") | Container::Each => neighbour == Some("td"),
        Container::Element("table") => neighbour == Some("tbody"),
        Container::Element("ul") => neighbour == Some("li"),
        Container::Element("div") => true,
        _ => false,
    }
}

#[cfg(feature = "napi")]
#[napi]
pub fn compact_template_native(nodes_json: String) -> napi::Result<String> {
    let mut nodes: Vec<TemplateNode> = serde_json::from_str(&nodes_json)
        .map_err(|e| napi::Error::from_reason(format!("Nodes parse error: {}", e)))?;
    compact_dom(&mut nodes);
    serde_json::to_string(&nodes)
        .map_err(|e| napi::Error::from_reason(format!("Serialize error: {}", e)))
}
