use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// TEMPLATE TREE
// Parsed markup handed over by the template compiler. Only the shape the
// whitespace pass needs is modelled.
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TemplateNode {
    Text(TextNode),
    Node(ElementNode),
    Each(BlockNode),
    Slot(BlockNode),
    Fragment(BlockNode),
    If(IfNode),
    Await(AwaitNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementNode {
    pub name: String,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockNode {
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfNode {
    #[serde(default)]
    pub children: Vec<TemplateNode>,
    #[serde(default)]
    pub else_children: Vec<TemplateNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwaitNode {
    #[serde(default)]
    pub main: Vec<TemplateNode>,
    #[serde(default)]
    pub then: Vec<TemplateNode>,
    #[serde(default)]
    pub catch: Vec<TemplateNode>,
}

impl TemplateNode {
    pub fn text(value: &str) -> Self {
        TemplateNode::Text(TextNode {
            value: value.to_string(),
        })
    }

    pub fn element(name: &str, children: Vec<TemplateNode>) -> Self {
        TemplateNode::Node(ElementNode {
            name: name.to_string(),
            children,
        })
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            TemplateNode::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Tag name when this is an element.
    pub fn element_name(&self) -> Option<&str> {
        match self {
            TemplateNode::Node(element) => Some(element.name.as_str()),
            _ => None,
        }
    }

    pub fn is_whitespace_text(&self) -> bool {
        matches!(self, TemplateNode::Text(text) if text.value.trim().is_empty())
    }
}

/// The owner of a children list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container<'n> {
    Root,
    Element(&'n str),
    Each,
    Slot,
    Fragment,
    If,
    Await,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tagged_nodes() {
        let json = r#"[
            {"type": "node", "name": "ul", "children": [
                {"type": "each", "children": [{"type": "node", "name": "li"}]}
            ]},
            {"type": "if", "children": [{"type": "text", "value": "yes"}], "elseChildren": []},
            {"type": "await", "main": [], "then": [{"type": "text", "value": " "}]}
        ]"#;
        let nodes: Vec<TemplateNode> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].element_name(), Some("ul"));
        match &nodes[1] {
            TemplateNode::If(node) => assert_eq!(node.children[0].as_text().unwrap().value, "yes"),
            other => panic!("expected if block, got {:?}", other),
        }
        match &nodes[2] {
            TemplateNode::Await(node) => {
                assert!(node.catch.is_empty());
                assert!(node.then[0].is_whitespace_text());
            }
            other => panic!("expected await block, got {:?}", other),
        }
    }
}
