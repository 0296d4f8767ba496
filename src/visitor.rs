use crate::template::{AwaitNode, BlockNode, Container, ElementNode, IfNode, TemplateNode, TextNode};

/// The TemplateVisitor trait is the one traversal mechanism for template trees.
///
/// Rules:
/// 1. Children lists are visited in order, each slot of a block in declaration order.
/// 2. Implementers override `visit_*` methods to add behavior.
/// 3. Implementers call the matching `walk_*` function to keep descending. Not
///    calling it prunes the subtree.
pub trait TemplateVisitor {
    fn visit_children(&mut self, children: &mut Vec<TemplateNode>, _container: Container<'_>) {
        walk_children(self, children);
    }

    fn visit_node(&mut self, node: &mut TemplateNode) {
        walk_node(self, node);
    }

    fn visit_text(&mut self, _text: &mut TextNode) {
        // Leaf
    }

    fn visit_element(&mut self, element: &mut ElementNode) {
        walk_element(self, element);
    }

    fn visit_block(&mut self, block: &mut BlockNode, container: Container<'_>) {
        walk_block(self, block, container);
    }

    fn visit_if(&mut self, node: &mut IfNode) {
        walk_if(self, node);
    }

    fn visit_await(&mut self, node: &mut AwaitNode) {
        walk_await(self, node);
    }
}

pub fn walk_root<V: TemplateVisitor + ?Sized>(visitor: &mut V, nodes: &mut Vec<TemplateNode>) {
    visitor.visit_children(nodes, Container::Root);
}

pub fn walk_children<V: TemplateVisitor + ?Sized>(
    visitor: &mut V,
    children: &mut Vec<TemplateNode>,
) {
    for node in children {
        visitor.visit_node(node);
    }
}

pub fn walk_node<V: TemplateVisitor + ?Sized>(visitor: &mut V, node: &mut TemplateNode) {
    match node {
        TemplateNode::Text(t) => visitor.visit_text(t),
        TemplateNode::Node(el) => visitor.visit_element(el),
        TemplateNode::Each(b) => visitor.visit_block(b, Container::Each),
        TemplateNode::Slot(b) => visitor.visit_block(b, Container::Slot),
        TemplateNode::Fragment(b) => visitor.visit_block(b, Container::Fragment),
        TemplateNode::If(n) => visitor.visit_if(n),
        TemplateNode::Await(n) => visitor.visit_await(n),
    }
}

pub fn walk_element<V: TemplateVisitor + ?Sized>(visitor: &mut V, element: &mut ElementNode) {
    visitor.visit_children(&mut element.children, Container::Element(&element.name));
}

pub fn walk_block<V: TemplateVisitor + ?Sized>(
    visitor: &mut V,
    block: &mut BlockNode,
    container: Container<'_>,
) {
    visitor.visit_children(&mut block.children, container);
}

pub fn walk_if<V: TemplateVisitor + ?Sized>(visitor: &mut V, node: &mut IfNode) {
    visitor.visit_children(&mut node.children, Container::If);
    visitor.visit_children(&mut node.else_children, Container::If);
}

pub fn walk_await<V: TemplateVisitor + ?Sized>(visitor: &mut V, node: &mut AwaitNode) {
    visitor.visit_children(&mut node.main, Container::Await);
    visitor.visit_children(&mut node.then, Container::Await);
    visitor.visit_children(&mut node.catch, Container::Await);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        containers: Vec<String>,
        texts: Vec<String>,
    }

    impl TemplateVisitor for Recorder {
        fn visit_children(&mut self, children: &mut Vec<TemplateNode>, container: Container<'_>) {
            self.containers.push(format!("{:?}", container));
            walk_children(self, children);
        }

        fn visit_text(&mut self, text: &mut TextNode) {
            self.texts.push(text.value.clone());
        }

        fn visit_element(&mut self, element: &mut ElementNode) {
            if element.name != "pre" {
                walk_element(self, element);
            }
        }
    }

    #[test]
    fn test_walk_order_and_pruning() {
        let mut nodes = vec![
            TemplateNode::element("div", vec![TemplateNode::text("a")]),
            TemplateNode::If(IfNode {
                children: vec![TemplateNode::text("b")],
                else_children: vec![TemplateNode::text("c")],
            }),
            TemplateNode::element("pre", vec![TemplateNode::text("skipped")]),
            TemplateNode::Each(BlockNode {
                children: vec![TemplateNode::text("d")],
            }),
        ];
        let mut recorder = Recorder::default();
        walk_root(&mut recorder, &mut nodes);

        assert_eq!(recorder.texts, vec!["a", "b", "c", "d"]);
        assert_eq!(
            recorder.containers,
            vec!["Root", "Element(\"div\")", "If", "If", "Each"]
        );
    }
}
