// ABOUTME: Recursive visitor traits over the fragment tree, shared and mutable.
// ABOUTME: Includes bottom-up and top-down node removal helpers used by the cleanup passes.

use super::node::{Element, Fragment, Node};

/// Read-only traversal in document order.
///
/// Override the hooks you need; the default `visit_element` descends into children.
pub trait Visitor {
    fn visit_element(&mut self, element: &Element) {
        walk_element(self, element);
    }

    fn visit_text(&mut self, _text: &str) {}

    fn visit_comment(&mut self, _comment: &str) {}
}

pub fn walk_node<V: Visitor + ?Sized>(visitor: &mut V, node: &Node) {
    match node {
        Node::Element(element) => visitor.visit_element(element),
        Node::Text(text) => visitor.visit_text(text),
        Node::Comment(comment) => visitor.visit_comment(comment),
    }
}

pub fn walk_element<V: Visitor + ?Sized>(visitor: &mut V, element: &Element) {
    for child in &element.children {
        walk_node(visitor, child);
    }
}

pub fn walk_fragment<V: Visitor + ?Sized>(visitor: &mut V, fragment: &Fragment) {
    for child in &fragment.children {
        walk_node(visitor, child);
    }
}

/// Mutable traversal over elements in document order.
pub trait VisitorMut {
    fn visit_element_mut(&mut self, element: &mut Element) {
        walk_element_mut(self, element);
    }
}

pub fn walk_element_mut<V: VisitorMut + ?Sized>(visitor: &mut V, element: &mut Element) {
    walk_nodes_mut(visitor, &mut element.children);
}

pub fn walk_nodes_mut<V: VisitorMut + ?Sized>(visitor: &mut V, nodes: &mut [Node]) {
    for node in nodes {
        if let Node::Element(element) = node {
            visitor.visit_element_mut(element);
        }
    }
}

pub fn walk_fragment_mut<V: VisitorMut + ?Sized>(visitor: &mut V, fragment: &mut Fragment) {
    walk_nodes_mut(visitor, &mut fragment.children);
}

/// Remove every node for which `remove` returns true and return how many were removed.
///
/// Children are processed before their parent, so the predicate sees a parent whose
/// subtree has already been cleaned. Sibling order is preserved.
pub fn remove_nodes<F>(nodes: &mut Vec<Node>, remove: &mut F) -> usize
where
    F: FnMut(&Node) -> bool,
{
    let mut removed = 0;
    for node in nodes.iter_mut() {
        if let Node::Element(element) = node {
            removed += remove_nodes(&mut element.children, remove);
        }
    }

    let before = nodes.len();
    nodes.retain(|node| !remove(node));
    removed + (before - nodes.len())
}

/// Remove nodes matching `remove`, top-down.
///
/// A removed node takes its subtree with it, so matches nested inside it are
/// neither visited nor counted. Sibling order is preserved.
pub fn prune_nodes<F>(nodes: &mut Vec<Node>, remove: &mut F) -> usize
where
    F: FnMut(&Node) -> bool,
{
    let before = nodes.len();
    nodes.retain(|node| !remove(node));
    let mut removed = before - nodes.len();
    for node in nodes.iter_mut() {
        if let Node::Element(element) = node {
            removed += prune_nodes(&mut element.children, remove);
        }
    }
    removed
}
