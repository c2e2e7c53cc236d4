// Tree navigation methods for SourceUnit

use super::source::SourceUnit;
use tree_sitter::Node;

impl SourceUnit {
    /// Find nodes by type anywhere below `node` (pre-order, includes `node`)
    pub fn find_nodes_by_type<'a>(&self, node: &Node<'a>, node_type: &str) -> Vec<Node<'a>> {
        let mut nodes = Vec::new();
        self.find_nodes_by_type_recursive(node, node_type, &mut nodes);
        nodes
    }

    #[allow(clippy::only_used_in_recursion)] // &self used in recursive calls
    fn find_nodes_by_type_recursive<'a>(
        &self,
        node: &Node<'a>,
        node_type: &str,
        nodes: &mut Vec<Node<'a>>,
    ) {
        if node.kind() == node_type {
            nodes.push(*node);
        }

        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                self.find_nodes_by_type_recursive(&child, node_type, nodes);
            }
        }
    }

    /// Find the nearest ancestor whose kind is one of `parent_types`
    pub fn find_parent_of_types<'a>(
        &self,
        node: &Node<'a>,
        parent_types: &[&str],
    ) -> Option<Node<'a>> {
        let mut current = node.parent();
        while let Some(parent) = current {
            if parent_types.contains(&parent.kind()) {
                return Some(parent);
            }
            current = parent.parent();
        }
        None
    }

    /// First node in pre-order below `node` (including `node`) accepted by `pred`
    #[allow(clippy::only_used_in_recursion)] // &self used in recursive calls
    pub fn find_first_descendant<'a, F>(&self, node: &Node<'a>, pred: &F) -> Option<Node<'a>>
    where
        F: Fn(&Node<'a>) -> bool,
    {
        if pred(node) {
            return Some(*node);
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(found) = self.find_first_descendant(&child, pred) {
                return Some(found);
            }
        }
        None
    }

    /// Named children without comments (argument lists may interleave them)
    pub fn named_children_without_comments<'a>(&self, node: &Node<'a>) -> Vec<Node<'a>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect()
    }

    /// Get field text safely
    pub fn get_field_text(&self, node: &Node, field_name: &str) -> Option<String> {
        node.child_by_field_name(field_name)
            .map(|field_node| self.get_node_text(&field_node))
    }
}
