// SourceUnit - a parsed handle on one Go file
//
// Owns the file content and its tree-sitter tree. Declarations and nodes
// handed out by the extractors borrow from it.

use crate::error::ExtractError;
use crate::language;
use tracing::debug;
use tree_sitter::{Node, Tree};

pub struct SourceUnit {
    pub file_path: String,
    pub content: String,
    tree: Tree,
}

impl SourceUnit {
    /// Parse Go source.
    ///
    /// tree-sitter recovers from syntax errors, so this only fails when the
    /// parser gives up entirely. Use [`SourceUnit::ensure_well_formed`] where a
    /// strict front end is wanted.
    pub fn parse(file_path: &str, content: &str) -> Result<Self, ExtractError> {
        let mut parser = language::go_parser().map_err(|e| ExtractError::Parse {
            path: file_path.to_string(),
            reason: e.to_string(),
        })?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| ExtractError::Parse {
                path: file_path.to_string(),
                reason: "parser returned no tree".to_string(),
            })?;

        debug!(
            "Parsed {} ({} bytes, errors: {})",
            file_path,
            content.len(),
            tree.root_node().has_error()
        );

        Ok(Self {
            file_path: file_path.to_string(),
            content: content.to_string(),
            tree,
        })
    }

    /// Reject trees that contain `ERROR` or `MISSING` nodes
    pub fn ensure_well_formed(&self) -> Result<(), ExtractError> {
        let root = self.root();
        if !root.has_error() {
            return Ok(());
        }

        let reason = match self.first_error_node(&root) {
            Some(node) => {
                let pos = node.start_position();
                format!("syntax error at {}:{}", pos.row + 1, pos.column + 1)
            }
            None => "syntax error".to_string(),
        };

        Err(ExtractError::Parse {
            path: self.file_path.clone(),
            reason,
        })
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get text from a tree-sitter node
    pub fn get_node_text(&self, node: &Node) -> String {
        let start_byte = node.start_byte();
        let end_byte = node.end_byte();

        // Use byte slice but handle UTF-8 boundaries properly
        let content_bytes = self.content.as_bytes();
        if start_byte < content_bytes.len() && end_byte <= content_bytes.len() {
            String::from_utf8_lossy(&content_bytes[start_byte..end_byte]).to_string()
        } else {
            String::new()
        }
    }

    /// Node text with all whitespace removed (`* testing . T` -> `*testing.T`)
    pub fn get_compact_text(&self, node: &Node) -> String {
        self.get_node_text(node)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }

    fn first_error_node<'a>(&self, node: &Node<'a>) -> Option<Node<'a>> {
        if node.is_error() || node.is_missing() {
            return Some(*node);
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.has_error() {
                if let Some(found) = self.first_error_node(&child) {
                    return Some(found);
                }
            }
        }
        None
    }
}
