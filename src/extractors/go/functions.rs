use super::helpers::{base_type_name, param_type};
use crate::extractors::base::{FunctionDecl, ParamType, Receiver, SourceUnit};
use tree_sitter::Node;

/// Function and method declarations of a Go file
impl SourceUnit {
    /// Top-level `func` declarations (functions and methods) in source order
    pub fn top_level_functions(&self) -> Vec<FunctionDecl<'_>> {
        let root = self.root();
        let mut cursor = root.walk();
        root.named_children(&mut cursor)
            .filter_map(|child| match child.kind() {
                "function_declaration" | "method_declaration" => {
                    self.extract_function_decl(child)
                }
                _ => None,
            })
            .collect()
    }

    fn extract_function_decl<'a>(&'a self, node: Node<'a>) -> Option<FunctionDecl<'a>> {
        let name = self.get_field_text(&node, "name")?;

        let receiver = match node.kind() {
            "method_declaration" => node
                .child_by_field_name("receiver")
                .and_then(|list| self.extract_receiver(list)),
            _ => None,
        };

        let params = node
            .child_by_field_name("parameters")
            .map(|list| self.extract_parameter_list(list))
            .unwrap_or_default();

        Some(FunctionDecl {
            name,
            receiver,
            params,
            node,
        })
    }

    /// Receiver type from `(s *Suite)`, `(s Suite)`, `(*Suite)` or `(s *Suite[T])`
    fn extract_receiver(&self, receiver_list: Node) -> Option<Receiver> {
        let mut cursor = receiver_list.walk();
        let param = receiver_list
            .named_children(&mut cursor)
            .find(|child| child.kind() == "parameter_declaration")?;
        let type_node = param.child_by_field_name("type")?;

        let by_pointer = type_node.kind() == "pointer_type";
        Some(Receiver {
            type_name: base_type_name(self, type_node),
            by_pointer,
        })
    }

    /// One entry per declared parameter; `(a, b *testing.T)` yields two
    fn extract_parameter_list(&self, list: Node) -> Vec<ParamType> {
        let mut parameters = Vec::new();
        let mut cursor = list.walk();

        for child in list.named_children(&mut cursor) {
            match child.kind() {
                "parameter_declaration" => {
                    let Some(type_node) = child.child_by_field_name("type") else {
                        continue;
                    };
                    let param = param_type(self, type_node);
                    let mut names_cursor = child.walk();
                    let names = child.children_by_field_name("name", &mut names_cursor).count();
                    for _ in 0..names.max(1) {
                        parameters.push(param.clone());
                    }
                }
                "variadic_parameter_declaration" => {
                    // `...T` never matches a handle type, keep the spelling as-is
                    parameters.push(ParamType {
                        text: self.get_compact_text(&child),
                        by_pointer: false,
                    });
                }
                _ => {}
            }
        }

        parameters
    }
}
