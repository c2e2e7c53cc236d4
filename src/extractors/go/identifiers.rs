//! Identifier and type resolution for suite instances.
//!
//! `suite.Run(t, &S{})`, `suite.Run(t, new(S))`, `suite.Run(t, s)` with
//! `s := S{}` and `suite.Run(t, p)` with `p := &S{}` all resolve to `S`.
//! Resolution is syntactic and file-local; when no binding is found the
//! identifier's own text is returned as a [`Resolution::Fallback`].

use super::helpers::{base_type_name, SKIP_IDENTS};
use crate::extractors::base::{Resolution, SourceUnit};
use std::collections::HashMap;
use tracing::trace;
use tree_sitter::Node;

/// Bounds identifier-to-identifier chains (`a := b; b := a` never terminates otherwise)
const MAX_RESOLVE_DEPTH: usize = 8;

const IDENTIFIER_KINDS: &[&str] = &["identifier", "type_identifier", "package_identifier"];

const FUNCTION_KINDS: &[&str] = &["function_declaration", "method_declaration"];

/// Nodes that open a scope for the `:=` and `var` declarations inside them
const LOCAL_SCOPE_KINDS: &[&str] = &[
    "block",
    "if_statement",
    "for_statement",
    "expression_switch_statement",
    "type_switch_statement",
    "expression_case",
    "type_case",
    "communication_case",
    "default_case",
    "func_literal",
    "function_declaration",
    "method_declaration",
];

/// First identifier-like node in `expr`, skipping wrapper identifiers such as `new`
pub fn first_identifier<'a>(unit: &SourceUnit, expr: Node<'a>) -> Option<Node<'a>> {
    unit.find_first_descendant(&expr, &|node: &Node<'a>| {
        IDENTIFIER_KINDS.contains(&node.kind())
            && !SKIP_IDENTS.contains(&unit.get_node_text(node).as_str())
    })
}

/// Where a name gets its type from
#[derive(Debug, Clone, Copy)]
enum Binding<'a> {
    /// `var s *S`, a parameter `s S`
    Typed(Node<'a>),
    /// `s := &S{}`, `var s = new(S)`
    Value(Node<'a>),
    /// `a, s := build()`: result `index` of a call
    CallResult(Node<'a>, usize),
}

/// Best-effort binder for one source unit
pub struct TypeResolver<'a> {
    unit: &'a SourceUnit,
    /// Package-level `var` bindings by name
    package_vars: HashMap<String, Binding<'a>>,
    /// Top-level functions by name, for `s := newSuite()`
    functions: HashMap<String, Node<'a>>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(unit: &'a SourceUnit) -> Self {
        let root = unit.root();
        let mut package_vars = HashMap::new();
        let mut functions = HashMap::new();

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "var_declaration" => {
                    for spec in unit.find_nodes_by_type(&child, "var_spec") {
                        for (name, binding) in var_spec_bindings(unit, spec) {
                            package_vars.insert(unit.get_node_text(&name), binding);
                        }
                    }
                }
                "function_declaration" => {
                    if let Some(name) = unit.get_field_text(&child, "name") {
                        functions.insert(name, child);
                    }
                }
                _ => {}
            }
        }

        Self {
            unit,
            package_vars,
            functions,
        }
    }

    /// Resolve the identifier found by [`first_identifier`] to a suite type name
    pub fn resolve(&self, ident: Node<'a>) -> Resolution {
        let text = self.unit.get_node_text(&ident);

        let bound = match ident.kind() {
            "type_identifier" => Some(text.clone()),
            "package_identifier" => ident
                .parent()
                .filter(|parent| parent.kind() == "qualified_type")
                .map(|parent| self.unit.get_compact_text(&parent)),
            "identifier" if self.is_new_argument(ident) => Some(text.clone()),
            "identifier" => self.resolve_value(ident, &text, MAX_RESOLVE_DEPTH),
            _ => None,
        };

        match bound {
            Some(type_name) => Resolution::Bound(type_name),
            None => {
                let pos = ident.start_position();
                trace!(
                    "Unresolved identifier {} at {}:{}:{}, using literal name",
                    text,
                    self.unit.file_path,
                    pos.row + 1,
                    pos.column + 1
                );
                Resolution::Fallback(text)
            }
        }
    }

    /// `T` in `new(T)` may parse as a plain identifier; it still names a type
    fn is_new_argument(&self, ident: Node<'a>) -> bool {
        ident
            .parent()
            .filter(|args| args.kind() == "argument_list")
            .and_then(|args| args.parent())
            .and_then(|call| call.child_by_field_name("function"))
            .is_some_and(|callee| SKIP_IDENTS.contains(&self.unit.get_node_text(&callee).as_str()))
    }

    /// Initializer expression bound to `name` at `use_site`, following
    /// identifier aliases; `None` for typed declarations and call results
    pub(crate) fn initializer(&self, use_site: Node<'a>, name: &str) -> Option<Node<'a>> {
        let mut site = use_site;
        let mut name = name.to_string();

        for _ in 0..MAX_RESOLVE_DEPTH {
            let binding = self
                .find_local_binding(site, &name)
                .or_else(|| self.package_vars.get(&name).copied())?;
            let Binding::Value(expr) = binding else {
                return None;
            };
            if expr.kind() != "identifier" {
                return Some(expr);
            }
            site = expr;
            name = self.unit.get_node_text(&expr);
        }

        None
    }

    fn resolve_value(&self, use_site: Node<'a>, name: &str, depth: usize) -> Option<String> {
        if depth == 0 {
            return None;
        }

        let binding = self
            .find_local_binding(use_site, name)
            .or_else(|| self.package_vars.get(name).copied())?;

        match binding {
            Binding::Typed(type_node) => Some(base_type_name(self.unit, type_node)),
            Binding::Value(expr) => self.infer_expr_type(expr, depth - 1),
            Binding::CallResult(call, index) => self.call_result_type(call, index),
        }
    }

    /// Nearest declaration of `name` preceding `use_site` whose scope encloses it
    fn find_local_binding(&self, use_site: Node<'a>, name: &str) -> Option<Binding<'a>> {
        let function = self.unit.find_parent_of_types(&use_site, FUNCTION_KINDS)?;
        let mut best: Option<(usize, Binding<'a>)> = None;

        let mut consider = |ident: Node<'a>, scope: Option<Node<'a>>, binding: Binding<'a>| {
            if ident.start_byte() >= use_site.start_byte() || self.unit.get_node_text(&ident) != name
            {
                return;
            }
            if !scope.is_some_and(|scope| encloses(scope, use_site)) {
                return;
            }
            if best.map_or(true, |(start, _)| ident.start_byte() > start) {
                best = Some((ident.start_byte(), binding));
            }
        };

        for param in self.unit.find_nodes_by_type(&function, "parameter_declaration") {
            // parameter_declaration -> parameter_list -> func_literal / declaration
            let scope = param.parent().and_then(|list| list.parent());
            if let Some(type_node) = param.child_by_field_name("type") {
                let mut cursor = param.walk();
                for ident in param.children_by_field_name("name", &mut cursor) {
                    consider(ident, scope, Binding::Typed(type_node));
                }
            }
        }

        for decl in self.unit.find_nodes_by_type(&function, "short_var_declaration") {
            let scope = self.unit.find_parent_of_types(&decl, LOCAL_SCOPE_KINDS);
            for (ident, binding) in assignment_bindings(self.unit, decl, "left", "right") {
                consider(ident, scope, binding);
            }
        }

        for spec in self.unit.find_nodes_by_type(&function, "var_spec") {
            let scope = self.unit.find_parent_of_types(&spec, LOCAL_SCOPE_KINDS);
            for (ident, binding) in var_spec_bindings(self.unit, spec) {
                consider(ident, scope, binding);
            }
        }

        best.map(|(_, binding)| binding)
    }

    fn infer_expr_type(&self, expr: Node<'a>, depth: usize) -> Option<String> {
        match expr.kind() {
            "composite_literal" => expr
                .child_by_field_name("type")
                .map(|t| base_type_name(self.unit, t)),
            "unary_expression" => {
                let operator = expr.child_by_field_name("operator")?;
                if self.unit.get_node_text(&operator) != "&" {
                    return None;
                }
                let operand = expr.child_by_field_name("operand")?;
                self.infer_expr_type(operand, depth)
            }
            "parenthesized_expression" => {
                let inner = expr.named_child(0)?;
                self.infer_expr_type(inner, depth)
            }
            "call_expression" => {
                let function = expr.child_by_field_name("function")?;
                let callee = self.unit.get_node_text(&function);
                if SKIP_IDENTS.contains(&callee.as_str()) {
                    let args = expr.child_by_field_name("arguments")?;
                    let type_node = self.unit.named_children_without_comments(&args).into_iter().next()?;
                    return Some(base_type_name(self.unit, type_node));
                }
                self.call_result_type(expr, 0)
            }
            "identifier" => {
                if depth == 0 {
                    return None;
                }
                let name = self.unit.get_node_text(&expr);
                self.resolve_value(expr, &name, depth)
            }
            _ => None,
        }
    }

    /// Declared result `index` of a call to a top-level function in this file
    fn call_result_type(&self, call: Node<'a>, index: usize) -> Option<String> {
        let function = call.child_by_field_name("function")?;
        if function.kind() != "identifier" {
            return None;
        }
        let decl = self.functions.get(&self.unit.get_node_text(&function))?;
        let result = decl.child_by_field_name("result")?;

        if result.kind() != "parameter_list" {
            return (index == 0).then(|| base_type_name(self.unit, result));
        }

        let mut types = Vec::new();
        let mut cursor = result.walk();
        for param in result.named_children(&mut cursor) {
            if param.kind() != "parameter_declaration" {
                continue;
            }
            let Some(type_node) = param.child_by_field_name("type") else {
                continue;
            };
            let mut names_cursor = param.walk();
            let names = param.children_by_field_name("name", &mut names_cursor).count();
            for _ in 0..names.max(1) {
                types.push(type_node);
            }
        }

        types.get(index).map(|t| base_type_name(self.unit, *t))
    }
}

/// True when `node` lies inside `scope`
fn encloses(scope: Node, node: Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.id() == scope.id() {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Bindings introduced by a `var_spec`: explicit type wins over the initializer
fn var_spec_bindings<'a>(unit: &SourceUnit, spec: Node<'a>) -> Vec<(Node<'a>, Binding<'a>)> {
    if let Some(type_node) = spec.child_by_field_name("type") {
        let mut cursor = spec.walk();
        return spec
            .children_by_field_name("name", &mut cursor)
            .map(|ident| (ident, Binding::Typed(type_node)))
            .collect();
    }

    let mut cursor = spec.walk();
    let names: Vec<Node<'a>> = spec.children_by_field_name("name", &mut cursor).collect();
    let values = spec
        .child_by_field_name("value")
        .map(|list| unit.named_children_without_comments(&list))
        .unwrap_or_default();
    pair_bindings(names, values)
}

/// Bindings of `a, b := x, y` (or `a, b := f()`)
fn assignment_bindings<'a>(
    unit: &SourceUnit,
    decl: Node<'a>,
    left_field: &str,
    right_field: &str,
) -> Vec<(Node<'a>, Binding<'a>)> {
    let names = decl
        .child_by_field_name(left_field)
        .map(|list| unit.named_children_without_comments(&list))
        .unwrap_or_default()
        .into_iter()
        .filter(|n| n.kind() == "identifier")
        .collect();
    let values = decl
        .child_by_field_name(right_field)
        .map(|list| unit.named_children_without_comments(&list))
        .unwrap_or_default();
    pair_bindings(names, values)
}

fn pair_bindings<'a>(names: Vec<Node<'a>>, values: Vec<Node<'a>>) -> Vec<(Node<'a>, Binding<'a>)> {
    if names.len() == values.len() {
        return names
            .into_iter()
            .zip(values)
            .map(|(name, value)| (name, Binding::Value(value)))
            .collect();
    }

    match values.as_slice() {
        [call] if call.kind() == "call_expression" => names
            .into_iter()
            .enumerate()
            .map(|(index, name)| (name, Binding::CallResult(*call, index)))
            .collect(),
        _ => Vec::new(),
    }
}
