//! Second pass: builds the resolved [`SyntaxTree`] of one unit.

use super::common::{
    child_of_kind, declaration_start, declared_modifiers, dimension_count, has_child_of_kind,
    is_member, named_children, node_text, type_parameters, TypeName, TypeParam,
    TYPE_DECLARATION_KINDS,
};
use super::resolver::{ArgType, Resolver, Scope};
use super::symbols::{Import, SymbolId, SymbolTable, UnitContext};
use crate::model::{MethodBinding, Modifiers, TypeBinding};
use crate::syntax::{NodeId, NodeKind, SyntaxTree, TypeRef};
use std::collections::HashMap;
use std::path::Path;
use tracing::trace;
use tree_sitter::Node;

/// Lengths of the scoped stacks when a scope was entered
#[derive(Debug, Clone, Copy)]
struct Mark {
    locals: usize,
    local_types: usize,
    type_vars: usize,
}

pub struct TreeBuilder<'a> {
    resolver: Resolver<'a>,
    table: &'a SymbolTable,
    path: &'a Path,
    source: &'a str,
    context: UnitContext,
    tree: SyntaxTree,
    /// Enclosing type declarations, innermost last
    types: Vec<Option<SymbolId>>,
    type_vars: Vec<TypeParam>,
    locals: Vec<(String, Option<TypeBinding>)>,
    local_types: Vec<(String, SymbolId)>,
    marks: Vec<Mark>,
    /// Resolved invocations by tree-sitter node id
    calls: HashMap<usize, Option<MethodBinding>>,
}

impl<'a> TreeBuilder<'a> {
    pub fn build(table: &'a SymbolTable, path: &'a Path, source: &'a str, root: Node) -> SyntaxTree {
        let mut builder = Self {
            resolver: Resolver::new(table),
            table,
            path,
            source,
            context: UnitContext::from_root(root, source),
            tree: SyntaxTree::for_source(source),
            types: Vec::new(),
            type_vars: Vec::new(),
            locals: Vec::new(),
            local_types: Vec::new(),
            marks: Vec::new(),
            calls: HashMap::new(),
        };
        builder.walk_children(root, None);
        trace!("{}: {} nodes", path.display(), builder.tree.len());
        builder.tree
    }

    fn walk(&mut self, node: Node, parent: Option<NodeId>) {
        match node.kind() {
            kind if TYPE_DECLARATION_KINDS.contains(&kind) => self.type_declaration(node, parent),
            "method_declaration" | "constructor_declaration" | "compact_constructor_declaration" => {
                self.method_declaration(node, parent)
            }
            "field_declaration" | "constant_declaration" => self.field_declaration(node, parent),
            "formal_parameter" | "spread_parameter" | "catch_formal_parameter" => {
                self.parameter(node, parent)
            }
            "enhanced_for_statement" => self.enhanced_for(node, parent),
            "local_variable_declaration" => self.local_variable(node, parent),
            "resource" => self.resource(node, parent),
            "instanceof_expression" => self.instanceof(node, parent),
            "lambda_expression" => self.lambda(node, parent),
            "method_invocation" => self.method_call(node, parent),
            "object_creation_expression" => self.object_creation(node, parent),
            "enum_constant" => self.enum_constant(node, parent),
            "block" | "constructor_body" | "for_statement" | "catch_clause"
            | "try_with_resources_statement" | "switch_block_statement_group" | "switch_rule" => {
                self.push_scope();
                self.walk_children(node, parent);
                self.pop_scope();
            }
            _ => self.walk_children(node, parent),
        }
    }

    fn walk_children(&mut self, node: Node, parent: Option<NodeId>) {
        for child in named_children(node) {
            self.walk(child, parent);
        }
    }

    fn walk_field(&mut self, node: Node, field: &str, parent: Option<NodeId>) {
        if let Some(child) = node.child_by_field_name(field) {
            self.walk(child, parent);
        }
    }

    // Scopes

    fn push_scope(&mut self) {
        self.marks.push(Mark {
            locals: self.locals.len(),
            local_types: self.local_types.len(),
            type_vars: self.type_vars.len(),
        });
    }

    fn pop_scope(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.locals.truncate(mark.locals);
            self.local_types.truncate(mark.local_types);
            self.type_vars.truncate(mark.type_vars);
        }
    }

    fn declare_local(&mut self, name: Option<Node>, ty: Option<TypeBinding>) {
        if let Some(name) = name {
            let name = node_text(name, self.source).to_string();
            self.locals.push((name, ty));
        }
    }

    fn current_type(&self) -> Option<SymbolId> {
        self.types.iter().rev().find_map(|t| *t)
    }

    fn scope(&self) -> Scope<'_> {
        Scope {
            context: &self.context,
            enclosing: self.current_type(),
            type_vars: &self.type_vars,
            local_types: &self.local_types,
        }
    }

    fn resolve_type_node(&self, node: Node) -> Option<TypeBinding> {
        let name = TypeName::from_node(node, self.source)?;
        self.resolver.resolve_type(&name, &self.scope())
    }

    fn type_ref(&self, node: Option<Node>) -> TypeRef {
        TypeRef::new(node.and_then(|n| self.resolve_type_node(n)))
    }

    // Declarations

    fn type_declaration(&mut self, node: Node, parent: Option<NodeId>) {
        let start = declaration_start(node, self.source);
        let symbol = self.table.type_at(self.path, start);
        let binding = symbol.map(|id| self.resolver.type_binding(id));

        if let (Some(id), Some(name)) = (symbol, node.child_by_field_name("name")) {
            if self.table.get(id).local && !is_member(node) {
                self.local_types
                    .push((node_text(name, self.source).to_string(), id));
            }
        }

        self.types.push(symbol);
        self.push_scope();

        let superclass = node
            .child_by_field_name("superclass")
            .map(|s| self.type_ref(named_children(s).into_iter().next()));
        let interface_list = node
            .child_by_field_name("interfaces")
            .or_else(|| child_of_kind(node, "extends_interfaces"))
            .and_then(|list| child_of_kind(list, "type_list"));
        let interfaces = interface_list
            .map(|list| {
                named_children(list)
                    .into_iter()
                    .map(|t| self.type_ref(Some(t)))
                    .collect()
            })
            .unwrap_or_default();

        let id = self.tree.push(
            NodeKind::TypeDeclaration {
                binding,
                superclass,
                interfaces,
            },
            start,
            parent,
        );

        self.walk_field(node, "parameters", Some(id));
        self.walk_field(node, "body", Some(id));

        self.pop_scope();
        self.types.pop();
    }

    fn method_declaration(&mut self, node: Node, parent: Option<NodeId>) {
        let start = declaration_start(node, self.source);
        let binding = self
            .table
            .method_at(self.path, start)
            .and_then(|(owner, index)| self.resolver.declared_method(owner, index));

        self.push_scope();
        self.type_vars
            .extend(type_parameters(node, self.source));

        let return_type = if node.kind() == "method_declaration" {
            Some(self.type_ref(node.child_by_field_name("type")))
        } else {
            None
        };

        let id = self.tree.push(
            NodeKind::MethodDeclaration {
                modifiers: declared_modifiers(node, self.source),
                binding,
                return_type,
            },
            start,
            parent,
        );

        self.walk_field(node, "parameters", Some(id));
        self.walk_field(node, "body", Some(id));
        self.pop_scope();
    }

    fn field_declaration(&mut self, node: Node, parent: Option<NodeId>) {
        let ty = self.type_ref(node.child_by_field_name("type"));
        let id = self.tree.push(
            NodeKind::FieldDeclaration {
                modifiers: declared_modifiers(node, self.source),
                ty,
            },
            declaration_start(node, self.source),
            parent,
        );

        for declarator in named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "variable_declarator")
        {
            self.walk_field(declarator, "value", Some(id));
        }
    }

    fn parameter(&mut self, node: Node, parent: Option<NodeId>) {
        let (type_node, name, extra_dims) = match node.kind() {
            "spread_parameter" => {
                let type_node = named_children(node)
                    .into_iter()
                    .find(|c| TypeName::from_node(*c, self.source).is_some());
                let name = child_of_kind(node, "variable_declarator")
                    .and_then(|d| d.child_by_field_name("name"))
                    .or_else(|| child_of_kind(node, "identifier"));
                (type_node, name, 1)
            }
            "catch_formal_parameter" => {
                let alternatives = child_of_kind(node, "catch_type")
                    .map(named_children)
                    .unwrap_or_default();
                let type_node = match alternatives.as_slice() {
                    [single] => Some(*single),
                    _ => None,
                };
                (type_node, node.child_by_field_name("name"), 0)
            }
            _ => {
                let dims = dimension_count(node.child_by_field_name("dimensions"), self.source);
                (node.child_by_field_name("type"), node.child_by_field_name("name"), dims)
            }
        };

        let binding = type_node.and_then(|t| self.resolve_type_node(t));
        let local_type = binding
            .clone()
            .map(|b| (0..extra_dims).fold(b, |acc, _| TypeBinding::array_of(acc)));
        self.declare_local(name, local_type);

        self.tree.push(
            NodeKind::ParameterDeclaration {
                modifiers: declared_modifiers(node, self.source),
                ty: TypeRef::new(binding),
            },
            node.start_byte(),
            parent,
        );
    }

    fn enhanced_for(&mut self, node: Node, parent: Option<NodeId>) {
        self.push_scope();

        let type_node = node.child_by_field_name("type");
        let value = node.child_by_field_name("value");
        let declared = type_node.and_then(|t| self.resolve_type_node(t));
        let is_var = type_node
            .and_then(|t| TypeName::from_node(t, self.source))
            .map(|t| t == TypeName::Inferred)
            .unwrap_or(false);
        let local_type = if is_var {
            value
                .and_then(|v| self.known_type(v))
                .and_then(|t| t.component().cloned())
        } else {
            declared.clone()
        };

        if let Some(type_node) = type_node {
            let start = child_of_kind(node, "modifiers").unwrap_or(type_node).start_byte();
            self.tree.push(
                NodeKind::ParameterDeclaration {
                    modifiers: declared_modifiers(node, self.source),
                    ty: TypeRef::new(declared),
                },
                start,
                parent,
            );
        }

        if let Some(value) = value {
            self.walk(value, parent);
        }
        self.declare_local(node.child_by_field_name("name"), local_type);
        self.walk_field(node, "body", parent);
        self.pop_scope();
    }

    fn local_variable(&mut self, node: Node, parent: Option<NodeId>) {
        let type_node = node.child_by_field_name("type");
        let name = type_node.and_then(|t| TypeName::from_node(t, self.source));
        let declared = type_node.and_then(|t| self.resolve_type_node(t));

        for declarator in named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "variable_declarator")
        {
            let value = declarator.child_by_field_name("value");
            if let Some(value) = value {
                self.walk(value, parent);
            }
            let ty = if name == Some(TypeName::Inferred) {
                value.and_then(|v| self.known_type(v))
            } else {
                let dims = dimension_count(declarator.child_by_field_name("dimensions"), self.source);
                declared
                    .clone()
                    .map(|b| (0..dims).fold(b, |acc, _| TypeBinding::array_of(acc)))
            };
            self.declare_local(declarator.child_by_field_name("name"), ty);
        }
    }

    fn resource(&mut self, node: Node, parent: Option<NodeId>) {
        self.walk_field(node, "value", parent);
        if node.child_by_field_name("name").is_some() {
            let ty = match node.child_by_field_name("type") {
                Some(t) if TypeName::from_node(t, self.source) != Some(TypeName::Inferred) => {
                    self.resolve_type_node(t)
                }
                _ => node
                    .child_by_field_name("value")
                    .and_then(|v| self.known_type(v)),
            };
            self.declare_local(node.child_by_field_name("name"), ty);
        } else {
            self.walk_children(node, parent);
        }
    }

    /// `x instanceof Foo f` declares a pattern variable
    fn instanceof(&mut self, node: Node, parent: Option<NodeId>) {
        self.walk_field(node, "left", parent);
        self.walk_field(node, "pattern", parent);

        let (Some(right), Some(name)) = (
            node.child_by_field_name("right"),
            node.child_by_field_name("name"),
        ) else {
            return;
        };
        let binding = self.resolve_type_node(right);
        self.declare_local(Some(name), binding.clone());

        let modifiers = if has_child_of_kind(node, "final") {
            Modifiers::FINAL
        } else {
            Modifiers::empty()
        };
        self.tree.push(
            NodeKind::ParameterDeclaration {
                modifiers,
                ty: TypeRef::new(binding),
            },
            right.start_byte(),
            parent,
        );
    }

    fn lambda(&mut self, node: Node, parent: Option<NodeId>) {
        self.push_scope();
        if let Some(params) = node.child_by_field_name("parameters") {
            match params.kind() {
                "identifier" => self.declare_local(Some(params), None),
                "inferred_parameters" => {
                    for name in named_children(params) {
                        self.declare_local(Some(name), None);
                    }
                }
                _ => self.walk(params, parent),
            }
        }
        self.walk_field(node, "body", parent);
        self.pop_scope();
    }

    fn enum_constant(&mut self, node: Node, parent: Option<NodeId>) {
        self.walk_field(node, "arguments", parent);
        if let Some(body) = node.child_by_field_name("body") {
            let anonymous = self.table.type_at(self.path, node.start_byte());
            self.types.push(anonymous);
            self.push_scope();
            self.walk(body, parent);
            self.pop_scope();
            self.types.pop();
        }
    }

    // Expressions

    fn method_call(&mut self, node: Node, parent: Option<NodeId>) {
        // `super.m()` and `Outer.super.m()` are super invocations, which are
        // typed for chained receivers but never reported as calls
        let method = if has_child_of_kind(node, "super") {
            None
        } else {
            self.resolve_call(node)
        };
        let id = self
            .tree
            .push(NodeKind::MethodCall { method }, node.start_byte(), parent);
        self.walk_children(node, Some(id));
    }

    fn object_creation(&mut self, node: Node, parent: Option<NodeId>) {
        let ty = node
            .child_by_field_name("type")
            .and_then(|t| self.resolve_type_node(t));
        let args = self.argument_types(node);
        let constructor = ty
            .as_ref()
            .and_then(|t| self.resolver.symbol_of(t))
            .filter(|id| !self.table.get(*id).decl.is_interface())
            .and_then(|id| {
                let candidates = self.resolver.constructors(id, args.len());
                self.resolver.select(candidates, &args)
            });

        let id = self.tree.push(
            NodeKind::ObjectConstruction { ty, constructor },
            node.start_byte(),
            parent,
        );

        let body = child_of_kind(node, "class_body");
        for child in named_children(node) {
            if Some(child.id()) != body.map(|b| b.id()) {
                self.walk(child, Some(id));
            }
        }
        if let Some(body) = body {
            let anonymous = self.table.type_at(self.path, node.start_byte());
            self.types.push(anonymous);
            self.push_scope();
            self.walk(body, Some(id));
            self.pop_scope();
            self.types.pop();
        }
    }

    fn arguments<'t>(node: Node<'t>) -> Vec<Node<'t>> {
        node.child_by_field_name("arguments")
            .map(named_children)
            .unwrap_or_default()
    }

    fn argument_types(&mut self, node: Node) -> Vec<ArgType> {
        Self::arguments(node)
            .into_iter()
            .map(|arg| self.expr_type(arg, false))
            .collect()
    }

    fn resolve_call(&mut self, node: Node) -> Option<MethodBinding> {
        if let Some(cached) = self.calls.get(&node.id()) {
            return cached.clone();
        }

        let resolved = self.resolve_call_uncached(node);
        self.calls.insert(node.id(), resolved.clone());
        resolved
    }

    fn resolve_call_uncached(&mut self, node: Node) -> Option<MethodBinding> {
        let name = node_text(node.child_by_field_name("name")?, self.source).to_string();
        let args = self.argument_types(node);
        let arity = args.len();

        let candidates = match node.child_by_field_name("object") {
            None => self.unqualified_candidates(&name, arity),
            Some(object) => {
                let owner = match object.kind() {
                    "this" => self.current_type(),
                    "super" => self.current_type().and_then(|t| self.superclass_of(t)),
                    _ => self
                        .receiver_type(object)
                        .and_then(|t| self.resolver.symbol_of(&t)),
                };
                owner
                    .map(|owner| self.resolver.methods(owner, &name, arity))
                    .unwrap_or_default()
            }
        };
        if candidates.is_empty() {
            trace!("Unresolved call {}/{} at byte {}", name, arity, node.start_byte());
        }
        self.resolver.select(candidates, &args)
    }

    /// Innermost enclosing type declaring a matching method, then static imports
    fn unqualified_candidates(&self, name: &str, arity: usize) -> Vec<MethodBinding> {
        for ty in self.types.iter().rev().flatten() {
            let found = self.resolver.methods(*ty, name, arity);
            if !found.is_empty() {
                return found;
            }
        }

        for import in &self.context.imports {
            let owner = match import {
                Import::Static { owner, member } if member == name => owner,
                Import::StaticOnDemand(owner) => owner,
                _ => continue,
            };
            if let Some(id) = self.table.by_qualified(owner) {
                let found = self.resolver.methods(id, name, arity);
                if !found.is_empty() {
                    return found;
                }
            }
        }
        Vec::new()
    }

    fn superclass_of(&self, id: SymbolId) -> Option<SymbolId> {
        self.table
            .get(id)
            .supertypes
            .iter()
            .copied()
            .find(|s| !self.table.get(*s).decl.is_interface())
    }

    fn receiver_type(&mut self, node: Node) -> Option<TypeBinding> {
        match self.expr_type(node, true) {
            ArgType::Known(binding) => Some(binding),
            _ => None,
        }
    }

    fn known_type(&mut self, node: Node) -> Option<TypeBinding> {
        match self.expr_type(node, false) {
            ArgType::Known(binding) => Some(binding),
            _ => None,
        }
    }

    fn named_type(&self, qualified: &str) -> ArgType {
        self.resolver.lookup_qualified(qualified).into()
    }

    /// Field visible by simple name from the current position
    fn field_in_scope(&self, name: &str) -> Option<TypeBinding> {
        for ty in self.types.iter().rev().flatten() {
            if let Some(found) = self.resolver.field_type(*ty, name) {
                return Some(found);
            }
        }
        self.context.imports.iter().find_map(|import| {
            let owner = match import {
                Import::Static { owner, member } if member == name => owner,
                Import::StaticOnDemand(owner) => owner,
                _ => return None,
            };
            let id = self.table.by_qualified(owner)?;
            self.resolver.field_type(id, name)
        })
    }

    /// Static type of an expression. Receivers may also be type names.
    fn expr_type(&mut self, node: Node, receiver: bool) -> ArgType {
        match node.kind() {
            "identifier" => {
                let name = node_text(node, self.source);
                if let Some((_, ty)) = self.locals.iter().rev().find(|(n, _)| n == name) {
                    return ty.clone().into();
                }
                if let Some(ty) = self.field_in_scope(name) {
                    return ArgType::Known(ty);
                }
                if receiver {
                    return self
                        .resolver
                        .resolve_type_segments(&[name.to_string()], &self.scope())
                        .into();
                }
                ArgType::Unknown
            }
            "field_access" => self.field_access_type(node, receiver),
            "this" => self.current_type().map(|t| self.resolver.type_binding(t)).into(),
            "super" => self
                .current_type()
                .and_then(|t| self.superclass_of(t))
                .map(|t| self.resolver.type_binding(t))
                .into(),
            "parenthesized_expression" => match named_children(node).into_iter().next() {
                Some(inner) => self.expr_type(inner, false),
                None => ArgType::Unknown,
            },
            "cast_expression" | "object_creation_expression" => node
                .child_by_field_name("type")
                .and_then(|t| self.resolve_type_node(t))
                .into(),
            "array_creation_expression" => {
                let dims: usize = named_children(node)
                    .into_iter()
                    .map(|c| match c.kind() {
                        "dimensions_expr" => 1,
                        "dimensions" => dimension_count(Some(c), self.source),
                        _ => 0,
                    })
                    .sum();
                node.child_by_field_name("type")
                    .and_then(|t| self.resolve_type_node(t))
                    .map(|b| (0..dims).fold(b, |acc, _| TypeBinding::array_of(acc)))
                    .into()
            }
            "array_access" => match node.child_by_field_name("array") {
                Some(array) => self
                    .known_type(array)
                    .and_then(|t| t.component().cloned())
                    .into(),
                None => ArgType::Unknown,
            },
            "method_invocation" => self
                .resolve_call(node)
                .filter(|m| !m.constructor && !m.return_type.is_void())
                .map(|m| m.return_type)
                .into(),
            "string_literal" | "text_block" => self.named_type("java.lang.String"),
            "class_literal" => self.named_type("java.lang.Class"),
            "character_literal" => ArgType::Known(TypeBinding::primitive("char")),
            "true" | "false" => ArgType::Known(TypeBinding::primitive("boolean")),
            "null_literal" => ArgType::Null,
            "decimal_integer_literal" | "hex_integer_literal" | "octal_integer_literal"
            | "binary_integer_literal" => {
                let text = node_text(node, self.source);
                let ty = if text.ends_with(['l', 'L']) { "long" } else { "int" };
                ArgType::Known(TypeBinding::primitive(ty))
            }
            "decimal_floating_point_literal" | "hex_floating_point_literal" => {
                let text = node_text(node, self.source);
                let ty = if text.ends_with(['f', 'F']) { "float" } else { "double" };
                ArgType::Known(TypeBinding::primitive(ty))
            }
            "instanceof_expression" => ArgType::Known(TypeBinding::primitive("boolean")),
            "binary_expression" => self.binary_type(node),
            "ternary_expression" => match node.child_by_field_name("consequence") {
                Some(consequence) => self.expr_type(consequence, false),
                None => ArgType::Unknown,
            },
            "assignment_expression" => match node.child_by_field_name("left") {
                Some(left) => self.expr_type(left, false),
                None => ArgType::Unknown,
            },
            "unary_expression" | "update_expression" => match named_children(node).into_iter().next() {
                Some(operand) => self.expr_type(operand, false),
                None => ArgType::Unknown,
            },
            _ => ArgType::Unknown,
        }
    }

    fn field_access_type(&mut self, node: Node, receiver: bool) -> ArgType {
        let (Some(object), Some(field)) = (
            node.child_by_field_name("object"),
            node.child_by_field_name("field"),
        ) else {
            return ArgType::Unknown;
        };

        // `Outer.this`
        if field.kind() == "this" {
            return self
                .resolver
                .resolve_type_segments(&dotted_segments(object, self.source), &self.scope())
                .into();
        }

        let field_name = node_text(field, self.source).to_string();
        if let Some(owner) = self.receiver_type(object) {
            if owner.is_array() && field_name == "length" {
                return ArgType::Known(TypeBinding::primitive("int"));
            }
            if let Some(ty) = self
                .resolver
                .symbol_of(&owner)
                .and_then(|id| self.resolver.field_type(id, &field_name))
            {
                return ArgType::Known(ty);
            }
        }

        if receiver {
            return self
                .resolver
                .resolve_type_segments(&dotted_segments(node, self.source), &self.scope())
                .into();
        }
        ArgType::Unknown
    }

    fn binary_type(&mut self, node: Node) -> ArgType {
        let operator = node
            .child_by_field_name("operator")
            .map(|op| node_text(op, self.source).to_string())
            .unwrap_or_default();
        match operator.as_str() {
            "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||" => {
                ArgType::Known(TypeBinding::primitive("boolean"))
            }
            "+" => {
                let string = self.resolver.lookup_qualified("java.lang.String");
                let is_string = |t: &ArgType| match (t, &string) {
                    (ArgType::Known(t), Some(s)) => t == s,
                    _ => false,
                };
                let left = node
                    .child_by_field_name("left")
                    .map(|l| self.expr_type(l, false))
                    .unwrap_or(ArgType::Unknown);
                let right = node
                    .child_by_field_name("right")
                    .map(|r| self.expr_type(r, false))
                    .unwrap_or(ArgType::Unknown);
                if is_string(&left) || is_string(&right) {
                    string.into()
                } else {
                    ArgType::Unknown
                }
            }
            _ => ArgType::Unknown,
        }
    }
}

/// `a.b.C` written as nested field accesses, as segments
fn dotted_segments(node: Node, source: &str) -> Vec<String> {
    node_text(node, source)
        .split('.')
        .map(|s| s.trim().to_string())
        .collect()
}
