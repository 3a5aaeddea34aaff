use super::caller::resolve_caller;
use super::format::{format_method, format_modifiers, format_type_with_keyword};
use super::{Finding, Usage};
use crate::model::TypeBinding;
use crate::syntax::{NodeId, NodeKind, SyntaxTree, TypeRef};
use tracing::trace;

/// Walks a [`SyntaxTree`] and collects every deprecated reference in it.
pub struct DeprecationVisitor<'t> {
    tree: &'t SyntaxTree,
    findings: Vec<Finding>,
}

impl<'t> DeprecationVisitor<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        Self {
            tree,
            findings: Vec::new(),
        }
    }

    /// Visit the whole tree and return the findings in visit order
    pub fn collect(mut self) -> Vec<Finding> {
        for id in self.tree.preorder() {
            self.visit(id);
        }
        self.findings
    }

    fn visit(&mut self, id: NodeId) {
        let tree = self.tree;
        match &tree.node(id).kind {
            NodeKind::MethodCall { method } => {
                if let Some(method) = method.as_ref().filter(|m| m.deprecated) {
                    self.emit(id, format_method(method), Usage::Call);
                }
            }
            NodeKind::ObjectConstruction { ty, constructor } => {
                if let Some(ty) = ty.as_ref().filter(|t| t.deprecated) {
                    self.emit(id, format_type_with_keyword(Some(ty)), Usage::ConstructedType);
                }
                if let Some(ctor) = constructor.as_ref().filter(|c| c.deprecated) {
                    self.emit(id, format_method(ctor), Usage::Constructor);
                }
            }
            NodeKind::TypeDeclaration {
                binding,
                superclass,
                interfaces,
            } => {
                if let Some(binding) = binding.as_ref().filter(|b| b.deprecated) {
                    self.emit(id, format_type_with_keyword(Some(binding)), Usage::DeclaredType);
                }
                if let Some(superclass) = superclass {
                    self.check_type(id, superclass, Usage::Extends);
                }
                for interface in interfaces {
                    self.check_type(id, interface, Usage::Implements);
                }
            }
            NodeKind::FieldDeclaration { modifiers, ty } => {
                self.check_type(id, ty, Usage::Field(*modifiers));
            }
            NodeKind::MethodDeclaration {
                modifiers,
                binding,
                return_type,
            } => {
                if let Some(return_type) = return_type {
                    self.check_type(id, return_type, Usage::Return(*modifiers));
                }
                if let Some(binding) = binding.as_ref().filter(|b| b.deprecated) {
                    self.emit(id, format_method(binding), Usage::DeclaredMethod);
                }
            }
            NodeKind::ParameterDeclaration { modifiers, ty } => {
                self.check_type(id, ty, Usage::Parameter(*modifiers));
            }
        }
    }

    fn check_type(&mut self, location: NodeId, ty: &TypeRef, usage: Usage) {
        let Some(binding) = ty.binding.as_ref().filter(|b| b.deprecated) else {
            return;
        };
        self.emit(location, describe_type(binding), usage);
    }

    fn emit(&mut self, location: NodeId, callee: String, usage: Usage) {
        let Some(caller) = resolve_caller(self.tree, location) else {
            trace!("Dropping {} reference without caller: {}", usage.role(), callee);
            return;
        };
        let line = self.tree.line_of(self.tree.node(location).start);
        self.findings.push(Finding {
            caller,
            callee,
            line,
            usage,
        });
    }
}

/// Callee text for a deprecated type reference: the type's own modifiers,
/// then the keyword and binary name.
fn describe_type(binding: &TypeBinding) -> String {
    let modifiers = format_modifiers(binding.modifiers);
    if modifiers.is_empty() {
        format_type_with_keyword(Some(binding))
    } else {
        format!("{} {}", modifiers, format_type_with_keyword(Some(binding)))
    }
}

/// Collect the findings of one tree
pub fn find_deprecated_usages(tree: &SyntaxTree) -> Vec<Finding> {
    DeprecationVisitor::new(tree).collect()
}
