use super::format::{format_method, format_modifiers, format_type_with_keyword};
use crate::syntax::{NodeId, NodeKind, SyntaxTree};

/// Signature of the nearest method or type declaration enclosing `node`,
/// starting with `node` itself.
///
/// Returns `None` when no declaration encloses the node, or when the
/// nearest one has no binding.
pub fn resolve_caller(tree: &SyntaxTree, node: NodeId) -> Option<String> {
    for id in tree.ancestors(node) {
        match &tree.node(id).kind {
            NodeKind::MethodDeclaration { binding, .. } => {
                return binding.as_ref().map(format_method);
            }
            NodeKind::TypeDeclaration { binding, .. } => {
                let binding = binding.as_ref()?;
                // The separator is kept even with no modifiers.
                return Some(format!(
                    "{} {}",
                    format_modifiers(binding.modifiers),
                    format_type_with_keyword(Some(binding))
                ));
            }
            NodeKind::MethodCall { .. }
            | NodeKind::ObjectConstruction { .. }
            | NodeKind::FieldDeclaration { .. }
            | NodeKind::ParameterDeclaration { .. } => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MethodBinding, Modifiers, TypeBinding, TypeKind};
    use crate::syntax::TypeRef;

    fn type_decl(binding: Option<TypeBinding>) -> NodeKind {
        NodeKind::TypeDeclaration {
            binding,
            superclass: None,
            interfaces: vec![],
        }
    }

    fn owner() -> TypeBinding {
        TypeBinding::declared("p.Owner", "p.Owner", TypeKind::CLASS).with_modifiers(Modifiers::PUBLIC)
    }

    #[test]
    fn test_method_wins_over_type() {
        let mut tree = SyntaxTree::for_source("");
        let ty = tree.push(type_decl(Some(owner())), 0, None);
        let method = MethodBinding::method("run", owner(), vec![], TypeBinding::primitive("void"))
            .with_modifiers(Modifiers::PUBLIC);
        let decl = tree.push(
            NodeKind::MethodDeclaration {
                modifiers: Modifiers::PUBLIC,
                binding: Some(method),
                return_type: Some(TypeRef::new(Some(TypeBinding::primitive("void")))),
            },
            1,
            Some(ty),
        );
        let call = tree.push(NodeKind::MethodCall { method: None }, 2, Some(decl));

        assert_eq!(
            resolve_caller(&tree, call).as_deref(),
            Some("public void p.Owner.run()")
        );
    }

    #[test]
    fn test_type_caller_keeps_separator() {
        let mut tree = SyntaxTree::for_source("");
        let bare = TypeBinding::declared("p.Bare", "p.Bare", TypeKind::INTERFACE);
        let ty = tree.push(type_decl(Some(bare)), 0, None);
        let field = tree.push(
            NodeKind::FieldDeclaration {
                modifiers: Modifiers::empty(),
                ty: TypeRef::unresolved(),
            },
            1,
            Some(ty),
        );

        assert_eq!(resolve_caller(&tree, field).as_deref(), Some(" interface p.Bare"));
    }

    #[test]
    fn test_unresolved_enclosing_declaration() {
        let mut tree = SyntaxTree::for_source("");
        let ty = tree.push(type_decl(Some(owner())), 0, None);
        let decl = tree.push(
            NodeKind::MethodDeclaration {
                modifiers: Modifiers::empty(),
                binding: None,
                return_type: None,
            },
            1,
            Some(ty),
        );
        let call = tree.push(NodeKind::MethodCall { method: None }, 2, Some(decl));

        assert_eq!(resolve_caller(&tree, call), None);
    }

    #[test]
    fn test_no_enclosing_declaration() {
        let mut tree = SyntaxTree::for_source("");
        let call = tree.push(NodeKind::MethodCall { method: None }, 0, None);
        assert_eq!(resolve_caller(&tree, call), None);
    }
}
