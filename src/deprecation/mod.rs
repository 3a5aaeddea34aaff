//! Deprecated-usage detection.
//!
//! [`find_deprecated_usages`] walks a resolved [`SyntaxTree`](crate::syntax::SyntaxTree)
//! and returns one [`Finding`] per deprecated reference. Findings are not
//! deduplicated here; that is the job of the [`Reporter`](crate::report::Reporter).

mod caller;
pub mod format;
mod visitor;

pub use caller::resolve_caller;
pub use format::{format_method, format_modifiers, format_type, format_type_with_keyword};
pub use visitor::{find_deprecated_usages, DeprecationVisitor};

use crate::model::Modifiers;

/// Syntactic position that produced a finding. Never rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Usage {
    Call,
    ConstructedType,
    Constructor,
    /// A deprecated type declaration itself
    DeclaredType,
    /// A deprecated method declaration itself
    DeclaredMethod,
    Extends,
    Implements,
    /// Field type; carries the field's own modifiers
    Field(Modifiers),
    /// Return type; carries the method's own modifiers
    Return(Modifiers),
    /// Parameter type; carries the parameter's own modifiers
    Parameter(Modifiers),
}

impl Usage {
    pub fn role(&self) -> &'static str {
        match self {
            Usage::Call => "call",
            Usage::ConstructedType => "new",
            Usage::Constructor => "constructor",
            Usage::DeclaredType => "type",
            Usage::DeclaredMethod => "method",
            Usage::Extends => "extends",
            Usage::Implements => "implements",
            Usage::Field(_) => "field",
            Usage::Return(_) => "return",
            Usage::Parameter(_) => "param",
        }
    }
}

/// One detected deprecated reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Signature of the enclosing declaration
    pub caller: String,
    /// Signature of the deprecated type or method
    pub callee: String,
    /// 1-based line of the referencing node
    pub line: usize,
    pub usage: Usage,
}
