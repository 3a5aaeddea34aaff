//! Binding model: resolved identities of types and methods.
//!
//! Bindings are plain values produced by the front-end and read by the
//! deprecation pass. Nothing here knows about source text.

mod binding;
mod modifiers;

pub use binding::{MethodBinding, TypeBinding, TypeKind, TypeShape};
pub use modifiers::Modifiers;
