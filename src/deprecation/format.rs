//! Canonical signature strings for bindings.
//!
//! These strings are both the report text and the dedup key, so any change
//! here changes which findings are considered identical.

use crate::model::{MethodBinding, Modifiers, TypeBinding, TypeShape};

const UNKNOWN: &str = "unknown";

/// Binary name for declared types (`$` for nesting), primitive name for
/// primitives, `[]` per array dimension.
pub fn format_type(binding: Option<&TypeBinding>) -> String {
    let Some(binding) = binding else {
        return UNKNOWN.to_string();
    };

    match &binding.shape {
        TypeShape::Array(component) => format!("{}[]", format_type(Some(component))),
        TypeShape::Primitive => binding.qualified_name.clone(),
        _ => binding
            .binary_name
            .clone()
            .unwrap_or_else(|| binding.qualified_name.clone()),
    }
}

/// `format_type` prefixed with the declaration keyword
pub fn format_type_with_keyword(binding: Option<&TypeBinding>) -> String {
    match binding {
        Some(binding) => format!("{} {}", binding.kind.keyword(), format_type(Some(binding))),
        None => UNKNOWN.to_string(),
    }
}

/// `[modifiers ]returnType owner.name(params)`, one parameter per line
pub fn format_method(binding: &MethodBinding) -> String {
    let owner = format_type(Some(&binding.declaring_type));
    let modifiers = format_modifiers(binding.modifiers);

    let params = if binding.parameter_types.is_empty() {
        String::new()
    } else {
        let joined = binding
            .parameter_types
            .iter()
            .map(|p| format_type(Some(p)))
            .collect::<Vec<_>>()
            .join(",\n    ");
        format!("\n    {}\n", joined)
    };

    let return_type = format_type(Some(&binding.return_type));

    let prefix = if modifiers.is_empty() {
        String::new()
    } else {
        format!("{} ", modifiers)
    };

    format!("{}{} {}.{}({})", prefix, return_type, owner, binding.name, params)
}

pub fn format_modifiers(modifiers: Modifiers) -> String {
    modifiers.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeKind;

    fn util_type() -> TypeBinding {
        TypeBinding::declared("com.example.Util", "com.example.Util", TypeKind::CLASS)
    }

    #[test]
    fn test_format_type_null() {
        assert_eq!(format_type(None), "unknown");
        assert_eq!(format_type_with_keyword(None), "unknown");
    }

    #[test]
    fn test_format_type_arrays() {
        for dims in 0..5 {
            let mut binding = TypeBinding::primitive("int");
            for _ in 0..dims {
                binding = TypeBinding::array_of(binding);
            }
            assert_eq!(format_type(Some(&binding)), format!("int{}", "[]".repeat(dims)));
        }
    }

    #[test]
    fn test_format_type_nested_uses_binary_name() {
        let inner = TypeBinding::declared("a.Outer.Inner", "a.Outer$Inner", TypeKind::CLASS);
        assert_eq!(format_type(Some(&inner)), "a.Outer$Inner");

        let recovered = TypeBinding::recovered("Missing");
        assert_eq!(format_type(Some(&recovered)), "Missing");
    }

    #[test]
    fn test_keyword_precedence() {
        let both = TypeBinding::declared("a.Marker", "a.Marker", TypeKind::ANNOTATION);
        assert!(both.kind.interface);
        assert_eq!(format_type_with_keyword(Some(&both)), "@interface a.Marker");

        let mut odd = TypeKind::ENUM;
        odd.interface = true;
        let binding = TypeBinding::declared("a.E", "a.E", odd);
        assert_eq!(format_type_with_keyword(Some(&binding)), "enum a.E");
    }

    #[test]
    fn test_format_method_no_params() {
        let method = MethodBinding::method("run", util_type(), vec![], TypeBinding::primitive("void"))
            .with_modifiers(Modifiers::PUBLIC);
        assert_eq!(format_method(&method), "public void com.example.Util.run()");
    }

    #[test]
    fn test_format_method_two_params() {
        let string = TypeBinding::declared("java.lang.String", "java.lang.String", TypeKind::CLASS);
        let method = MethodBinding::method(
            "join",
            util_type(),
            vec![string.clone(), TypeBinding::array_of(TypeBinding::primitive("int"))],
            string,
        );
        assert_eq!(
            format_method(&method),
            "java.lang.String com.example.Util.join(\n    java.lang.String,\n    int[]\n)"
        );
    }

    #[test]
    fn test_format_constructor() {
        let ctor = MethodBinding::constructor(util_type(), vec![TypeBinding::primitive("long")])
            .with_modifiers(Modifiers::PROTECTED);
        assert_eq!(
            format_method(&ctor),
            "protected void com.example.Util.Util(\n    long\n)"
        );
    }
}
