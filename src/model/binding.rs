use super::Modifiers;

/// Kind flags of a declared type.
///
/// The flags are not exclusive: an annotation type is also an interface,
/// which is why the keyword precedence lives in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeKind {
    pub annotation: bool,
    pub enumeration: bool,
    pub interface: bool,
}

impl TypeKind {
    pub const CLASS: Self = Self {
        annotation: false,
        enumeration: false,
        interface: false,
    };
    pub const INTERFACE: Self = Self {
        annotation: false,
        enumeration: false,
        interface: true,
    };
    pub const ENUM: Self = Self {
        annotation: false,
        enumeration: true,
        interface: false,
    };
    pub const ANNOTATION: Self = Self {
        annotation: true,
        enumeration: false,
        interface: true,
    };

    /// Declaration keyword: `@interface`, `enum`, `interface` or `class`
    pub fn keyword(&self) -> &'static str {
        if self.annotation {
            "@interface"
        } else if self.enumeration {
            "enum"
        } else if self.interface {
            "interface"
        } else {
            "class"
        }
    }

    pub fn is_class(&self) -> bool {
        !self.annotation && !self.enumeration && !self.interface
    }
}

/// Structural shape of a type binding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// A class, interface, enum, record or annotation type
    Declared,
    /// `int`, `boolean`, `void`, ...
    Primitive,
    /// One array dimension over the component type
    Array(Box<TypeBinding>),
    /// A type variable such as `T`, with its erasure when known
    Variable(Option<Box<TypeBinding>>),
    /// A reference the front-end could not resolve, kept by name only
    Recovered,
}

/// Resolved identity of a type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeBinding {
    /// Dotted name, e.g. `com.example.Outer.Inner`
    pub qualified_name: String,
    /// Binary name, e.g. `com.example.Outer$Inner`
    pub binary_name: Option<String>,
    pub shape: TypeShape,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub deprecated: bool,
}

impl TypeBinding {
    pub fn declared(qualified_name: impl Into<String>, binary_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            binary_name: Some(binary_name.into()),
            shape: TypeShape::Declared,
            kind,
            modifiers: Modifiers::empty(),
            deprecated: false,
        }
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self {
            qualified_name: name.into(),
            binary_name: None,
            shape: TypeShape::Primitive,
            kind: TypeKind::CLASS,
            modifiers: Modifiers::empty(),
            deprecated: false,
        }
    }

    /// One more array dimension over `component`. Array types never carry
    /// the deprecation of their element type.
    pub fn array_of(component: TypeBinding) -> Self {
        Self {
            qualified_name: format!("{}[]", component.qualified_name),
            binary_name: None,
            shape: TypeShape::Array(Box::new(component)),
            kind: TypeKind::CLASS,
            modifiers: Modifiers::empty(),
            deprecated: false,
        }
    }

    /// Type variable `name` erasing to `erasure`, its first bound or
    /// `java.lang.Object`
    pub fn variable(name: impl Into<String>, erasure: Option<TypeBinding>) -> Self {
        Self {
            qualified_name: name.into(),
            binary_name: None,
            shape: TypeShape::Variable(erasure.map(Box::new)),
            kind: TypeKind::CLASS,
            modifiers: Modifiers::empty(),
            deprecated: false,
        }
    }

    pub fn recovered(name: impl Into<String>) -> Self {
        Self {
            qualified_name: name.into(),
            binary_name: None,
            shape: TypeShape::Recovered,
            kind: TypeKind::CLASS,
            modifiers: Modifiers::empty(),
            deprecated: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn is_array(&self) -> bool {
        matches!(self.shape, TypeShape::Array(_))
    }

    pub fn is_primitive(&self) -> bool {
        self.shape == TypeShape::Primitive
    }

    pub fn is_void(&self) -> bool {
        self.is_primitive() && self.qualified_name == "void"
    }

    /// Component type for arrays, one dimension down
    pub fn component(&self) -> Option<&TypeBinding> {
        match &self.shape {
            TypeShape::Array(component) => Some(component),
            _ => None,
        }
    }

    /// The type members are looked up in: the erasure for type variables,
    /// the binding itself otherwise
    pub fn erasure(&self) -> Option<&TypeBinding> {
        match &self.shape {
            TypeShape::Variable(erasure) => erasure.as_deref(),
            _ => Some(self),
        }
    }

    /// Innermost non-array type
    pub fn element_type(&self) -> &TypeBinding {
        let mut current = self;
        while let Some(component) = current.component() {
            current = component;
        }
        current
    }

    pub fn dimensions(&self) -> usize {
        let mut dims = 0;
        let mut current = self;
        while let Some(component) = current.component() {
            dims += 1;
            current = component;
        }
        dims
    }

    /// Name used for identity comparisons: binary name when present
    pub fn identity(&self) -> &str {
        self.binary_name.as_deref().unwrap_or(&self.qualified_name)
    }

    /// Simple (unqualified) name
    pub fn simple_name(&self) -> &str {
        let name = self.identity();
        name.rsplit(['.', '$']).next().unwrap_or(name)
    }
}

/// Resolved identity of a method or constructor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodBinding {
    pub name: String,
    pub declaring_type: TypeBinding,
    /// Parameter types in declaration order
    pub parameter_types: Vec<TypeBinding>,
    /// `void` for constructors
    pub return_type: TypeBinding,
    pub modifiers: Modifiers,
    pub deprecated: bool,
    pub constructor: bool,
    pub varargs: bool,
}

impl MethodBinding {
    pub fn method(
        name: impl Into<String>,
        declaring_type: TypeBinding,
        parameter_types: Vec<TypeBinding>,
        return_type: TypeBinding,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_type,
            parameter_types,
            return_type,
            modifiers: Modifiers::empty(),
            deprecated: false,
            constructor: false,
            varargs: false,
        }
    }

    /// Constructor bindings are named after their declaring type and
    /// report `void` as return type.
    pub fn constructor(declaring_type: TypeBinding, parameter_types: Vec<TypeBinding>) -> Self {
        let name = declaring_type.simple_name().to_string();
        Self {
            name,
            declaring_type,
            parameter_types,
            return_type: TypeBinding::primitive("void"),
            modifiers: Modifiers::empty(),
            deprecated: false,
            constructor: true,
            varargs: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn with_varargs(mut self, varargs: bool) -> Self {
        self.varargs = varargs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_precedence() {
        assert_eq!(TypeKind::ANNOTATION.keyword(), "@interface");
        assert_eq!(TypeKind::ENUM.keyword(), "enum");
        assert_eq!(TypeKind::INTERFACE.keyword(), "interface");
        assert_eq!(TypeKind::CLASS.keyword(), "class");
    }

    #[test]
    fn test_array_element_type() {
        let int = TypeBinding::primitive("int");
        let matrix = TypeBinding::array_of(TypeBinding::array_of(int.clone()));
        assert_eq!(matrix.dimensions(), 2);
        assert_eq!(matrix.element_type(), &int);
        assert!(!matrix.deprecated);
    }

    #[test]
    fn test_simple_name() {
        let inner = TypeBinding::declared("a.b.Outer.Inner", "a.b.Outer$Inner", TypeKind::CLASS);
        assert_eq!(inner.simple_name(), "Inner");
        let ctor = MethodBinding::constructor(inner, vec![]);
        assert_eq!(ctor.name, "Inner");
        assert!(ctor.return_type.is_void());
    }
}
