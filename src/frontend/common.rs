//! Tree-sitter helpers shared by the symbol collector, the tree builder and
//! the syntax diagnostics.

use super::FrontEndError;
use crate::model::Modifiers;
use std::fmt;
use std::path::Path;
use tree_sitter::{Node, Parser as TsParser, Tree};

/// Node kinds that declare a named type
pub const TYPE_DECLARATION_KINDS: [&str; 5] = [
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

/// Node kinds whose children are type members
pub const TYPE_BODY_KINDS: [&str; 5] = [
    "class_body",
    "interface_body",
    "enum_body",
    "enum_body_declarations",
    "annotation_type_body",
];

/// Parse Java source with tree-sitter
pub fn parse_java(path: &Path, source: &str) -> Result<Tree, FrontEndError> {
    let mut parser = TsParser::new();
    parser
        .set_language(&tree_sitter_java::language())
        .map_err(|e| FrontEndError::Language(e.to_string()))?;

    parser.parse(source, None).ok_or_else(|| FrontEndError::Parse {
        path: path.to_path_buf(),
    })
}

/// Extract text from a node
pub fn node_text<'a>(node: Node<'a>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

pub fn is_comment(node: Node) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment" | "comment")
}

pub fn is_type_declaration(node: Node) -> bool {
    TYPE_DECLARATION_KINDS.contains(&node.kind())
}

/// Whether `node` sits directly in a type body, i.e. is a member
pub fn is_member(node: Node) -> bool {
    node.parent()
        .map(|p| TYPE_BODY_KINDS.contains(&p.kind()))
        .unwrap_or(false)
}

/// Named children, comments excluded
pub fn named_children<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !is_comment(*child))
        .collect()
}

/// First child of the given kind
pub fn child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

pub fn has_child_of_kind(node: Node, kind: &str) -> bool {
    child_of_kind(node, kind).is_some()
}

/// Keyword modifiers written on a declaration
pub fn declared_modifiers(node: Node, source: &str) -> Modifiers {
    let Some(modifiers) = child_of_kind(node, "modifiers") else {
        return Modifiers::empty();
    };
    let mut cursor = modifiers.walk();
    let keywords: Vec<&str> = modifiers
        .children(&mut cursor)
        .map(|child| node_text(child, source))
        .collect();
    keywords.into_iter().collect()
}

/// `@Deprecated` annotation or a `@deprecated` javadoc tag
pub fn is_deprecated(node: Node, source: &str) -> bool {
    has_deprecated_annotation(node, source)
        || javadoc(node, source)
            .map(|doc| has_deprecated_tag(node_text(doc, source)))
            .unwrap_or(false)
}

fn has_deprecated_annotation(node: Node, source: &str) -> bool {
    let Some(modifiers) = child_of_kind(node, "modifiers") else {
        return false;
    };
    let mut cursor = modifiers.walk();
    let found = modifiers.children(&mut cursor).any(|child| {
        matches!(child.kind(), "marker_annotation" | "annotation")
            && child
                .child_by_field_name("name")
                .map(|name| matches!(node_text(name, source), "Deprecated" | "java.lang.Deprecated"))
                .unwrap_or(false)
    });
    found
}

/// Whether a doc comment carries a `@deprecated` block tag
pub fn has_deprecated_tag(comment: &str) -> bool {
    comment.lines().any(|line| {
        line.trim_start_matches(|c: char| c.is_whitespace() || c == '/' || c == '*')
            .starts_with("@deprecated")
    })
}

/// Doc comment attached to a declaration: the nearest preceding `/** */`
/// comment, looking past other comments only.
pub fn javadoc<'a>(node: Node<'a>, source: &'a str) -> Option<Node<'a>> {
    let mut current = node.prev_sibling();
    while let Some(sibling) = current {
        if !is_comment(sibling) {
            return None;
        }
        if node_text(sibling, source).starts_with("/**") {
            return Some(sibling);
        }
        current = sibling.prev_sibling();
    }
    None
}

/// Start offset of a body declaration, including its doc comment
pub fn declaration_start(node: Node, source: &str) -> usize {
    javadoc(node, source)
        .map(|doc| doc.start_byte())
        .unwrap_or_else(|| node.start_byte())
}

/// A declared type variable and the first type of its bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    pub name: String,
    pub bound: Option<TypeName>,
}

impl TypeParam {
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound: None,
        }
    }
}

/// Type variables declared by the `type_parameters` of `node`
pub fn type_parameters(node: Node, source: &str) -> Vec<TypeParam> {
    let Some(params) = node.child_by_field_name("type_parameters") else {
        return Vec::new();
    };
    named_children(params)
        .into_iter()
        .filter(|p| p.kind() == "type_parameter")
        .filter_map(|p| {
            let children = named_children(p);
            let name = children
                .iter()
                .find(|c| matches!(c.kind(), "type_identifier" | "identifier"))
                .map(|c| node_text(*c, source).to_string())?;
            // Only the first bound determines the erasure
            let bound = children
                .iter()
                .find(|c| c.kind() == "type_bound")
                .and_then(|b| named_children(*b).into_iter().next())
                .and_then(|t| TypeName::from_node(t, source));
            Some(TypeParam { name, bound })
        })
        .collect()
}

/// Number of `[]` pairs in a `dimensions` node
pub fn dimension_count(node: Option<Node>, source: &str) -> usize {
    node.map(|d| node_text(d, source).matches('[').count())
        .unwrap_or(0)
}

/// A type as written in source, before resolution. Type arguments are
/// dropped: only the erasure matters for bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Primitive(String),
    /// Dotted segments, e.g. `["java", "util", "List"]` or `["Outer", "Inner"]`
    Named(Vec<String>),
    /// An already resolved binary name
    Binary(String),
    Array(Box<TypeName>),
    /// `var`
    Inferred,
}

impl TypeName {
    pub fn named(name: &str) -> Self {
        TypeName::Named(name.split('.').map(str::to_string).collect())
    }

    /// Parse a type written as text, e.g. `java.lang.String[]` or `int`
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Some(inner) = text.strip_suffix("...") {
            return TypeName::Array(Box::new(Self::parse(inner)));
        }
        if let Some(inner) = text.strip_suffix("[]") {
            return TypeName::Array(Box::new(Self::parse(inner)));
        }
        let erased = text.split('<').next().unwrap_or(text);
        if is_primitive_name(erased) {
            TypeName::Primitive(erased.to_string())
        } else if erased == "var" {
            TypeName::Inferred
        } else {
            Self::named(erased)
        }
    }

    /// Build from a tree-sitter type node
    pub fn from_node(node: Node, source: &str) -> Option<Self> {
        match node.kind() {
            "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
                Some(TypeName::Primitive(node_text(node, source).trim().to_string()))
            }
            "type_identifier" => {
                let text = node_text(node, source);
                if text == "var" {
                    Some(TypeName::Inferred)
                } else {
                    Some(TypeName::Named(vec![text.to_string()]))
                }
            }
            "scoped_type_identifier" | "generic_type" => {
                let segments = type_segments(node, source);
                if segments.is_empty() {
                    None
                } else {
                    Some(TypeName::Named(segments))
                }
            }
            "array_type" => {
                let element = Self::from_node(node.child_by_field_name("element")?, source)?;
                let dims = dimension_count(node.child_by_field_name("dimensions"), source);
                Some(element.with_dimensions(dims))
            }
            "annotated_type" => named_children(node)
                .into_iter()
                .rev()
                .find(|c| !matches!(c.kind(), "marker_annotation" | "annotation"))
                .and_then(|c| Self::from_node(c, source)),
            _ => None,
        }
    }

    pub fn with_dimensions(self, dims: usize) -> Self {
        (0..dims).fold(self, |acc, _| TypeName::Array(Box::new(acc)))
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Primitive(name) | TypeName::Binary(name) => f.write_str(name),
            TypeName::Named(segments) => f.write_str(&segments.join(".")),
            TypeName::Array(component) => write!(f, "{}[]", component),
            TypeName::Inferred => f.write_str("var"),
        }
    }
}

pub fn is_primitive_name(name: &str) -> bool {
    matches!(
        name,
        "boolean" | "byte" | "char" | "short" | "int" | "long" | "float" | "double" | "void"
    )
}

/// Identifier segments of a possibly scoped, possibly generic type
fn type_segments(node: Node, source: &str) -> Vec<String> {
    match node.kind() {
        "type_identifier" | "identifier" => vec![node_text(node, source).to_string()],
        "generic_type" => named_children(node)
            .into_iter()
            .find(|c| matches!(c.kind(), "type_identifier" | "scoped_type_identifier"))
            .map(|c| type_segments(c, source))
            .unwrap_or_default(),
        "scoped_type_identifier" => named_children(node)
            .into_iter()
            .filter(|c| {
                matches!(
                    c.kind(),
                    "type_identifier" | "scoped_type_identifier" | "generic_type" | "identifier"
                )
            })
            .flat_map(|c| type_segments(c, source))
            .collect(),
        _ => Vec::new(),
    }
}
