//! Project-wide declarations, collected in a first pass over every unit.

use super::common::{
    child_of_kind, declaration_start, declared_modifiers, dimension_count, has_child_of_kind,
    is_deprecated, is_member, is_type_declaration, named_children, node_text,
    type_parameters, TypeName, TypeParam,
};
use crate::model::{Modifiers, TypeKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tree_sitter::Node;

/// Index of a type inside the [`SymbolTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub(crate) usize);

/// Declaration form, finer than [`TypeKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
    Anonymous,
}

impl DeclKind {
    pub fn type_kind(self) -> TypeKind {
        match self {
            DeclKind::Class | DeclKind::Record | DeclKind::Anonymous => TypeKind::CLASS,
            DeclKind::Interface => TypeKind::INTERFACE,
            DeclKind::Enum => TypeKind::ENUM,
            DeclKind::Annotation => TypeKind::ANNOTATION,
        }
    }

    pub fn is_interface(self) -> bool {
        matches!(self, DeclKind::Interface | DeclKind::Annotation)
    }

    fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "class_declaration" => Some(DeclKind::Class),
            "interface_declaration" => Some(DeclKind::Interface),
            "enum_declaration" => Some(DeclKind::Enum),
            "record_declaration" => Some(DeclKind::Record),
            "annotation_type_declaration" => Some(DeclKind::Annotation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Import {
    /// `import a.b.C;`
    Single(String),
    /// `import a.b.*;`
    OnDemand(String),
    /// `import static a.b.C.m;`
    Static { owner: String, member: String },
    /// `import static a.b.C.*;`
    StaticOnDemand(String),
}

/// Package and imports of one compilation unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitContext {
    pub package: String,
    pub imports: Vec<Import>,
}

impl UnitContext {
    pub fn from_root(root: Node, source: &str) -> Self {
        let mut context = UnitContext::default();
        for child in named_children(root) {
            match child.kind() {
                "package_declaration" => {
                    if let Some(name) = named_children(child)
                        .into_iter()
                        .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
                    {
                        context.package = node_text(name, source).to_string();
                    }
                }
                "import_declaration" => {
                    if let Some(import) = Self::import(child, source) {
                        context.imports.push(import);
                    }
                }
                _ => {}
            }
        }
        context
    }

    fn import(node: Node, source: &str) -> Option<Import> {
        let name = named_children(node)
            .into_iter()
            .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))?;
        let name: String = node_text(name, source)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let is_static = has_child_of_kind(node, "static");
        let on_demand = has_child_of_kind(node, "asterisk");

        Some(match (is_static, on_demand) {
            (false, false) => Import::Single(name),
            (false, true) => Import::OnDemand(name),
            (true, true) => Import::StaticOnDemand(name),
            (true, false) => {
                let (owner, member) = name.rsplit_once('.')?;
                Import::Static {
                    owner: owner.to_string(),
                    member: member.to_string(),
                }
            }
        })
    }

    /// Qualify a top-level simple name with this unit's package
    pub fn qualify(&self, simple: &str) -> String {
        if self.package.is_empty() {
            simple.to_string()
        } else {
            format!("{}.{}", self.package, simple)
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSymbol {
    pub name: String,
    pub ty: TypeName,
    pub modifiers: Modifiers,
    pub deprecated: bool,
}

#[derive(Debug, Clone)]
pub struct MethodSymbol {
    /// Method name, or the type's simple name for constructors
    pub name: String,
    pub params: Vec<TypeName>,
    /// `None` for constructors
    pub return_type: Option<TypeName>,
    pub modifiers: Modifiers,
    pub deprecated: bool,
    pub constructor: bool,
    pub varargs: bool,
    pub type_params: Vec<TypeParam>,
    /// Declaration start byte in its unit, if declared in source
    pub site: Option<usize>,
}

impl MethodSymbol {
    pub fn accepts_arity(&self, arity: usize) -> bool {
        if self.varargs {
            arity + 1 >= self.params.len()
        } else {
            arity == self.params.len()
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeSymbol {
    pub binary_name: String,
    /// Dotted name; equals the binary name for local and anonymous types
    pub qualified_name: String,
    pub simple_name: String,
    pub decl: DeclKind,
    pub modifiers: Modifiers,
    pub deprecated: bool,
    /// Lexically enclosing type, by binary name
    pub outer: Option<String>,
    /// Local and anonymous types cannot be named from outside their block
    pub local: bool,
    pub type_params: Vec<TypeParam>,
    pub superclass: Option<TypeName>,
    pub interfaces: Vec<TypeName>,
    /// Member types by binary name
    pub members: Vec<String>,
    pub fields: Vec<FieldSymbol>,
    pub methods: Vec<MethodSymbol>,
    pub context: Arc<UnitContext>,
    /// Declaration start byte in its unit, if declared in source
    pub site: Option<usize>,
    /// Linked direct supertypes, superclass first
    pub supertypes: Vec<SymbolId>,
}

impl TypeSymbol {
    pub fn kind(&self) -> TypeKind {
        self.decl.type_kind()
    }
}

/// Per-unit summary kept by the table
#[derive(Debug, Clone, Default)]
pub struct UnitSymbols {
    pub package: String,
    /// Qualified name of the first top-level type
    pub primary_type: Option<String>,
}

/// All types known to one front-end instance
#[derive(Debug, Default)]
pub struct SymbolTable {
    types: Vec<TypeSymbol>,
    by_binary: HashMap<String, SymbolId>,
    by_qualified: HashMap<String, SymbolId>,
    type_sites: HashMap<(PathBuf, usize), SymbolId>,
    method_sites: HashMap<(PathBuf, usize), (SymbolId, usize)>,
    units: HashMap<PathBuf, UnitSymbols>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, id: SymbolId) -> &TypeSymbol {
        &self.types[id.0]
    }

    pub fn by_binary(&self, binary: &str) -> Option<SymbolId> {
        self.by_binary.get(binary).copied()
    }

    /// Lookup by dotted name; local and anonymous types are not reachable
    pub fn by_qualified(&self, qualified: &str) -> Option<SymbolId> {
        self.by_qualified.get(qualified).copied()
    }

    pub fn type_at(&self, path: &Path, site: usize) -> Option<SymbolId> {
        self.type_sites.get(&(path.to_path_buf(), site)).copied()
    }

    pub fn method_at(&self, path: &Path, site: usize) -> Option<(SymbolId, usize)> {
        self.method_sites.get(&(path.to_path_buf(), site)).copied()
    }

    pub fn unit(&self, path: &Path) -> Option<&UnitSymbols> {
        self.units.get(path)
    }

    pub fn outer(&self, id: SymbolId) -> Option<SymbolId> {
        self.get(id).outer.as_deref().and_then(|b| self.by_binary(b))
    }

    /// Add a type. A binary name seen before keeps its first declaration.
    pub fn insert(&mut self, symbol: TypeSymbol, path: Option<&Path>) -> SymbolId {
        if let Some(existing) = self.by_binary(&symbol.binary_name) {
            tracing::debug!("Duplicate type {} ignored", symbol.binary_name);
            return existing;
        }

        let id = SymbolId(self.types.len());
        self.by_binary.insert(symbol.binary_name.clone(), id);
        if !symbol.local {
            self.by_qualified.insert(symbol.qualified_name.clone(), id);
        }
        if let Some(path) = path {
            if let Some(site) = symbol.site {
                self.type_sites.insert((path.to_path_buf(), site), id);
            }
            for (index, method) in symbol.methods.iter().enumerate() {
                if let Some(site) = method.site {
                    self.method_sites.insert((path.to_path_buf(), site), (id, index));
                }
            }
        }
        self.types.push(symbol);
        id
    }

    /// Merge the output of a [`SymbolCollector`]
    pub fn add_unit(&mut self, path: &Path, collected: CollectedUnit) {
        let primary_type = collected
            .types
            .iter()
            .find(|t| t.outer.is_none())
            .map(|t| t.qualified_name.clone());
        self.units.insert(
            path.to_path_buf(),
            UnitSymbols {
                package: collected.context.package.clone(),
                primary_type,
            },
        );
        for symbol in collected.types {
            self.insert(symbol, Some(path));
        }
    }

    /// Resolve the written supertypes of every type into [`SymbolId`]s
    pub fn link(&mut self) {
        let resolved: Vec<Vec<SymbolId>> = {
            let resolver = super::resolver::Resolver::new(self);
            (0..self.types.len())
                .map(|index| resolver.direct_supertypes(SymbolId(index)))
                .collect()
        };
        for (symbol, supertypes) in self.types.iter_mut().zip(resolved) {
            symbol.supertypes = supertypes;
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> {
        (0..self.types.len()).map(SymbolId)
    }
}

/// Declarations found in one unit
#[derive(Debug, Clone)]
pub struct CollectedUnit {
    pub context: Arc<UnitContext>,
    pub types: Vec<TypeSymbol>,
}

/// First-pass walker: records every type declaration of a unit with its
/// members, naming local and anonymous types the way `javac` does.
pub struct SymbolCollector<'s> {
    source: &'s str,
    context: Arc<UnitContext>,
    types: Vec<TypeSymbol>,
    /// `(enclosing binary name, simple name)` -> next local index
    local_counters: HashMap<(String, String), usize>,
}

impl<'s> SymbolCollector<'s> {
    pub fn collect(root: Node, source: &'s str) -> CollectedUnit {
        let context = Arc::new(UnitContext::from_root(root, source));
        let mut collector = Self {
            source,
            context: context.clone(),
            types: Vec::new(),
            local_counters: HashMap::new(),
        };
        collector.walk(root, None);
        CollectedUnit {
            context,
            types: collector.types,
        }
    }

    fn walk(&mut self, node: Node, enclosing: Option<usize>) {
        if is_type_declaration(node) {
            self.declare_type(node, enclosing);
            return;
        }

        match (node.kind(), enclosing) {
            (
                "method_declaration" | "constructor_declaration" | "compact_constructor_declaration",
                Some(owner),
            ) if is_member(node) => {
                self.declare_method(node, owner);
                return;
            }
            ("field_declaration" | "constant_declaration", Some(owner)) if is_member(node) => {
                self.declare_fields(node, owner);
                return;
            }
            ("enum_constant", Some(owner)) => {
                self.declare_enum_constant(node, owner);
                return;
            }
            ("object_creation_expression", Some(owner)) => {
                if let Some(body) = child_of_kind(node, "class_body") {
                    for child in named_children(node) {
                        if child.id() != body.id() {
                            self.walk(child, enclosing);
                        }
                    }
                    let base = node
                        .child_by_field_name("type")
                        .and_then(|t| TypeName::from_node(t, self.source));
                    self.declare_anonymous(node, body, owner, base);
                    return;
                }
            }
            _ => {}
        }

        for child in named_children(node) {
            self.walk(child, enclosing);
        }
    }

    fn next_local_index(&mut self, enclosing: &str, name: &str) -> usize {
        let counter = self
            .local_counters
            .entry((enclosing.to_string(), name.to_string()))
            .or_insert(0);
        *counter += 1;
        *counter
    }

    fn declare_type(&mut self, node: Node, enclosing: Option<usize>) {
        let Some(decl) = DeclKind::from_node_kind(node.kind()) else {
            return;
        };
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let simple_name = node_text(name, self.source).to_string();
        let member = enclosing.is_some() && is_member(node);

        let (binary_name, qualified_name, local, outer) = match enclosing {
            None => {
                let qualified = self.context.qualify(&simple_name);
                (qualified.clone(), qualified, false, None)
            }
            Some(owner) => {
                let outer = &self.types[owner];
                let outer_binary = outer.binary_name.clone();
                if member {
                    (
                        format!("{}${}", outer_binary, simple_name),
                        format!("{}.{}", outer.qualified_name, simple_name),
                        outer.local,
                        Some(outer_binary),
                    )
                } else {
                    let index = self.next_local_index(&outer_binary, &simple_name);
                    let binary = format!("{}${}{}", outer_binary, index, simple_name);
                    (binary.clone(), binary, true, Some(outer_binary))
                }
            }
        };

        let mut modifiers = declared_modifiers(node, self.source);
        match decl {
            DeclKind::Interface | DeclKind::Annotation => modifiers.insert(Modifiers::ABSTRACT),
            DeclKind::Record => modifiers.insert(Modifiers::FINAL),
            DeclKind::Enum if !has_constant_bodies(node) => modifiers.insert(Modifiers::FINAL),
            _ => {}
        }
        if member {
            if let Some(owner) = enclosing {
                if self.types[owner].decl.is_interface() {
                    modifiers.insert(Modifiers::PUBLIC | Modifiers::STATIC);
                }
            }
            if decl != DeclKind::Class {
                modifiers.insert(Modifiers::STATIC);
            }
        }

        let superclass = node
            .child_by_field_name("superclass")
            .and_then(|s| named_children(s).into_iter().next())
            .and_then(|t| TypeName::from_node(t, self.source));

        let interface_list = node
            .child_by_field_name("interfaces")
            .or_else(|| child_of_kind(node, "extends_interfaces"));
        let interfaces = interface_list
            .and_then(|list| child_of_kind(list, "type_list"))
            .map(|list| {
                named_children(list)
                    .into_iter()
                    .filter_map(|t| TypeName::from_node(t, self.source))
                    .collect()
            })
            .unwrap_or_default();

        let index = self.types.len();
        self.types.push(TypeSymbol {
            binary_name,
            qualified_name,
            simple_name,
            decl,
            modifiers,
            deprecated: is_deprecated(node, self.source),
            outer,
            local,
            type_params: type_parameters(node, self.source),
            superclass,
            interfaces,
            members: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            context: self.context.clone(),
            site: Some(declaration_start(node, self.source)),
            supertypes: Vec::new(),
        });
        if member {
            if let Some(owner) = enclosing {
                let binary = self.types[index].binary_name.clone();
                self.types[owner].members.push(binary);
            }
        }

        if decl == DeclKind::Record {
            self.declare_record_components(node, index);
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.walk(body, Some(index));
        }
        if decl == DeclKind::Record {
            self.declare_canonical_constructor(index);
        }
    }

    fn declare_anonymous(&mut self, node: Node, body: Node, owner: usize, base: Option<TypeName>) {
        let outer_binary = self.types[owner].binary_name.clone();
        let index = self.next_local_index(&outer_binary, "");
        let binary = format!("{}${}", outer_binary, index);

        let symbol_index = self.types.len();
        self.types.push(TypeSymbol {
            binary_name: binary.clone(),
            qualified_name: binary,
            simple_name: String::new(),
            decl: DeclKind::Anonymous,
            modifiers: Modifiers::empty(),
            deprecated: false,
            outer: Some(outer_binary),
            local: true,
            type_params: Vec::new(),
            superclass: base,
            interfaces: Vec::new(),
            members: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            context: self.context.clone(),
            site: Some(node.start_byte()),
            supertypes: Vec::new(),
        });
        self.walk(body, Some(symbol_index));
    }

    fn declare_enum_constant(&mut self, node: Node, owner: usize) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let enum_binary = self.types[owner].binary_name.clone();
        self.types[owner].fields.push(FieldSymbol {
            name: node_text(name, self.source).to_string(),
            ty: TypeName::Binary(enum_binary.clone()),
            modifiers: Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
            deprecated: is_deprecated(node, self.source),
        });

        if let Some(arguments) = node.child_by_field_name("arguments") {
            self.walk(arguments, Some(owner));
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.declare_anonymous(node, body, owner, Some(TypeName::Binary(enum_binary)));
        }
    }

    fn declare_fields(&mut self, node: Node, owner: usize) {
        let Some(ty) = node
            .child_by_field_name("type")
            .and_then(|t| TypeName::from_node(t, self.source))
        else {
            return;
        };
        let mut modifiers = declared_modifiers(node, self.source);
        if self.types[owner].decl.is_interface() {
            modifiers.insert(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL);
        }
        let deprecated = is_deprecated(node, self.source);

        for declarator in named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "variable_declarator")
        {
            let Some(name) = declarator.child_by_field_name("name") else {
                continue;
            };
            let dims = dimension_count(declarator.child_by_field_name("dimensions"), self.source);
            self.types[owner].fields.push(FieldSymbol {
                name: node_text(name, self.source).to_string(),
                ty: ty.clone().with_dimensions(dims),
                modifiers,
                deprecated,
            });
            if let Some(value) = declarator.child_by_field_name("value") {
                self.walk(value, Some(owner));
            }
        }
    }

    fn declare_record_components(&mut self, node: Node, owner: usize) {
        let Some(params) = node.child_by_field_name("parameters") else {
            return;
        };
        for param in named_children(params) {
            let (Some(ty), Some(name)) = (
                param
                    .child_by_field_name("type")
                    .and_then(|t| TypeName::from_node(t, self.source)),
                param.child_by_field_name("name"),
            ) else {
                continue;
            };
            let name = node_text(name, self.source).to_string();
            self.types[owner].methods.push(MethodSymbol {
                name: name.clone(),
                params: Vec::new(),
                return_type: Some(ty.clone()),
                modifiers: Modifiers::PUBLIC,
                deprecated: false,
                constructor: false,
                varargs: false,
                type_params: Vec::new(),
                site: None,
            });
            self.types[owner].fields.push(FieldSymbol {
                name,
                ty,
                modifiers: Modifiers::PRIVATE | Modifiers::FINAL,
                deprecated: false,
            });
        }
    }

    /// Records get a canonical constructor unless one is written out
    fn declare_canonical_constructor(&mut self, owner: usize) {
        let symbol = &self.types[owner];
        let components: Vec<TypeName> = symbol
            .fields
            .iter()
            .filter(|f| !f.modifiers.contains(Modifiers::STATIC))
            .map(|f| f.ty.clone())
            .collect();
        let explicit = symbol
            .methods
            .iter()
            .any(|m| m.constructor && m.params.len() == components.len());
        if explicit {
            return;
        }

        let access = symbol.modifiers.access();
        let name = symbol.simple_name.clone();
        self.types[owner].methods.push(MethodSymbol {
            name,
            params: components,
            return_type: None,
            modifiers: access,
            deprecated: false,
            constructor: true,
            varargs: false,
            type_params: Vec::new(),
            site: None,
        });
    }

    fn declare_method(&mut self, node: Node, owner: usize) {
        let owner_symbol = &self.types[owner];
        let owner_decl = owner_symbol.decl;
        let constructor = node.kind() != "method_declaration";
        let name = if constructor {
            owner_symbol.simple_name.clone()
        } else {
            match node.child_by_field_name("name") {
                Some(name) => node_text(name, self.source).to_string(),
                None => return,
            }
        };

        let (params, varargs) = if node.kind() == "compact_constructor_declaration" {
            let components = owner_symbol
                .fields
                .iter()
                .filter(|f| !f.modifiers.contains(Modifiers::STATIC))
                .map(|f| f.ty.clone())
                .collect();
            (components, false)
        } else {
            self.parameter_types(node)
        };

        let return_type = if constructor {
            None
        } else {
            let dims = dimension_count(node.child_by_field_name("dimensions"), self.source);
            node.child_by_field_name("type")
                .and_then(|t| TypeName::from_node(t, self.source))
                .map(|t| t.with_dimensions(dims))
        };

        let mut modifiers = declared_modifiers(node, self.source);
        let has_body = node.child_by_field_name("body").is_some();
        if owner_decl.is_interface() {
            if !modifiers.contains(Modifiers::PRIVATE) {
                modifiers.insert(Modifiers::PUBLIC);
            }
            let is_default = has_child_of_kind(
                child_of_kind(node, "modifiers").unwrap_or(node),
                "default",
            );
            if !has_body
                && !is_default
                && !modifiers.contains(Modifiers::STATIC)
                && !modifiers.contains(Modifiers::PRIVATE)
            {
                modifiers.insert(Modifiers::ABSTRACT);
            }
        }
        if owner_decl == DeclKind::Enum && constructor {
            modifiers.insert(Modifiers::PRIVATE);
        }

        self.types[owner].methods.push(MethodSymbol {
            name,
            params,
            return_type,
            modifiers,
            deprecated: is_deprecated(node, self.source),
            constructor,
            varargs,
            type_params: type_parameters(node, self.source),
            site: Some(declaration_start(node, self.source)),
        });

        if let Some(body) = node.child_by_field_name("body") {
            self.walk(body, Some(owner));
        }
    }

    fn parameter_types(&self, node: Node) -> (Vec<TypeName>, bool) {
        let Some(params) = node.child_by_field_name("parameters") else {
            return (Vec::new(), false);
        };
        let mut types = Vec::new();
        let mut varargs = false;
        for param in named_children(params) {
            match param.kind() {
                "formal_parameter" => {
                    let dims = dimension_count(param.child_by_field_name("dimensions"), self.source);
                    let ty = param
                        .child_by_field_name("type")
                        .and_then(|t| TypeName::from_node(t, self.source))
                        .map(|t| t.with_dimensions(dims))
                        .unwrap_or(TypeName::Inferred);
                    types.push(ty);
                }
                "spread_parameter" => {
                    let ty = named_children(param)
                        .into_iter()
                        .find_map(|c| TypeName::from_node(c, self.source))
                        .unwrap_or(TypeName::Inferred);
                    types.push(ty.with_dimensions(1));
                    varargs = true;
                }
                _ => {}
            }
        }
        (types, varargs)
    }
}

fn has_constant_bodies(node: Node) -> bool {
    node.child_by_field_name("body")
        .map(|body| {
            named_children(body)
                .into_iter()
                .any(|c| c.kind() == "enum_constant" && c.child_by_field_name("body").is_some())
        })
        .unwrap_or(false)
}
