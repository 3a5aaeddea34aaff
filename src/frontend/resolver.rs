//! Name resolution against the [`SymbolTable`].
//!
//! Resolution is best effort: anything the table cannot answer yields
//! `None` (or a recovered binding), never an error.

use super::common::{TypeName, TypeParam};
use super::platform;
use super::symbols::{DeclKind, Import, MethodSymbol, SymbolId, SymbolTable, UnitContext};
use crate::model::{MethodBinding, Modifiers, TypeBinding, TypeShape};
use std::collections::HashSet;

/// Lexical context for a type lookup
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub context: &'a UnitContext,
    /// Innermost enclosing type
    pub enclosing: Option<SymbolId>,
    /// Method-level type variables, innermost last; class-level ones
    /// come from `enclosing`
    pub type_vars: &'a [TypeParam],
    /// Local classes visible at this point, innermost last
    pub local_types: &'a [(String, SymbolId)],
}

impl<'a> Scope<'a> {
    pub fn new(context: &'a UnitContext) -> Self {
        Self {
            context,
            enclosing: None,
            type_vars: &[],
            local_types: &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Named {
    Symbol(SymbolId),
    Variable(TypeBinding),
}

/// Static type of an argument expression, as far as it is known
#[derive(Debug, Clone, PartialEq)]
pub enum ArgType {
    Known(TypeBinding),
    Null,
    Unknown,
}

impl From<Option<TypeBinding>> for ArgType {
    fn from(binding: Option<TypeBinding>) -> Self {
        binding.map(ArgType::Known).unwrap_or(ArgType::Unknown)
    }
}

/// How well an argument fits a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Fit {
    No,
    Loose,
    Exact,
}

pub struct Resolver<'t> {
    table: &'t SymbolTable,
}

const OBJECT: &str = "java.lang.Object";

impl<'t> Resolver<'t> {
    pub fn new(table: &'t SymbolTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t SymbolTable {
        self.table
    }

    /// Scope of a type's own body
    pub fn scope_of(&self, id: SymbolId) -> Scope<'t> {
        Scope {
            context: &self.table.get(id).context,
            enclosing: Some(id),
            type_vars: &[],
            local_types: &[],
        }
    }

    pub fn type_binding(&self, id: SymbolId) -> TypeBinding {
        let symbol = self.table.get(id);
        TypeBinding::declared(&symbol.qualified_name, &symbol.binary_name, symbol.kind())
            .with_modifiers(symbol.modifiers)
            .with_deprecated(symbol.deprecated)
    }

    pub fn lookup_qualified(&self, qualified: &str) -> Option<TypeBinding> {
        self.table.by_qualified(qualified).map(|id| self.type_binding(id))
    }

    /// Declared type whose members `binding` exposes. Type variables
    /// answer through their erasure.
    pub fn symbol_of(&self, binding: &TypeBinding) -> Option<SymbolId> {
        let binding = binding.erasure()?;
        match binding.shape {
            TypeShape::Declared => binding
                .binary_name
                .as_deref()
                .and_then(|b| self.table.by_binary(b)),
            _ => None,
        }
    }

    /// Resolve a written type; `None` when any part is unknown
    pub fn resolve_type(&self, name: &TypeName, scope: &Scope) -> Option<TypeBinding> {
        match name {
            TypeName::Primitive(p) => Some(TypeBinding::primitive(p.as_str())),
            TypeName::Array(component) => {
                self.resolve_type(component, scope).map(TypeBinding::array_of)
            }
            TypeName::Inferred => None,
            TypeName::Binary(binary) => self.table.by_binary(binary).map(|id| self.type_binding(id)),
            TypeName::Named(segments) => match self.lookup(segments, scope)? {
                Named::Symbol(id) => Some(self.type_binding(id)),
                Named::Variable(binding) => Some(binding),
            },
        }
    }

    /// Like [`Resolver::resolve_type`], falling back to a recovered binding
    pub fn resolve_or_recover(&self, name: &TypeName, scope: &Scope) -> TypeBinding {
        if let Some(binding) = self.resolve_type(name, scope) {
            return binding;
        }
        match name {
            TypeName::Array(component) => {
                TypeBinding::array_of(self.resolve_or_recover(component, scope))
            }
            other => TypeBinding::recovered(other.to_string()),
        }
    }

    /// A bare or dotted name used as an expression qualifier, e.g. the
    /// `Math` in `Math.max(a, b)`
    pub fn resolve_type_segments(&self, segments: &[String], scope: &Scope) -> Option<TypeBinding> {
        match self.lookup(segments, scope)? {
            Named::Symbol(id) => Some(self.type_binding(id)),
            Named::Variable(_) => None,
        }
    }

    fn lookup(&self, segments: &[String], scope: &Scope) -> Option<Named> {
        let (first, rest) = segments.split_first()?;
        if rest.is_empty() {
            return self.lookup_simple(first, scope);
        }

        if let Some(id) = self.table.by_qualified(&segments.join(".")) {
            return Some(Named::Symbol(id));
        }
        if let Some(Named::Symbol(outer)) = self.lookup_simple(first, scope) {
            if let Some(id) = self.member_path(outer, rest) {
                return Some(Named::Symbol(id));
            }
        }
        // Longest package prefix first, then member types
        for split in (1..segments.len()).rev() {
            if let Some(outer) = self.table.by_qualified(&segments[..split].join(".")) {
                if let Some(id) = self.member_path(outer, &segments[split..]) {
                    return Some(Named::Symbol(id));
                }
            }
        }
        None
    }

    fn member_path(&self, outer: SymbolId, path: &[String]) -> Option<SymbolId> {
        path.iter()
            .try_fold(outer, |current, segment| self.member_type(current, segment))
    }

    fn lookup_simple(&self, simple: &str, scope: &Scope) -> Option<Named> {
        if let Some(index) = scope.type_vars.iter().rposition(|v| v.name == simple) {
            // A bound may only name the variables declared before it
            let bound_scope = Scope {
                type_vars: &scope.type_vars[..index],
                ..*scope
            };
            let binding = self.variable_binding(&scope.type_vars[index], &bound_scope);
            return Some(Named::Variable(binding));
        }
        if let Some((_, id)) = scope.local_types.iter().rev().find(|(name, _)| name == simple) {
            return Some(Named::Symbol(*id));
        }

        let mut current = scope.enclosing;
        while let Some(id) = current {
            let symbol = self.table.get(id);
            if let Some(index) = symbol.type_params.iter().position(|v| v.name == simple) {
                let bound_scope = Scope {
                    context: &symbol.context,
                    enclosing: self.table.outer(id),
                    type_vars: &symbol.type_params[..index],
                    local_types: scope.local_types,
                };
                let binding = self.variable_binding(&symbol.type_params[index], &bound_scope);
                return Some(Named::Variable(binding));
            }
            if symbol.simple_name == simple {
                return Some(Named::Symbol(id));
            }
            if let Some(member) = self.member_type(id, simple) {
                return Some(Named::Symbol(member));
            }
            current = self.table.outer(id);
        }

        self.lookup_imported(simple, scope.context).map(Named::Symbol)
    }

    /// A type variable erases to its first bound, else to `java.lang.Object`
    fn variable_binding(&self, param: &TypeParam, scope: &Scope) -> TypeBinding {
        let erasure = match &param.bound {
            Some(bound) => self
                .resolve_type(bound, scope)
                .and_then(|b| b.erasure().cloned()),
            None => self.lookup_qualified(OBJECT),
        };
        TypeBinding::variable(param.name.as_str(), erasure)
    }

    fn lookup_imported(&self, simple: &str, context: &UnitContext) -> Option<SymbolId> {
        let suffix = format!(".{}", simple);
        for import in &context.imports {
            if let Import::Single(name) = import {
                if name == simple || name.ends_with(&suffix) {
                    if let Some(id) = self.table.by_qualified(name) {
                        return Some(id);
                    }
                }
            }
        }

        if let Some(id) = self.table.by_qualified(&context.qualify(simple)) {
            return Some(id);
        }

        for import in &context.imports {
            if let Import::OnDemand(package) = import {
                if let Some(id) = self.table.by_qualified(&format!("{}.{}", package, simple)) {
                    return Some(id);
                }
            }
        }

        self.table.by_qualified(&format!("java.lang.{}", simple))
    }

    /// Member type by simple name, declared or inherited
    pub fn member_type(&self, owner: SymbolId, simple: &str) -> Option<SymbolId> {
        self.hierarchy(owner).into_iter().find_map(|id| {
            self.table
                .get(id)
                .members
                .iter()
                .filter_map(|binary| self.table.by_binary(binary))
                .find(|m| self.table.get(*m).simple_name == simple)
        })
    }

    /// `id` followed by all of its supertypes, depth first, superclass
    /// before interfaces, each once
    pub fn hierarchy(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current);
            stack.extend(self.table.get(current).supertypes.iter().rev().copied());
        }
        order
    }

    /// Resolve the written (or implicit) supertypes of `id`
    pub fn direct_supertypes(&self, id: SymbolId) -> Vec<SymbolId> {
        let symbol = self.table.get(id);
        let outer = self.table.outer(id);
        let scope = Scope {
            context: &symbol.context,
            enclosing: outer,
            type_vars: &symbol.type_params,
            local_types: &[],
        };
        let resolve = |name: &TypeName| -> Option<SymbolId> {
            match name {
                TypeName::Binary(binary) => self.table.by_binary(binary),
                TypeName::Named(segments) => match self.lookup(segments, &scope)? {
                    Named::Symbol(found) if found != id => Some(found),
                    _ => None,
                },
                _ => None,
            }
        };

        let mut supertypes: Vec<SymbolId> = Vec::new();
        let implicit = match symbol.decl {
            DeclKind::Enum => Some("java.lang.Enum"),
            DeclKind::Record => Some("java.lang.Record"),
            _ => None,
        };
        if let Some(superclass) = symbol.superclass.as_ref().and_then(|s| resolve(s)) {
            supertypes.push(superclass);
        } else if let Some(implicit) = implicit.and_then(|q| self.table.by_qualified(q)) {
            supertypes.push(implicit);
        }
        supertypes.extend(symbol.interfaces.iter().filter_map(|i| resolve(i)));

        let has_class = supertypes
            .iter()
            .any(|s| !self.table.get(*s).decl.is_interface());
        if !has_class && symbol.qualified_name != OBJECT {
            if let Some(object) = self.table.by_qualified(OBJECT) {
                supertypes.push(object);
            }
        }
        supertypes
    }

    pub fn method_binding(&self, owner: SymbolId, method: &MethodSymbol) -> MethodBinding {
        let declaring = self.type_binding(owner);
        let scope = Scope {
            type_vars: &method.type_params,
            ..self.scope_of(owner)
        };
        let params = method
            .params
            .iter()
            .map(|p| self.resolve_or_recover(p, &scope))
            .collect();

        let binding = match &method.return_type {
            None => MethodBinding::constructor(declaring, params),
            Some(ret) => MethodBinding::method(
                &method.name,
                declaring,
                params,
                self.resolve_or_recover(ret, &scope),
            ),
        };
        binding
            .with_modifiers(method.modifiers)
            .with_deprecated(method.deprecated)
            .with_varargs(method.varargs)
    }

    /// Binding of the method declared at `index` of `owner`
    pub fn declared_method(&self, owner: SymbolId, index: usize) -> Option<MethodBinding> {
        self.table
            .get(owner)
            .methods
            .get(index)
            .map(|m| self.method_binding(owner, m))
    }

    /// Methods named `name` callable with `arity` arguments on `owner`,
    /// overridden declarations hidden by the most derived one
    pub fn methods(&self, owner: SymbolId, name: &str, arity: usize) -> Vec<MethodBinding> {
        let mut seen_params: HashSet<Vec<String>> = HashSet::new();
        let mut found = Vec::new();
        for id in self.hierarchy(owner) {
            for method in &self.table.get(id).methods {
                if method.constructor || method.name != name || !method.accepts_arity(arity) {
                    continue;
                }
                let binding = self.method_binding(id, method);
                let key: Vec<String> = binding
                    .parameter_types
                    .iter()
                    .map(|p| p.identity().to_string())
                    .collect();
                if seen_params.insert(key) {
                    found.push(binding);
                }
            }
        }
        found
    }

    /// Constructors of `owner` callable with `arity` arguments. A class
    /// without any declared constructor gets the default one.
    pub fn constructors(&self, owner: SymbolId, arity: usize) -> Vec<MethodBinding> {
        let symbol = self.table.get(owner);
        let declared: Vec<&MethodSymbol> =
            symbol.methods.iter().filter(|m| m.constructor).collect();

        if declared.is_empty() {
            if arity != 0 || symbol.decl.is_interface() {
                return Vec::new();
            }
            let access = if symbol.decl == DeclKind::Enum {
                Modifiers::PRIVATE
            } else {
                symbol.modifiers.access()
            };
            return vec![MethodBinding::constructor(self.type_binding(owner), Vec::new())
                .with_modifiers(access)];
        }

        declared
            .into_iter()
            .filter(|m| m.accepts_arity(arity))
            .map(|m| self.method_binding(owner, m))
            .collect()
    }

    /// Field type by name, declared or inherited
    pub fn field_type(&self, owner: SymbolId, name: &str) -> Option<TypeBinding> {
        self.hierarchy(owner).into_iter().find_map(|id| {
            let field = self.table.get(id).fields.iter().find(|f| f.name == name)?;
            Some(self.resolve_or_recover(&field.ty, &self.scope_of(id)))
        })
    }

    /// Pick the overload the arguments select. Ambiguity yields `None`.
    pub fn select(&self, candidates: Vec<MethodBinding>, args: &[ArgType]) -> Option<MethodBinding> {
        if candidates.len() <= 1 {
            return candidates.into_iter().next();
        }

        // Strict and loose invocation first, variable arity only after
        let fixed: Vec<(MethodBinding, usize)> = candidates
            .iter()
            .filter(|m| m.parameter_types.len() == args.len())
            .filter_map(|m| self.score(m, args, false).map(|s| (m.clone(), s)))
            .collect();
        let applicable = if fixed.is_empty() {
            candidates
                .iter()
                .filter(|m| m.varargs)
                .filter_map(|m| self.score(m, args, true).map(|s| (m.clone(), s)))
                .collect()
        } else {
            fixed
        };

        let best = applicable.iter().map(|(_, s)| *s).max()?;
        let tied: Vec<MethodBinding> = applicable
            .into_iter()
            .filter(|(_, s)| *s == best)
            .map(|(m, _)| m)
            .collect();
        if tied.len() == 1 {
            return tied.into_iter().next();
        }

        let most_specific: Vec<&MethodBinding> = tied
            .iter()
            .filter(|a| {
                tied.iter()
                    .all(|b| std::ptr::eq(*a, b) || self.more_specific(a, b))
            })
            .collect();
        match most_specific.as_slice() {
            [only] => Some((*only).clone()),
            _ => None,
        }
    }

    /// Number of exact argument matches, `None` when not applicable
    fn score(&self, method: &MethodBinding, args: &[ArgType], expand: bool) -> Option<usize> {
        let params = &method.parameter_types;
        let mut exact = 0;
        for (i, arg) in args.iter().enumerate() {
            let param = if expand && i + 1 >= params.len() {
                let last = params.last()?;
                last.component().unwrap_or(last)
            } else {
                params.get(i)?
            };
            match self.fit(param, arg) {
                Fit::No => return None,
                Fit::Exact => exact += 1,
                Fit::Loose => {}
            }
        }
        Some(exact)
    }

    fn more_specific(&self, a: &MethodBinding, b: &MethodBinding) -> bool {
        a.parameter_types.len() == b.parameter_types.len()
            && a.parameter_types
                .iter()
                .zip(&b.parameter_types)
                .all(|(pa, pb)| self.fit(pb, &ArgType::Known(pa.clone())) != Fit::No)
    }

    fn fit(&self, param: &TypeBinding, arg: &ArgType) -> Fit {
        let arg = match arg {
            ArgType::Unknown => return Fit::Loose,
            ArgType::Null => {
                return if param.is_primitive() { Fit::No } else { Fit::Loose };
            }
            ArgType::Known(arg) => arg,
        };

        match (&param.shape, &arg.shape) {
            (TypeShape::Variable(_) | TypeShape::Recovered, _)
            | (_, TypeShape::Variable(_) | TypeShape::Recovered) => Fit::Loose,
            (TypeShape::Primitive, TypeShape::Primitive) => {
                if param.qualified_name == arg.qualified_name {
                    Fit::Exact
                } else if platform::widens_to(&arg.qualified_name, &param.qualified_name) {
                    Fit::Loose
                } else {
                    Fit::No
                }
            }
            (TypeShape::Primitive, TypeShape::Declared) => {
                match platform::unboxed(&arg.qualified_name) {
                    Some(p) if platform::widens_to(p, &param.qualified_name) => Fit::Loose,
                    _ => Fit::No,
                }
            }
            (TypeShape::Declared, TypeShape::Primitive) => {
                let boxed = platform::boxed(&arg.qualified_name);
                if boxed == Some(param.qualified_name.as_str())
                    || matches!(
                        param.qualified_name.as_str(),
                        OBJECT | "java.lang.Number" | "java.io.Serializable" | "java.lang.Comparable"
                    )
                {
                    Fit::Loose
                } else {
                    Fit::No
                }
            }
            (TypeShape::Array(pc), TypeShape::Array(ac)) => {
                if pc.is_primitive() || ac.is_primitive() {
                    if pc.qualified_name == ac.qualified_name {
                        Fit::Exact
                    } else {
                        Fit::No
                    }
                } else {
                    self.fit(pc, &ArgType::Known((**ac).clone()))
                }
            }
            (TypeShape::Declared, TypeShape::Array(_)) => {
                if param.qualified_name == OBJECT {
                    Fit::Loose
                } else {
                    Fit::No
                }
            }
            (TypeShape::Declared, TypeShape::Declared) => {
                if param.identity() == arg.identity() {
                    return Fit::Exact;
                }
                if param.qualified_name == OBJECT {
                    return Fit::Loose;
                }
                match (self.symbol_of(arg), self.symbol_of(param)) {
                    (Some(sub), Some(sup)) => {
                        if self.hierarchy(sub).contains(&sup) {
                            Fit::Loose
                        } else {
                            Fit::No
                        }
                    }
                    _ => Fit::Loose,
                }
            }
            (TypeShape::Array(_), _) | (TypeShape::Primitive, TypeShape::Array(_)) => Fit::No,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::common::parse_java;
    use crate::frontend::symbols::SymbolCollector;
    use std::path::Path;

    fn table(sources: &[(&str, &str)]) -> SymbolTable {
        let mut table = SymbolTable::new();
        for (path, source) in sources {
            let tree = parse_java(Path::new(path), source).unwrap();
            let collected = SymbolCollector::collect(tree.root_node(), source);
            table.add_unit(Path::new(path), collected);
        }
        platform::install(&mut table);
        table.link();
        table
    }

    fn known(binding: TypeBinding) -> ArgType {
        ArgType::Known(binding)
    }

    #[test]
    fn test_scope_order() {
        let table = table(&[
            ("a/A.java", "package a; import b.B; class A { class Inner {} }"),
            ("b/B.java", "package b; public class B {}"),
            ("a/Peer.java", "package a; class Peer {}"),
        ]);
        let resolver = Resolver::new(&table);
        let a = table.by_qualified("a.A").unwrap();
        let scope = resolver.scope_of(a);

        let resolve = |name: &str| {
            resolver
                .resolve_type(&TypeName::parse(name), &scope)
                .map(|b| b.identity().to_string())
        };
        assert_eq!(resolve("Inner").as_deref(), Some("a.A$Inner"));
        assert_eq!(resolve("B").as_deref(), Some("b.B"));
        assert_eq!(resolve("Peer").as_deref(), Some("a.Peer"));
        assert_eq!(resolve("String").as_deref(), Some("java.lang.String"));
        assert_eq!(resolve("a.A.Inner").as_deref(), Some("a.A$Inner"));
        assert_eq!(resolve("Inner[]").as_deref(), Some("a.A.Inner[]"));
        assert_eq!(resolve("Missing"), None);
        assert_eq!(
            resolver.resolve_or_recover(&TypeName::parse("Missing[]"), &scope).qualified_name,
            "Missing[]"
        );
    }

    #[test]
    fn test_inherited_member_type() {
        let table = table(&[(
            "p/T.java",
            "package p; class Base { static class Nested {} } class Derived extends Base {}",
        )]);
        let resolver = Resolver::new(&table);
        let derived = table.by_qualified("p.Derived").unwrap();
        let found = resolver
            .resolve_type(&TypeName::parse("Nested"), &resolver.scope_of(derived))
            .unwrap();
        assert_eq!(found.identity(), "p.Base$Nested");
    }

    #[test]
    fn test_implicit_supertypes() {
        let table = table(&[("p/E.java", "package p; enum E { A } interface I {} class C {}")]);
        let resolver = Resolver::new(&table);
        let names = |q: &str| -> Vec<String> {
            let id = table.by_qualified(q).unwrap();
            table.get(id)
                .supertypes
                .iter()
                .map(|s| table.get(*s).qualified_name.clone())
                .collect()
        };
        assert_eq!(names("p.E"), vec!["java.lang.Enum"]);
        assert_eq!(names("p.C"), vec!["java.lang.Object"]);
        assert_eq!(names("p.I"), vec!["java.lang.Object"]);

        let e = table.by_qualified("p.E").unwrap();
        assert_eq!(resolver.methods(e, "ordinal", 0).len(), 1);
    }

    #[test]
    fn test_type_variables_erase_to_first_bound() {
        let table = table(&[(
            "p/G.java",
            "package p; class Base {} class G<T extends Base, U extends T, V> {}",
        )]);
        let resolver = Resolver::new(&table);
        let g = table.by_qualified("p.G").unwrap();
        let scope = resolver.scope_of(g);

        let erasure = |name: &str| {
            let binding = resolver.resolve_type(&TypeName::parse(name), &scope).unwrap();
            assert_eq!(binding.qualified_name, name);
            resolver
                .symbol_of(&binding)
                .map(|id| table.get(id).qualified_name.clone())
        };
        assert_eq!(erasure("T").as_deref(), Some("p.Base"));
        assert_eq!(erasure("U").as_deref(), Some("p.Base"));
        assert_eq!(erasure("V").as_deref(), Some("java.lang.Object"));
    }

    #[test]
    fn test_overload_selection() {
        let table = table(&[(
            "p/O.java",
            r#"package p;
            class O {
                void f(int x) {}
                void f(String s) {}
                void f(Object o) {}
                void g(long x) {}
                void g(double x) {}
                void v(String... parts) {}
            }"#,
        )]);
        let resolver = Resolver::new(&table);
        let o = table.by_qualified("p.O").unwrap();
        let string = resolver.lookup_qualified("java.lang.String").unwrap();
        let int = TypeBinding::primitive("int");

        let pick = |name: &str, args: Vec<ArgType>| {
            let candidates = resolver.methods(o, name, args.len());
            resolver
                .select(candidates, &args)
                .map(|m| m.parameter_types[0].qualified_name.clone())
        };
        assert_eq!(pick("f", vec![known(int.clone())]).as_deref(), Some("int"));
        assert_eq!(pick("f", vec![known(string.clone())]).as_deref(), Some("java.lang.String"));
        assert_eq!(pick("f", vec![ArgType::Null]).as_deref(), Some("java.lang.String"));
        assert_eq!(pick("f", vec![ArgType::Unknown]), None);
        assert_eq!(pick("g", vec![known(int)]).as_deref(), Some("long"));
        assert_eq!(
            pick("v", vec![known(string.clone()), known(string)]).as_deref(),
            Some("java.lang.String[]")
        );
    }

    #[test]
    fn test_default_constructor() {
        let table = table(&[("p/D.java", "package p; public class D {}")]);
        let resolver = Resolver::new(&table);
        let d = table.by_qualified("p.D").unwrap();
        let ctors = resolver.constructors(d, 0);
        assert_eq!(ctors.len(), 1);
        assert_eq!(ctors[0].modifiers, Modifiers::PUBLIC);
        assert!(resolver.constructors(d, 1).is_empty());
    }
}
