//! The symbol-source seam between the host resolver and the processors.

use crate::types::{ClassDecl, PropertyDecl, SymbolSnapshot};
use std::collections::HashMap;

/// Supplies annotated declarations with resolved type information.
///
/// The query methods preserve snapshot order so that processing, and the
/// diagnostics it produces, is deterministic.
pub trait SymbolSource {
    fn declarations(&self) -> &[ClassDecl];

    fn resolve(&self, qualified_name: &str) -> Option<&ClassDecl>;

    /// Declarations carrying a route annotation.
    fn routes(&self) -> Vec<&ClassDecl> {
        self.declarations()
            .iter()
            .filter(|decl| decl.annotations.route.is_some())
            .collect()
    }

    /// Declarations carrying an interceptor annotation.
    fn interceptors(&self) -> Vec<&ClassDecl> {
        self.declarations()
            .iter()
            .filter(|decl| decl.annotations.interceptor.is_some())
            .collect()
    }

    /// Every property carrying an autowire (or legacy param) directive,
    /// paired with its declaring class.
    fn autowired(&self) -> Vec<(&ClassDecl, &PropertyDecl)> {
        self.declarations()
            .iter()
            .flat_map(|decl| {
                decl.properties
                    .iter()
                    .filter(|prop| prop.autowired.is_some() || prop.param.is_some())
                    .map(move |prop| (decl, prop))
            })
            .collect()
    }
}

/// In-memory [`SymbolSource`] indexed by qualified name.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    declarations: Vec<ClassDecl>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: SymbolSnapshot) -> Self {
        let mut table = Self::new();
        table.extend(snapshot.declarations);
        table
    }

    /// Add declarations; a declaration whose qualified name is already known
    /// replaces the earlier one in place.
    pub fn extend(&mut self, declarations: impl IntoIterator<Item = ClassDecl>) {
        for decl in declarations {
            self.insert(decl);
        }
    }

    pub fn insert(&mut self, decl: ClassDecl) {
        match self.index.get(&decl.qualified_name) {
            Some(&slot) => self.declarations[slot] = decl,
            None => {
                self.index
                    .insert(decl.qualified_name.clone(), self.declarations.len());
                self.declarations.push(decl);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.declarations
            .iter()
            .map(|decl| decl.qualified_name.as_str())
            .collect()
    }
}

impl SymbolSource for SymbolTable {
    fn declarations(&self) -> &[ClassDecl] {
        &self.declarations
    }

    fn resolve(&self, qualified_name: &str) -> Option<&ClassDecl> {
        self.index
            .get(qualified_name)
            .map(|&slot| &self.declarations[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AutowiredAnnotation, RouteAnnotation, TypeRef};

    #[test]
    fn test_insert_replaces_same_name() {
        let mut table = SymbolTable::new();
        table.insert(ClassDecl::new("com.example.A"));
        let mut updated = ClassDecl::new("com.example.A");
        updated.resolved = false;
        table.insert(updated);

        assert_eq!(table.len(), 1);
        assert!(!table.resolve("com.example.A").expect("present").resolved);
    }

    #[test]
    fn test_annotation_queries() {
        let mut routed = ClassDecl::new("com.example.Main");
        routed.annotations.route = Some(RouteAnnotation::new("/main/home"));
        let mut field = crate::types::PropertyDecl::new("id", TypeRef::named("kotlin.Long"));
        field.autowired = Some(AutowiredAnnotation::default());
        routed.properties.push(field);
        routed
            .properties
            .push(crate::types::PropertyDecl::new("plain", TypeRef::named("kotlin.Int")));

        let table = SymbolTable::from_snapshot(SymbolSnapshot {
            declarations: vec![routed, ClassDecl::new("com.example.Other")],
        });

        assert_eq!(table.routes().len(), 1);
        assert!(table.interceptors().is_empty());
        let autowired = table.autowired();
        assert_eq!(autowired.len(), 1);
        assert_eq!(autowired[0].1.name, "id");
    }
}
