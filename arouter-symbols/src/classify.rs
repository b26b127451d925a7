//! Capability classification over the resolved supertype graph.
//!
//! A declaration "implements" a contract when the contract's qualified name
//! appears anywhere in its breadth-first supertype closure. References the
//! resolver could not settle are treated as leaves: their own name still
//! counts, but nothing beyond them is visited.

use crate::table::SymbolSource;
use crate::types::{ClassDecl, TypeRef};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

/// Memoizing classifier for one processing round.
///
/// Ancestor lists are cached per declaration name, so a fresh classifier
/// must be created whenever the underlying [`SymbolSource`] changes.
pub struct Classifier<'a> {
    source: &'a dyn SymbolSource,
    ancestors: RefCell<HashMap<String, Rc<[String]>>>,
}

impl<'a> Classifier<'a> {
    pub fn new(source: &'a dyn SymbolSource) -> Self {
        Self {
            source,
            ancestors: RefCell::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &'a dyn SymbolSource {
        self.source
    }

    /// Breadth-first supertype closure of `decl`, excluding `decl` itself.
    pub fn ancestors(&self, decl: &ClassDecl) -> Rc<[String]> {
        if let Some(cached) = self.ancestors.borrow().get(&decl.qualified_name) {
            return Rc::clone(cached);
        }

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(decl.qualified_name.as_str());
        let mut queue: VecDeque<&TypeRef> = decl.supertypes.iter().collect();
        let mut order = Vec::new();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.name.as_str()) {
                continue;
            }
            order.push(current.name.clone());
            match self.source.resolve(&current.name) {
                Some(resolved) => queue.extend(resolved.supertypes.iter()),
                None => tracing::trace!(
                    target: "arouter::symbols",
                    supertype = %current.name,
                    "supertype not in snapshot, treated as leaf"
                ),
            }
        }

        let order: Rc<[String]> = order.into();
        self.ancestors
            .borrow_mut()
            .insert(decl.qualified_name.clone(), Rc::clone(&order));
        order
    }

    /// Index into `candidates` of the first contract met while walking the
    /// supertype chain of `decl`, or `None`.
    pub fn first_match(&self, decl: &ClassDecl, candidates: &[&str]) -> Option<usize> {
        self.ancestors(decl)
            .iter()
            .find_map(|name| candidates.iter().position(|c| c == name))
    }

    pub fn implements(&self, decl: &ClassDecl, contract: &str) -> bool {
        self.first_match(decl, &[contract]).is_some()
    }

    /// Classify a field type: the type's own name is checked first, then the
    /// supertype closure of its declaration when the resolver knows it.
    pub fn type_first_match(&self, ty: &TypeRef, candidates: &[&str]) -> Option<usize> {
        if let Some(index) = candidates.iter().position(|c| *c == ty.name) {
            return Some(index);
        }
        let decl = self.source.resolve(&ty.name)?;
        self.first_match(decl, candidates)
    }

    pub fn type_implements(&self, ty: &TypeRef, contract: &str) -> bool {
        self.type_first_match(ty, &[contract]).is_some()
    }
}
