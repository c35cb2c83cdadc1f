use crate::eval::ty::Ty;
use crate::grammer::ast::Scope;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct VarEntry {
    pub ty: Ty,
    pub slot: usize,
    pub line: usize,
    pub array: bool,
    pub size: Option<usize>,
    pub scope: Scope,
}

/// Declared variables: name -> scope -> entry
#[derive(Debug, Default, Serialize)]
pub struct VarMap(pub IndexMap<String, IndexMap<Scope, VarEntry>>);

impl VarMap {
    /// Declaration of `name` in exactly this scope
    pub fn get(&self, name: &str, scope: &Scope) -> Option<&VarEntry> {
        self.0.get(name)?.get(scope)
    }

    /// Declaration visible from `scope`: locals, then parameters, then globals
    pub fn resolve(&self, name: &str, scope: &Scope) -> Option<&VarEntry> {
        let scopes = self.0.get(name)?;
        let mut current = Some(scope.clone());
        while let Some(scope) = current {
            if let Some(entry) = scopes.get(&scope) {
                return Some(entry);
            }
            current = scope.parent();
        }
        None
    }

    pub fn insert(&mut self, name: &str, entry: VarEntry) {
        self.0
            .entry(name.to_string())
            .or_default()
            .insert(entry.scope.clone(), entry);
    }
}
