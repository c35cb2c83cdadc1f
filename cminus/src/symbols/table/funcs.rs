use crate::eval::ty::Ty;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FuncEntry {
    pub ret: Ty,
    pub params: Vec<Ty>,
    pub slot: usize,
    pub line: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct FuncMap(pub IndexMap<String, FuncEntry>);

impl FuncMap {
    pub fn get(&self, name: &str) -> Option<&FuncEntry> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: &str, entry: FuncEntry) {
        self.0.insert(name.to_string(), entry);
    }
}
