use crate::eval::ty::Ty;
use crate::grammer::ast::Scope;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Ref {
    pub line: usize,
    pub scope: Scope,
    pub call: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexUse {
    pub line: usize,
    pub expr: String,
}

/// Argument types seen at one call
#[derive(Debug, Clone, Serialize)]
pub struct CallSite {
    pub line: usize,
    pub args: Vec<Ty>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageEntry {
    pub refs: Vec<Ref>,
    pub indexes: Vec<IndexUse>,
    pub is_call: bool,
    pub calls: Vec<CallSite>,
}

/// Every use of every name, declared or not
#[derive(Debug, Default, Serialize)]
pub struct UsageMap(pub IndexMap<String, UsageEntry>);

impl UsageMap {
    pub fn get(&self, name: &str) -> Option<&UsageEntry> {
        self.0.get(name)
    }

    pub fn record(&mut self, name: &str, line: usize, scope: &Scope, call: bool) -> &mut UsageEntry {
        let entry = self.0.entry(name.to_string()).or_default();
        entry.refs.push(Ref {
            line,
            scope: scope.clone(),
            call,
        });
        entry.is_call |= call;
        entry
    }

    pub fn call_site(&mut self, name: &str, site: CallSite) {
        self.0.entry(name.to_string()).or_default().calls.push(site);
    }
}
