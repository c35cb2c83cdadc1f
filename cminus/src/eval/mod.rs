mod checks;
mod collect;
mod typecheck;
pub mod ty;

use crate::error::{has_error, Diag, Error};
use crate::grammer::ast::{NodeId, AST};
use crate::symbols::Symbols;
use std::collections::HashMap;
use ty::Ty;

/// Name of the function where execution starts
pub const ENTRY: &str = "main";

/// State threaded through every analysis pass
#[derive(Debug, Default)]
pub struct Analyzer {
    symbols: Symbols,
    types: HashMap<NodeId, Ty>,
    diags: Vec<Diag>,
}

/// What the analysis knows about a program
#[derive(Debug)]
pub struct Analysis {
    pub symbols: Symbols,
    pub types: HashMap<NodeId, Ty>,
    pub diags: Vec<Diag>,
}

impl Analysis {
    pub fn has_error(&self) -> bool {
        has_error(&self.diags)
    }

    /// Type of an expression node, `Ty::Error` when it was never checked
    pub fn type_of(&self, id: NodeId) -> Ty {
        self.types.get(&id).copied().unwrap_or(Ty::Error)
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(mut self, ast: &AST) -> Analysis {
        // 1. Declarations and usages, pre-order
        self.collect(ast);

        // 2. Types, post-order
        self.check_types(ast);

        // 3. Whole program
        self.check_scopes();
        self.check_calls();
        self.check_entry(ast);

        Analysis {
            symbols: self.symbols,
            types: self.types,
            diags: self.diags,
        }
    }

    fn error(&mut self, line: usize, e: Error) {
        self.diags.push(Diag::error(line, e));
    }

    fn warn(&mut self, line: usize, e: Error) {
        self.diags.push(Diag::warn(line, e));
    }
}
