use super::ty::Ty;
use super::{Analyzer, ENTRY};
use crate::error::Error;
use crate::grammer::ast::{Decl, AST};

// Checks over the finished tables

impl Analyzer {
    /// Every use must come after the declaration it resolves to
    pub(super) fn check_scopes(&mut self) {
        let mut late = Vec::new();
        for (name, usage) in &self.symbols.usages.0 {
            for r in &usage.refs {
                let declared = if r.call {
                    self.symbols.funcs.get(name).map(|func| func.line)
                } else {
                    self.symbols.vars.resolve(name, &r.scope).map(|var| var.line)
                };
                if let Some(declared) = declared.filter(|&declared| r.line < declared) {
                    late.push((r.line, Error::UseBeforeDeclaration(name.clone(), r.line, declared)));
                }
            }
        }
        for (line, e) in late {
            self.error(line, e);
        }
    }

    /// Every call must pass what the callee declares
    pub(super) fn check_calls(&mut self) {
        let mut mismatches = Vec::new();
        for (name, usage) in &self.symbols.usages.0 {
            let Some(func) = self.symbols.funcs.get(name) else {
                continue;
            };
            for site in &usage.calls {
                if site.args.len() != func.params.len() {
                    let e = Error::ArgCount(name.clone(), site.args.len(), func.params.len());
                    mismatches.push((site.line, e));
                }
                for (i, (&arg, &param)) in site.args.iter().zip(&func.params).enumerate() {
                    if arg != Ty::Error && arg != param {
                        mismatches.push((site.line, Error::ArgType(name.clone(), i + 1, arg, param)));
                    }
                }
            }
        }
        for (line, e) in mismatches {
            self.error(line, e);
        }
    }

    /// `void main(void)` must exist and close the program
    pub(super) fn check_entry(&mut self, ast: &AST) {
        let Some(main) = self.symbols.funcs.get(ENTRY) else {
            let line = ast.0.last().map_or(0, Decl::line);
            self.error(line, Error::MissingEntry);
            return;
        };
        let (line, ret) = (main.line, main.ret);

        if ret != Ty::Void {
            self.error(line, Error::EntryNotVoid);
        }
        let last = ast.0.last();
        if !matches!(last, Some(decl @ Decl::Func(_)) if decl.name() == ENTRY) {
            self.error(line, Error::EntryNotLast);
        }
    }
}
