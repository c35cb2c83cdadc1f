use super::ty::Ty;
use super::Analyzer;
use crate::error::Error;
use crate::grammer::ast::{Decl, Expr, ExprKind, FuncDecl, Shape, Stmt, StmtKind, TypeSpec, VarDecl, AST};
use crate::symbols::{FuncEntry, IndexUse, VarEntry};

// Pre-order walk recording every declaration and every use of a name

impl Analyzer {
    pub(super) fn collect(&mut self, ast: &AST) {
        for decl in &ast.0 {
            match decl {
                Decl::Var(var) => self.declare_var(var),
                Decl::Func(func) => {
                    self.declare_func(func);
                    for param in &func.params {
                        self.declare_var(param);
                    }
                    self.collect_stmts(&func.body);
                }
            }
        }
    }

    fn declare_var(&mut self, var: &VarDecl) {
        if let Some(prev) = self.symbols.vars.get(&var.name, &var.scope) {
            let e = Error::VarRedefinition(var.name.clone(), prev.line);
            self.error(var.line, e);
            return;
        }

        let outer = var
            .scope
            .parent()
            .and_then(|scope| self.symbols.vars.resolve(&var.name, &scope))
            .map(|prev| (prev.scope.to_string(), prev.line));
        if let Some((scope, line)) = outer {
            self.warn(var.line, Error::Shadowing(var.name.clone(), scope, line));
        }

        let (array, size) = match var.shape {
            Shape::Scalar => (false, None),
            Shape::Array(size) => (true, size),
        };
        if array && var.ty == TypeSpec::Void {
            self.error(var.line, Error::VoidArray(var.name.clone()));
        }

        let entry = VarEntry {
            ty: Ty::of_decl(var.ty, &var.shape),
            slot: self.symbols.next_slot(),
            line: var.line,
            array,
            size,
            scope: var.scope.clone(),
        };
        self.symbols.vars.insert(&var.name, entry);
    }

    fn declare_func(&mut self, func: &FuncDecl) {
        if let Some(prev) = self.symbols.funcs.get(&func.name) {
            let e = Error::FuncRedefinition(func.name.clone(), prev.line);
            self.error(func.line, e);
            return;
        }

        let entry = FuncEntry {
            ret: Ty::from(func.ret),
            params: func
                .params
                .iter()
                .map(|param| Ty::of_decl(param.ty, &param.shape))
                .collect(),
            slot: self.symbols.next_slot(),
            line: func.line,
        };
        self.symbols.funcs.insert(&func.name, entry);
    }

    fn collect_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            match &stmt.kind {
                StmtKind::Local(var) => self.declare_var(var),
                StmtKind::Expr(expr) => self.collect_expr(expr),
                StmtKind::If(cond, then, els) => {
                    self.collect_expr(cond);
                    self.collect_stmts(then);
                    if let Some(els) = els {
                        self.collect_stmts(els);
                    }
                }
                StmtKind::While(cond, body) => {
                    self.collect_expr(cond);
                    self.collect_stmts(body);
                }
                StmtKind::Return(value) => {
                    if let Some(value) = value {
                        self.collect_expr(value);
                    }
                }
            }
        }
    }

    fn collect_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Var(name, index, scope) => {
                let usage = self.symbols.usages.record(name, expr.line, scope, false);
                if let Some(index) = index {
                    usage.indexes.push(IndexUse {
                        line: expr.line,
                        expr: index.to_string(),
                    });
                    self.collect_expr(index);
                }
            }
            ExprKind::Call(name, args, scope) => {
                self.symbols.usages.record(name, expr.line, scope, true);
                for arg in args {
                    self.collect_expr(arg);
                }
            }
            ExprKind::Binary(_, lhs, rhs) | ExprKind::Assign(lhs, rhs) => {
                self.collect_expr(lhs);
                self.collect_expr(rhs);
            }
            ExprKind::Output(arg) => self.collect_expr(arg),
            ExprKind::Number(_) | ExprKind::Input | ExprKind::Error => {}
        }
    }
}
