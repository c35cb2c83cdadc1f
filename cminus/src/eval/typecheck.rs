use super::ty::Ty;
use super::Analyzer;
use crate::error::Error;
use crate::grammer::ast::{Decl, Expr, ExprKind, FuncDecl, Stmt, StmtKind, TypeSpec, AST};
use crate::symbols::CallSite;

// Post-order walk giving every expression a type

impl Analyzer {
    pub(super) fn check_types(&mut self, ast: &AST) {
        for decl in &ast.0 {
            if let Decl::Func(func) = decl {
                self.check_stmts(&func.body, func);
            }
        }
    }

    fn check_stmts(&mut self, stmts: &[Stmt], func: &FuncDecl) {
        for stmt in stmts {
            self.check_stmt(stmt, func);
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt, func: &FuncDecl) {
        match &stmt.kind {
            StmtKind::Local(_) => {}
            StmtKind::Expr(expr) => {
                self.typeof_expr(expr);
            }
            StmtKind::If(cond, then, els) => {
                let ty = self.typeof_expr(cond);
                self.check_stmts(then, func);
                if let Some(els) = els {
                    self.check_stmts(els, func);
                }
                self.check_cond("if", ty, stmt.line);
            }
            StmtKind::While(cond, body) => {
                let ty = self.typeof_expr(cond);
                self.check_stmts(body, func);
                self.check_cond("while", ty, stmt.line);
            }
            StmtKind::Return(value) => {
                let ty = value.as_ref().map(|value| self.typeof_expr(value));
                match (func.ret, ty) {
                    (TypeSpec::Int, Some(ty)) if !ty.is_int_like() => {
                        self.error(stmt.line, Error::ReturnNotInt(func.name.clone(), ty));
                    }
                    (TypeSpec::Int, None) => {
                        self.error(stmt.line, Error::ReturnValueRequired(func.name.clone()));
                    }
                    (TypeSpec::Void, Some(_)) => {
                        self.error(stmt.line, Error::ReturnInVoid(func.name.clone()));
                    }
                    _ => {}
                }
            }
        }
    }

    fn check_cond(&mut self, keyword: &'static str, ty: Ty, line: usize) {
        if !matches!(ty, Ty::Bool | Ty::Error) {
            self.error(line, Error::ConditionNotBool(keyword, ty));
        }
    }

    /// Type an expression and its children, recording each in the type table
    pub(super) fn typeof_expr(&mut self, expr: &Expr) -> Ty {
        let ty = match &expr.kind {
            ExprKind::Number(_) => Ty::Int,
            ExprKind::Input => Ty::Int,

            ExprKind::Output(arg) => {
                let ty = self.typeof_expr(arg);
                if !ty.is_int_like() {
                    self.error(expr.line, Error::OutputNotInt(ty));
                }
                Ty::Void
            }

            ExprKind::Var(name, index, scope) => {
                let index_ty = index.as_ref().map(|index| self.typeof_expr(index));
                let Some(var) = self.symbols.vars.resolve(name, scope).cloned() else {
                    self.error(expr.line, Error::UndeclaredVariable(name.clone()));
                    return self.annotate(expr, Ty::Error);
                };
                match (index, index_ty) {
                    (None, _) => var.ty,
                    (Some(_), _) if !var.array => {
                        self.error(expr.line, Error::NotAnArray(name.clone()));
                        Ty::Error
                    }
                    (Some(index), Some(index_ty)) => {
                        if !index_ty.is_int_like() {
                            self.error(expr.line, Error::IndexNotInt(index_ty));
                        }
                        if let (ExprKind::Number(n), Some(size)) = (&index.kind, var.size) {
                            if *n < 0 || *n as u64 >= size as u64 {
                                let e = Error::IndexOutOfBounds(name.clone(), *n, size);
                                self.error(expr.line, e);
                            }
                        }
                        match var.ty {
                            Ty::Error => Ty::Error,
                            _ => Ty::Int,
                        }
                    }
                    (Some(_), None) => Ty::Error,
                }
            }

            ExprKind::Call(name, args, _) => {
                let args: Vec<Ty> = args.iter().map(|arg| self.typeof_expr(arg)).collect();
                match self.symbols.funcs.get(name).map(|func| func.ret) {
                    Some(ret) => {
                        let site = CallSite {
                            line: expr.line,
                            args,
                        };
                        self.symbols.usages.call_site(name, site);
                        ret
                    }
                    None => {
                        self.error(expr.line, Error::UndeclaredFunction(name.clone()));
                        Ty::Error
                    }
                }
            }

            ExprKind::Binary(op, lhs, rhs) => {
                let lhs = self.typeof_expr(lhs);
                let rhs = self.typeof_expr(rhs);
                if !lhs.is_int_like() || !rhs.is_int_like() {
                    self.error(expr.line, Error::OperandNotInt(op.symbol(), lhs, rhs));
                }
                if op.is_relational() {
                    Ty::Bool
                } else {
                    Ty::Int
                }
            }

            ExprKind::Assign(target, value) => {
                let target_ty = self.typeof_expr(target);
                let value_ty = self.typeof_expr(value);
                if !matches!(target.kind, ExprKind::Var(..)) {
                    self.error(expr.line, Error::InvalidAssignTarget);
                } else if !target_ty.is_int_like() || !value_ty.is_int_like() {
                    self.error(expr.line, Error::OperandNotInt("=", target_ty, value_ty));
                }
                Ty::Int
            }

            ExprKind::Error => Ty::Error,
        };
        self.annotate(expr, ty)
    }

    fn annotate(&mut self, expr: &Expr, ty: Ty) -> Ty {
        self.types.insert(expr.id, ty);
        ty
    }
}
