use super::synth::Fragments;
use super::tac::{Label, Line, Program, Tac};
use crate::grammer::ast::{Decl, Expr, ExprKind, FuncDecl, NodeId, Stmt, StmtKind, AST};

/// Flatten the fragment table into program order
pub fn linearize(ast: &AST, frags: &Fragments) -> Program {
    let mut linear = Linearizer {
        frags,
        lines: Vec::new(),
        pending: Vec::new(),
    };
    for decl in &ast.0 {
        if let Decl::Func(func) = decl {
            linear.func(func);
        }
    }
    Program(linear.lines)
}

struct Linearizer<'a> {
    frags: &'a Fragments,
    lines: Vec<Line>,
    // Labels waiting for the next emitted instruction
    pending: Vec<Label>,
}

impl Linearizer<'_> {
    fn func(&mut self, func: &FuncDecl) {
        self.own(func.id);
        self.stmts(&func.body);
    }

    fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        if let Some(frag) = self.frags.get(&stmt.id) {
            self.pending.extend(frag.labels.iter().copied());
        }
        match &stmt.kind {
            StmtKind::Local(_) => {}
            StmtKind::Expr(expr) => self.expr(expr),
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.expr(value);
                }
                self.own(stmt.id);
            }
            StmtKind::If(cond, then, els) => {
                self.expr(cond);
                self.own(stmt.id);
                self.stmts(then);
                if let Some(els) = els {
                    self.stmts(els);
                }
            }
            StmtKind::While(cond, body) => {
                self.expr(cond);
                self.own(stmt.id);
                self.stmts(body);
                self.tail(stmt.id);
            }
        }
    }

    // Children in evaluation order, then the node itself
    fn expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Var(_, Some(index), _) => self.expr(index),
            ExprKind::Binary(_, lhs, rhs) | ExprKind::Assign(lhs, rhs) => {
                self.expr(lhs);
                self.expr(rhs);
            }
            ExprKind::Call(_, args, _) => {
                for arg in args {
                    self.expr(arg);
                }
            }
            ExprKind::Output(arg) => self.expr(arg),
            _ => {}
        }
        self.own(expr.id);
    }

    fn own(&mut self, id: NodeId) {
        let frags = self.frags;
        if let Some(frag) = frags.get(&id) {
            for inst in &frag.insts {
                self.emit(inst.clone(), id);
            }
        }
    }

    fn tail(&mut self, id: NodeId) {
        let frags = self.frags;
        if let Some(frag) = frags.get(&id) {
            for inst in &frag.tail {
                self.emit(inst.clone(), id);
            }
        }
    }

    fn emit(&mut self, inst: Tac, origin: NodeId) {
        let labels = std::mem::take(&mut self.pending);
        self.lines.push(Line {
            labels,
            inst,
            origin,
        });
    }
}
