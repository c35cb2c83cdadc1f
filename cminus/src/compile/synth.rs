use super::tac::{Label, Operand, Tac, Temp};
use crate::eval::ty::Ty;
use crate::eval::Analysis;
use crate::grammer::ast::{Decl, Expr, ExprKind, FuncDecl, NodeId, Stmt, StmtKind, AST};
use std::collections::HashMap;

/// Instructions generated for one node
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    pub labels: Vec<Label>,
    pub insts: Vec<Tac>,
    pub tail: Vec<Tac>, // placed after the children
}

pub type Fragments = HashMap<NodeId, Fragment>;

/// A label allocated during synthesis, bound by the patch pass
#[derive(Debug, Clone, Copy)]
pub enum Patch {
    // Loop start, labels the loop node itself
    Mark {
        label: Label,
        target: NodeId,
    },
    // The `if_false` of `from` jumps to the first instruction of `target`
    Jump {
        label: Label,
        from: NodeId,
        target: Option<NodeId>,
        line: usize,
        looped: bool,
    },
}

// Value of a void expression; never read in a well-typed program
const VOID: Operand = Operand::Const(0);

/// Post-order synthesis of the fragment table
pub struct Synth<'a> {
    analysis: &'a Analysis,
    temps: usize,
    labels: usize,
    frags: Fragments,
    patches: Vec<Patch>,
}

impl<'a> Synth<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Synth {
            analysis,
            temps: 0,
            labels: 0,
            frags: HashMap::new(),
            patches: Vec::new(),
        }
    }

    pub fn run(mut self, ast: &AST) -> (Fragments, Vec<Patch>) {
        for decl in &ast.0 {
            if let Decl::Func(func) = decl {
                self.func(func);
            }
        }
        (self.frags, self.patches)
    }

    fn temp(&mut self) -> Temp {
        self.temps += 1;
        Temp(self.temps)
    }

    fn label(&mut self) -> Label {
        self.labels += 1;
        Label(self.labels)
    }

    fn emit(&mut self, id: NodeId, inst: Tac) {
        self.frags.entry(id).or_default().insts.push(inst);
    }
}

// ----------------------------------------------------------------------------
// Declarations and statements
// ----------------------------------------------------------------------------

impl Synth<'_> {
    fn func(&mut self, func: &FuncDecl) {
        self.stmts(&func.body);

        let types = match self.analysis.symbols.funcs.get(&func.name) {
            Some(entry) => entry.params.clone(),
            None => Vec::new(),
        };
        let params = types
            .into_iter()
            .zip(&func.params)
            .map(|(ty, param)| (ty, param.name.clone()))
            .collect();
        self.emit(func.id, Tac::Entry(func.name.clone(), params));
    }

    fn stmts(&mut self, stmts: &[Stmt]) {
        for (i, stmt) in stmts.iter().enumerate() {
            self.stmt(stmt, &stmts[i + 1..]);
        }
    }

    /// `rest` holds the statements after `stmt` in the same list
    fn stmt(&mut self, stmt: &Stmt, rest: &[Stmt]) {
        match &stmt.kind {
            StmtKind::Local(_) => {}
            StmtKind::Expr(expr) => {
                self.expr(expr, true);
            }
            StmtKind::Return(value) => {
                let value = value.as_ref().map(|value| self.expr(value, false));
                self.emit(stmt.id, Tac::Return(value));
            }
            StmtKind::If(cond, then, els) => {
                let cond = self.expr(cond, false);
                self.stmts(then);
                if let Some(els) = els {
                    self.stmts(els);
                }
                let label = self.label();
                let target = follower(rest).or_else(|| els.as_deref().and_then(follower));
                self.emit(stmt.id, Tac::IfFalse(cond, None));
                self.patches.push(Patch::Jump {
                    label,
                    from: stmt.id,
                    target,
                    line: stmt.line,
                    looped: false,
                });
            }
            StmtKind::While(cond, body) => {
                let cond = self.expr(cond, false);
                self.stmts(body);
                let start = self.label();
                let finish = self.label();
                self.emit(stmt.id, Tac::IfFalse(cond, None));
                self.frags
                    .entry(stmt.id)
                    .or_default()
                    .tail
                    .push(Tac::Goto(start));
                self.patches.push(Patch::Mark {
                    label: start,
                    target: stmt.id,
                });
                self.patches.push(Patch::Jump {
                    label: finish,
                    from: stmt.id,
                    target: follower(rest),
                    line: stmt.line,
                    looped: true,
                });
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl Synth<'_> {
    /// Emit the instructions of `expr` and return the operand holding its value.
    /// `discard` is set when the value is not used.
    fn expr(&mut self, expr: &Expr, discard: bool) -> Operand {
        match &expr.kind {
            ExprKind::Number(value) => Operand::Const(*value),
            ExprKind::Var(name, None, _) => Operand::Var(name.clone()),
            ExprKind::Var(name, Some(index), _) => {
                let index = self.expr(index, false);
                Operand::Elem(name.clone(), Box::new(index))
            }
            ExprKind::Binary(op, lhs, rhs) => {
                let lhs = self.expr(lhs, false);
                let rhs = self.expr(rhs, false);
                let dest = self.temp();
                self.emit(expr.id, Tac::Binary(dest, *op, lhs, rhs));
                Operand::Temp(dest)
            }
            ExprKind::Assign(target, value) => {
                let dest = self.expr(target, false);
                let src = self.expr(value, false);
                self.emit(expr.id, Tac::Copy(dest.clone(), src));
                dest
            }
            ExprKind::Call(name, args, _) => {
                let args: Vec<Operand> = args.iter().map(|arg| self.expr(arg, false)).collect();
                for arg in args {
                    self.emit(expr.id, Tac::Arg(arg));
                }
                let used = !discard && self.analysis.type_of(expr.id) == Ty::Int;
                let dest = if used { Some(self.temp()) } else { None };
                self.emit(expr.id, Tac::Call(dest, name.clone()));
                dest.map_or(VOID, Operand::Temp)
            }
            ExprKind::Input => {
                if discard {
                    self.emit(expr.id, Tac::Input);
                }
                Operand::Input
            }
            ExprKind::Output(arg) => {
                let value = self.expr(arg, false);
                self.emit(expr.id, Tac::Output(value));
                VOID
            }
            ExprKind::Error => VOID,
        }
    }
}

/// First statement of `stmts` that produces an instruction; labels bind only there
pub(super) fn follower(stmts: &[Stmt]) -> Option<NodeId> {
    stmts.iter().find(|stmt| emits(stmt)).map(|stmt| stmt.id)
}

fn emits(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Local(_) => false,
        StmtKind::Expr(expr) => emits_expr(expr, true),
        StmtKind::If(..) | StmtKind::While(..) | StmtKind::Return(_) => true,
    }
}

fn emits_expr(expr: &Expr, discard: bool) -> bool {
    match &expr.kind {
        ExprKind::Number(_) | ExprKind::Error => false,
        ExprKind::Var(_, index, _) => index.as_ref().is_some_and(|index| emits_expr(index, false)),
        ExprKind::Input => discard,
        ExprKind::Binary(..) | ExprKind::Assign(..) | ExprKind::Call(..) | ExprKind::Output(_) => {
            true
        }
    }
}
