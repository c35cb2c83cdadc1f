use super::synth::follower;
use super::tac::{Operand, Program, Tac, Temp};
use crate::grammer::ast::{BinaryOp, Decl, NodeId, Stmt, StmtKind, AST};
use std::collections::{HashMap, HashSet};

/// Values known at one point of a straight-line scan
#[derive(Debug, Default)]
struct Known {
    vars: HashMap<String, i64>,
    temps: HashMap<Temp, i64>,
}

impl Known {
    fn eval(&self, operand: &Operand) -> Option<i64> {
        match operand {
            Operand::Const(value) => Some(*value),
            Operand::Var(name) => self.vars.get(name).copied(),
            Operand::Temp(temp) => self.temps.get(temp).copied(),
            Operand::Elem(..) | Operand::Input => None,
        }
    }

    fn set_var(&mut self, name: &str, value: Option<i64>) {
        match value {
            Some(value) => self.vars.insert(name.to_string(), value),
            None => self.vars.remove(name),
        };
    }

    fn set_temp(&mut self, temp: Temp, value: Option<i64>) {
        match value {
            Some(value) => self.temps.insert(temp, value),
            None => self.temps.remove(&temp),
        };
    }
}

/// Fold an operator over two constants. `None` when the result is not a value.
pub fn fold(op: BinaryOp, lhs: i64, rhs: i64) -> Option<i64> {
    match op {
        BinaryOp::Add => lhs.checked_add(rhs),
        BinaryOp::Sub => lhs.checked_sub(rhs),
        BinaryOp::Mul => lhs.checked_mul(rhs),
        BinaryOp::Div => lhs.checked_div(rhs),
        BinaryOp::Eq => Some((lhs == rhs) as i64),
        BinaryOp::Ne => Some((lhs != rhs) as i64),
        BinaryOp::Lt => Some((lhs < rhs) as i64),
        BinaryOp::Le => Some((lhs <= rhs) as i64),
        BinaryOp::Gt => Some((lhs > rhs) as i64),
        BinaryOp::Ge => Some((lhs >= rhs) as i64),
    }
}

/// Find the `if`/`while` nodes whose condition is always false.
/// Variable facts are dropped wherever control may join or a call may write.
pub fn scan(program: &Program) -> HashSet<NodeId> {
    let mut known = Known::default();
    let mut dead = HashSet::new();
    for line in &program.0 {
        if !line.labels.is_empty() {
            known.vars.clear();
        }
        match &line.inst {
            Tac::Entry(..) => {
                known.vars.clear();
                known.temps.clear();
            }
            Tac::Binary(dest, op, lhs, rhs) => {
                let value = match (known.eval(lhs), known.eval(rhs)) {
                    (Some(lhs), Some(rhs)) => fold(*op, lhs, rhs),
                    _ => None,
                };
                known.set_temp(*dest, value);
            }
            Tac::Copy(Operand::Var(name), src) => {
                let value = known.eval(src);
                known.set_var(name, value);
            }
            Tac::Call(dest, _) => {
                known.vars.clear();
                if let Some(dest) = dest {
                    known.set_temp(*dest, None);
                }
            }
            Tac::IfFalse(cond, _) => {
                if known.eval(cond) == Some(0) {
                    dead.insert(line.origin);
                }
            }
            _ => {}
        }
    }
    dead
}

/// Splice dead nodes out of the tree. A dead `while` disappears. A dead `if`
/// disappears with both branches when its jump skipped to a following
/// statement, and is replaced by its else branch when the jump landed there.
/// Returns the line and keyword of each removal.
pub fn eliminate(ast: &mut AST, dead: &HashSet<NodeId>) -> Vec<(usize, &'static str)> {
    let mut removed = Vec::new();
    if dead.is_empty() {
        return removed;
    }
    for decl in &mut ast.0 {
        if let Decl::Func(func) = decl {
            prune(&mut func.body, dead, &mut removed);
        }
    }
    removed
}

fn prune(stmts: &mut Vec<Stmt>, dead: &HashSet<NodeId>, removed: &mut Vec<(usize, &'static str)>) {
    // Whether each statement had a jump target after it in this list
    let followed: Vec<bool> = (0..stmts.len())
        .map(|i| follower(&stmts[i + 1..]).is_some())
        .collect();

    for (mut stmt, followed) in std::mem::take(stmts).into_iter().zip(followed) {
        if dead.contains(&stmt.id) {
            match stmt.kind {
                StmtKind::If(_, _, els) => {
                    removed.push((stmt.line, "if"));
                    if let (false, Some(mut els)) = (followed, els) {
                        prune(&mut els, dead, removed);
                        stmts.extend(els);
                    }
                }
                _ => removed.push((stmt.line, "while")),
            }
            continue;
        }
        match &mut stmt.kind {
            StmtKind::If(_, then, els) => {
                prune(then, dead, removed);
                if let Some(els) = els {
                    prune(els, dead, removed);
                }
            }
            StmtKind::While(_, body) => prune(body, dead, removed),
            _ => {}
        }
        stmts.push(stmt);
    }
}
