use crate::compile::tac::{Program, Tac};
use crate::grammer::ast::{Decl, Stmt, StmtKind, AST};
use color_print::{cformat, cprintln};

/// Listing of a TAC program: functions in green, labels in magenta
pub fn print_program(program: &Program) {
    println!("+------+-------------------------------------------------------------------------");
    for (i, line) in program.0.iter().enumerate() {
        let labels: String = line
            .labels
            .iter()
            .map(|label| cformat!("<m>{}</m>: ", label))
            .collect();
        match &line.inst {
            Tac::Entry(..) => cprintln!("| {:>4} | <green>{}</green>", i + 1, line.inst),
            Tac::IfFalse(_, None) => cprintln!("| {:>4} | {}<red>{}</red>", i + 1, labels, line.inst),
            _ => cprintln!("| {:>4} | {}{}", i + 1, labels, line.inst),
        }
    }
    println!("+------+-------------------------------------------------------------------------");
}

/// Outline of the tree, one declaration or statement per row
pub fn print_ast(ast: &AST) {
    for decl in &ast.0 {
        match decl {
            Decl::Var(var) => cprintln!("<blue>var</blue> {} : {} ({})", var.name, var.line, var.scope),
            Decl::Func(func) => {
                cprintln!("<green>func</green> {} : {}", func.name, func.line);
                print_stmts(&func.body, 1);
            }
        }
    }
}

fn print_stmts(stmts: &[Stmt], depth: usize) {
    let indent = "  ".repeat(depth);
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Local(var) => cprintln!("{}<blue>var</blue> {} : {}", indent, var.name, stmt.line),
            StmtKind::Expr(expr) => println!("{}{} : {}", indent, expr, stmt.line),
            StmtKind::If(cond, then, els) => {
                cprintln!("{}<yellow>if</yellow> {} : {}", indent, cond, stmt.line);
                print_stmts(then, depth + 1);
                if let Some(els) = els {
                    cprintln!("{}<yellow>else</yellow>", indent);
                    print_stmts(els, depth + 1);
                }
            }
            StmtKind::While(cond, body) => {
                cprintln!("{}<yellow>while</yellow> {} : {}", indent, cond, stmt.line);
                print_stmts(body, depth + 1);
            }
            StmtKind::Return(Some(value)) => {
                cprintln!("{}<yellow>return</yellow> {} : {}", indent, value, stmt.line)
            }
            StmtKind::Return(None) => cprintln!("{}<yellow>return</yellow> : {}", indent, stmt.line),
        }
    }
}
