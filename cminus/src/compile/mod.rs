pub mod linear;
pub mod optimize;
pub mod patch;
pub mod synth;
pub mod tac;

use crate::error::{Diag, Error};
use crate::eval::Analysis;
use crate::grammer::ast::AST;
use std::collections::HashSet;
use synth::Synth;
use tac::Program;

/// Lowers an analysed tree to TAC
pub struct Generator<'a> {
    analysis: &'a Analysis,
    optimize: bool,
}

#[derive(Debug)]
pub struct Generated {
    pub program: Program,
    pub diags: Vec<Diag>,
    pub iterations: usize,
}

impl<'a> Generator<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Generator {
            analysis,
            optimize: true,
        }
    }

    pub fn optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Lower, then remove always-false branches from the tree and lower again
    /// until nothing is removed. Structural problems are reported from the last
    /// lowering only.
    pub fn generate(&self, ast: &mut AST) -> Generated {
        let mut diags = Vec::new();
        let mut iterations = 0;
        loop {
            iterations += 1;
            let (program, problems) = self.lower(ast);
            let dead = match self.optimize {
                true => optimize::scan(&program),
                false => HashSet::new(),
            };
            let removed = optimize::eliminate(ast, &dead);
            if removed.is_empty() {
                diags.extend(problems);
                return Generated {
                    program,
                    diags,
                    iterations,
                };
            }
            for (line, keyword) in removed {
                diags.push(Diag::note(line, Error::DeadBranch(keyword)));
            }
        }
    }

    /// One lowering from a fresh state: new temps, labels and fragments
    pub fn lower(&self, ast: &AST) -> (Program, Vec<Diag>) {
        let (mut frags, patches) = Synth::new(self.analysis).run(ast);
        let diags = patch::patch(&mut frags, &patches);
        (linear::linearize(ast, &frags), diags)
    }
}
