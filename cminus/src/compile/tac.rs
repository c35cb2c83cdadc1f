use crate::eval::ty::Ty;
use crate::grammer::ast::{BinaryOp, NodeId};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Temp(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Const(i64),                 // 5
    Var(String),                // x
    Temp(Temp),                 // t1
    Elem(String, Box<Operand>), // a[t1]
    Input,                      // input
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tac {
    Entry(String, Vec<(Ty, String)>),         // entry f(int x, int[] a)
    Binary(Temp, BinaryOp, Operand, Operand), // t1 = a + b
    Copy(Operand, Operand),                   // x = t1
    IfFalse(Operand, Option<Label>),          // if_false t1 jump to L1
    Goto(Label),                              // goto L1
    Arg(Operand),                             // arg x
    Call(Option<Temp>, String),               // [ t1 = ] call f
    Input,                                    // input
    Output(Operand),                          // output ( x )
    Return(Option<Operand>),                  // return [ ( x ) ]
}

/// One instruction with its labels and the node it was generated for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub labels: Vec<Label>,
    pub inst: Tac,
    pub origin: NodeId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program(pub Vec<Line>);

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Const(value) => write!(f, "{}", value),
            Operand::Var(name) => write!(f, "{}", name),
            Operand::Temp(temp) => write!(f, "{}", temp),
            Operand::Elem(name, index) => write!(f, "{}[{}]", name, index),
            Operand::Input => write!(f, "input"),
        }
    }
}

impl fmt::Display for Tac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tac::Entry(name, params) if params.is_empty() => write!(f, "entry {}", name),
            Tac::Entry(name, params) => {
                let params: Vec<String> = params
                    .iter()
                    .map(|(ty, name)| format!("{} {}", ty, name))
                    .collect();
                write!(f, "entry {}({})", name, params.join(", "))
            }
            Tac::Binary(dest, op, lhs, rhs) => write!(f, "{} = {} {} {}", dest, lhs, op, rhs),
            Tac::Copy(dest, src) => write!(f, "{} = {}", dest, src),
            Tac::IfFalse(cond, Some(label)) => write!(f, "if_false {} jump to {}", cond, label),
            Tac::IfFalse(cond, None) => write!(f, "if_false {} jump to ?", cond),
            Tac::Goto(label) => write!(f, "goto {}", label),
            Tac::Arg(value) => write!(f, "arg {}", value),
            Tac::Call(Some(dest), name) => write!(f, "{} = call {}", dest, name),
            Tac::Call(None, name) => write!(f, "call {}", name),
            Tac::Input => write!(f, "input"),
            Tac::Output(value) => write!(f, "output ( {} )", value),
            Tac::Return(Some(value)) => write!(f, "return ( {} )", value),
            Tac::Return(None) => write!(f, "return"),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.labels {
            write!(f, "{}: ", label)?;
        }
        write!(f, "{}", self.inst)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}
