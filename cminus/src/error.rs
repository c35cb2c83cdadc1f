use crate::eval::ty::Ty;
use crate::eval::ENTRY;
use color_print::cprintln;
use thiserror::Error;

// Unified error type for the C- compiler
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Lexical errors
    #[error("Unrecognized character: `{0}`")]
    UnexpectedChar(char),

    #[error("Nested comment: `/*` inside a comment")]
    NestedComment,

    #[error("Unterminated comment")]
    UnterminatedComment,

    #[error("Integer literal out of range: {0}")]
    NumberOverflow(String),

    // Syntax errors
    #[error("Unexpected {found}, expected {expected}")]
    UnexpectedToken { found: String, expected: String },

    // Declaration errors
    #[error("Redefinition of variable `{0}`, first declared on line {1}")]
    VarRedefinition(String, usize),

    #[error("Redefinition of function `{0}`, first declared on line {1}")]
    FuncRedefinition(String, usize),

    #[error("`{0}` shadows the declaration in scope `{1}` on line {2}")]
    Shadowing(String, String, usize),

    #[error("Void array `{0}`")]
    VoidArray(String),

    // Usage errors
    #[error("Variable `{0}` used but not declared")]
    UndeclaredVariable(String),

    #[error("Function `{0}` called but not declared")]
    UndeclaredFunction(String),

    #[error("`{0}` used on line {1} before its declaration on line {2}")]
    UseBeforeDeclaration(String, usize, usize),

    // Type errors
    #[error("Operands of `{0}` must be int, found {1} and {2}")]
    OperandNotInt(&'static str, Ty, Ty),

    #[error("Assignment target is not a variable")]
    InvalidAssignTarget,

    #[error("Condition of `{0}` must be a comparison, found {1}")]
    ConditionNotBool(&'static str, Ty),

    #[error("Function `{0}` must return an int value")]
    ReturnValueRequired(String),

    #[error("Return value of `{0}` must be int, found {1}")]
    ReturnNotInt(String, Ty),

    #[error("Void function `{0}` cannot return a value")]
    ReturnInVoid(String),

    #[error("`{0}` is not an array")]
    NotAnArray(String),

    #[error("Array index must be int, found {0}")]
    IndexNotInt(Ty),

    #[error("Index {1} is out of bounds for `{0}` of size {2}")]
    IndexOutOfBounds(String, i64, usize),

    #[error("Argument of `output` must be int, found {0}")]
    OutputNotInt(Ty),

    #[error("Call to `{0}` passes {1} argument(s), expected {2}")]
    ArgCount(String, usize, usize),

    #[error("Argument {1} of call to `{0}` is {2}, expected {3}")]
    ArgType(String, usize, Ty, Ty),

    // Entry function errors
    #[error("Entry function `{}` is not declared", ENTRY)]
    MissingEntry,

    #[error("Entry function `{}` must return void", ENTRY)]
    EntryNotVoid,

    #[error("Entry function `{}` must be the last declaration", ENTRY)]
    EntryNotLast,

    // Code generation errors
    #[error("Branch at line {0} has no target: nothing follows it and it has no else branch")]
    UnresolvedBranch(usize),

    #[error("Loop at line {0} has no exit target: nothing follows it")]
    UnresolvedLoopExit(usize),

    #[error("Condition of `{0}` is always false, branch removed")]
    DeadBranch(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
    Note,
}

/// A reported problem: what went wrong, how bad it is, and where.
/// Line `0` means the problem has no source location.
#[derive(Debug)]
pub struct Diag {
    pub level: Level,
    pub line: usize,
    pub error: Error,
}

impl Diag {
    pub fn error(line: usize, error: Error) -> Self {
        Diag {
            level: Level::Error,
            line,
            error,
        }
    }

    pub fn warn(line: usize, error: Error) -> Self {
        Diag {
            level: Level::Warn,
            line,
            error,
        }
    }

    pub fn note(line: usize, error: Error) -> Self {
        Diag {
            level: Level::Note,
            line,
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }

    pub fn print(&self, file: &str, source: &str) {
        match self.level {
            Level::Error => cprintln!("<red,bold>error</>: {}", self.error),
            Level::Warn => cprintln!("<yellow,bold>warn</>: {}", self.error),
            Level::Note => cprintln!("<green,bold>note</>: {}", self.error),
        }
        if self.line == 0 {
            cprintln!("     <blue>--></> <underline>{}</>", file);
            return;
        }
        let raw = source.lines().nth(self.line - 1).unwrap_or("");
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, self.line);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", self.line, raw);
        cprintln!("      <blue>|</>");
    }
}

pub fn has_error(diags: &[Diag]) -> bool {
    diags.iter().any(Diag::is_error)
}
