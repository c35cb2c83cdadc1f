use std::fmt;

/// Identifies a node within one parse. Assigned in parse order.
pub type NodeId = usize;

#[derive(Debug, Clone, Default)]
pub struct AST(pub Vec<Decl>); // program = decl { decl }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSpec {
    Int,  // "int"
    Void, // "void"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Array(Option<usize>), // "[" num "]" in declarations, "[" "]" in parameters
}

/// Where a name lives. Locals of any block depth share their function's scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Param(String), // parameters of the named function
    Local(String), // locals of the named function
}

impl Scope {
    /// Next scope searched when a name is not found here
    pub fn parent(&self) -> Option<Scope> {
        match self {
            Scope::Local(func) => Some(Scope::Param(func.clone())),
            Scope::Param(_) => Some(Scope::Global),
            Scope::Global => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Param(func) => write!(f, "{} parameter", func),
            Scope::Local(func) => write!(f, "{}", func),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Decl {
    Var(VarDecl),   // type ident [ "[" num "]" ] ";"
    Func(FuncDecl), // type ident "(" params ")" compound
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Var(var) => &var.name,
            Decl::Func(func) => &func.name,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Decl::Var(var) => var.line,
            Decl::Func(func) => func.line,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub id: NodeId,
    pub line: usize,
    pub name: String,
    pub ty: TypeSpec,
    pub shape: Shape,
    pub scope: Scope,
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub id: NodeId,
    pub line: usize,
    pub name: String,
    pub ret: TypeSpec,
    pub params: Vec<VarDecl>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub line: usize,
    pub kind: StmtKind,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Local(VarDecl),                         // type ident [ "[" num "]" ] ";"
    Expr(Expr),                             // expr ";"
    If(Expr, Vec<Stmt>, Option<Vec<Stmt>>), // "if" "(" expr ")" stmt [ "else" stmt ]
    While(Expr, Vec<Stmt>),                 // "while" "(" expr ")" stmt
    Return(Option<Expr>),                   // "return" [ expr ] ";"
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub line: usize,
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Number(i64),                            // num
    Var(String, Option<Box<Expr>>, Scope),  // ident [ "[" expr "]" ]
    Call(String, Vec<Expr>, Scope),         // ident "(" [ expr { "," expr } ] ")"
    Binary(BinaryOp, Box<Expr>, Box<Expr>), // expr (binop) expr
    Assign(Box<Expr>, Box<Expr>),           // var "=" expr
    Input,                                  // "input" "(" ")"
    Output(Box<Expr>),                      // "output" "(" expr ")"
    Error,                                  // missing expression
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add, // "+"
    Sub, // "-"
    Mul, // "*"
    Div, // "/"
    Eq,  // "=="
    Ne,  // "!="
    Lt,  // "<"
    Le,  // "<="
    Gt,  // ">"
    Ge,  // ">="
}

impl BinaryOp {
    pub fn is_relational(self) -> bool {
        !matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// Renders the expression back to source form
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(value) => write!(f, "{}", value),
            ExprKind::Var(name, None, _) => write!(f, "{}", name),
            ExprKind::Var(name, Some(index), _) => write!(f, "{}[{}]", name, index),
            ExprKind::Call(name, args, _) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            ExprKind::Binary(op, lhs, rhs) => write!(f, "{} {} {}", lhs, op, rhs),
            ExprKind::Assign(target, value) => write!(f, "{} = {}", target, value),
            ExprKind::Input => write!(f, "input()"),
            ExprKind::Output(arg) => write!(f, "output({})", arg),
            ExprKind::Error => write!(f, "<error>"),
        }
    }
}

// Scopes are written as their display name, so they can key a serialized map
impl serde::Serialize for Scope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
