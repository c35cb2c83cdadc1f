use super::ast::{
    BinaryOp, Decl, Expr, ExprKind, FuncDecl, Scope, Shape, Stmt, StmtKind, TypeSpec, VarDecl,
    AST,
};
use super::lexer::TokenStream;
use super::parsercore::Parser;
use super::token::TokenKind::*;
use crate::error::Diag;
use crate::{check, expect, optional, repeat};

impl<T: TokenStream> Parser<T> {
    pub fn parse(mut self) -> (AST, Vec<Diag>) {
        let program = self.parse_program();
        (program, self.getdiags())
    }
}

// ----------------------------------------------------------------------------
// Declarations
// ----------------------------------------------------------------------------

impl<T: TokenStream> Parser<T> {
    /// program = decl { decl } EOF
    fn parse_program(&mut self) -> AST {
        let mut decls = Vec::new();
        loop {
            if let Some(decl) = self.parse_decl() {
                decls.push(decl);
            }
            if check!(self, Eof) {
                break;
            }
        }
        AST(decls)
    }

    /// decl = type ident ( ";" | "[" num "]" ";" | "(" params ")" compound )
    fn parse_decl(&mut self) -> Option<Decl> {
        self.set_scope(Scope::Global);
        let Some(ty) = self.parse_type() else {
            self.skip_unexpected("type specifier");
            return None;
        };
        let (name, line) = self.parse_ident();
        if check!(self, LParen) {
            Some(Decl::Func(self.parse_func(ty, name, line)))
        } else if check!(self, Semicolon | LBracket) {
            Some(Decl::Var(self.parse_var(ty, name, line)))
        } else {
            self.unexpected("`;`, `[` or `(`");
            None
        }
    }

    /// type = "int" | "void"
    fn parse_type(&mut self) -> Option<TypeSpec> {
        if optional!(self, KwInt).is_some() {
            Some(TypeSpec::Int)
        } else if optional!(self, KwVoid).is_some() {
            Some(TypeSpec::Void)
        } else {
            None
        }
    }

    /// A missing name becomes the empty string
    fn parse_ident(&mut self) -> (String, usize) {
        let line = self.peek().line;
        match expect!(self, Ident) {
            Some(token) => (token.text, token.line),
            None => (String::new(), line),
        }
    }

    /// var-rest = [ "[" num "]" ] ";"
    fn parse_var(&mut self, ty: TypeSpec, name: String, line: usize) -> VarDecl {
        let shape = match optional!(self, LBracket, self.parse_size()) {
            Some(size) => {
                expect!(self, RBracket);
                Shape::Array(size)
            }
            None => Shape::Scalar,
        };
        expect!(self, Semicolon);
        VarDecl {
            id: self.node_id(),
            line,
            name,
            ty,
            shape,
            scope: self.scope().clone(),
        }
    }

    fn parse_size(&mut self) -> Option<usize> {
        let token = expect!(self, Number)?;
        token.text.parse().ok()
    }

    /// func-rest = "(" params ")" compound
    fn parse_func(&mut self, ret: TypeSpec, name: String, line: usize) -> FuncDecl {
        let id = self.node_id();
        expect!(self, LParen);
        self.set_scope(Scope::Param(name.clone()));
        let params = self.parse_params();
        expect!(self, RParen);
        self.set_scope(Scope::Local(name.clone()));
        let body = self.parse_compound();
        FuncDecl {
            id,
            line,
            name,
            ret,
            params,
            body,
        }
    }

    /// params = "void" | param { "," param }
    fn parse_params(&mut self) -> Vec<VarDecl> {
        let first = if optional!(self, KwVoid).is_some() {
            // `void` alone is an empty list, `void x` is a parameter
            if !check!(self, Ident) {
                return Vec::new();
            }
            self.parse_param(TypeSpec::Void)
        } else if optional!(self, KwInt).is_some() {
            self.parse_param(TypeSpec::Int)
        } else {
            self.unexpected("parameter list");
            return Vec::new();
        };

        let mut params = vec![first];
        while optional!(self, Comma).is_some() {
            match self.parse_type() {
                Some(ty) => params.push(self.parse_param(ty)),
                None => self.unexpected("type specifier"),
            }
        }
        params
    }

    /// param = type ident [ "[" "]" ]
    fn parse_param(&mut self, ty: TypeSpec) -> VarDecl {
        let (name, line) = self.parse_ident();
        let shape = match optional!(self, LBracket) {
            Some(_) => {
                expect!(self, RBracket);
                Shape::Array(None)
            }
            None => Shape::Scalar,
        };
        VarDecl {
            id: self.node_id(),
            line,
            name,
            ty,
            shape,
            scope: self.scope().clone(),
        }
    }
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

impl<T: TokenStream> Parser<T> {
    /// compound = "{" { local-decl } { stmt } "}"
    /// Flattened into the enclosing statement list.
    fn parse_compound(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        expect!(self, LCurly);
        while let Some(ty) = self.parse_type() {
            stmts.push(self.parse_local(ty));
        }
        let body = repeat!(self, self.parse_stmt(), RCurly | Eof);
        stmts.extend(body.into_iter().flatten());
        expect!(self, RCurly);
        stmts
    }

    /// local-decl = type ident [ "[" num "]" ] ";"
    fn parse_local(&mut self, ty: TypeSpec) -> Stmt {
        let (name, line) = self.parse_ident();
        let decl = self.parse_var(ty, name, line);
        Stmt {
            id: self.node_id(),
            line,
            kind: StmtKind::Local(decl),
        }
    }

    /// stmt = compound | if | while | return | expr-stmt
    fn parse_stmt(&mut self) -> Vec<Stmt> {
        let kind = self.peek().kind;
        match kind {
            LCurly => self.parse_compound(),
            KwIf => vec![self.parse_if()],
            KwWhile => vec![self.parse_while()],
            KwReturn => vec![self.parse_return()],
            Semicolon => {
                self.next();
                Vec::new()
            }
            Ident | Number | LParen | KwInput | KwOutput => {
                let line = self.peek().line;
                let expr = self.parse_expr();
                expect!(self, Semicolon);
                vec![self.stmt(line, StmtKind::Expr(expr))]
            }
            _ => {
                self.skip_unexpected("statement");
                Vec::new()
            }
        }
    }

    /// if = "if" "(" expr ")" stmt [ "else" stmt ]
    fn parse_if(&mut self) -> Stmt {
        let line = self.next().line;
        expect!(self, LParen);
        let cond = self.parse_expr();
        expect!(self, RParen);
        let then = self.parse_stmt();
        let els = optional!(self, KwElse, self.parse_stmt());
        self.stmt(line, StmtKind::If(cond, then, els))
    }

    /// while = "while" "(" expr ")" stmt
    fn parse_while(&mut self) -> Stmt {
        let line = self.next().line;
        expect!(self, LParen);
        let cond = self.parse_expr();
        expect!(self, RParen);
        let body = self.parse_stmt();
        self.stmt(line, StmtKind::While(cond, body))
    }

    /// return = "return" [ expr ] ";"
    fn parse_return(&mut self) -> Stmt {
        let line = self.next().line;
        let value = if check!(self, Semicolon) {
            None
        } else {
            Some(self.parse_expr())
        };
        expect!(self, Semicolon);
        self.stmt(line, StmtKind::Return(value))
    }

    fn stmt(&mut self, line: usize, kind: StmtKind) -> Stmt {
        Stmt {
            id: self.node_id(),
            line,
            kind,
        }
    }
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl<T: TokenStream> Parser<T> {
    /// expr = simple [ "=" expr ]
    fn parse_expr(&mut self) -> Expr {
        let target = self.parse_simple_expr();
        match optional!(self, Equal) {
            Some(token) => {
                let value = self.parse_expr();
                self.expr(
                    token.line,
                    ExprKind::Assign(Box::new(target), Box::new(value)),
                )
            }
            None => target,
        }
    }

    /// simple = additive { relop additive }
    fn parse_simple_expr(&mut self) -> Expr {
        let mut lhs = self.parse_additive_expr();
        loop {
            let op = match self.peek().kind {
                EqualEqual => BinaryOp::Eq,
                ExclEqual => BinaryOp::Ne,
                LAngle => BinaryOp::Lt,
                LAngleEqual => BinaryOp::Le,
                RAngle => BinaryOp::Gt,
                RAngleEqual => BinaryOp::Ge,
                _ => return lhs,
            };
            let line = self.next().line;
            let rhs = self.parse_additive_expr();
            lhs = self.expr(line, ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)));
        }
    }

    /// additive = term { ("+"|"-") term }
    fn parse_additive_expr(&mut self) -> Expr {
        let mut lhs = self.parse_term();
        loop {
            let op = match self.peek().kind {
                Plus => BinaryOp::Add,
                Minus => BinaryOp::Sub,
                _ => return lhs,
            };
            let line = self.next().line;
            let rhs = self.parse_term();
            lhs = self.expr(line, ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)));
        }
    }

    /// term = factor { ("*"|"/") factor }
    fn parse_term(&mut self) -> Expr {
        let mut lhs = self.parse_factor();
        loop {
            let op = match self.peek().kind {
                Star => BinaryOp::Mul,
                Slash => BinaryOp::Div,
                _ => return lhs,
            };
            let line = self.next().line;
            let rhs = self.parse_factor();
            lhs = self.expr(line, ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)));
        }
    }

    /// factor = "(" expr ")" | num | ident [ "[" expr "]" | "(" args ")" ]
    ///        | "input" "(" ")" | "output" "(" expr ")"
    fn parse_factor(&mut self) -> Expr {
        let (kind, line) = (self.peek().kind, self.peek().line);
        match kind {
            LParen => {
                self.next();
                let expr = self.parse_expr();
                expect!(self, RParen);
                expr
            }
            Number => {
                let token = self.next();
                let value = token.text.parse().unwrap_or_default();
                self.expr(line, ExprKind::Number(value))
            }
            Ident => {
                let name = self.next().text;
                let scope = self.scope().clone();
                if optional!(self, LBracket).is_some() {
                    let index = self.parse_expr();
                    expect!(self, RBracket);
                    self.expr(line, ExprKind::Var(name, Some(Box::new(index)), scope))
                } else if optional!(self, LParen).is_some() {
                    // args = [ expr { "," expr } ]
                    let args = repeat!(self, self.parse_expr(), Comma, RParen);
                    expect!(self, RParen);
                    self.expr(line, ExprKind::Call(name, args, scope))
                } else {
                    self.expr(line, ExprKind::Var(name, None, scope))
                }
            }
            KwInput => {
                self.next();
                expect!(self, LParen);
                expect!(self, RParen);
                self.expr(line, ExprKind::Input)
            }
            KwOutput => {
                self.next();
                expect!(self, LParen);
                let arg = self.parse_expr();
                expect!(self, RParen);
                self.expr(line, ExprKind::Output(Box::new(arg)))
            }
            _ => {
                self.unexpected("expression");
                self.expr(line, ExprKind::Error)
            }
        }
    }

    fn expr(&mut self, line: usize, kind: ExprKind) -> Expr {
        Expr {
            id: self.node_id(),
            line,
            kind,
        }
    }
}
