use cminus::grammer::ast::{BinaryOp, Decl, ExprKind, Scope, Shape, StmtKind, TypeSpec, AST};
use cminus::grammer::lexer::TokenStream;
use cminus::grammer::token::{Token, TokenKind};
use cminus::{Error, Parser};

fn assert(code: &str) -> AST {
    for (idx, line) in code.lines().enumerate() {
        println!("{:>2}: {}", idx + 1, line);
    }
    let (ast, diags) = cminus::parse(code);
    println!("{:#?}", ast);
    for diag in &diags {
        println!("{:?}", diag);
    }
    assert!(diags.is_empty(), "Errors found: {:?}", diags);
    ast
}

fn assert_errors(code: &str, count: usize) -> AST {
    let (ast, diags) = cminus::parse(code);
    for diag in &diags {
        println!("{}: {}", diag.line, diag.error);
    }
    assert_eq!(diags.len(), count);
    ast
}

macro_rules! case {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            assert($code);
        }
    };
    ($name:ident, $code:expr, errors = $count:expr) => {
        #[test]
        fn $name() {
            assert_errors($code, $count);
        }
    };
}

// Declarations
case!(global_var, "int x; void main(void) { }");
case!(global_array, "int a[10]; void main(void) { }");
case!(func_params, "int f(int x, int a[]) { return x; } void main(void) { }");
case!(func_void_param, "void f(void x) { } void main(void) { }");
case!(locals, "void main(void) { int x; int a[3]; x = 1; }");
case!(nested_blocks, "void main(void) { { int y; { y = 1; } } }");

// Statements
case!(if_else, "void main(void) { if (1 < 2) output(1); else output(2); }");
case!(dangling_else, "void main(void) { if (1 < 2) if (2 < 3) output(1); else output(2); }");
case!(while_loop, "void main(void) { int i; i = 0; while (i < 10) { i = i + 1; } }");
case!(empty_stmt, "void main(void) { ; ; }");
case!(return_void, "void main(void) { return; }");

// Expressions
case!(chained_assign, "void main(void) { int a; int b; a = b = 3; }");
case!(call_args, "int f(int a, int b) { return a; } void main(void) { output(f(1, 2 * 3)); }");
case!(call_no_args, "int f(void) { return 1; } void main(void) { f(); }");
case!(input_expr, "void main(void) { int x; x = input(); }");
case!(indexed, "void main(void) { int a[4]; a[a[0] + 1] = 2; }");
case!(comparisons, "void main(void) { if (1 == 2) ; if (1 != 2) ; if (1 >= 2) ; }");

// Errors
case!(empty_unit, "", errors = 1);
case!(missing_semicolon, "int x void main(void) { }", errors = 1);
case!(missing_rparen, "void main(void) { output(1; }", errors = 1);
case!(empty_params, "void main() { }", errors = 1);
case!(missing_expr, "void main(void) { int x; x = ; }", errors = 1);
case!(stray_token_skipped, "void main(void) { else; }", errors = 1);
// No synchronization: every token of `n];` is reported
case!(array_size_not_literal, "int a[n]; void main(void) { }", errors = 6);

#[test]
fn test_precedence() {
    let ast = assert("void main(void) { x = 1 + 2 * 3 < 4 - 5; }");
    let Decl::Func(main) = &ast.0[0] else {
        panic!("expected a function");
    };
    let StmtKind::Expr(expr) = &main.body[0].kind else {
        panic!("expected an expression statement");
    };
    let ExprKind::Assign(_, value) = &expr.kind else {
        panic!("expected an assignment");
    };
    let ExprKind::Binary(BinaryOp::Lt, lhs, rhs) = &value.kind else {
        panic!("expected a comparison");
    };
    assert!(matches!(lhs.kind, ExprKind::Binary(BinaryOp::Add, _, _)));
    assert!(matches!(rhs.kind, ExprKind::Binary(BinaryOp::Sub, _, _)));
    assert_eq!(value.to_string(), "1 + 2 * 3 < 4 - 5");
}

#[test]
fn test_left_associative() {
    let ast = assert("void main(void) { output(8 - 4 - 2); }");
    let Decl::Func(main) = &ast.0[0] else {
        panic!("expected a function");
    };
    let StmtKind::Expr(expr) = &main.body[0].kind else {
        panic!("expected an expression statement");
    };
    let ExprKind::Output(arg) = &expr.kind else {
        panic!("expected output");
    };
    let ExprKind::Binary(BinaryOp::Sub, lhs, _) = &arg.kind else {
        panic!("expected a subtraction");
    };
    assert!(matches!(lhs.kind, ExprKind::Binary(BinaryOp::Sub, _, _)));
}

#[test]
fn test_scopes() {
    let ast = assert("int g; int f(int p) { int l; l = p + g; return l; } void main(void) { }");
    let Decl::Var(g) = &ast.0[0] else {
        panic!("expected a variable");
    };
    assert_eq!(g.scope, Scope::Global);

    let Decl::Func(f) = &ast.0[1] else {
        panic!("expected a function");
    };
    assert_eq!(f.ret, TypeSpec::Int);
    assert_eq!(f.params[0].scope, Scope::Param("f".into()));
    let StmtKind::Local(l) = &f.body[0].kind else {
        panic!("expected a local");
    };
    assert_eq!(l.scope, Scope::Local("f".into()));
    let StmtKind::Expr(expr) = &f.body[1].kind else {
        panic!("expected an expression statement");
    };
    let ExprKind::Assign(target, _) = &expr.kind else {
        panic!("expected an assignment");
    };
    assert!(matches!(&target.kind, ExprKind::Var(name, None, Scope::Local(func)) if name == "l" && func == "f"));
}

#[test]
fn test_compound_flattened() {
    let ast = assert("void main(void) { int a; { int b; { b = 1; } a = 2; } }");
    let Decl::Func(main) = &ast.0[0] else {
        panic!("expected a function");
    };
    let kinds: Vec<bool> = main
        .body
        .iter()
        .map(|stmt| matches!(stmt.kind, StmtKind::Local(_)))
        .collect();
    assert_eq!(kinds, vec![true, true, false, false]);
}

#[test]
fn test_shapes() {
    let ast = assert("int a[10]; void f(int b[]) { } void main(void) { }");
    let Decl::Var(a) = &ast.0[0] else {
        panic!("expected a variable");
    };
    assert_eq!(a.shape, Shape::Array(Some(10)));
    let Decl::Func(f) = &ast.0[1] else {
        panic!("expected a function");
    };
    assert_eq!(f.params[0].shape, Shape::Array(None));
}

#[test]
fn test_error_message() {
    let (_, diags) = cminus::parse("void main(void) { output(1; }");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].line, 1);
    match &diags[0].error {
        Error::UnexpectedToken { found, expected } => {
            assert_eq!(found, "`;`");
            assert_eq!(expected, "`)`");
        }
        e => panic!("unexpected error: {e}"),
    }
}

// Any token source can drive the parser
struct Replay(std::vec::IntoIter<Token>);

impl TokenStream for Replay {
    fn next_token(&mut self) -> Token {
        self.0
            .next()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, "", 1))
    }
}

#[test]
fn test_token_stream() {
    use TokenKind::*;
    let tokens = [
        (KwVoid, "void"),
        (Ident, "main"),
        (LParen, "("),
        (KwVoid, "void"),
        (RParen, ")"),
        (LCurly, "{"),
        (RCurly, "}"),
    ]
    .into_iter()
    .map(|(kind, text)| Token::new(kind, text, 1))
    .collect::<Vec<_>>();

    let (ast, diags) = Parser::new(Replay(tokens.into_iter())).parse();
    assert!(diags.is_empty());
    assert_eq!(ast.0.len(), 1);
    assert_eq!(ast.0[0].name(), "main");
}
