use cminus::{Error, Level, Options, Output};

fn compile(code: &str) -> Output {
    for (idx, line) in code.lines().enumerate() {
        println!("{:>2}: {}", idx + 1, line);
    }
    let options = Options { optimize: false };
    match cminus::compile_with(code, options) {
        Ok(output) => {
            println!("{}", output.program);
            output
        }
        Err(diags) => panic!("Compile errors found: {:?}", diags),
    }
}

fn assert(code: &str, expected: &[&str]) {
    let output = compile(code);
    assert!(!output.has_error(), "Errors found: {:?}", output.diags);
    let lines: Vec<String> = output.program.0.iter().map(|line| line.to_string()).collect();
    assert_eq!(lines, expected);
}

macro_rules! case {
    ($name:ident, $code:expr, [$($line:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            assert($code, &[$($line),*]);
        }
    };
}

// ---- Straight-line code ----
case!(
    assign_sum,
    "int x; void main(void) { x = 2 + 3; output(x); }",
    ["entry main", "t1 = 2 + 3", "x = t1", "output ( x )"]
);
case!(
    nested_arithmetic,
    "void main(void) { int x; x = (1 + 2) * 3; }",
    ["entry main", "t1 = 1 + 2", "t2 = t1 * 3", "x = t2"]
);
case!(
    chained_assign,
    "void main(void) { int x; int y; x = y = 4; }",
    ["entry main", "y = 4", "x = y"]
);
case!(
    array_elements,
    "int a[3]; void main(void) { a[1] = input(); output(a[1 + 1]); }",
    ["entry main", "a[1] = input", "t1 = 1 + 1", "output ( a[t1] )"]
);
case!(
    input_discarded,
    "void main(void) { input(); }",
    ["entry main", "input"]
);
case!(
    bare_values_emit_nothing,
    "void main(void) { int x; 1; x; ; }",
    ["entry main"]
);

// ---- Functions ----
case!(
    entry_params,
    "void f(int x, int a[]) { } void main(void) { }",
    ["entry f(int x, int[] a)", "entry main"]
);
case!(
    return_value,
    "int f(void) { return 1 + 2; } void main(void) { }",
    ["entry f", "t1 = 1 + 2", "return ( t1 )", "entry main"]
);
case!(
    return_plain,
    "void main(void) { return; }",
    ["entry main", "return"]
);
case!(
    call_temps,
    "int f(int a) { return a; }
void g(void) { }
void main(void) { int y; y = f(1); f(2); g(); }",
    [
        "entry f(int a)",
        "return ( a )",
        "entry main",
        "arg 1",
        "t1 = call f",
        "y = t1",
        "arg 2",
        "call f",
        "call g",
    ]
);
case!(
    call_args_in_order,
    "int f(int a, int b) { return a; } void main(void) { output(f(1 + 2, 3)); }",
    [
        "entry f(int a, int b)",
        "return ( a )",
        "entry main",
        "t1 = 1 + 2",
        "arg t1",
        "arg 3",
        "t2 = call f",
        "output ( t2 )",
    ]
);

// ---- Control flow ----
case!(
    if_with_follower,
    "void main(void) { int x; x = input(); if (x > 1) output(1); output(2); }",
    [
        "entry main",
        "x = input",
        "t1 = x > 1",
        "if_false t1 jump to L1",
        "output ( 1 )",
        "L1: output ( 2 )",
    ]
);
case!(
    if_else_at_end,
    "void main(void) { int x; x = input(); if (x > 1) output(1); else output(2); }",
    [
        "entry main",
        "x = input",
        "t1 = x > 1",
        "if_false t1 jump to L1",
        "output ( 1 )",
        "L1: output ( 2 )",
    ]
);
case!(
    follower_skips_declarations,
    "void main(void) { int x; x = input(); if (x > 1) { output(1); } { int y; y = 2; } }",
    [
        "entry main",
        "x = input",
        "t1 = x > 1",
        "if_false t1 jump to L1",
        "output ( 1 )",
        "L1: y = 2",
    ]
);
case!(
    while_loop,
    "void main(void) { int i; i = 0; while (i < 3) { output(i); i = i + 1; } output(9); }",
    [
        "entry main",
        "i = 0",
        "L1: t1 = i < 3",
        "if_false t1 jump to L2",
        "output ( i )",
        "t2 = i + 1",
        "i = t2",
        "goto L1",
        "L2: output ( 9 )",
    ]
);
case!(
    nested_labels,
    "void main(void) { int x; x = input(); while (x > 0) { if (x > 5) x = 5; x = x - 1; } output(x); }",
    [
        "entry main",
        "x = input",
        "L2: t1 = x > 0",
        "if_false t1 jump to L3",
        "t2 = x > 5",
        "if_false t2 jump to L1",
        "x = 5",
        "L1: t3 = x - 1",
        "x = t3",
        "goto L2",
        "L3: output ( x )",
    ]
);

// ---- Structural errors ----

#[test]
fn test_unresolved_branch() {
    let output = compile("void main(void) { int x; x = input(); if (x > 1) output(1); }");
    assert!(output.has_error());
    assert!(output
        .diags
        .iter()
        .any(|diag| matches!(diag.error, Error::UnresolvedBranch(1))));
    let text = output.program.to_string();
    assert!(text.contains("if_false t1 jump to ?"));
}

#[test]
fn test_unresolved_loop_exit() {
    let output = compile("void main(void) {\n  int x;\n  x = input();\n  while (x > 1) x = x - 1;\n}");
    let errors: Vec<&Error> = output
        .diags
        .iter()
        .filter(|diag| diag.level == Level::Error)
        .map(|diag| &diag.error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], Error::UnresolvedLoopExit(4)));
    assert!(output.program.to_string().contains("goto L1"));
}

#[test]
fn test_semantic_errors_skip_generation() {
    let result = cminus::compile("void main(void) { x = 1; }");
    let Err(diags) = result else {
        panic!("Expected errors");
    };
    assert!(diags
        .iter()
        .any(|diag| matches!(diag.error, Error::UndeclaredVariable(_))));
}

#[test]
fn test_deterministic() {
    let code = "int a[4];
int sum(int v[], int n) {
    int i; int s;
    i = 0; s = 0;
    while (i < n) { s = s + v[i]; i = i + 1; }
    return s;
}
void main(void) {
    int i;
    i = 0;
    while (i < 4) { a[i] = input(); i = i + 1; }
    output(sum(a, 4));
}";
    let first = compile(code).program.to_string();
    let second = compile(code).program.to_string();
    assert_eq!(first, second);
    assert!(first.starts_with("entry sum(int[] v, int n)"));
}

#[test]
fn test_checked_stage() {
    let code = "int x; void main(void) { x = 2 + 3; output(x); }";
    let checked = cminus::check(code);
    assert!(!checked.has_error());
    assert_eq!(checked.ast.0.len(), 2);
    assert!(checked.analysis.symbols.funcs.get("main").is_some());

    let staged = match checked.generate(Options::default()) {
        Ok(output) => output.program.to_string(),
        Err(diags) => panic!("Compile errors found: {:?}", diags),
    };
    assert_eq!(staged, compile(code).program.to_string());
}

#[test]
fn test_checked_keeps_parse_diags() {
    let checked = cminus::check("void main(void) { output(1; }");
    assert!(checked.has_error());
    assert!(matches!(
        checked.analysis.diags[0].error,
        Error::UnexpectedToken { .. }
    ));
    assert!(checked.generate(Options::default()).is_err());
}
