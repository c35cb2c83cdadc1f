use cminus::compile::optimize::fold;
use cminus::compile::tac::{Label, Operand, Program, Tac, Temp};
use cminus::{Error, Level, Options, Output};
use std::collections::HashMap;

fn compile(code: &str, optimize: bool) -> Output {
    for (idx, line) in code.lines().enumerate() {
        println!("{:>2}: {}", idx + 1, line);
    }
    match cminus::compile_with(code, Options { optimize }) {
        Ok(output) => {
            println!("{}", output.program);
            output
        }
        Err(diags) => panic!("Compile errors found: {:?}", diags),
    }
}

fn lines(output: &Output) -> Vec<String> {
    output.program.0.iter().map(|line| line.to_string()).collect()
}

fn removed(output: &Output) -> Vec<&'static str> {
    output
        .diags
        .iter()
        .filter_map(|diag| match diag.error {
            Error::DeadBranch(keyword) if diag.level == Level::Note => Some(keyword),
            _ => None,
        })
        .collect()
}

fn assert(code: &str, expected: &[&str], notes: &[&str], iterations: usize) {
    let output = compile(code, true);
    assert!(!output.has_error(), "Errors found: {:?}", output.diags);
    assert_eq!(lines(&output), expected);
    assert_eq!(removed(&output), notes);
    assert_eq!(output.iterations, iterations);
}

macro_rules! case {
    ($name:ident, $code:expr, [$($line:expr),* $(,)?], removed = [$($note:expr),*], iterations = $n:expr) => {
        #[test]
        fn $name() {
            assert($code, &[$($line),*], &[$($note),*], $n);
        }
    };
}

case!(
    dead_if,
    "void main(void) { if (2 < 1) { output(1); } output(2); }",
    ["entry main", "output ( 2 )"],
    removed = ["if"],
    iterations = 2
);
case!(
    live_if,
    "void main(void) { if (2 > 1) { output(1); } output(2); }",
    [
        "entry main",
        "t1 = 2 > 1",
        "if_false t1 jump to L1",
        "output ( 1 )",
        "L1: output ( 2 )",
    ],
    removed = [],
    iterations = 1
);
case!(
    dead_while,
    "void main(void) { while (1 > 2) output(1); output(2); }",
    ["entry main", "output ( 2 )"],
    removed = ["while"],
    iterations = 2
);
case!(
    else_skipped_by_follower,
    "void main(void) { if (1 > 2) output(1); else output(2); output(3); }",
    ["entry main", "output ( 3 )"],
    removed = ["if"],
    iterations = 2
);
case!(
    else_kept_without_follower,
    "void main(void) { if (1 > 2) output(1); else output(2); }",
    ["entry main", "output ( 2 )"],
    removed = ["if"],
    iterations = 2
);
case!(
    else_kept_before_declaration,
    "void main(void) { if (1 > 2) output(1); else output(2); { int y; } }",
    ["entry main", "output ( 2 )"],
    removed = ["if"],
    iterations = 2
);
case!(
    nested_in_else,
    "void main(void) {
    int x;
    x = 0;
    if (1 > 2) output(1);
    else {
        if (x > 0) output(2);
        else {
            if (x > 1) output(3);
            else output(4);
        }
    }
}",
    ["entry main", "x = 0", "output ( 4 )"],
    removed = ["if", "if", "if"],
    iterations = 4
);
case!(
    known_variable,
    "void main(void) { int x; x = 1; if (x > 2) output(1); output(2); }",
    ["entry main", "x = 1", "output ( 2 )"],
    removed = ["if"],
    iterations = 2
);
case!(
    dead_without_follower,
    "void main(void) { if (2 < 1) output(1); }",
    ["entry main"],
    removed = ["if"],
    iterations = 2
);
case!(
    nested_removed_once,
    "void main(void) {
    int x;
    x = 0;
    while (x < 3) {
        if (1 > 2) { if (2 > 3) output(1); output(5); }
        x = x + 1;
    }
    output(2);
}",
    [
        "entry main",
        "x = 0",
        "L1: t1 = x < 3",
        "if_false t1 jump to L2",
        "t2 = x + 1",
        "x = t2",
        "goto L1",
        "L2: output ( 2 )",
    ],
    removed = ["if"],
    iterations = 2
);
case!(
    removal_exposes_fact,
    "void main(void) { int x; x = 0; if (1 > 2) output(1); if (x > 0) output(2); output(3); }",
    ["entry main", "x = 0", "output ( 3 )"],
    removed = ["if", "if"],
    iterations = 3
);

// ---- Kept branches ----
case!(
    division_by_zero_unknown,
    "void main(void) { if (1 / 0 > 2) output(1); output(2); }",
    [
        "entry main",
        "t1 = 1 / 0",
        "t2 = t1 > 2",
        "if_false t2 jump to L1",
        "output ( 1 )",
        "L1: output ( 2 )",
    ],
    removed = [],
    iterations = 1
);
case!(
    input_unknown,
    "void main(void) { int x; x = input(); if (x > 2) output(1); output(2); }",
    [
        "entry main",
        "x = input",
        "t1 = x > 2",
        "if_false t1 jump to L1",
        "output ( 1 )",
        "L1: output ( 2 )",
    ],
    removed = [],
    iterations = 1
);
case!(
    call_forgets_variables,
    "int g;
void f(void) { g = 1; }
void main(void) { g = 0; f(); if (g > 0) output(1); output(2); }",
    [
        "entry f",
        "g = 1",
        "entry main",
        "g = 0",
        "call f",
        "t1 = g > 0",
        "if_false t1 jump to L1",
        "output ( 1 )",
        "L1: output ( 2 )",
    ],
    removed = [],
    iterations = 1
);

#[test]
fn test_disabled() {
    let output = compile("void main(void) { if (2 < 1) { output(1); } output(2); }", false);
    assert_eq!(
        lines(&output),
        [
            "entry main",
            "t1 = 2 < 1",
            "if_false t1 jump to L1",
            "output ( 1 )",
            "L1: output ( 2 )",
        ]
    );
    assert!(removed(&output).is_empty());
    assert_eq!(output.iterations, 1);
}

#[test]
fn test_iterations_bounded_by_depth() {
    // Each removal exposes the next constant, one level per lowering
    let code = "void main(void) {
    int a; int b; int c;
    a = 0; b = 0; c = 0;
    if (1 > 2) output(1);
    if (a > 0) output(2);
    if (b > 0) output(3);
    if (c > 0) output(4);
    output(5);
}";
    let output = compile(code, true);
    assert_eq!(lines(&output), ["entry main", "a = 0", "b = 0", "c = 0", "output ( 5 )"]);
    assert_eq!(removed(&output).len(), 4);
    assert!(output.iterations <= 5);
}

// Outputs of `main` for programs without input, calls or arrays
fn run(program: &Program) -> Vec<i64> {
    let lines = &program.0;
    let mut labels: HashMap<Label, usize> = HashMap::new();
    for (i, line) in lines.iter().enumerate() {
        for &label in &line.labels {
            labels.insert(label, i);
        }
    }
    let start = lines
        .iter()
        .position(|line| matches!(&line.inst, Tac::Entry(name, _) if name == "main"))
        .unwrap_or_else(|| panic!("no entry main"));

    let mut vars: HashMap<String, i64> = HashMap::new();
    let mut temps: HashMap<Temp, i64> = HashMap::new();
    let value = |vars: &HashMap<String, i64>, temps: &HashMap<Temp, i64>, operand: &Operand| match operand {
        Operand::Const(value) => *value,
        Operand::Var(name) => vars.get(name).copied().unwrap_or(0),
        Operand::Temp(temp) => temps[temp],
        other => panic!("unsupported operand {}", other),
    };

    let mut outputs = Vec::new();
    let mut pc = start + 1;
    for _ in 0..10_000 {
        let Some(line) = lines.get(pc) else {
            return outputs;
        };
        pc += 1;
        match &line.inst {
            Tac::Entry(..) | Tac::Return(_) => return outputs,
            Tac::Binary(dest, op, lhs, rhs) => {
                let (lhs, rhs) = (value(&vars, &temps, lhs), value(&vars, &temps, rhs));
                temps.insert(*dest, fold(*op, lhs, rhs).unwrap_or(0));
            }
            Tac::Copy(Operand::Var(name), src) => {
                let src = value(&vars, &temps, src);
                vars.insert(name.clone(), src);
            }
            Tac::IfFalse(cond, Some(label)) => {
                if value(&vars, &temps, cond) == 0 {
                    pc = labels[label];
                }
            }
            Tac::Goto(label) => pc = labels[label],
            Tac::Output(arg) => outputs.push(value(&vars, &temps, arg)),
            inst => panic!("unsupported instruction {}", inst),
        }
    }
    panic!("program did not stop");
}

#[test]
fn test_same_behavior() {
    let programs = [
        "void main(void) { if (1 > 2) output(1); else output(2); output(3); }",
        "void main(void) { int x; x = 0; if (x > 0) { output(1); } else { output(2); } x = 5; output(x); }",
        "void main(void) {
    int i;
    i = 0;
    while (i < 3) {
        if (i > 10) output(100); else output(i);
        i = i + 1;
    }
    while (2 < 1) output(7);
    output(9);
}",
        "void main(void) {
    int x;
    x = 0;
    if (1 > 2) output(1);
    else {
        if (x > 0) output(2);
        else {
            if (x > 1) output(3);
            else output(4);
        }
    }
}",
    ];
    for code in programs {
        let plain = compile(code, false);
        let optimized = compile(code, true);
        assert!(!optimized.has_error(), "Errors found: {:?}", optimized.diags);
        assert_eq!(run(&plain.program), run(&optimized.program));
    }
}
