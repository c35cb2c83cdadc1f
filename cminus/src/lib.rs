pub mod compile;
pub mod error;
pub mod eval;
pub mod grammer;
pub mod symbols;
pub mod util;

pub use compile::tac::Program;
pub use compile::{Generated, Generator};
pub use error::{has_error, Diag, Error, Level};
pub use eval::{Analysis, Analyzer, ENTRY};
pub use grammer::ast::AST;
pub use grammer::lexer::{Lexer, TokenStream};
pub use grammer::parsercore::Parser;
pub use symbols::Symbols;

#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Remove branches whose condition is always false
    pub optimize: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { optimize: true }
    }
}

#[derive(Debug)]
pub struct Output {
    pub program: Program,
    pub symbols: Symbols,
    /// Warnings, notes and structural code generation errors
    pub diags: Vec<Diag>,
    /// Lowerings run before the tree stopped changing
    pub iterations: usize,
}

impl Output {
    pub fn has_error(&self) -> bool {
        has_error(&self.diags)
    }
}

/// Tokenize and parse one compilation unit
pub fn parse(source: &str) -> (AST, Vec<Diag>) {
    Parser::new(Lexer::new(source)).parse()
}

/// A parsed and analysed unit. `analysis.diags` holds the parse diagnostics
/// followed by the semantic ones.
#[derive(Debug)]
pub struct Checked {
    pub ast: AST,
    pub analysis: Analysis,
}

impl Checked {
    pub fn has_error(&self) -> bool {
        self.analysis.has_error()
    }

    /// Generate TAC unless an error was found.
    /// `Err` carries every diagnostic when generation was skipped.
    pub fn generate(mut self, options: Options) -> Result<Output, Vec<Diag>> {
        if self.has_error() {
            return Err(self.analysis.diags);
        }

        let generated = Generator::new(&self.analysis)
            .optimize(options.optimize)
            .generate(&mut self.ast);
        let mut diags = self.analysis.diags;
        diags.extend(generated.diags);
        Ok(Output {
            program: generated.program,
            symbols: self.analysis.symbols,
            diags,
            iterations: generated.iterations,
        })
    }
}

/// Parse and analyse one compilation unit
pub fn check(source: &str) -> Checked {
    let (ast, mut diags) = parse(source);
    let mut analysis = Analyzer::new().analyze(&ast);
    diags.append(&mut analysis.diags);
    analysis.diags = diags;
    Checked { ast, analysis }
}

/// Compile with default options
pub fn compile(source: &str) -> Result<Output, Vec<Diag>> {
    compile_with(source, Options::default())
}

/// Parse and analyse `source`, then generate TAC unless an error was found
pub fn compile_with(source: &str, options: Options) -> Result<Output, Vec<Diag>> {
    check(source).generate(options)
}
