use clap::Parser;
use cminus::util::display::{print_ast, print_program};
use cminus::{Diag, Error, Options};
use std::path::Path;
use std::process::ExitCode;

#[derive(Debug, clap::Parser)]
#[clap(author, version, about)]
struct Args {
    /// Input file
    #[clap(default_value = "main.c-")]
    input: String,

    /// Output file [default: input with a `.tac` extension]
    #[clap(short, long)]
    output: Option<String>,

    /// Enable verbose output
    #[clap(short, long)]
    verbose: bool,

    /// Print the symbol tables as YAML
    #[clap(short, long)]
    symbols: bool,

    /// Keep branches whose condition is always false
    #[clap(long)]
    no_opt: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            Diag::error(0, Error::Io(e)).print(&args.input, "");
            return ExitCode::FAILURE;
        }
    };
    let report = |diags: &[Diag]| {
        for diag in diags {
            diag.print(&args.input, &source);
        }
    };

    // 1. Parse, 2. Analyze
    let checked = cminus::check(&source);
    if args.verbose {
        println!("1. Parse");
        print_ast(&checked.ast);
        println!("2. Analyze");
    }
    if args.symbols {
        match checked.analysis.symbols.to_yaml() {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => eprintln!("Failed to serialize symbols: {}", e),
        }
    }

    // 3. Generate
    let options = Options {
        optimize: !args.no_opt,
    };
    let generated = match checked.generate(options) {
        Ok(generated) => generated,
        Err(diags) => {
            report(&diags);
            return ExitCode::FAILURE;
        }
    };
    report(&generated.diags);
    if args.verbose {
        println!("3. Generate ({} iterations)", generated.iterations);
        print_program(&generated.program);
    }

    // 4. Write
    let output = match args.output {
        Some(output) => output,
        None => Path::new(&args.input)
            .with_extension("tac")
            .display()
            .to_string(),
    };
    let text = format!("{}\n", generated.program);
    if let Err(e) = std::fs::write(&output, text) {
        Diag::error(0, Error::Io(e)).print(&output, "");
        return ExitCode::FAILURE;
    }

    if generated.has_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
