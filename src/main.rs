//! servlang — analyze a service DSL source file.
//!
//! Prints the token stream, then runs the syntactic and semantic phases
//! independently over the same token list so every phase's result is
//! reported even when an earlier one failed.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use servlang::{format_tokens, Frontend};

#[derive(Parser)]
#[command(name = "servlang", version, about = "Service DSL front end")]
struct Cli {
    /// Source file to analyze
    file: PathBuf,

    /// Print the formatted token view instead of the raw token stream
    #[arg(long)]
    tokens: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to read {}: {e}", cli.file.display());
            return ExitCode::FAILURE;
        }
    };

    let report = Frontend::run(&source);

    println!("=== Lexical Analysis ===\n");
    if cli.tokens {
        for line in format_tokens(&report.tokens) {
            println!("{line}");
        }
    } else {
        for token in &report.tokens {
            println!("{token}");
        }
    }

    println!("\n=== Syntax Analysis ===\n");
    match &report.syntax {
        Ok(()) => println!("Syntax analysis completed without errors."),
        Err(e) => println!("{e}"),
    }

    println!("\n=== Semantic Analysis ===\n");
    match &report.semantics {
        Ok(()) => println!("Semantic analysis completed without errors."),
        Err(e) => println!("{e}"),
    }

    if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
