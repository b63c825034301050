// minic: tokenize and parse a source file, then print the tokens or the AST

use std::fs;
use std::path::PathBuf;

use clap::{Parser as CliParser, ValueEnum};

use minic::parser::{parse, tokenize, Program, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// The parsed syntax tree
    Ast,
    /// The token sequence, one token per line
    Tokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// S-expression rendering
    Sexp,
    /// Pretty-printed JSON
    Json,
    /// Rust debug rendering
    Debug,
}

#[derive(CliParser)]
#[command(name = "minic")]
#[command(about = "Tokenize and parse a minic source file")]
struct Args {
    /// Path to the source file
    file: PathBuf,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Ast)]
    emit: Emit,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Sexp)]
    format: Format,

    /// Suppress progress messages on stderr
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if !args.file.exists() {
        eprintln!("Error: File '{}' not found", args.file.display());
        std::process::exit(1);
    }

    let source = fs::read_to_string(&args.file)?;

    if !args.quiet {
        eprintln!("Parsing {}...", args.file.display());
    }

    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if args.emit == Emit::Tokens {
        return print_tokens(&tokens, args.format);
    }

    let program = match parse(tokens) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if !args.quiet {
        eprintln!(
            "Parsed successfully. Found {} top-level declarations.",
            program.items.len()
        );
        if program.function("main").is_none() {
            eprintln!("Warning: no 'main' function defined");
        }
    }

    print_program(&program, args.format)
}

fn print_tokens(tokens: &[Token], format: Format) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(tokens)?),
        Format::Debug => println!("{:#?}", tokens),
        Format::Sexp => {
            for token in tokens {
                let span = token.span();
                println!(
                    "{}:{}\t{}..{}\t{:?}\t{}",
                    token.line(),
                    token.location.column,
                    span.start,
                    span.end,
                    token.kind,
                    token.text()
                );
            }
        }
    }
    Ok(())
}

fn print_program(program: &Program, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(program)?),
        Format::Debug => println!("{:#?}", program),
        Format::Sexp => println!("{}", program),
    }
    Ok(())
}
