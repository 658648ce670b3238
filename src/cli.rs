use std::path::PathBuf;

use clap::Parser;
use clap::builder::RangedU64ValueParser;

use pasparse::interpreter::{DEFAULT_MAX_CALL_DEPTH, MAX_CALL_DEPTH};

/// Runs a Pascal program: dumps its syntax tree and symbol table, then
/// evaluates it and prints the final bindings of the program frame.
#[derive(Parser, Debug)]
#[command(name = "pasparse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for a small Pascal subset", long_about = None)]
pub struct Args {
    /// Program to run. Reads stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Do not print the postorder AST dump.
    #[arg(long = "no-ast")]
    pub no_ast: bool,

    /// Do not print the symbol table dump.
    #[arg(long = "no-symbols")]
    pub no_symbols: bool,

    /// Maximum number of live activation records.
    #[arg(
        long = "max-call-depth",
        value_name = "N",
        default_value_t = DEFAULT_MAX_CALL_DEPTH,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_CALL_DEPTH as u64)
    )]
    pub max_call_depth: usize,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins
    /// when set.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}
