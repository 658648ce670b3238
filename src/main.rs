use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pasparse::interpreter::Interpreter;
use pasparse::{Error, parser, printer, semantic};

mod cli;
mod config;

use cli::Args;
use config::AppConfig;

fn main() -> ExitCode {
    let args = Args::parse();
    let config = AppConfig::from_args(&args);
    init_tracing(&config);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(config: &AppConfig) -> Result<()> {
    let source = if let Some(path) = &config.input {
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Reading stdin")?;
        buffer
    };

    let program = parser::parse(&source).map_err(Error::from)?;
    if config.dump_ast {
        print!("{}", printer::render_ast(&program));
    }

    let symbols = semantic::analyze(&program).map_err(Error::from)?;
    if config.dump_symbols {
        print!("{}", printer::render_symbols(&symbols));
    }

    let bindings = Interpreter::with_config(config.interpreter)
        .evaluate(&program)
        .map_err(Error::from)?;
    print!("{}", printer::render_bindings(&bindings));
    println!("Done");
    Ok(())
}
