use std::path::PathBuf;

use pasparse::interpreter::InterpreterConfig;
use tracing::Level;

use crate::cli::Args;

pub struct AppConfig {
    pub input: Option<PathBuf>,
    pub dump_ast: bool,
    pub dump_symbols: bool,
    pub log_level: Level,
    pub interpreter: InterpreterConfig,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let input = args
            .file
            .clone()
            .filter(|path| path.as_os_str() != "-");
        let log_level = match args.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };

        AppConfig {
            input,
            dump_ast: !args.no_ast,
            dump_symbols: !args.no_symbols,
            log_level,
            interpreter: InterpreterConfig {
                max_call_depth: args.max_call_depth,
            },
        }
    }
}
