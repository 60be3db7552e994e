//! dirdupes - find folders that hold the same files
//!
//! Entry point for the dirdupes CLI application.

use std::io::{self, BufRead, IsTerminal, Write};

use clap::Parser;
use dirdupes::{
    cli::Cli,
    error::{ExitCode, StructuredError},
    logging::init_logging,
};

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    init_logging(cli.verbose, cli.quiet);

    match dirdupes::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::for_error(&err);

            if json_errors {
                let structured = StructuredError::new(&err, exit_code);
                match serde_json::to_string_pretty(&structured) {
                    Ok(json) => eprintln!("{json}"),
                    Err(_) => eprintln!("[{}] Error: {err:#}", exit_code.code_prefix()),
                }
            } else {
                eprintln!("[{}] Error: {err:#}", exit_code.code_prefix());
            }

            if exit_code != ExitCode::Interrupted {
                acknowledge();
            }
            std::process::exit(exit_code.as_i32());
        }
    }
}

/// Keep the error on screen until the operator has seen it.
fn acknowledge() {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return;
    }
    eprint!("Press Enter to exit...");
    let _ = io::stderr().flush();
    let mut line = String::new();
    let _ = stdin.lock().read_line(&mut line);
}
