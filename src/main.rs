use std::env::args_os;
use std::process::ExitCode;

use imtool::{run, CLIParser};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match run(&arguments) {
        Ok(outcome) => {
            println!("{}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Operation failed because of: {}", e);
            ExitCode::FAILURE
        }
    }
}
