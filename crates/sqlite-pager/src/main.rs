mod adapters;
mod cli;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(&args.log_level);

    let res = if args.bridge {
        adapters::bridge::run(args)
    } else {
        adapters::oneshot::run(args)
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", e.code(), e);
            ExitCode::FAILURE
        }
    }
}
