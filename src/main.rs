use std::process::ExitCode;

use clap::Parser;
use console::style;
use log::{error, info};

mod batch;
mod cookie;
mod error;
mod presenter;
mod session;
mod util;

use crate::error::Error;
use crate::session::Session;

/// Exit status after Ctrl-C, as a shell reports SIGINT.
const SIGINT_STATUS: i32 = 130;

/// Interactively turn a username and passwords into
/// base64(username:md5(password)) cookies, one per line in an output file.
#[derive(Debug, Parser)]
#[command(author, about, version)]
struct Args {}

fn interrupted() {
    eprintln!("\n{}", style("Interrupted by user").red().for_stderr());
}

fn main() -> ExitCode {
    env_logger::init();

    let Args {} = Args::parse();

    if let Err(e) = ctrlc::set_handler(|| {
        interrupted();
        std::process::exit(SIGINT_STATUS);
    }) {
        error!("cannot install interrupt handler: {e}");
    }

    let mut presenter = presenter::select();
    match Session::new(&mut *presenter).run() {
        Ok(()) => {
            info!("session finished");
            ExitCode::SUCCESS
        }
        Err(Error::Interrupted) => {
            interrupted();
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e:?}");
            eprintln!("{} {e}", style("Error:").red().for_stderr());
            ExitCode::FAILURE
        }
    }
}
