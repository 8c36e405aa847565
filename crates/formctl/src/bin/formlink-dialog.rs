//! Dialog executable launched by a host.
//!
//! Takes exactly `<form> <request> <response> <build hash> <build kind>`.
//! Exits 0 once a response file has been written; any failure is printed to
//! stderr and the process exits 1 without leaving a response behind.

use std::io;
use std::process::ExitCode;

use formctl::common;
use formctl::terminal::TerminalFrontend;
use formlink::{
    run_dialog, AcceptFrontend, BuildIdentity, DialogArgs, FormError, FormResult, Frontend,
};
use tracing::error;

fn frontend_from_env() -> Box<dyn Frontend> {
    match std::env::var("FORMLINK_FRONTEND").as_deref() {
        Ok("accept") => Box::new(AcceptFrontend),
        _ => Box::new(TerminalFrontend::new(io::stdin().lock(), io::stderr())),
    }
}

fn run() -> Result<FormResult, FormError> {
    let args = DialogArgs::parse(std::env::args_os().skip(1))?;
    let mut frontend = frontend_from_env();
    run_dialog(&args, &BuildIdentity::current(), frontend.as_mut())
}

fn main() -> ExitCode {
    common::init_tracing(0, "warn");
    match run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "dialog failed");
            eprintln!("formlink-dialog: {err}");
            ExitCode::FAILURE
        }
    }
}
