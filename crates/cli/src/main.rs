#![forbid(unsafe_code)]

mod commands;
mod config;
mod git;

use config::{Invocation, env_var, parse_args, usage};
use git::GitCommitInformation;
use cl_storage::StoreError;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("CL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();
}

/// A missing row is an answer, not a failure.
fn failure_level(err: &StoreError) -> Level {
    if err.is_not_found() {
        Level::DEBUG
    } else {
        Level::ERROR
    }
}

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = match parse_args(&args, env_var) {
        Ok(Invocation::Help) => {
            print!("{}", usage());
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Run(cfg)) => cfg,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    init_logging();

    let commits = GitCommitInformation::new(&cfg.repo, cfg.git_bin.clone());
    match commands::execute(&cfg, commits) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            if failure_level(&err) == Level::DEBUG {
                tracing::debug!(code = err.code(), "nothing recorded for key");
            } else {
                tracing::error!(code = err.code(), error = %err, "command failed");
            }
            eprintln!("{}: {err}", err.code());
            ExitCode::FAILURE
        }
    }
}
