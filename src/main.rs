//! VoiceScribe CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_scribe::cli::{
    app::run_pipeline,
    args::{Cli, RunOptions},
};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    // A .env file is optional; the credential check in the config layer is
    // what enforces the environment contract.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    run_pipeline(RunOptions { output: cli.output }).await
}
