use clap::Parser;
use colored::*;
use std::path::PathBuf;
use verify_assets::config::{self, Overrides};
use verify_assets::error::Result;

mod args;
use args::Cli;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    verify_assets::logging::init(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let overrides = cli.overrides().or(Overrides::from_env());
    let config = config::resolve(&overrides, &cwd)?;

    verify_assets::verify(&config, &cli.inputs)
}
