// src/cli.rs
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "intake", version, about = "Client intake questionnaire runner")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Replay a JSON5 script of form events against a fresh session
    Replay {
        /// Path to the script (array of steps)
        script: PathBuf,
        /// Directory for submitted records (overrides `output_dir`)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Print the final session view as JSON
        #[arg(long)]
        print: bool,
    },
    /// Print the effective option catalog
    Options,
    /// Print the step sequence
    Steps,
}
