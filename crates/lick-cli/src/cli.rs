use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lick_types::Address;

#[derive(Parser)]
#[command(
    name = "lick",
    about = "Lick — per-artwork payment ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a scenario file against a fresh contract
    Run(RunArgs),
    /// Originate a contract and register the initial artworks
    Seed(SeedArgs),
    /// Run the built-in consolidation walkthrough
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct RunArgs {
    pub path: PathBuf,
    /// Exit with an error if any operation was rejected
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct SeedArgs {
    /// Contract configuration (TOML); overrides --admin and --count
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Admin address; defaults to the "Admin" test account
    #[arg(long)]
    pub admin: Option<Address>,
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,
    #[arg(long, default_value = "artwork_")]
    pub prefix: String,
}

#[derive(Args)]
pub struct DemoArgs {}
