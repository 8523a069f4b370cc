use amtools::config::{COMPDB_DIR_ENV, RANKING_DB_ENV};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "amtools")]
#[command(about = "Activity manager developer tools", version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compiler flags for editor completion of a source file
    Flags(FlagsArgs),
    /// Dump summed week scores per activity
    Scores(ScoresArgs),
    /// Check the configured databases
    Doctor(DoctorArgs),
}

#[derive(Debug, Args)]
pub struct FlagsArgs {
    pub file: PathBuf,
    /// Directory containing compile_commands.json
    #[arg(long, env = COMPDB_DIR_ENV)]
    pub compdb_dir: Option<String>,
    /// Directory the built-in flags are resolved against
    #[arg(long)]
    pub base_dir: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ScoresArgs {
    #[arg(long, env = RANKING_DB_ENV)]
    pub db: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct DoctorArgs {
    #[arg(long, env = RANKING_DB_ENV)]
    pub db: Option<String>,
    #[arg(long, env = COMPDB_DIR_ENV)]
    pub compdb_dir: Option<String>,
    #[arg(long)]
    pub json: bool,
}
