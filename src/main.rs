mod cli;

use amtools::compdb::CompilationDatabase;
use amtools::config;
use amtools::doctor::run_doctor;
use amtools::flags::flags_for_file;
use amtools::scores::{load_week_scores, open_ranking_db, render_all};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        cli::Command::Flags(args) => handle_flags(args),
        cli::Command::Scores(args) => handle_scores(args),
        cli::Command::Doctor(args) => handle_doctor(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_flags(args: cli::FlagsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let database = match config::compdb_dir(args.compdb_dir.as_deref()) {
        Some(dir) => Some(CompilationDatabase::open(&dir)?),
        None => None,
    };
    let base_dir = config::base_dir(args.base_dir.as_deref())?;

    let response = flags_for_file(&args.file, database.as_ref(), &base_dir)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    for flag in &response.flags {
        println!("{flag}");
    }
    Ok(())
}

fn handle_scores(args: cli::ScoresArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db_path = config::ranking_db_path(args.db.as_deref());
    tracing::info!(path = %db_path.display(), "opening ranking database");

    let conn = open_ranking_db(&db_path)?;
    let rows = load_week_scores(&conn, args.location.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    print!("{}", render_all(&rows));
    Ok(())
}

fn handle_doctor(args: cli::DoctorArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db_path = config::ranking_db_path(args.db.as_deref());
    let compdb_dir = config::compdb_dir(args.compdb_dir.as_deref());
    let report = run_doctor(&db_path, compdb_dir.as_deref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("ranking db: {}", report.db_path.display());
    println!("  exists: {}", report.db_exists);
    println!("  schema ok: {}", report.schema_ok);
    if let Some(error) = &report.schema_error {
        println!("  schema error: {error}");
    }
    println!("  activities: {}", report.activity_count);

    match &report.compdb_path {
        Some(path) => {
            println!("compilation db: {}", path.display());
            println!("  loaded: {}", report.compdb_ok);
            if let Some(error) = &report.compdb_error {
                println!("  error: {error}");
            }
            println!("  entries: {}", report.compdb_entries);
        }
        None => println!("compilation db: (not configured, using built-in flags)"),
    }
    Ok(())
}
