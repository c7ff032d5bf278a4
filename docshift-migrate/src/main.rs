//! Docshift Migration CLI Tool
//!
//! Command-line interface for running and inspecting data migrations against
//! a JSON-file document store.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use docshift::migration::{
    startup_migration_with, DataMigration, MigrationReport, VersionRegistry,
};
use docshift::MigrationConfig;
use docshift_migrate::{plan, DataDir};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "docshift-migrate")]
#[command(about = "Data migration tool for docshift document stores")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file (TOML); DOCSHIFT__* env vars override it
    #[arg(long, default_value = "config/docshift.toml")]
    config: PathBuf,

    /// Directory holding the JSON-file store
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the data migration with the built-in preparers
    Run,

    /// Show the recorded version and which configured versions are due
    Status,

    /// Show what a run would execute, without calling any preparer
    Plan,

    /// List the built-in preparer identifiers
    List,
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let result = match &cli.command {
        Commands::List => handle_list(),
        Commands::Run => handle_run(&cli),
        Commands::Status => handle_status(&cli),
        Commands::Plan => handle_plan(&cli),
    };

    match result {
        Ok(()) => {
            if !cli.quiet {
                println!("{}", "✅ Success".green());
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{} {:#}", "❌ Error:".red(), e);
            process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<MigrationConfig> {
    MigrationConfig::load_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))
}

fn handle_list() -> anyhow::Result<()> {
    let driver = DataMigration::with_builtin();
    let registry = driver.registry();

    println!("\n🧩 Built-in Preparers ({}):", registry.len());
    for name in registry.names() {
        println!("  • {}", name);
    }
    Ok(())
}

fn handle_run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let store = DataDir::open(&cli.data_dir);
    let core = store.core(&config.database_min_version);
    let ctx = store.context(config.parameters(), &core);

    println!("Running data migration against {}...", store.root().display());
    let report = startup_migration_with(&DataMigration::with_builtin(), &core, &ctx);
    print_report(&report);

    // Preparer failures never fail the run.
    Ok(())
}

fn print_report(report: &MigrationReport) {
    println!("\n📊 Migration Report\n");

    for error in &report.errors {
        println!("  {} {}", "✗".red(), error);
    }

    for version in &report.versions {
        if !version.processed {
            println!("  {} {} (skipped, already applied)", "·".dimmed(), version.version);
            continue;
        }
        println!("  {} {}", "▸".cyan(), version.version);
        if let Some(error) = &version.error {
            println!("      {} {}", "✗".red(), error);
        }
        for preparer in &version.preparers {
            let mark = if preparer.outcome.is_failure() {
                "✗".red()
            } else {
                "✓".green()
            };
            println!(
                "      {} {} ({}, {}ms)",
                mark, preparer.name, preparer.outcome, preparer.execution_time_ms
            );
        }
    }

    println!(
        "\n📈 Summary: {} completed, {} failed, version {} -> {} ({}ms)",
        report.completed_count(),
        report.failure_count(),
        report.starting_version.as_deref().unwrap_or("-"),
        report.final_version.as_deref().unwrap_or("unchanged"),
        report.duration_ms()
    );
}

fn handle_status(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let store = DataDir::open(&cli.data_dir);
    let core = store.core(&config.database_min_version);
    let current = core.get_current_database_version();

    println!("\n📊 Migration Status\n");
    println!("Recorded version: {}", current.as_str().bold());

    let params = config.parameters();
    let versions = match VersionRegistry::parse(params.version_list()) {
        Ok(versions) => versions,
        Err(e) => {
            println!("{} {}", "⚠".yellow(), e);
            return Ok(());
        }
    };

    let due: Vec<_> = versions.due(&current).collect();
    let past: Vec<_> = versions.iter().filter(|v| !v.is_due(&current)).collect();

    println!("\n⏳ Due Versions ({}):", due.len());
    for version in &due {
        let note = if version.is_always() { " (runs every time)" } else { "" };
        println!("  ⏳ {}{}", version, note);
    }

    println!("\n✅ Applied Versions ({}):", past.len());
    for version in &past {
        println!("  ✓ {}", version);
    }

    if let Some(latest) = versions.latest() {
        println!("\nLatest declared version: {}", latest);
    }
    Ok(())
}

fn handle_plan(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let store = DataDir::open(&cli.data_dir);
    let core = store.core(&config.database_min_version);
    let current = core.get_current_database_version();
    let driver = DataMigration::with_builtin();

    let planned = match plan(&config.parameters(), driver.registry(), &current) {
        Ok(planned) => planned,
        Err(e) => {
            println!("{} {}; a run would execute nothing", "⚠".yellow(), e);
            return Ok(());
        }
    };

    println!("\n📋 Migration Plan (recorded version {})\n", current);
    for version in planned.iter().filter(|v| v.due) {
        println!("  {}", version.version.as_str().bold());
        match &version.preparers {
            Ok(preparers) if preparers.is_empty() => println!("      (no preparers)"),
            Ok(preparers) => {
                for preparer in preparers {
                    if preparer.registered {
                        println!("      {} {}", "✓".green(), preparer.name);
                    } else {
                        println!("      {} {} (not registered)", "✗".red(), preparer.name);
                    }
                }
            }
            Err(e) => println!("      {} {}", "✗".red(), e),
        }
    }

    let skipped = planned.iter().filter(|v| !v.due).count();
    if skipped > 0 {
        println!("\n{} version(s) already applied", skipped);
    }
    Ok(())
}
