//! Schema Compatibility CLI
//!
//! Checks whether new schema versions may replace existing ones.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use schemacompat::{
    check_dirs, CompatConfig, CompatibilityChecker, CompatibilityReport, FieldPath, SchemaNode,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-compat")]
#[command(about = "Check structural schema compatibility and compute the LCD schema")]
struct Cli {
    /// Configuration file (defaults to schemacompat.toml lookup)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare one existing schema with a new one
    Check {
        /// Currently accepted schema (JSON)
        #[arg(short, long)]
        existing: PathBuf,
        /// Proposed schema (JSON)
        #[arg(short, long)]
        new: PathBuf,
        /// Narrow the existing schema instead of failing on removals
        #[arg(long)]
        narrow: bool,
        /// Dotted root path for reported violations
        #[arg(short, long)]
        path: Option<String>,
        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare every schema in a directory with its counterpart
    Batch {
        /// Directory of currently accepted schemas
        #[arg(short, long)]
        existing: PathBuf,
        /// Directory of proposed schemas
        #[arg(short, long)]
        new: PathBuf,
        /// Narrow existing schemas instead of failing on removals
        #[arg(long)]
        narrow: bool,
        /// Write the JSON report to a file
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether the checked schemas are compatible
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = CompatConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Check {
            existing,
            new,
            narrow,
            path,
            output,
        } => {
            let root = path
                .map(|p| FieldPath::parse_dotted(&p))
                .unwrap_or_else(|| config.check.root());
            let mut checker = CompatibilityChecker::from_config(&config.check);
            if narrow {
                checker = checker.narrow_existing(true);
            }

            let existing_schema = SchemaNode::load(&existing)
                .with_context(|| format!("reading {}", existing.display()))?;
            let new_schema =
                SchemaNode::load(&new).with_context(|| format!("reading {}", new.display()))?;

            let name = existing.display().to_string();
            let mut report =
                CompatibilityReport::run(name, &checker, &root, &existing_schema, &new_schema)?;

            if report.compatible {
                eprintln!("✅ {} -> {}: compatible", existing.display(), new.display());
                if report.narrowed {
                    eprintln!("   (existing schema was narrowed)");
                }
            } else {
                eprintln!("❌ {} -> {}: INCOMPATIBLE", existing.display(), new.display());
                for violation in &report.violations {
                    eprintln!("   └─ {}", violation);
                }
            }

            if !config.output.include_lcd {
                report = report.without_lcd();
            }
            let rendered = config.output.format.render(&report)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    eprintln!("Report written to {:?}", path);
                }
                None => println!("{}", rendered),
            }

            Ok(report.compatible)
        }

        Commands::Batch {
            existing,
            new,
            narrow,
            report,
        } => {
            let mut checker = CompatibilityChecker::from_config(&config.check);
            if narrow {
                checker = checker.narrow_existing(true);
            }

            println!(
                "🔍 Checking compatibility: {} -> {}",
                existing.display(),
                new.display()
            );
            println!();

            let mut batch = check_dirs(&existing, &new, &checker, &config.check.root())?;

            for entry in &batch.reports {
                if entry.compatible {
                    let note = if entry.narrowed { " (narrowed)" } else { "" };
                    println!("✅ {}{}", entry.name, note);
                } else {
                    println!("❌ {} - INCOMPATIBLE", entry.name);
                    for violation in &entry.violations {
                        println!("   └─ {}", violation);
                    }
                }
            }

            println!();
            println!(
                "{} schemas: {} compatible, {} narrowed, {} incompatible",
                batch.total, batch.compatible, batch.narrowed, batch.incompatible
            );

            if let Some(path) = report {
                if !config.output.include_lcd {
                    batch.reports = batch.reports.into_iter().map(|r| r.without_lcd()).collect();
                }
                std::fs::write(&path, config.output.format.render(&batch)?)?;
                println!("Report written to {:?}", path);
            }

            Ok(batch.is_compatible())
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(true)
        }
    }
}
