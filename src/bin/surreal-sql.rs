//! surreal-sql — offline companion CLI for the driver.
//!
//! # Usage
//!
//! ```bash
//! # Normalize a multi-line query and count its placeholders
//! surreal-sql normalize "SELECT *
//!     FROM user WHERE name = \$name"
//!
//! # Decode a captured response envelope
//! surreal-sql decode response.json --format json
//!
//! # Inspect a record id
//! surreal-sql id 'user:`3f2504e0-4f89-11d3-9a0c-0305e82c3301`'
//! ```

use std::collections::BTreeSet;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use surreal_sql::prelude::*;
use surreal_sql::{query, response};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "surreal-sql")]
#[command(version)]
#[command(about = "Inspect queries, response envelopes and record ids", long_about = None)]
#[command(after_help = "EXAMPLES:
    surreal-sql normalize 'SELECT * FROM user WHERE name = $name'
    surreal-sql decode response.json
    surreal-sql id 'post:42'")]
struct Cli {
    /// Configuration file (defaults to ./surreal-sql.toml, then the user config dir)
    #[arg(long, env = "SURREAL_SQL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the single-line form of a query and its placeholder count
    Normalize {
        /// The query text
        query: String,
    },
    /// List placeholder occurrences in a query
    Inputs {
        /// The query text
        query: String,
    },
    /// Classify a response envelope and print its rows
    Decode {
        /// JSON file holding the envelope; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Show how a record id decodes
    Id {
        /// Record id such as `user:mark`
        record: String,
    },
    /// Print the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Normalize { query } => normalize(query),
        Commands::Inputs { query } => inputs(query, &cli.format)?,
        Commands::Decode { file } => decode(file.as_ref(), &cli.format)?,
        Commands::Id { record } => show_id(record),
        Commands::Config => print!("{}", load_config(cli.config.as_ref())?.to_toml()?),
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            Config::load(path).with_context(|| format!("failed to load {}", path.display()))
        }
        None => Ok(Config::discover()?),
    }
}

fn normalize(text: &str) {
    let normalized = query::prepare_query(text);
    println!("{}", normalized.white());
    println!(
        "{} {}",
        "Placeholders:".dimmed(),
        query::num_input(&normalized).to_string().cyan()
    );
}

fn inputs(text: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let names = query::placeholders(text);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Table => {
            if names.is_empty() {
                println!("{}", "(no placeholders)".dimmed());
                return Ok(());
            }
            for (i, name) in names.iter().enumerate() {
                println!("  {} ${}", format!("{:>3}", i + 1).dimmed(), name.yellow());
            }
            let distinct: BTreeSet<&str> = names.iter().copied().collect();
            println!();
            println!(
                "{} occurrence(s), {} distinct",
                names.len().to_string().cyan(),
                distinct.len().to_string().cyan()
            );
        }
    }

    Ok(())
}

fn decode(file: Option<&PathBuf>, format: &OutputFormat) -> anyhow::Result<()> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let json: serde_json::Value = serde_json::from_str(&content).context("invalid JSON")?;
    let rows = Rows::new(response::classify(Value::from(json))?);
    format_output(&rows, format)?;
    Ok(())
}

fn format_output(rows: &Rows, format: &OutputFormat) -> anyhow::Result<()> {
    if rows.is_empty() {
        println!("{}", "(no results)".dimmed());
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let values: Vec<serde_json::Value> = rows.iter().map(|r| r.value().to_json()).collect();
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        OutputFormat::Table => {
            // Union of columns across rows, in canonical order
            let columns: BTreeSet<&str> = rows.iter().flat_map(|r| r.columns()).collect();
            let columns: Vec<&str> = if columns.is_empty() {
                vec!["value"]
            } else {
                columns.into_iter().collect()
            };

            let cells: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    columns
                        .iter()
                        .map(|c| match row.get(c) {
                            Some(v) => v.to_string(),
                            None if row.columns().is_empty() => row.value().to_string(),
                            None => String::new(),
                        })
                        .collect()
                })
                .collect();

            let widths: Vec<usize> = columns
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    cells
                        .iter()
                        .map(|r| r[i].chars().count())
                        .chain(std::iter::once(c.len()))
                        .max()
                        .unwrap_or(0)
                })
                .collect();

            let header: Vec<String> = columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:width$}", c, width = *w))
                .collect();
            println!("{}", header.join(" │ ").white().bold());

            let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            println!("{}", sep.join("─┼─").dimmed());

            for row in &cells {
                let line: Vec<String> = row
                    .iter()
                    .zip(&widths)
                    .map(|(v, w)| format!("{:width$}", v, width = *w))
                    .collect();
                println!("{}", line.join(" │ "));
            }

            println!();
            println!("{} row(s) returned", rows.len().to_string().cyan());
        }
    }

    Ok(())
}

fn show_id(record: &str) {
    let value = Value::from(record);

    println!("{}", "Record id".cyan().bold());
    match RecordId::from_value(&value) {
        Ok(id) => {
            println!("  {} {}", "Raw:".dimmed(), id.as_str().white());
            if let (Some(table), Some(key)) = (id.table(), id.key()) {
                println!("  {} {}", "Table:".dimmed(), table.white());
                println!("  {} {}", "Key:".dimmed(), key.white());
            }
        }
        Err(e) => println!("  {} {}", "Raw:".dimmed(), e.to_string().red()),
    }

    match RecordUuid::from_value(&value) {
        Ok(id) => println!("  {} {}", "UUID:".dimmed(), id.uuid().to_string().green()),
        Err(e) => println!("  {} {}", "UUID:".dimmed(), e.to_string().yellow()),
    }

    match AutoId::from_value(&value) {
        Ok(id) => println!("  {} {}", "Auto id:".dimmed(), id.as_str().green()),
        Err(e) => println!("  {} {}", "Auto id:".dimmed(), e.to_string().yellow()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING: &str = "/nonexistent/surreal-sql.toml";

    #[test]
    fn test_offline_commands_ignore_config() {
        for args in [
            vec!["surreal-sql", "--config", MISSING, "normalize", "SELECT *\n FROM user"],
            vec!["surreal-sql", "--config", MISSING, "inputs", "$a $b"],
            vec!["surreal-sql", "--config", MISSING, "id", "post:42"],
        ] {
            let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
            assert!(run(&cli).is_ok(), "{args:?}");
        }
    }

    #[test]
    fn test_config_command_reports_bad_path() {
        let cli = Cli::try_parse_from(["surreal-sql", "--config", MISSING, "config"]).unwrap();
        let err = run(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load"));
    }
}
