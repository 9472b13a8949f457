use clap::{
    Parser, Subcommand,
    builder::styling,
    error::{ContextKind, ContextValue, ErrorKind},
};
use disaster_etl::{
    EtlConfig, JoinPolicy,
    cli::{category_columns, inspect_table, run_pipeline, write_report},
};
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::Path;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

const USAGE: &str = "Please provide the filepaths of the messages and categories \
datasets as the first and second argument respectively, as well as the filepath \
of the database to save the cleaned data to as the third argument.

Example: detl run disaster_messages.csv disaster_categories.csv DisasterResponse.db";

/// Disaster ETL: decode disaster-response message categories into a SQLite table
#[derive(Parser)]
#[command(name = "detl", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source configuration from, if it exists
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, clean and save messages and their categories
    Run {
        /// CSV file of messages with an `id` column
        messages: String,

        /// CSV file with `id` and `categories` columns
        categories: String,

        /// SQLite database to write the cleaned table to
        database: String,

        /// How to treat ids found in only one file [env: ETL_JOIN_POLICY]
        #[arg(short, long, value_enum)]
        join: Option<JoinPolicy>,

        /// Table to replace in the database [env: ETL_TABLE_NAME]
        #[arg(short, long)]
        table: Option<String>,

        /// Write a JSON summary of the run to this file
        #[arg(short, long)]
        report: Option<String>,
    },

    /// Print the label columns derived from a categories file
    Schema {
        /// CSV file with a `categories` column
        categories: String,
    },

    /// Summarize a table previously written by `run`
    Inspect {
        /// SQLite database to read
        database: String,

        /// Table to read [env: ETL_TABLE_NAME]
        #[arg(short, long)]
        table: Option<String>,
    },
}

/// Too few or too many positionals for `run`, or no command at all
///
/// Mistyped flags and errors from other commands keep clap's own message.
fn is_argument_count_error(e: &clap::Error) -> bool {
    let run = std::env::args().skip(1).any(|arg| arg == "run");
    match e.kind() {
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => true,
        ErrorKind::MissingRequiredArgument => run,
        ErrorKind::UnknownArgument => {
            run && matches!(
                e.get(ContextKind::InvalidArg),
                Some(ContextValue::String(arg)) if !arg.starts_with('-')
            )
        }
        _ => false,
    }
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if is_argument_count_error(&e) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(e) => e.exit(),
    };

    if Path::new(&cli.env).exists() {
        dotenvy::from_filename(&cli.env)?;
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    let config = EtlConfig::from_env()?;

    match cli.command {
        Commands::Run {
            messages,
            categories,
            database,
            join,
            table,
            report,
        } => {
            let config = config.with_overrides(table, join);
            log::info!(
                "Processing {} with {} join",
                messages.bright_black(),
                config.join_policy.cyan()
            );

            let summary = run_pipeline(&messages, &categories, &database, &config)?;
            if let Some(report) = report {
                write_report(&summary, &report)?;
                log::info!("Report written to {}", report.bright_black());
            }

            log::info!(
                "{} Cleaned data saved to database! ({} rows in {})",
                "✓".green(),
                summary.rows.loaded,
                config.table_name.cyan()
            );
        }
        Commands::Schema { categories } => {
            log::info!("Deriving category columns from {}", categories.bright_black());
            let columns = category_columns(&categories)?;
            for column in &columns {
                println!("{}", column);
            }
            log::info!("{} category column(s)", columns.len());
        }
        Commands::Inspect { database, table } => {
            let config = config.with_overrides(table, None);
            let (rows, columns) = inspect_table(&database, &config.table_name)?;
            println!(
                "{}: {} rows, {} columns",
                config.table_name.cyan(),
                rows,
                columns.len()
            );
            println!("{}", columns.join(", "));
        }
    }

    Ok(())
}
