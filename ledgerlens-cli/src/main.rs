use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use ledgerlens_core::{default_period, today_in};
use ledgerlens_sheets::{
    get_customer_analytics, get_upcoming_birthdays, CsvDirSource, GoogleSheetSource, SheetSource,
    SourceIds,
};
use std::path::PathBuf;

mod config;
mod render;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LEDGERLENS_BUILD_SHA"),
    ")"
);

/// Customer analytics over the shop's spreadsheet export
#[derive(Parser, Debug)]
#[command(name = "ledgerlens", version = VERSION)]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Read `<id>.csv` files from this directory instead of Google Sheets
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Override today's date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default ~/.ledgerlens/config.toml
    Init,

    /// Ranking, inactivity, monthly evolution, bands, recurrence and birthdays
    Customers {
        #[command(flatten)]
        source: SourceArgs,

        /// Period start (default: first day of the current month)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Period end, inclusive (default: today)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Only list customers whose name contains this text
        #[arg(long, default_value = "")]
        search: String,

        /// Rows per list (default: 10)
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Birthdays today and in the next 7 days
    Birthdays {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Init => {
            let p = config::config_file()?;
            if config::write_default_config(&p)? {
                println!("Wrote {}", p.display());
            } else {
                println!("Config already exists: {}", p.display());
            }
        }

        Command::Customers {
            source,
            start,
            end,
            search,
            limit,
            json,
        } => {
            let cfg = config::load_config()?;
            let today = resolve_today(&source, &cfg)?;
            let (default_start, default_end) = default_period(today);
            let start = start.unwrap_or(default_start);
            let end = end.unwrap_or(default_end);
            if start > end {
                bail!("--start {start} is after --end {end}");
            }

            let (sheets, ids) = open_source(&source, &cfg)?;
            let result = get_customer_analytics(sheets.as_ref(), &ids, start, end, today)
                .await
                .context("loading customer analytics")?
                .filter_by_name(&search);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let mut out = String::new();
                render::dashboard(&mut out, &result, limit)?;
                let (from, to) = (start.format("%d/%m/%Y"), end.format("%d/%m/%Y"));
                println!("# Customers {from} .. {to}\n");
                print!("{out}");
            }
        }

        Command::Birthdays { source } => {
            let cfg = config::load_config()?;
            let today = resolve_today(&source, &cfg)?;
            let (sheets, ids) = open_source(&source, &cfg)?;
            let entries = get_upcoming_birthdays(sheets.as_ref(), &ids, today)
                .await
                .context("loading birthdays")?;

            let mut out = String::new();
            render::birthdays(&mut out, &entries)?;
            print!("{out}");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn resolve_today(args: &SourceArgs, cfg: &config::Config) -> Result<NaiveDate> {
    match args.today {
        Some(d) => Ok(d),
        None => today_in(&cfg.analytics.timezone),
    }
}

/// Local CSV directory when `--csv-dir` is given (ids default to the file
/// stems `clientes` / `aniversarios`), Google Sheets otherwise.
fn open_source(
    args: &SourceArgs,
    cfg: &config::Config,
) -> Result<(Box<dyn SheetSource>, SourceIds)> {
    if let Some(dir) = &args.csv_dir {
        if !dir.is_dir() {
            bail!("CSV directory not found: {}", dir.display());
        }
        log::debug!("reading sheets from {}", dir.display());
        return Ok((
            Box::new(CsvDirSource::new(dir)),
            SourceIds::new("clientes", "aniversarios"),
        ));
    }

    cfg.require_remote()?;
    Ok((
        Box::new(GoogleSheetSource::new(&cfg.sheets.spreadsheet_id)),
        cfg.source_ids(),
    ))
}
