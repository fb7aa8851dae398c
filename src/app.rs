//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging
//! - loads the indicator catalog
//! - reads the FRED credential
//! - runs the pipeline and prints, exports, or hands off to the TUI

use chrono::Local;
use clap::Parser;
use tracing::Level;

use crate::catalog::{Indicator, IndicatorCatalog};
use crate::cli::{Cli, Command, SelectionArgs, ShowArgs};
use crate::data::{FredClient, SeriesProvider};
use crate::domain::{ChartStyle, WindowSize};
use crate::error::AppError;
use crate::logging::{self, LogConfig};

pub mod pipeline;

/// Entry point for the `econ` binary.
pub fn run() -> Result<(), AppError> {
    // `econ` and `econ -i UNRATE` behave like `econ tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    let _log = logging::install(&log_config(&cli))?;

    let catalog = IndicatorCatalog::load(cli.catalog.as_deref())?;

    match cli.command {
        Command::Show(args) => handle_show(&catalog, args),
        Command::List => handle_list(&catalog),
        Command::Tui(args) => handle_tui(catalog, args),
    }
}

/// Logging policy for a parsed command line.
///
/// The TUI owns the terminal, so it logs to the file only.
pub fn log_config(cli: &Cli) -> LogConfig {
    let console_level = match (&cli.command, cli.verbose) {
        (Command::Tui(_), _) => None,
        (_, true) => Some(Level::DEBUG),
        (_, false) => Some(Level::INFO),
    };
    LogConfig {
        dir: cli.log_dir.clone(),
        console_level,
        ..LogConfig::default()
    }
}

/// Initial selection resolved against the catalog.
#[derive(Debug, Clone)]
pub struct Selection {
    pub indicator_index: usize,
    pub style: ChartStyle,
    pub window: WindowSize,
}

impl Selection {
    pub fn resolve(catalog: &IndicatorCatalog, args: &SelectionArgs) -> Result<Self, AppError> {
        let indicator_index = match &args.indicator {
            Some(query) => catalog.index_of(query)?,
            None => 0,
        };
        Ok(Self {
            indicator_index,
            style: ChartStyle::from_name(&args.style),
            window: WindowSize::new(args.window)?,
        })
    }

    pub fn indicator<'a>(&self, catalog: &'a IndicatorCatalog) -> Result<&'a Indicator, AppError> {
        catalog
            .get(self.indicator_index)
            .ok_or_else(|| AppError::config("Indicator selection out of range."))
    }
}

/// Resolve the selection, then obtain a provider via `connect`.
///
/// A failing `connect` (missing credential) ends the run before anything is
/// fetched or the terminal is taken over.
fn prepare<P>(
    catalog: &IndicatorCatalog,
    args: &SelectionArgs,
    connect: impl FnOnce() -> Result<P, AppError>,
) -> Result<(Selection, P), AppError> {
    let selection = Selection::resolve(catalog, args)?;
    let provider = connect()?;
    Ok((selection, provider))
}

fn handle_show(catalog: &IndicatorCatalog, args: ShowArgs) -> Result<(), AppError> {
    let (selection, client) = prepare(catalog, &args.selection, FredClient::from_env)?;
    show(catalog, &args, &selection, &client)
}

fn show<P: SeriesProvider>(
    catalog: &IndicatorCatalog,
    args: &ShowArgs,
    selection: &Selection,
    provider: &P,
) -> Result<(), AppError> {
    let indicator = selection.indicator(catalog)?;

    let view = pipeline::run_pipeline(
        provider,
        indicator,
        selection.window,
        selection.style,
        Local::now().date_naive(),
    )?;

    println!(
        "{}",
        crate::report::format_run_summary(&view.indicator, &view.series, &view.stats)
    );

    if !args.no_plot {
        println!(
            "{}",
            crate::chart::render_ascii_chart(&view.chart, args.width, args.height)
        );
    }

    println!("Raw Data");
    println!("{}", crate::report::format_raw_table(&view.series));
    println!("{}", crate::report::DATA_SOURCE);

    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, &view.series)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::write_view_json(path, &view)?;
    }

    Ok(())
}

fn handle_list(catalog: &IndicatorCatalog) -> Result<(), AppError> {
    print!("{}", crate::report::format_catalog(catalog));
    Ok(())
}

fn handle_tui(catalog: IndicatorCatalog, args: SelectionArgs) -> Result<(), AppError> {
    let (selection, client) = prepare(&catalog, &args, FredClient::from_env)?;
    crate::tui::run(catalog, client, selection)
}

/// Rewrite argv so `econ` defaults to `econ tui`.
///
/// Rules:
/// - `econ`                      -> `econ tui`
/// - `econ -i UNRATE ...`        -> `econ tui -i UNRATE ...`
/// - `econ --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "list" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
