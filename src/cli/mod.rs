//! Command-line parsing for the economic data dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline and presentation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::WindowSize;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "econ", version, about = "U.S. Economic Data Dashboard (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Indicator catalog (TOML) replacing the built-in list.
    #[arg(long, global = true, env = "ECON_CATALOG", value_name = "TOML")]
    pub catalog: Option<PathBuf>,

    /// Directory for the rotating log files.
    #[arg(long, global = true, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Log DEBUG and above to the console.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one indicator, print statistics, an ASCII chart and the raw data.
    Show(ShowArgs),
    /// List the indicators in the catalog.
    List,
    /// Launch the interactive dashboard.
    Tui(SelectionArgs),
}

/// Indicator / chart style / window selection shared by `show` and `tui`.
#[derive(Debug, Args, Clone)]
pub struct SelectionArgs {
    /// Indicator name or FRED series id (defaults to the first catalog entry).
    #[arg(short, long)]
    pub indicator: Option<String>,

    /// Chart style: line, bar or area. Anything else renders as line.
    #[arg(short, long, default_value = "line")]
    pub style: String,

    /// Number of quarters to display.
    #[arg(
        short,
        long,
        default_value_t = WindowSize::DEFAULT.quarters(),
        value_parser = clap::value_parser!(u32).range(i64::from(WindowSize::MIN)..=i64::from(WindowSize::MAX))
    )]
    pub window: u32,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Skip the ASCII chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the shaped series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export series + statistics to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_parses_selection_and_exports() {
        let cli = Cli::try_parse_from([
            "econ", "show", "-i", "UNRATE", "-s", "bar", "-w", "12", "--export", "out.csv",
        ])
        .unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.selection.indicator.as_deref(), Some("UNRATE"));
        assert_eq!(args.selection.style, "bar");
        assert_eq!(args.selection.window, 12);
        assert_eq!(args.export, Some(PathBuf::from("out.csv")));
        assert!(!args.no_plot);
    }

    #[test]
    fn window_outside_range_is_rejected() {
        assert!(Cli::try_parse_from(["econ", "show", "-w", "3"]).is_err());
        assert!(Cli::try_parse_from(["econ", "show", "-w", "21"]).is_err());
        assert!(Cli::try_parse_from(["econ", "tui", "-w", "20"]).is_ok());
    }

    #[test]
    fn defaults_match_the_dashboard() {
        let cli = Cli::try_parse_from(["econ", "tui"]).unwrap();
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(args.window, 8);
        assert_eq!(args.style, "line");
        assert!(args.indicator.is_none());
        assert_eq!(cli.log_dir, PathBuf::from("logs"));
    }
}
