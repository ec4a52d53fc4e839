//! Command-line parsing for the warehouse/retail sales dashboard.
//!
//! Argument parsing and command dispatch stay separate from the aggregation
//! and rendering code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ALL_CATEGORIES, CategoryFilter, Metric, Stance};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "wrs",
    version,
    about = "Warehouse and retail sales by month (Montgomery County, MD)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard.
    Tui(ViewArgs),
    /// Print KPIs and the monthly table, optionally plot and export.
    Summary(SummaryArgs),
    /// Write the monthly line chart as SVG.
    Chart(ChartArgs),
    /// List the distinct item types in the dataset.
    Categories,
    /// Record a vote with the saved identity.
    Vote(VoteArgs),
}

/// Category and metric selection shared by every view.
#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Item type to include (`ALL` for every type).
    #[arg(short = 'c', long, default_value = ALL_CATEGORIES)]
    pub category: String,

    /// Sales column to chart.
    #[arg(short = 'm', long, value_enum, default_value_t = Metric::Total)]
    pub metric: Metric,
}

impl ViewArgs {
    pub fn filter(&self) -> CategoryFilter {
        CategoryFilter::from(self.category.as_str())
    }
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the monthly buckets to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output SVG file.
    #[arg(short = 'o', long, value_name = "SVG")]
    pub output: PathBuf,

    /// Render with this month index hovered.
    #[arg(long)]
    pub hover: Option<usize>,

    /// Line and area color.
    #[arg(long, default_value = crate::chart::DEFAULT_COLOR)]
    pub color: String,
}

#[derive(Debug, Args, Clone)]
pub struct VoteArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    #[arg(long, value_enum)]
    pub stance: Stance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_summary_flags() {
        let cli = Cli::parse_from([
            "wrs", "summary", "-c", "WINE", "-m", "retail", "--no-plot", "--export", "out.csv",
        ]);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.view.filter(), CategoryFilter::from("WINE"));
        assert_eq!(args.view.metric, Metric::Retail);
        assert!(args.no_plot);
        assert_eq!(args.export, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn view_defaults_to_all_and_total() {
        let cli = Cli::parse_from(["wrs", "tui"]);
        let Command::Tui(view) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(view.filter(), CategoryFilter::All);
        assert_eq!(view.metric, Metric::Total);
    }

    #[test]
    fn vote_requires_a_stance() {
        assert!(Cli::try_parse_from(["wrs", "vote"]).is_err());
        let cli = Cli::parse_from(["wrs", "vote", "--stance", "against"]);
        let Command::Vote(args) = cli.command else {
            panic!("expected vote");
        };
        assert_eq!(args.stance, Stance::Against);
    }
}
