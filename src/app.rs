//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads settings and starts logging
//! - fetches the grouped dataset
//! - prints reports/plots, writes charts and exports
//! - records votes

use std::fs;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::chart::{SvgStyle, render_svg};
use crate::cli::{ChartArgs, Command, SummaryArgs, ViewArgs, VoteArgs};
use crate::config::Settings;
use crate::error::AppError;
use crate::gateway::RemoteGateway;
use crate::store::LocalStore;

pub mod pipeline;
pub mod session;

use session::{RemoteVote, Session};

/// Entry point for the `wrs` binary.
pub fn run() -> Result<(), AppError> {
    // `wrs` and `wrs -c WINE` behave like `wrs tui ...`.
    //
    // Clap requires a subcommand name, so we rewrite argv before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let settings = Settings::from_env()?;
    crate::logging::init(&settings.state_dir);
    info!(command = ?cli.command, "starting");

    match cli.command {
        Command::Tui(args) => handle_tui(&settings, args),
        Command::Summary(args) => handle_summary(&settings, args),
        Command::Chart(args) => handle_chart(&settings, args),
        Command::Categories => handle_categories(&settings),
        Command::Vote(args) => handle_vote(&settings, args),
    }
}

fn handle_tui(settings: &Settings, args: ViewArgs) -> Result<(), AppError> {
    crate::tui::run(settings, args)
}

fn handle_summary(settings: &Settings, args: SummaryArgs) -> Result<(), AppError> {
    let rows = pipeline::load_rows(settings)?;
    let filter = args.view.filter();
    let metric = args.view.metric;
    let derived = pipeline::derive_once(&rows, &filter, metric);

    println!(
        "{}",
        crate::report::format_header(&filter, metric, derived.buckets.len())
    );
    println!("{}", crate::report::format_kpis(&derived.kpis));
    println!("{}", crate::report::format_monthly_table(&derived.buckets));

    if args.plot && !args.no_plot {
        let plot = crate::plot::render_ascii_plot(&derived.points, args.width, args.height);
        println!("{plot}");
    }

    if let Some(path) = &args.export {
        crate::io::export::write_monthly_csv(path, &derived.buckets, &filter, metric)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_chart(settings: &Settings, args: ChartArgs) -> Result<(), AppError> {
    let rows = pipeline::load_rows(settings)?;
    let derived = pipeline::derive_once(&rows, &args.view.filter(), args.view.metric);

    if let Some(i) = args.hover {
        if i >= derived.points.len() {
            return Err(AppError::config(format!(
                "--hover {i} is out of range ({} months).",
                derived.points.len()
            )));
        }
    }

    let style = SvgStyle {
        color: args.color.clone(),
        ..SvgStyle::default()
    };
    let svg = render_svg(&derived.points, args.hover, &style);
    fs::write(&args.output, svg).map_err(|e| {
        AppError::io(format!("Failed to write '{}': {e}", args.output.display()))
    })?;

    println!("Wrote {} ({} months)", args.output.display(), derived.points.len());
    Ok(())
}

fn handle_categories(settings: &Settings) -> Result<(), AppError> {
    let rows = pipeline::load_rows(settings)?;
    for category in crate::series::categories(&rows) {
        println!("{category}");
    }
    Ok(())
}

fn handle_vote(settings: &Settings, args: VoteArgs) -> Result<(), AppError> {
    let gateway = RemoteGateway::from_settings(settings);
    let mut session = Session::new(Arc::new(gateway), LocalStore::new(&settings.state_dir));
    session.set_filter(args.view.filter());
    session.set_metric(args.view.metric);

    let outcome = session.cast_vote(args.stance);
    println!("{}", outcome.record.stance.acknowledgement());
    println!(
        "Your vote was recorded on {}.",
        outcome.record.at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
    );

    match outcome.remote {
        RemoteVote::Saved => println!("Vote logging: saved remotely."),
        RemoteVote::Skipped => {
            if session.auth().is_none() {
                println!("Not signed in; the vote is stored locally only.");
            }
        }
        RemoteVote::Failed(msg) => {
            eprintln!("Vote saved locally, but Firestore write failed: {msg}");
        }
    }
    Ok(())
}

/// Rewrite argv so `wrs` defaults to `wrs tui`.
///
/// Rules:
/// - `wrs`                      -> `wrs tui`
/// - `wrs -c WINE ...`          -> `wrs tui -c WINE ...`
/// - `wrs --help/--version/-h`  -> unchanged (show top-level help/version)
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

    let is_subcommand = matches!(
        arg1.as_str(),
        "tui" | "summary" | "chart" | "categories" | "vote"
    );
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

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_the_dashboard() {
        assert_eq!(rewrite_args(args(&["wrs"])), args(&["wrs", "tui"]));
        assert_eq!(
            rewrite_args(args(&["wrs", "-c", "WINE"])),
            args(&["wrs", "tui", "-c", "WINE"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(rewrite_args(args(&["wrs", "summary"])), args(&["wrs", "summary"]));
        assert_eq!(rewrite_args(args(&["wrs", "--help"])), args(&["wrs", "--help"]));
        assert_eq!(rewrite_args(args(&["wrs", "bogus"])), args(&["wrs", "bogus"]));
    }
}
