use std::process::ExitCode;

use anyhow::Result;
use clap::{Arg, Command};
use kiln_cli::{run, CliOptions, ConsoleNotifier, Notifier, OutputFormat};
use kiln_core::{init_tracing, MemberAccessFallback, PostprocessConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match try_main() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            ConsoleNotifier::new().on_error(&format!("error: {e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<bool> {
    // Parse command line arguments
    let matches = Command::new("kiln-postprocess")
        .version(kiln_core::VERSION)
        .about("Normalize parsed syntax trees before type inference")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("JSON file holding one tree or an array of trees, '-' for stdin")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .help("Output rendering: json or source")
                .default_value("source"),
        )
        .arg(
            Arg::new("jobs")
                .long("jobs")
                .short('j')
                .value_name("N")
                .help("Worker threads for independent trees")
                .value_parser(clap::value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            Arg::new("arrow-fallback")
                .long("arrow-fallback")
                .value_name("MODE")
                .help("Result of a malformed '->': original or base")
                .default_value("original"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Print per-rule counters to stderr")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logging
    if matches.get_flag("debug") {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("kiln_core=debug,kiln_cli=debug"))
            .with_writer(std::io::stderr)
            .init();
    } else {
        init_tracing();
    }

    let input = matches
        .get_one::<String>("file")
        .cloned()
        .unwrap_or_else(|| "-".to_string());
    let format = match matches.get_one::<String>("format") {
        Some(format) => format.parse::<OutputFormat>()?,
        None => OutputFormat::default(),
    };
    let fallback = match matches.get_one::<String>("arrow-fallback") {
        Some(mode) => mode.parse::<MemberAccessFallback>()?,
        None => MemberAccessFallback::default(),
    };
    let jobs = matches.get_one::<usize>("jobs").copied().unwrap_or(1);

    let options = CliOptions {
        input,
        format,
        config: PostprocessConfig::new()
            .with_member_access_fallback(fallback)
            .jobs(jobs),
        show_stats: matches.get_flag("stats"),
    };

    let summary = run(&options, &ConsoleNotifier::new())?;
    info!(
        trees = summary.trees,
        errors = summary.errors,
        "postprocess finished"
    );

    Ok(summary.success())
}
