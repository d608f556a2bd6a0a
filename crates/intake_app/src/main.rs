mod app;
mod config;
mod effects;
mod logging;
mod notify;
mod persistence;
mod select;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Arg, Command};
use intake_core::SessionOutcome;
use intake_logging::intake_info;

fn main() -> anyhow::Result<()> {
    let matches = Command::new("intake")
        .about("Bulk resume upload client for the recruiting backend")
        .arg(
            Arg::new("paths")
                .value_name("PATH")
                .num_args(1..)
                .required(true)
                .help("Resume files or directories to upload"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("RON configuration file (default: ./intake.ron)"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Override the backend base URL"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .value_name("TOKEN")
                .help("Bearer token for the backend session"),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .value_name("DEST")
                .help("Log destination: terminal, file, or both (default: terminal)"),
        )
        .get_matches();

    let destination = match matches.get_one::<String>("log").map(String::as_str) {
        Some("file") => logging::LogDestination::File,
        Some("both") => logging::LogDestination::Both,
        _ => logging::LogDestination::Terminal,
    };
    logging::initialize(destination);

    let config_path = matches
        .get_one::<String>("config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::CONFIG_FILENAME));
    let mut config = config::load_config(&config_path);
    if let Some(url) = matches.get_one::<String>("base-url") {
        config.base_url = Some(url.clone());
    }
    if let Some(token) = matches.get_one::<String>("token") {
        config.bearer_token = Some(token.clone());
    }

    let paths: Vec<PathBuf> = matches
        .get_many::<String>("paths")
        .expect("paths are required")
        .map(PathBuf::from)
        .collect();
    let files = select::collect_files(&paths).context("collecting selected files")?;
    intake_info!("Selected {} file(s) from {} path(s)", files.len(), paths.len());

    let output_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let options = app::RunOptions {
        files,
        rules: config.selection_rules(),
        settings: config.upload_settings(),
        output_dir,
    };

    let outcome = app::run(options, Box::new(notify::ConsoleNotifier::new()))?;
    if outcome == Some(SessionOutcome::Failed) {
        std::process::exit(1);
    }
    Ok(())
}
