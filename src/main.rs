//! Sidenote - checklist notes and a countdown timer in the terminal.
//!
//! # Usage
//!
//! ```bash
//! sidenote
//! sidenote --checklist
//! sidenote --store ~/notes/sidenote.json --save
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sidenote::app::App;
use sidenote::config::{
    ConfigFlags, clear_config_flags, default_store_path, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use sidenote::perf;

/// Checklist-aware notes and a persistent countdown timer
#[derive(Parser, Debug)]
#[command(name = "sidenote", version, about, long_about = None)]
struct Cli {
    /// JSON file holding notes and timer state
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Start with checklist mode on
    #[arg(long)]
    checklist: bool,

    /// Enable startup performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed event and render timings to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging() {
    // stderr only, and only when SIDENOTE_LOG is set.
    if std::env::var_os("SIDENOTE_LOG").is_none() {
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_env("SIDENOTE_LOG")
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("SIDENOTE_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize render debug log {}: {}",
            render_debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    let store_path = effective.store.clone().unwrap_or_else(default_store_path);
    tracing::debug!(store = %store_path.display(), checklist = effective.checklist, "starting");

    // Run the application
    let mut app = App::new(store_path)
        .with_checklist(effective.checklist)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
