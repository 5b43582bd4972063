//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - loads configuration (`.env` / environment)
//! - collects both sources for every country and writes the panels
//! - prints the coverage summary

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::PanelConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `panels` binary. Takes no arguments.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let config = PanelConfig::from_env()?;
    info!(
        countries = config.registry.len(),
        start = %config.window.start,
        end = %config.window.end,
        output = %config.output_dir.display(),
        "starting collection"
    );

    let output = pipeline::run_collection(&config)?;

    println!("{}", crate::report::format_run_summary(&output.panels.report));
    for path in &output.written {
        info!(path = %path.display(), "wrote panel");
    }

    Ok(())
}

/// Log to stderr so stdout only carries the summary. `RUST_LOG` overrides
/// the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
