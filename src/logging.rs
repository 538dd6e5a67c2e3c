// src/logging.rs
// =============================================================================
// Log setup.
//
// Logs always go to stderr. stdout is reserved for the JSON output when the
// user asks for `--output -`, so piping the result into another tool works.
//
// RUST_LOG overrides the level picked from -v / -q, e.g.
//   RUST_LOG=page_harvester=trace page-harvester https://example.com
// =============================================================================

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

// Maps the -v / -q flags to a filter directive
fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "warn";
    }
    match verbose {
        0 => "info",
        1 => "page_harvester=debug,info",
        _ => "trace",
    }
}

/// Installs the global subscriber. Call once, at startup.
pub fn init(format: LogFormat, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // try_init so a second call (tests) is harmless
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
