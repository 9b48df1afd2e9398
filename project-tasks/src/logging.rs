//! Tracing setup shared by the CLI and the tool server
//!
//! Logs always go to stderr: stdout carries rendered output or the MCP
//! protocol. Set `LOG_FORMAT=json` for JSON lines; `RUST_LOG` refines the
//! default filter.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default level for a verbosity count, `quiet` wins
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::WARN;
    }
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Initialize tracing for the given crates at `level`
pub fn init_tracing(crates: &[&str], level: LevelFilter) -> anyhow::Result<()> {
    let mut filter = EnvFilter::from_default_env();
    for name in crates {
        filter = filter.add_directive(format!("{}={}", name, level).parse()?);
    }

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
