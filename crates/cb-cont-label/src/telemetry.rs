//! Tracing initialisation for binaries built on this crate.
//!
//! Call [`init_tracing`] once at program start. Later calls are ignored
//! (the global subscriber can only be set once per process).

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Targets that log at the requested level; everything else stays at `warn`.
pub const LOG_TARGETS: &[&str] = &["cb_cont_label", "cbcont"];

/// Filter directives used when `RUST_LOG` is not set, e.g.
/// `warn,cb_cont_label=debug,cbcont=debug`.
pub fn default_directives(level: Level) -> String {
    let mut directives = String::from("warn");
    for target in LOG_TARGETS {
        directives.push(',');
        directives.push_str(target);
        directives.push('=');
        directives.push_str(level.as_str());
    }
    directives
}

/// Initialise the global tracing subscriber.
///
/// * `json`: emit newline-delimited JSON log lines.
/// * `level`: verbosity for this crate and the `cbcont` binary when
///   `RUST_LOG` is not set.
///
/// Logs are written to stderr.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let layer = fmt::layer().with_writer(std::io::stderr);
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}
