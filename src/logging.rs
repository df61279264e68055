//! Tracing subscriber setup for the command line tool.
//!
//! `RUST_LOG` takes precedence; otherwise the level follows the `-v` count, starting at
//! `warn`. Output goes to stderr so reports printed on stdout stay machine-readable.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn default_directive(verbosity: u8) -> &'static str {
  match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  }
}

/// Install the global subscriber. Calling it twice keeps the first subscriber.
pub fn init_tracing(verbosity: u8) {
  let env_filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

  let fmt_layer = fmt::layer()
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time();

  let _ = tracing_subscriber::registry()
    .with(env_filter)
    .with(fmt_layer)
    .try_init();
}
