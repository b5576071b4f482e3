//! Process-wide logging for the notes search service.
//!
//! Two fmt layers share one registry:
//! - index events (`note_index::*`): compact, RFC3339 UTC timestamps,
//!   `file:line`, span close timings;
//! - everything else (HTTP handlers, the binary): plain lines without target.
//!
//! Filtering: `RUST_LOG` (or the given default) for the whole process, and
//! `NOTE_INDEX_LOG` to raise or lower only the index, e.g. `NOTE_INDEX_LOG=debug`.

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::{Level, Metadata};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, filter, fmt, layer::SubscriberExt};

/// Target prefix of every event emitted by this crate.
pub const TARGET_PREFIX: &str = "note_index";

/// Env var holding the index-only level.
pub const INDEX_LEVEL_ENV: &str = "NOTE_INDEX_LOG";

#[derive(Clone, Debug, Default)]
struct UtcSeconds;

impl FormatTime for UtcSeconds {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

fn is_index_event(meta: &Metadata<'_>) -> bool {
    meta.target().starts_with(TARGET_PREFIX)
}

/// `note_index=<level>` for a level name such as `debug` or `WARN`.
///
/// Returns `None` for anything that is not a tracing level.
pub fn index_directive(level: &str) -> Option<Directive> {
    let level = Level::from_str(level.trim()).ok()?;
    let s = format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase());
    Directive::from_str(&s).ok()
}

/// `RUST_LOG` if set, otherwise `default`; then the `NOTE_INDEX_LOG` override.
pub fn env_filter(default: &str) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    match std::env::var(INDEX_LEVEL_ENV).ok().as_deref().and_then(index_directive) {
        Some(directive) => base.add_directive(directive),
        None => base,
    }
}

/// Installs the global subscriber. Call once, before the index is built.
pub fn init(default: &str) -> Result<(), TryInitError> {
    let ansi = io::stdout().is_terminal();

    let index_layer = fmt::layer()
        .with_timer(UtcSeconds)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(ansi)
        // Durations of instrumented index builds.
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(filter::filter_fn(is_index_event));

    let service_layer = fmt::layer()
        .with_target(false)
        .with_ansi(ansi)
        .with_filter(filter::filter_fn(|meta| !is_index_event(meta)));

    tracing_subscriber::registry()
        .with(env_filter(default))
        .with(service_layer)
        .with(index_layer)
        .try_init()
}
