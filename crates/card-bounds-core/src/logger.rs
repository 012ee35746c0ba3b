//! Stderr logging for detector runs.
//!
//! [`init_with_level`] installs a small `log` backend: records from the
//! `card_bounds*` crates pass at the requested level, everything else only at
//! `warn` and above. With the `tracing` feature, [`init_tracing`] installs a
//! `tracing-subscriber` pipeline instead (log records are bridged into it).

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, fmt::format::FmtSpan, util::SubscriberInitExt, EnvFilter};

const CRATE_PREFIX: &str = "card_bounds";

struct DetectorLogger {
    level: LevelFilter,
    started: Instant,
}

impl DetectorLogger {
    fn passes(&self, level: Level, target: &str) -> bool {
        if target.starts_with(CRATE_PREFIX) {
            level <= self.level
        } else {
            level <= Level::Warn
        }
    }
}

impl Log for DetectorLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.passes(metadata.level(), metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // `card_bounds_detector::edges` -> `edges`
        let stage = record
            .target()
            .rsplit("::")
            .next()
            .unwrap_or_else(|| record.target());

        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{:>8.3}s {:<5} {:<10} {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            stage,
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<DetectorLogger> = OnceLock::new();

/// Install the stderr logger for the detector crates at `level`.
///
/// Only the first call installs anything; later calls return `Ok(())`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| DetectorLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level.max(LevelFilter::Warn));
    Ok(())
}

/// Install a `tracing` subscriber.
///
/// Honors `RUST_LOG`; without it, the detector crates log at `info` and
/// everything else at `warn`. `json` switches to flattened JSON events.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{CRATE_PREFIX}=info")));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .compact()
            .finish()
            .try_init()
    };
}
