//! Log output for the command-line front end.
//!
//! Library code only talks to the `log` facade (and `tracing` spans behind
//! the feature). Installing a sink is up to the binary:
//! - [`init_with_level`]: stderr lines like `[  0.004s DEBUG grid] ...`
//! - [`init_tracing`]: a `tracing-subscriber` fmt layer, text or JSON

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const CRATE_PREFIXES: [&str; 2] = ["aerialware_core", "aerialware"];

/// Map a `-v` count to a level: warn, info, debug, then trace.
pub fn verbosity_level(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn is_own_target(target: &str) -> bool {
    CRATE_PREFIXES.iter().any(|p| target.starts_with(p))
}

/// `aerialware_core::grid` -> `grid`; foreign targets are left alone.
fn short_target(target: &str) -> &str {
    for prefix in CRATE_PREFIXES {
        if let Some(rest) = target.strip_prefix(prefix) {
            return match rest.strip_prefix("::") {
                Some(module) => module,
                None if rest.is_empty() => prefix,
                None => target,
            };
        }
    }
    target
}

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Dependencies only get through with warnings and errors.
        let cap = if is_own_target(metadata.target()) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        };
        metadata.level() <= cap
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{elapsed:7.3}s {:>5} {}] {}",
            record.level(),
            short_target(record.target()),
            record.args()
        );
        if record.level() == Level::Error {
            let _ = stderr.flush();
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger. Later calls keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber. `RUST_LOG` wins over `level`, which
/// applies to this workspace's crates only. Span close events carry timings
/// for grid building and path planning.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.to_string().to_lowercase();
        EnvFilter::new(format!(
            "warn,aerialware={level},aerialware_core={level}"
        ))
    });
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .with_writer(std::io::stderr)
            .finish()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_counts() {
        assert_eq!(verbosity_level(0), LevelFilter::Warn);
        assert_eq!(verbosity_level(1), LevelFilter::Info);
        assert_eq!(verbosity_level(2), LevelFilter::Debug);
        assert_eq!(verbosity_level(9), LevelFilter::Trace);
    }

    #[test]
    fn targets_are_shortened() {
        assert_eq!(short_target("aerialware_core::grid"), "grid");
        assert_eq!(short_target("aerialware::session"), "session");
        assert_eq!(short_target("aerialware"), "aerialware");
        assert_eq!(short_target("serde_json::de"), "serde_json::de");
    }

    #[test]
    fn dependencies_are_capped_at_warn() {
        let logger = StderrLogger {
            level: LevelFilter::Debug,
            started: Instant::now(),
        };
        let own = Metadata::builder()
            .level(Level::Debug)
            .target("aerialware_core::path")
            .build();
        let foreign = Metadata::builder()
            .level(Level::Info)
            .target("other_crate")
            .build();
        assert!(logger.enabled(&own));
        assert!(!logger.enabled(&foreign));
    }
}
