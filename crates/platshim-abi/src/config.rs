//! Runtime configuration.
//!
//! The only knob is the format of the record written on the fatal path,
//! selected by the `PLATSHIM_LOG` environment variable:
//! - `json` (default): one JSON object per line.
//! - `text`: a single human-readable line.
//! - `off`: nothing is written before aborting.
//!
//! Hosts that configure logging themselves can bypass the environment with
//! [`set_log_format`].

use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable read on first use.
pub const LOG_ENV: &str = "PLATSHIM_LOG";

/// Output format for fatal records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
    Off,
}

impl LogFormat {
    /// Parse from string (case-insensitive). Unknown values fall back to JSON.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" | "human" => Self::Text,
            "off" | "none" | "disabled" | "0" => Self::Off,
            _ => Self::Json,
        }
    }

    /// Returns true if a record should be written at all.
    #[must_use]
    pub const fn enabled(self) -> bool {
        !matches!(self, Self::Off)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Off => "off",
        }
    }
}

// 0=unresolved, 1=Json, 2=Text, 3=Off, 255=resolving.
static CACHED_FORMAT: AtomicU8 = AtomicU8::new(0);

const FORMAT_UNRESOLVED: u8 = 0;
const FORMAT_JSON: u8 = 1;
const FORMAT_TEXT: u8 = 2;
const FORMAT_OFF: u8 = 3;
const FORMAT_RESOLVING: u8 = 255;

fn format_to_u8(format: LogFormat) -> u8 {
    match format {
        LogFormat::Json => FORMAT_JSON,
        LogFormat::Text => FORMAT_TEXT,
        LogFormat::Off => FORMAT_OFF,
    }
}

fn u8_to_format(v: u8) -> LogFormat {
    match v {
        FORMAT_TEXT => LogFormat::Text,
        FORMAT_OFF => LogFormat::Off,
        _ => LogFormat::Json,
    }
}

/// Get the configured log format (reads `PLATSHIM_LOG` on first call, caches thereafter).
///
/// Concurrent first calls race to claim the resolution slot; losers see the
/// default until the winner stores its result.
#[must_use]
pub fn log_format() -> LogFormat {
    let cached = CACHED_FORMAT.load(Ordering::Acquire);
    if cached != FORMAT_UNRESOLVED && cached != FORMAT_RESOLVING {
        return u8_to_format(cached);
    }
    if cached == FORMAT_RESOLVING {
        return LogFormat::default();
    }

    if CACHED_FORMAT
        .compare_exchange(
            FORMAT_UNRESOLVED,
            FORMAT_RESOLVING,
            Ordering::SeqCst,
            Ordering::Relaxed,
        )
        .is_err()
    {
        let v = CACHED_FORMAT.load(Ordering::Acquire);
        return if v != FORMAT_UNRESOLVED && v != FORMAT_RESOLVING {
            u8_to_format(v)
        } else {
            LogFormat::default()
        };
    }

    let format = std::env::var(LOG_ENV)
        .map(|v| LogFormat::from_str_loose(&v))
        .unwrap_or_default();
    // A concurrent set_log_format wins over the environment.
    let _ = CACHED_FORMAT.compare_exchange(
        FORMAT_RESOLVING,
        format_to_u8(format),
        Ordering::SeqCst,
        Ordering::Relaxed,
    );
    u8_to_format(CACHED_FORMAT.load(Ordering::Acquire))
}

/// Override the log format, ignoring `PLATSHIM_LOG` from now on.
pub fn set_log_format(format: LogFormat) {
    CACHED_FORMAT.store(format_to_u8(format), Ordering::Release);
}
