//! Structured record for the fatal narrowing path.
//!
//! The layer stays silent on every recoverable path. The one thing it logs is
//! the invariant violation that precedes an abort, so the host's crash report
//! names the symbol, the field and the offending value. Records follow the
//! workspace JSONL convention (`timestamp`, `level`, `event` first).

use std::io::Write;

use parking_lot::Mutex;
use serde::Serialize;

use platshim_core::time::FieldOverflow;

use crate::config::{self, LogFormat};

/// Destination for fatal records. `None` means stderr.
pub type Sink = Box<dyn Write + Send>;

static SINK: Mutex<Option<Sink>> = parking_lot::const_mutex(None);

/// A native-width truncation detected at the ABI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FatalRecord {
    /// Nanoseconds since the Unix epoch.
    pub timestamp: u64,
    pub level: &'static str,
    pub event: &'static str,
    /// Exported function that received the value.
    pub symbol: &'static str,
    /// Native field that could not hold it.
    pub field: &'static str,
    pub value: i64,
    pub native_bits: u32,
}

impl FatalRecord {
    #[must_use]
    pub fn narrowing_overflow(symbol: &'static str, overflow: &FieldOverflow) -> Self {
        Self {
            timestamp: now_ns(),
            level: "fatal",
            event: "narrowing_overflow",
            symbol,
            field: overflow.field,
            value: overflow.source.value(),
            native_bits: overflow.source.bits(),
        }
    }
}

fn now_ns() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

/// Render a record in `format`. Returns `None` when logging is off.
#[must_use]
pub fn render(record: &FatalRecord, format: LogFormat) -> Option<String> {
    match format {
        LogFormat::Off => None,
        LogFormat::Json => Some(serde_json::to_string(record).unwrap_or_else(|_| {
            format!(
                "{{\"level\":\"fatal\",\"event\":\"{}\",\"symbol\":\"{}\"}}",
                record.event, record.symbol
            )
        })),
        LogFormat::Text => Some(format!(
            "platshim fatal: {}: {}={} does not fit in a {}-bit native field",
            record.symbol, record.field, record.value, record.native_bits
        )),
    }
}

/// Replace the sink, returning the previous one. `None` restores stderr.
pub fn set_sink(sink: Option<Sink>) -> Option<Sink> {
    std::mem::replace(&mut *SINK.lock(), sink)
}

/// Write a record using the configured format.
pub fn emit(record: &FatalRecord) {
    emit_as(record, config::log_format());
}

/// Write a record in an explicit format. Write errors are dropped: the
/// caller is about to abort and has nowhere to report them.
pub fn emit_as(record: &FatalRecord, format: LogFormat) {
    let Some(line) = render(record, format) else {
        return;
    };
    let mut sink = SINK.lock();
    match sink.as_mut() {
        Some(w) => {
            let _ = writeln!(w, "{line}");
            let _ = w.flush();
        }
        None => {
            let mut err = std::io::stderr().lock();
            let _ = writeln!(err, "{line}");
            let _ = err.flush();
        }
    }
}
