//! Harness error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("path contains an interior NUL byte: {0}")]
    NulInPath(String),
    #[error("{symbol} failed with errno {errno}")]
    Syscall { symbol: &'static str, errno: i32 },
    #[error("{invalid} of {total} log lines failed validation")]
    InvalidLog { total: usize, invalid: usize },
}

impl HarnessError {
    /// Capture the calling thread's `errno` for a failed wrapper call.
    #[must_use]
    pub fn last_os(symbol: &'static str) -> Self {
        let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        Self::Syscall { symbol, errno }
    }
}
