//! Error types for the I/O edges of the game.
//!
//! The simulation itself cannot fail. Everything here comes from the display
//! bridge, asset loading, the score store or settings, and none of it is
//! allowed to stop the tick loop: callers log and carry on.

use std::fmt;

/// Top-level error enum
#[derive(Debug)]
pub enum ArkanoidError {
    /// The display bridge did not show up in time.
    BridgeTimeout {
        /// How long we waited, in milliseconds.
        waited_ms: u64,
    },

    /// A display call (page build, text or image update) failed.
    Display {
        /// Which operation failed, for the log line.
        op: &'static str,
        message: String,
    },

    /// An image asset could not be read.
    Asset {
        name: String,
        source: std::io::Error,
    },

    /// Fetching or submitting the best score failed.
    ScoreStore(String),

    /// The settings file exists but could not be parsed.
    Settings(String),
}

impl fmt::Display for ArkanoidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArkanoidError::BridgeTimeout { waited_ms } => {
                write!(f, "Even bridge not detected within {}ms", waited_ms)
            }
            ArkanoidError::Display { op, message } => {
                write!(f, "display {} failed: {}", op, message)
            }
            ArkanoidError::Asset { name, source } => {
                write!(f, "failed to load {}: {}", name, source)
            }
            ArkanoidError::ScoreStore(msg) => write!(f, "score store: {}", msg),
            ArkanoidError::Settings(msg) => write!(f, "invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for ArkanoidError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArkanoidError::Asset { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ArkanoidError {
    pub fn display(op: &'static str, err: impl fmt::Display) -> Self {
        ArkanoidError::Display {
            op,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArkanoidError>;
