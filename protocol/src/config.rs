//! Sizing policy for [`PacketWriter`](crate::PacketWriter).

use std::env;

use tracing::debug;

use crate::error::ProtocolError;

/// Capacity a fresh writer starts with.
pub const DEFAULT_INITIAL_CAPACITY: usize = 128;

/// Capacity `shrink` falls back to once a large payload has inflated the buffer.
pub const DEFAULT_SHRINK_THRESHOLD: usize = 4096;

/// Largest value the four-byte remaining length field can carry.
pub const MAX_REMAINING_LENGTH: i32 = 268_435_455;

/// Largest payload a two-byte length prefix can describe.
pub const MAX_PREFIXED_LEN: usize = u16::MAX as usize;

const INITIAL_CAPACITY_VAR: &str = "PACKET_WRITER_INITIAL_CAPACITY";
const SHRINK_THRESHOLD_VAR: &str = "PACKET_WRITER_SHRINK_THRESHOLD";

/// Capacity policy of a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    initial_capacity: usize,
    shrink_threshold: usize,
}

impl WriterConfig {
    /// Creates a config.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidConfig`] if either value is zero, since
    /// growth doubles from the current capacity.
    pub fn new(initial_capacity: usize, shrink_threshold: usize) -> Result<Self, ProtocolError> {
        if initial_capacity == 0 {
            return Err(ProtocolError::InvalidConfig {
                field: "initial_capacity",
                reason: "must be non-zero",
            });
        }
        if shrink_threshold == 0 {
            return Err(ProtocolError::InvalidConfig {
                field: "shrink_threshold",
                reason: "must be non-zero",
            });
        }
        Ok(Self {
            initial_capacity,
            shrink_threshold,
        })
    }

    /// Reads `PACKET_WRITER_INITIAL_CAPACITY` and `PACKET_WRITER_SHRINK_THRESHOLD`,
    /// falling back to the defaults for anything missing, unparsable or zero.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            initial_capacity: env_size(INITIAL_CAPACITY_VAR).unwrap_or(DEFAULT_INITIAL_CAPACITY),
            shrink_threshold: env_size(SHRINK_THRESHOLD_VAR).unwrap_or(DEFAULT_SHRINK_THRESHOLD),
        }
    }

    #[must_use]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    #[must_use]
    pub fn shrink_threshold(&self) -> usize {
        self.shrink_threshold
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            shrink_threshold: DEFAULT_SHRINK_THRESHOLD,
        }
    }
}

fn env_size(name: &str) -> Option<usize> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => {
            debug!("Ignoring {}={:?}, using default", name, raw);
            None
        }
        Ok(value) => Some(value),
    }
}
