//! Error types for the packet writer.

use thiserror::Error;

/// Recoverable errors surfaced at the edges of the writer.
///
/// The write path itself never returns these; misuse there is a panic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unknown packet type: 0x{0:02x}")]
    UnknownPacketType(u8),

    #[error("invalid writer config: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}
