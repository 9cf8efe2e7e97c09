//! Output buffer and wire encoders for building MQTT control packets.
//!
//! [`PacketWriter`] accumulates the bytes of one packet at a time and hands
//! them to the transport through [`PacketWriter::as_bytes`]. The free
//! functions in [`encoding`] produce the fixed header byte and the variable
//! length remaining length field.

pub mod config;
pub mod encoding;
pub mod error;
pub mod io;
pub mod packet_type;

pub use config::WriterConfig;
pub use encoding::{
    build_fixed_header, encode_remaining_length, remaining_length_len, RemainingLength,
};
pub use error::ProtocolError;
pub use io::PacketWriter;
pub use packet_type::PacketType;
