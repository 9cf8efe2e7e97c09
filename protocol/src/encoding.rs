//! Fixed header and remaining length encoders (MQTT 3.1.1 section 2.2).

use std::fmt;
use std::ops::Deref;

/// Packs a packet type nibble and a flags nibble into the first fixed header byte.
///
/// `packet_type` lands in bits 7-4 and `flags` in bits 3-0. Both must fit in
/// four bits; this is only checked in debug builds.
#[inline]
#[must_use]
pub fn build_fixed_header(packet_type: u8, flags: u8) -> u8 {
    debug_assert!(packet_type <= 0x0F, "packet type {packet_type} is not a nibble");
    debug_assert!(flags <= 0x0F, "flags {flags:#06b} are not a nibble");
    (packet_type << 4) | flags
}

/// Encoded remaining length field, kept on the stack.
///
/// Derefs to the encoded bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RemainingLength {
    bytes: [u8; 5],
    len: u8,
}

impl Deref for RemainingLength {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }
}

impl AsRef<[u8]> for RemainingLength {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl fmt::Debug for RemainingLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RemainingLength").field(&&**self).finish()
    }
}

/// Encodes `length` as an MQTT variable byte integer.
///
/// Seven bits per byte, least significant group first, with 0x80 set on every
/// byte but the last. Zero and negative values encode as a single `0x00`.
///
/// Values above [`MAX_REMAINING_LENGTH`](crate::config::MAX_REMAINING_LENGTH)
/// are not rejected and spill into a fifth byte that conforming readers will
/// refuse; callers enforce the protocol limit.
#[must_use]
pub fn encode_remaining_length(length: i32) -> RemainingLength {
    let mut out = RemainingLength {
        bytes: [0; 5],
        len: 0,
    };
    // Non-positive input degrades to the single zero byte.
    let mut value = u32::try_from(length).unwrap_or(0);
    loop {
        #[allow(clippy::cast_possible_truncation)]
        let mut byte = (value % 128) as u8;
        value /= 128;
        if value > 0 {
            byte |= 0x80;
        }
        out.bytes[usize::from(out.len)] = byte;
        out.len += 1;
        if value == 0 {
            break out;
        }
    }
}

/// Number of bytes [`encode_remaining_length`] produces for `length`.
#[must_use]
pub const fn remaining_length_len(length: i32) -> usize {
    if length < 128 {
        1
    } else if length < 16_384 {
        2
    } else if length < 2_097_152 {
        3
    } else if length < 268_435_456 {
        4
    } else {
        5
    }
}
