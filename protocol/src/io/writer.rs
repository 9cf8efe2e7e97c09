use tracing::{debug, trace};

use crate::config::{WriterConfig, MAX_PREFIXED_LEN};
use crate::encoding::{build_fixed_header, encode_remaining_length};

/// Growable output buffer for building one outgoing packet at a time.
///
/// Writes append at a cursor; [`seek`](Self::seek) moves the cursor back to
/// patch earlier fields while [`len`](Self::len) keeps the furthest position
/// written since the last [`reset`](Self::reset). Only `as_bytes()` is ever
/// meant to reach the transport.
///
/// Keep one writer per connection: `reset` between packets keeps the
/// allocation, `shrink` returns memory after an oversized payload.
#[derive(Debug, Clone)]
pub struct PacketWriter {
    /// Backing storage; its length is the writer's capacity.
    buf: Vec<u8>,
    pos: usize,
    len: usize,
    config: WriterConfig,
}

impl PacketWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WriterConfig::default())
    }

    #[must_use]
    pub fn with_config(config: WriterConfig) -> Self {
        Self {
            buf: vec![0; config.initial_capacity()],
            pos: 0,
            len: 0,
            config,
        }
    }

    /// Makes room for `additional` bytes at the cursor.
    #[inline]
    pub fn ensure_additional(&mut self, additional: usize) {
        if self.buf.len() - self.pos < additional {
            self.ensure_capacity(self.pos + additional);
        }
    }

    /// Doubles the capacity until it holds at least `min` bytes.
    ///
    /// Bytes below [`len`](Self::len) keep their offsets.
    pub fn ensure_capacity(&mut self, min: usize) {
        let old = self.buf.len();
        if old >= min {
            return;
        }
        let mut capacity = old;
        while capacity < min {
            capacity = capacity.saturating_mul(2);
        }
        trace!("Growing packet buffer {} -> {} bytes", old, capacity);
        self.buf.resize(capacity, 0);
    }

    /// Drops back to the configured shrink threshold if the buffer grew past it.
    ///
    /// Call between packets only: anything written beyond the threshold is lost.
    pub fn shrink(&mut self) {
        let threshold = self.config.shrink_threshold();
        if self.buf.len() <= threshold {
            return;
        }
        debug!("Shrinking packet buffer {} -> {} bytes", self.buf.len(), threshold);
        self.buf.truncate(threshold);
        self.buf.shrink_to_fit();
        self.pos = self.pos.min(threshold);
        self.len = self.len.min(threshold);
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.ensure_additional(1);
        self.buf[self.pos] = value;
        self.advance(1);
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.put(&value.to_be_bytes());
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.put(&value.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.put(bytes);
    }

    /// Writes `count` bytes of `src` starting at `offset`.
    ///
    /// # Panics
    /// Panics if `offset + count` exceeds `src.len()`. Callers own this bound.
    pub fn write_range(&mut self, src: &[u8], offset: usize, count: usize) {
        debug_assert!(
            offset.checked_add(count).is_some_and(|end| end <= src.len()),
            "range {offset}+{count} out of bounds for source of {} bytes",
            src.len()
        );
        self.put(&src[offset..offset + count]);
    }

    /// Writes a u16 length prefix followed by `bytes`.
    ///
    /// # Panics
    /// Panics if `bytes` is longer than 65535.
    pub fn write_binary(&mut self, bytes: &[u8]) {
        assert!(
            bytes.len() <= MAX_PREFIXED_LEN,
            "length-prefixed field of {} bytes exceeds {}",
            bytes.len(),
            MAX_PREFIXED_LEN
        );
        #[allow(clippy::cast_possible_truncation)]
        let prefix = bytes.len() as u16;
        self.ensure_additional(2 + bytes.len());
        self.write_u16(prefix);
        self.put(bytes);
    }

    /// Like [`write_binary`](Self::write_binary); `None` writes an empty field.
    ///
    /// # Panics
    /// Panics if the bytes are longer than 65535.
    pub fn write_binary_opt(&mut self, bytes: Option<&[u8]>) {
        self.write_binary(bytes.unwrap_or_default());
    }

    /// Writes `text` as a length-prefixed UTF-8 string.
    ///
    /// # Panics
    /// Panics if the encoded string is longer than 65535 bytes.
    pub fn write_string(&mut self, text: &str) {
        self.write_binary(text.as_bytes());
    }

    /// Like [`write_string`](Self::write_string); `None` writes an empty string.
    ///
    /// # Panics
    /// Panics if the encoded string is longer than 65535 bytes.
    pub fn write_string_opt(&mut self, text: Option<&str>) {
        self.write_string(text.unwrap_or_default());
    }

    pub fn write_fixed_header(&mut self, packet_type: u8, flags: u8) {
        self.write_u8(build_fixed_header(packet_type, flags));
    }

    pub fn write_remaining_length(&mut self, length: i32) {
        self.put(&encode_remaining_length(length));
    }

    /// Moves the cursor to `offset`, growing storage if needed.
    ///
    /// [`len`](Self::len) is left alone; the next write raises it only if it
    /// goes past the current high-water mark.
    pub fn seek(&mut self, offset: usize) {
        self.ensure_capacity(offset);
        self.pos = offset;
    }

    /// Writes a zero u16 placeholder and returns its offset.
    pub fn reserve_u16(&mut self) -> usize {
        let pos = self.pos;
        self.write_u16(0);
        pos
    }

    /// Overwrites the u16 at `offset`, leaving the cursor where it was.
    pub fn write_u16_at(&mut self, offset: usize, value: u16) {
        let pos = self.pos;
        self.seek(offset);
        self.write_u16(value);
        self.pos = pos;
    }

    /// Logically empties the writer. Capacity and storage are kept.
    #[inline]
    pub fn reset(&mut self) {
        self.pos = 0;
        self.len = 0;
    }

    /// The bytes to transmit: everything up to the high-water mark.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current cursor offset.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Consumes the writer, keeping only the valid bytes.
    #[must_use]
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.truncate(self.len);
        self.buf
    }

    fn put(&mut self, bytes: &[u8]) {
        self.ensure_additional(bytes.len());
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.advance(bytes.len());
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        self.pos += n;
        self.len = self.len.max(self.pos);
    }
}

impl Default for PacketWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for PacketWriter {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
