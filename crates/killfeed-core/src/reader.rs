//! In-memory byte/bit reader over one decrypted buffer.
//!
//! The cursor is tracked in bits so that callers can reposition to exact bit
//! boundaries, but every primitive read is byte-granular and starts at the
//! byte containing the cursor. All multi-byte values are little-endian.

use crate::chunk::ReplayHeader;
use crate::error::ReadError;
use crate::id::NetId;

/// Saved cursor position, see [`BitReader::checkpoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    offset: usize,
}

/// Checkpointable reader over an owned buffer.
///
/// Failed reads leave the cursor untouched and raise a sticky error flag
/// ([`is_error`](Self::is_error)), cleared by [`restore`](Self::restore) or
/// [`clear_error`](Self::clear_error).
///
/// # Examples
///
/// ```
/// use killfeed_core::{BitReader, ReplayHeader};
///
/// let mut r = BitReader::new(vec![7, 1, 0, 0, 0], ReplayHeader::default());
/// assert_eq!(r.read_byte().unwrap(), 7);
/// assert_eq!(r.read_u32().unwrap(), 1);
/// assert!(r.read_byte().is_err());
/// assert!(r.is_error());
/// ```
#[derive(Clone, Debug)]
pub struct BitReader {
    data: Vec<u8>,
    offset: usize,
    is_error: bool,
    header: ReplayHeader,
}

impl BitReader {
    /// Wrap `data`, positioned at bit 0.
    pub fn new(data: Vec<u8>, header: ReplayHeader) -> Self {
        Self {
            data,
            offset: 0,
            is_error: false,
            header,
        }
    }

    /// Version fields of the replay this buffer belongs to.
    pub fn header(&self) -> &ReplayHeader {
        &self.header
    }

    /// Current cursor position in bits.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total buffer size in bits.
    pub fn len_bits(&self) -> usize {
        self.data.len() * 8
    }

    /// Bits left between the cursor and the end of the buffer.
    pub fn remaining_bits(&self) -> usize {
        self.len_bits().saturating_sub(self.offset)
    }

    /// Whether `bits` more bits are available.
    pub fn can_read(&self, bits: usize) -> bool {
        bits <= self.remaining_bits()
    }

    /// Whether a read has failed since the flag was last cleared.
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Clear the error flag.
    pub fn clear_error(&mut self) {
        self.is_error = false;
    }

    /// Save the current cursor position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            offset: self.offset,
        }
    }

    /// Return to a saved position and clear the error flag.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.offset = checkpoint.offset;
        self.is_error = false;
    }

    /// Attempt an optimistic read of at least `bits` bits.
    ///
    /// Returns `None` without touching the cursor when fewer than `bits`
    /// remain. Otherwise runs `read`; if it yields `None` the cursor returns
    /// to where it was and the error flag is cleared.
    pub fn speculate<T>(
        &mut self,
        bits: usize,
        read: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        if !self.can_read(bits) {
            return None;
        }
        let checkpoint = self.checkpoint();
        let value = read(self);
        if value.is_none() {
            self.restore(checkpoint);
        }
        value
    }

    /// Move the cursor to byte `pos`.
    pub fn go_to(&mut self, pos: usize) -> Result<(), ReadError> {
        match pos.checked_mul(8) {
            Some(bit) => self.go_to_bit(bit),
            None => {
                self.is_error = true;
                Err(ReadError::SeekOutOfBounds {
                    target_bits: usize::MAX,
                    limit_bits: self.len_bits(),
                })
            }
        }
    }

    /// Move the cursor to bit `bit`. The end of the buffer is a valid target.
    pub fn go_to_bit(&mut self, bit: usize) -> Result<(), ReadError> {
        if bit > self.len_bits() {
            self.is_error = true;
            return Err(ReadError::SeekOutOfBounds {
                target_bits: bit,
                limit_bits: self.len_bits(),
            });
        }
        self.offset = bit;
        Ok(())
    }

    /// Advance past `n` bytes.
    pub fn skip_bytes(&mut self, n: usize) -> Result<(), ReadError> {
        self.take(n).map(|_| ())
    }

    fn take(&mut self, n: usize) -> Result<&[u8], ReadError> {
        let start = self.offset >> 3;
        let end = start.checked_add(n).filter(|&end| end <= self.data.len());
        match end {
            Some(end) => {
                self.offset = end * 8;
                Ok(&self.data[start..end])
            }
            None => {
                self.is_error = true;
                Err(ReadError::Overrun {
                    offset_bits: self.offset,
                    requested_bits: n.saturating_mul(8),
                    available_bits: self.remaining_bits(),
                })
            }
        }
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, ReadError> {
        self.take(n).map(<[u8]>::to_vec)
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8, ReadError> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Read a one-byte boolean; any non-zero value is `true`.
    pub fn read_bool(&mut self) -> Result<bool, ReadError> {
        Ok(self.read_byte()? != 0)
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian i32.
    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian f32.
    pub fn read_f32(&mut self) -> Result<f32, ReadError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    /// Read a length-prefixed string.
    ///
    /// The i32 prefix counts characters: positive for single-byte (Latin-1)
    /// text, negative for UTF-16LE code units. One trailing NUL is dropped.
    /// On failure the cursor is left before the prefix.
    pub fn read_string(&mut self) -> Result<String, ReadError> {
        let checkpoint = self.checkpoint();
        let result = self.read_string_inner();
        if result.is_err() {
            self.offset = checkpoint.offset;
            self.is_error = true;
        }
        result
    }

    fn read_string_inner(&mut self) -> Result<String, ReadError> {
        let len = self.read_i32()?;
        let mut s = if len >= 0 {
            self.take(len as usize)?.iter().map(|&b| char::from(b)).collect()
        } else {
            let units = len.unsigned_abs() as usize;
            let bytes = self.take(units.saturating_mul(2))?;
            let wide: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|p| u16::from_le_bytes([p[0], p[1]]))
                .collect();
            String::from_utf16(&wide).map_err(|e| ReadError::InvalidString {
                detail: format!("invalid UTF-16: {e}"),
            })?
        };
        if s.ends_with('\0') {
            s.pop();
        }
        Ok(s)
    }

    /// Read a 16-byte network identifier.
    pub fn read_id(&mut self) -> Result<NetId, ReadError> {
        Ok(NetId(self.take_array()?))
    }
}
