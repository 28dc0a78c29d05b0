//! The whole-replay stream and its decrypt-and-view step.

use std::fmt;

use crate::chunk::ReplayHeader;
use crate::error::ReadError;
use crate::reader::BitReader;

/// Decrypts the bytes of one chunk of an encrypted replay.
///
/// The block cipher and its key management live outside this crate; callers
/// plug them in through this trait.
pub trait BufferCipher {
    /// Decrypt `data`, returning the plaintext chunk bytes.
    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, ReadError>;
}

/// Reader over a complete in-memory replay.
///
/// Chunks are accessed by seeking to their start position and calling
/// [`decrypt_buffer`](Self::decrypt_buffer), which yields a standalone
/// [`BitReader`] over the chunk's plaintext.
pub struct ReplayStream {
    reader: BitReader,
    is_encrypted: bool,
    cipher: Option<Box<dyn BufferCipher>>,
}

impl ReplayStream {
    /// Wrap an unencrypted replay buffer.
    pub fn new(data: Vec<u8>, header: ReplayHeader) -> Self {
        Self {
            reader: BitReader::new(data, header),
            is_encrypted: false,
            cipher: None,
        }
    }

    /// Wrap an encrypted replay buffer.
    ///
    /// Without a cipher every [`decrypt_buffer`](Self::decrypt_buffer) call
    /// fails with [`ReadError::MissingCipher`].
    pub fn encrypted(
        data: Vec<u8>,
        header: ReplayHeader,
        cipher: Option<Box<dyn BufferCipher>>,
    ) -> Self {
        Self {
            reader: BitReader::new(data, header),
            is_encrypted: true,
            cipher,
        }
    }

    /// Version fields of the replay.
    pub fn header(&self) -> &ReplayHeader {
        self.reader.header()
    }

    /// Whether chunk bytes must pass through the cipher.
    pub fn is_encrypted(&self) -> bool {
        self.is_encrypted
    }

    /// Current cursor position in bits.
    pub fn offset(&self) -> usize {
        self.reader.offset()
    }

    /// Move the cursor to byte `pos`.
    pub fn go_to(&mut self, pos: usize) -> Result<(), ReadError> {
        self.reader.go_to(pos)
    }

    /// Move the cursor to bit `bit`.
    pub fn go_to_bit(&mut self, bit: usize) -> Result<(), ReadError> {
        self.reader.go_to_bit(bit)
    }

    /// Consume `length` bytes at the cursor and return a reader over their
    /// plaintext.
    pub fn decrypt_buffer(&mut self, length: usize) -> Result<BitReader, ReadError> {
        let bytes = self.reader.read_bytes(length)?;
        let plain = if self.is_encrypted {
            let cipher = self.cipher.as_ref().ok_or(ReadError::MissingCipher)?;
            cipher.decrypt(&bytes)?
        } else {
            bytes
        };
        Ok(BitReader::new(plain, *self.reader.header()))
    }
}

impl fmt::Debug for ReplayStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayStream")
            .field("header", self.reader.header())
            .field("offset", &self.reader.offset())
            .field("len_bits", &self.reader.len_bits())
            .field("is_encrypted", &self.is_encrypted)
            .field("has_cipher", &self.cipher.is_some())
            .finish()
    }
}
