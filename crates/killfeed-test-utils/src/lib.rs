//! Chunk encoders and payload fixtures for killfeed development.
//!
//! [`ChunkBuilder`] writes the little-endian wire primitives the decoders
//! read, [`EliminationChunk`] encodes a whole `playerElim` body for a given
//! replay header, and [`ReplayBuilder`] lays chunks out in one buffer and
//! hands back their descriptors. [`XorCipher`] is a trivial
//! [`BufferCipher`] for exercising encrypted streams.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::PayloadBuilder;

use killfeed_core::{BufferCipher, ChunkDescriptor, ReadError, ReplayHeader};

/// Byte-level encoder for chunk bodies.
#[derive(Clone, Debug, Default)]
pub struct ChunkBuilder {
    buf: Vec<u8>,
}

impl ChunkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(mut self, data: &[u8]) -> Self {
        self.buf.extend_from_slice(data);
        self
    }

    /// Append `n` copies of `byte`.
    pub fn fill(mut self, n: usize, byte: u8) -> Self {
        self.buf.resize(self.buf.len() + n, byte);
        self
    }

    pub fn zeros(self, n: usize) -> Self {
        self.fill(n, 0)
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.buf.push(v);
        self
    }

    pub fn bool(self, v: bool) -> Self {
        self.u8(u8::from(v))
    }

    pub fn u32(self, v: u32) -> Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn i32(self, v: i32) -> Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn f32(self, v: f32) -> Self {
        self.bytes(&v.to_le_bytes())
    }

    /// Single-byte string with a NUL terminator counted in the prefix.
    ///
    /// The empty string is written as a bare zero prefix.
    pub fn string(self, s: &str) -> Self {
        if s.is_empty() {
            return self.i32(0);
        }
        let mut body: Vec<u8> = s.chars().map(|c| c as u8).collect();
        body.push(0);
        self.i32(body.len() as i32).bytes(&body)
    }

    /// UTF-16LE string with a NUL terminator; the prefix is negative.
    pub fn wide_string(self, s: &str) -> Self {
        let mut units: Vec<u16> = s.encode_utf16().collect();
        units.push(0);
        let body: Vec<u8> = units.iter().flat_map(|u| u.to_le_bytes()).collect();
        self.i32(-(units.len() as i32)).bytes(&body)
    }

    pub fn id(self, id: [u8; 16]) -> Self {
        self.bytes(&id)
    }

    pub fn vector(self, v: [f32; 3]) -> Self {
        self.f32(v[0]).f32(v[1]).f32(v[2])
    }

    /// Encode a player reference as it appears in an elimination chunk.
    pub fn player(self, player: &Player) -> Self {
        match player {
            Player::Bot => self.u8(3),
            Player::Name(name) => self.u8(16).string(name),
            Player::Id(id) => self.u8(17).u8(0).id(*id),
            Player::Tag(tag) => self.u8(*tag),
            Player::Plain(name) => self.string(name),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// A player reference as written on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Player {
    /// Tag 3.
    #[default]
    Bot,
    /// Tag 16 plus a string.
    Name(String),
    /// Tag 17, one filler byte, 16-byte id.
    Id([u8; 16]),
    /// A bare tag byte with no payload.
    Tag(u8),
    /// Untagged string, as in legacy layouts.
    Plain(String),
}

/// Preamble length for `header`, mirroring the decoder's layout table.
pub fn elimination_preamble(header: &ReplayHeader) -> usize {
    if header.uses_tagged_players() {
        if header.engine_network_version >= 23 {
            165
        } else {
            85
        }
    } else if header.major <= 4 && header.minor < 2 {
        12
    } else if header.major == 4 && header.minor <= 2 {
        40
    } else {
        45
    }
}

/// A complete `playerElim` chunk body.
///
/// Players are written exactly as given; pair [`Player::Plain`] with legacy
/// headers and the tagged variants with modern ones.
#[derive(Clone, Debug, Default)]
pub struct EliminationChunk {
    pub header: ReplayHeader,
    pub eliminated: Player,
    pub eliminator: Player,
    pub gun_type: u8,
    pub knocked: bool,
    pub eliminated_location: Option<[f32; 3]>,
    pub eliminator_location: Option<[f32; 3]>,
    pub distance: Option<f32>,
    /// Raw bytes appended after every other field.
    pub trailing: Vec<u8>,
}

impl EliminationChunk {
    pub fn encode(&self) -> Vec<u8> {
        let mut b = ChunkBuilder::new()
            .zeros(elimination_preamble(&self.header))
            .player(&self.eliminated)
            .player(&self.eliminator)
            .u8(self.gun_type)
            .bool(self.knocked);
        if let Some(v) = self.eliminated_location {
            b = b.vector(v);
        }
        if let Some(v) = self.eliminator_location {
            b = b.vector(v);
        }
        if let Some(d) = self.distance {
            b = b.f32(d);
        }
        b.bytes(&self.trailing).build()
    }
}

/// Lays chunk bodies out in one replay buffer.
#[derive(Clone, Debug, Default)]
pub struct ReplayBuilder {
    data: Vec<u8>,
    chunks: Vec<ChunkDescriptor>,
}

impl ReplayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `n` filler bytes that belong to no chunk.
    pub fn padding(mut self, n: usize) -> Self {
        self.data.resize(self.data.len() + n, 0xEE);
        self
    }

    /// Append a chunk body and record its descriptor.
    pub fn chunk(
        mut self,
        group: &str,
        metadata: &str,
        start_time: Option<u32>,
        body: Vec<u8>,
    ) -> Self {
        let mut desc = ChunkDescriptor::new(group, metadata, self.data.len(), body.len());
        if let Some(ms) = start_time {
            desc = desc.with_start_time(ms);
        }
        self.data.extend_from_slice(&body);
        self.chunks.push(desc);
        self
    }

    pub fn build(self) -> (Vec<u8>, Vec<ChunkDescriptor>) {
        (self.data, self.chunks)
    }
}

/// XORs every byte with a fixed key. Its own inverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XorCipher(pub u8);

impl XorCipher {
    pub fn apply(&self, data: &[u8]) -> Vec<u8> {
        data.iter().map(|b| b ^ self.0).collect()
    }
}

impl BufferCipher for XorCipher {
    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, ReadError> {
        Ok(self.apply(data))
    }
}
