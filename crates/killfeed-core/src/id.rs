//! Player identifiers: [`NetId`] and the [`PlayerRef`] variant.

use std::fmt;

use serde::{Serialize, Serializer};

/// Opaque 16-byte network identifier of a player.
///
/// Rendered as 32 lowercase hex digits, which is also how the property
/// replication path reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(pub [u8; 16]);

impl NetId {
    /// Byte length of an identifier on the wire.
    pub const LEN: usize = 16;

    /// Parse 32 hex digits (either case) into an identifier.
    ///
    /// Returns `None` for any other length or a non-hex digit.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.as_bytes();
        if s.len() != Self::LEN * 2 {
            return None;
        }
        let mut out = [0u8; Self::LEN];
        for (i, pair) in s.chunks_exact(2).enumerate() {
            let hi = hex_digit(pair[0])?;
            let lo = hex_digit(pair[1])?;
            out[i] = (hi << 4) | lo;
        }
        Some(Self(out))
    }
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 16]> for NetId {
    fn from(v: [u8; 16]) -> Self {
        Self(v)
    }
}

/// A participant in an elimination.
///
/// Wire tags: `3` is a bot, `16` a display name, `17` a network id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlayerRef {
    /// An AI-controlled player.
    Bot,
    /// A player known only by display name.
    Name(String),
    /// A player known by network identifier.
    Id(NetId),
}

impl PlayerRef {
    /// Text used for bots, both on output and when parsing property values.
    pub const BOT: &'static str = "bot";

    /// Classify free-form text coming from the property replication path.
    ///
    /// 32 hex digits become [`PlayerRef::Id`], `"bot"` becomes
    /// [`PlayerRef::Bot`], anything else is a name.
    pub fn parse(s: &str) -> Self {
        if s == Self::BOT {
            return Self::Bot;
        }
        match NetId::from_hex(s) {
            Some(id) => Self::Id(id),
            None => Self::Name(s.to_string()),
        }
    }
}

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bot => f.write_str(Self::BOT),
            Self::Name(name) => f.write_str(name),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for PlayerRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
