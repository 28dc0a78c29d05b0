//! Replay header and chunk descriptors handed over by the chunk index.

use serde::{Deserialize, Serialize};

/// Version fields of the replay header that govern chunk layouts.
///
/// # Examples
///
/// ```
/// use killfeed_core::ReplayHeader;
///
/// let header = ReplayHeader::new(23, 19, 10);
/// assert!(header.uses_tagged_players());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayHeader {
    /// Engine network protocol version.
    pub engine_network_version: u32,
    /// Game major version.
    pub major: u32,
    /// Game minor version.
    pub minor: u32,
}

impl ReplayHeader {
    /// Construct from version fields.
    pub fn new(engine_network_version: u32, major: u32, minor: u32) -> Self {
        Self {
            engine_network_version,
            major,
            minor,
        }
    }

    /// Whether elimination chunks encode players as tagged references
    /// rather than bare strings.
    pub fn uses_tagged_players(&self) -> bool {
        self.engine_network_version >= 11 && self.major >= 9
    }
}

/// One independently positioned byte range of the replay.
///
/// Deserializes from the chunk index's `{group, metadata, startPos, length,
/// startTime}` shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkDescriptor {
    /// Semantic group label (e.g. `"playerElim"`).
    pub group: String,
    /// Metadata label (e.g. `"AthenaMatchStats"`).
    pub metadata: String,
    /// Byte offset of the chunk within the replay buffer.
    pub start_pos: usize,
    /// Chunk length in bytes.
    pub length: usize,
    /// Match time at which the chunk was recorded, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u32>,
}

impl ChunkDescriptor {
    /// Construct a descriptor without a start time.
    pub fn new(
        group: impl Into<String>,
        metadata: impl Into<String>,
        start_pos: usize,
        length: usize,
    ) -> Self {
        Self {
            group: group.into(),
            metadata: metadata.into(),
            start_pos,
            length,
            start_time: None,
        }
    }

    /// Attach a start time in milliseconds.
    pub fn with_start_time(mut self, millis: u32) -> Self {
        self.start_time = Some(millis);
        self
    }

    /// Start time converted to seconds.
    pub fn start_seconds(&self) -> Option<f64> {
        self.start_time.map(|ms| f64::from(ms) / 1000.0)
    }

    /// Bit position immediately after the chunk's declared length.
    ///
    /// Saturates at `usize::MAX` for descriptors outside any real buffer.
    pub fn end_bit(&self) -> usize {
        self.start_pos
            .saturating_add(self.length)
            .saturating_mul(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_players_need_both_versions() {
        assert!(ReplayHeader::new(11, 9, 0).uses_tagged_players());
        assert!(!ReplayHeader::new(10, 9, 0).uses_tagged_players());
        assert!(!ReplayHeader::new(23, 8, 0).uses_tagged_players());
    }

    #[test]
    fn start_time_converts_to_seconds() {
        let chunk = ChunkDescriptor::new("playerElim", "", 0, 10).with_start_time(61_250);
        assert_eq!(chunk.start_seconds(), Some(61.25));
        assert_eq!(ChunkDescriptor::new("g", "m", 0, 1).start_seconds(), None);
    }

    #[test]
    fn descriptor_loads_from_index_json() {
        let chunk: ChunkDescriptor = serde_json::from_str(
            r#"{"group":"playerElim","metadata":"","startPos":512,"length":48,"startTime":9000}"#,
        )
        .unwrap();
        assert_eq!(
            chunk,
            ChunkDescriptor::new("playerElim", "", 512, 48).with_start_time(9000)
        );
        let untimed: ChunkDescriptor =
            serde_json::from_str(r#"{"group":"g","metadata":"m","startPos":0,"length":1}"#)
                .unwrap();
        assert_eq!(untimed.start_time, None);
    }

    #[test]
    fn end_bit_covers_declared_length() {
        let chunk = ChunkDescriptor::new("g", "m", 4, 10);
        assert_eq!(chunk.end_bit(), 112);
        let huge = ChunkDescriptor::new("g", "m", usize::MAX / 8 + 1, 10);
        assert_eq!(huge.end_bit(), usize::MAX);
    }
}
