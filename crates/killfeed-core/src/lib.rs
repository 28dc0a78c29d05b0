//! Core types and the byte/bit reader for killfeed.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! player identifiers, positions, weapon resolution, chunk descriptors,
//! the raw and canonical elimination records, and the checkpointable
//! reader the chunk decoders run on.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod chunk;
pub mod elimination;
pub mod error;
pub mod geometry;
pub mod id;
pub mod reader;
pub mod stream;
pub mod weapon;

pub use chunk::{ChunkDescriptor, ReplayHeader};
pub use elimination::{valid_distance, CanonicalElimination, RawElimination};
pub use error::ReadError;
pub use geometry::{Vector3, CM_TO_METERS, MAX_REASONABLE_COORDINATE};
pub use id::{NetId, PlayerRef};
pub use reader::{BitReader, Checkpoint};
pub use stream::{BufferCipher, ReplayStream};
pub use weapon::{Weapon, WeaponTable};
