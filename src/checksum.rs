//! Per-frame checksums for `StoredFrame` (spec.md §3, §9).
//!
//! The weak mix is the contract's minimum bar: equal frames produce equal
//! checksums, different frames produce different checksums with high
//! probability, and it costs nothing extra to compute. The canonical
//! checksum is the stronger alternative spec.md §9 explicitly permits
//! ("folding component bytes via a fixed, byte-order-canonical walk"),
//! built from the teacher's own `bincode` dependency (`engine.rs` already
//! encodes arena snapshots with `bincode::serde::encode_to_vec`) folded
//! through a `crc32fast::Hasher`, the integrity-digest crate
//! `rodd-oss-rodengine` depends on.

use bincode::config::standard;
use bincode::serde::encode_to_vec;
use serde::Serialize;

use crate::frame::Frame;

/// Weak mix of frame_number, entity_count and time (spec.md §3). Always
/// available; does not require components to be serializable.
pub fn weak_checksum(frame_number: u64, entity_count: u32, time: f64) -> u64 {
    frame_number ^ ((entity_count as u64) << 32) ^ (time * 1_000_000.0) as u64
}

/// Stronger checksum: the weak mix combined with a CRC32 fold over a
/// canonical `bincode` encoding of the world. Requires `W` (and the host's
/// `Input` type `I`) to implement `Serialize`; callers whose component types
/// are not serializable should use [`weak_checksum`] alone.
pub fn canonical_checksum<W, I>(
    frame: &Frame<W, I>,
    entity_count: u32,
) -> Result<u64, bincode::error::EncodeError>
where
    W: Serialize,
    I: Serialize,
{
    let weak = weak_checksum(frame.frame_number, entity_count, frame.time);
    let bytes = encode_to_vec(&frame.world, standard())?;
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&bytes);
    let crc = hasher.finalize() as u64;
    Ok(weak ^ (crc << 32) ^ crc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_inputs_produce_equal_weak_checksums() {
        assert_eq!(weak_checksum(5, 3, 1.5), weak_checksum(5, 3, 1.5));
    }

    #[test]
    fn different_frame_numbers_differ() {
        assert_ne!(weak_checksum(5, 3, 1.5), weak_checksum(6, 3, 1.5));
    }
}
