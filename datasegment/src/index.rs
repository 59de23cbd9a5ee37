//! Data-segment index entries.
//!
//! An entry is a fixed 64-byte record committing to one client's placement
//! inside an aggregator: the client's piece commitment followed by a packed
//! `(offset, size, checksum)` field. Both 32-byte halves are Fr32-valid, so
//! an entry spans exactly two tree leaves, and its leaf node (the truncated
//! hash of the serialization) equals the parent those two leaves fold into
//! inside the aggregator's tree.

use datasegment_merkle_tree::{truncated_hash, Node, NODE_SIZE};
use sha2::{Digest, Sha256};

use crate::{
    error::DataSegmentError,
    fr32::{is_fr32_aligned, Fr32},
};

/// Serialized size of an index entry: two nodes.
pub const BYTES_IN_INDEX_ENTRY: usize = 2 * NODE_SIZE;

/// Size of the entry checksum.
pub const BYTES_IN_CHECKSUM: usize = 16;

/// Byte range of the checksum within a serialized entry.
const CHECKSUM_RANGE: std::ops::Range<usize> =
    (BYTES_IN_INDEX_ENTRY - BYTES_IN_CHECKSUM)..BYTES_IN_INDEX_ENTRY;

/// A data-segment index entry: one client's `(commitment, offset, size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentDescriptor {
    comm_ds: Fr32,
    offset: u64,
    size: u64,
    checksum: [u8; BYTES_IN_CHECKSUM],
}

impl SegmentDescriptor {
    /// Build the entry for a client piece at `offset` covering `size` bytes.
    ///
    /// Offset and size must fall on Fr32 element boundaries. The checksum
    /// is computed here; entries are immutable afterwards.
    pub fn new(comm_ds: Fr32, offset: u64, size: u64) -> Result<Self, DataSegmentError> {
        if !is_fr32_aligned(offset) || !is_fr32_aligned(size) {
            return Err(DataSegmentError::InvalidAlignment { offset, size });
        }
        let mut entry = SegmentDescriptor {
            comm_ds,
            offset,
            size,
            checksum: [0u8; BYTES_IN_CHECKSUM],
        };
        entry.checksum = entry.compute_checksum();
        Ok(entry)
    }

    /// The client's piece commitment.
    pub fn comm_ds(&self) -> Fr32 {
        self.comm_ds
    }

    /// Offset of the client's data within the aggregator, in bytes.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Padded size of the client's data, in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The stored checksum.
    pub fn checksum(&self) -> &[u8; BYTES_IN_CHECKSUM] {
        &self.checksum
    }

    /// Serialize to the fixed 64-byte wire layout:
    /// `commitment(32) ‖ offset u64 LE(8) ‖ size u64 LE(8) ‖ checksum(16)`.
    pub fn serialize(&self) -> [u8; BYTES_IN_INDEX_ENTRY] {
        let mut buf = [0u8; BYTES_IN_INDEX_ENTRY];
        buf[..NODE_SIZE].copy_from_slice(self.comm_ds.as_bytes());
        buf[NODE_SIZE..NODE_SIZE + 8].copy_from_slice(&self.offset.to_le_bytes());
        buf[NODE_SIZE + 8..NODE_SIZE + 16].copy_from_slice(&self.size.to_le_bytes());
        buf[CHECKSUM_RANGE].copy_from_slice(&self.checksum);
        buf
    }

    /// Parse an entry from its 64-byte wire layout, checking alignment and
    /// the checksum.
    pub fn deserialize(bytes: &[u8; BYTES_IN_INDEX_ENTRY]) -> Result<Self, DataSegmentError> {
        let mut comm = [0u8; NODE_SIZE];
        comm.copy_from_slice(&bytes[..NODE_SIZE]);
        let comm = Fr32::from_bytes(comm);
        let offset = u64::from_le_bytes(
            bytes[NODE_SIZE..NODE_SIZE + 8]
                .try_into()
                .expect("slice is 8 bytes"),
        );
        let size = u64::from_le_bytes(
            bytes[NODE_SIZE + 8..NODE_SIZE + 16]
                .try_into()
                .expect("slice is 8 bytes"),
        );

        let expected = Self::new(comm, offset, size)?;
        if bytes[CHECKSUM_RANGE] != expected.checksum {
            return Err(DataSegmentError::DecodeError(
                "index entry checksum mismatch".to_string(),
            ));
        }
        Ok(expected)
    }

    /// The entry's leaf node: the truncated hash of its serialization.
    pub fn leaf_node(&self) -> Node {
        truncated_hash(&self.serialize())
    }

    /// Recompute the checksum and compare it with the stored one.
    pub fn verify_checksum(&self) -> bool {
        self.checksum == self.compute_checksum()
    }

    /// Truncated SHA-256 over the serialization with the checksum field
    /// zeroed; the final byte is masked so the packed half of the entry
    /// stays Fr32-valid.
    fn compute_checksum(&self) -> [u8; BYTES_IN_CHECKSUM] {
        let mut to_hash = self.serialize();
        to_hash[CHECKSUM_RANGE].fill(0);

        let digest = Sha256::digest(to_hash);
        let mut checksum = [0u8; BYTES_IN_CHECKSUM];
        checksum.copy_from_slice(&digest[..BYTES_IN_CHECKSUM]);
        checksum[BYTES_IN_CHECKSUM - 1] &= 0b0011_1111;
        checksum
    }
}

#[cfg(test)]
mod tests {
    use datasegment_merkle_tree::combine;

    use super::*;
    use crate::fr32::Fr32;

    fn sample_entry() -> SegmentDescriptor {
        SegmentDescriptor::new(Fr32::from(truncated_hash(b"client piece")), 256, 128)
            .expect("build entry")
    }

    #[test]
    fn test_wire_layout() {
        let entry = sample_entry();
        let bytes = entry.serialize();

        assert_eq!(&bytes[..32], &entry.comm_ds().as_bytes()[..]);
        assert_eq!(bytes[32..40], 256u64.to_le_bytes());
        assert_eq!(bytes[40..48], 128u64.to_le_bytes());
        assert_eq!(&bytes[48..], &entry.checksum()[..]);
    }

    #[test]
    fn test_rejects_unaligned_offset_and_size() {
        let comm = Fr32::from(truncated_hash(b"client piece"));
        assert!(matches!(
            SegmentDescriptor::new(comm, 100, 128).expect_err("unaligned offset"),
            DataSegmentError::InvalidAlignment {
                offset: 100,
                size: 128
            }
        ));
        assert!(matches!(
            SegmentDescriptor::new(comm, 128, 100).expect_err("unaligned size"),
            DataSegmentError::InvalidAlignment { .. }
        ));
    }

    #[test]
    fn test_packed_half_is_fr32_valid() {
        let entry = sample_entry();
        let bytes = entry.serialize();
        let mut packed = [0u8; 32];
        packed.copy_from_slice(&bytes[32..]);
        assert!(Fr32::from_bytes(packed).is_valid());
    }

    #[test]
    fn test_checksum_is_deterministic_and_binding() {
        let entry = sample_entry();
        assert!(entry.verify_checksum());
        assert_eq!(entry, sample_entry());

        // Any field change moves the checksum.
        let other_offset =
            SegmentDescriptor::new(entry.comm_ds(), 288, 128).expect("build entry");
        assert_ne!(entry.checksum(), other_offset.checksum());
        let other_comm =
            SegmentDescriptor::new(Fr32::from(truncated_hash(b"other piece")), 256, 128)
                .expect("build entry");
        assert_ne!(entry.checksum(), other_comm.checksum());
    }

    #[test]
    fn test_deserialize_roundtrip() {
        let entry = sample_entry();
        let decoded = SegmentDescriptor::deserialize(&entry.serialize()).expect("decode entry");
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_deserialize_rejects_tampered_checksum() {
        let mut bytes = sample_entry().serialize();
        bytes[50] ^= 0x01;
        assert!(matches!(
            SegmentDescriptor::deserialize(&bytes).expect_err("tampered checksum"),
            DataSegmentError::DecodeError(_)
        ));
    }

    #[test]
    fn test_deserialize_rejects_tampered_offset() {
        let mut bytes = sample_entry().serialize();
        // Still 32-byte aligned, so only the checksum catches it.
        bytes[32] ^= 0x20;
        assert!(SegmentDescriptor::deserialize(&bytes).is_err());
    }

    #[test]
    fn test_leaf_node_equals_combined_halves() {
        // An entry's two 32-byte halves are exactly two Fr32 tree leaves;
        // hashing the whole record must equal combining the halves as raw
        // leaf nodes.
        let entry = sample_entry();
        let bytes = entry.serialize();

        let mut left = [0u8; 32];
        left.copy_from_slice(&bytes[..32]);
        let mut right = [0u8; 32];
        right.copy_from_slice(&bytes[32..]);

        assert_eq!(
            entry.leaf_node(),
            combine(&Node::from_bytes(left), &Node::from_bytes(right))
        );
    }
}
