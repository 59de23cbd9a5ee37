use datasegment_merkle_tree::MerkleTreeError;
use thiserror::Error;

/// Errors from index-entry construction and inclusion verification.
#[derive(Debug, Error)]
pub enum DataSegmentError {
    /// The CID does not encode a v1 piece commitment.
    #[error("invalid piece commitment: {0}")]
    InvalidPieceCommitment(String),
    /// The subtree inclusion proof could not be replayed.
    #[error("could not validate the subtree proof: {0}")]
    SubtreeProofInvalid(#[source] MerkleTreeError),
    /// The data-segment index entry proof could not be replayed.
    #[error("could not validate the index proof: {0}")]
    IndexProofInvalid(#[source] MerkleTreeError),
    /// The aggregator commitments derived from the two proofs disagree.
    #[error("aggregator commitments do not match: {subtree} != {index}")]
    CommitmentMismatch {
        /// Hex-encoded commitment derived from the subtree proof.
        subtree: String,
        /// Hex-encoded commitment derived from the index proof.
        index: String,
    },
    /// The aggregator sizes derived from the two proofs disagree.
    #[error("aggregator sizes do not match: {subtree} != {index}")]
    SizeMismatch {
        /// Size in bytes derived from the subtree proof.
        subtree: u64,
        /// Size in bytes derived from the index proof.
        index: u64,
    },
    /// A derived size exceeds the supported range.
    #[error("size overflow: (1 << {depth}) * {size} exceeds 2^63 bytes")]
    SizeOverflow {
        /// The proof depth driving the scaling.
        depth: usize,
        /// The per-unit size being scaled.
        size: u64,
    },
    /// An offset or size does not fall on Fr32 element boundaries.
    #[error("offset {offset} or size {size} is not a multiple of 32 bytes")]
    InvalidAlignment {
        /// The offending offset in bytes.
        offset: u64,
        /// The offending size in bytes.
        size: u64,
    },
    /// An entry or proof could not be decoded from bytes.
    #[error("failed to decode: {0}")]
    DecodeError(String),
}
