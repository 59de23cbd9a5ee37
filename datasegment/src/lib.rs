//! Aggregated data-segment inclusion proofs for piece-committed content.
//!
//! An aggregator bundles many client pieces into one deal and commits to
//! them with a single Merkle root. Each client holds an
//! [`InclusionProof`]: a subtree proof placing its piece commitment inside
//! the aggregator's tree, and an index proof placing the matching 64-byte
//! [`SegmentDescriptor`] entry among the deal's data-segment index leaves.
//! [`InclusionProof::compute_expected_aux_data`] replays both proofs and
//! returns the aggregator commitment and size they jointly attest, for the
//! caller to cross-check against chain state.
//!
//! Trees and proofs come from the companion `datasegment-merkle-tree`
//! crate; this crate owns the Fr32 conventions, the CID codec for piece
//! commitments, the index-entry format, and the verifier itself.

mod commitment;
mod error;
mod fr32;
mod index;
mod inclusion;


pub use commitment::{
    cid_to_piece_commitment, piece_commitment_to_cid, FIL_COMMITMENT_UNSEALED,
    SHA2_256_TRUNC254_PADDED,
};
pub use error::DataSegmentError;
pub use fr32::{is_fr32_aligned, is_padded_piece_size, Fr32, BYTES_IN_FR32};
pub use index::{SegmentDescriptor, BYTES_IN_CHECKSUM, BYTES_IN_INDEX_ENTRY};
pub use inclusion::{InclusionAuxData, InclusionProof, InclusionVerifierData};
