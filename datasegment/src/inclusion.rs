//! The inclusion verifier.
//!
//! Given only a client's piece commitment and padded size plus two Merkle
//! proofs (one placing the commitment as a subtree of the aggregator, one
//! placing the matching index entry as a leaf), the verifier derives the
//! aggregator's commitment and size twice, independently, and accepts only
//! when both derivations agree. The result still has to be cross-checked
//! against chain state by the caller; nothing here consults the chain.

use bincode::{Decode, Encode};
use cid::Cid;
use datasegment_merkle_tree::ProofData;

use crate::{
    commitment::{cid_to_piece_commitment, piece_commitment_to_cid},
    error::DataSegmentError,
    fr32::Fr32,
    index::{SegmentDescriptor, BYTES_IN_INDEX_ENTRY},
};

/// Upper bound on derived aggregator sizes: `2^63` bytes.
const MAX_PADDED_SIZE: u64 = 1 << 63;

/// Cap on bytes accepted by proof decoding.
const MAX_DECODE_BYTES: usize = 100 * 1024 * 1024;

/// Client-supplied inputs to inclusion verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionVerifierData {
    /// Piece commitment to the client's data.
    pub comm_pc: Cid,
    /// Padded size of the client's data in bytes (`2^k * 32`).
    pub size_pc: u64,
}

/// The verifier's output, to be cross-checked with chain state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionAuxData {
    /// Piece commitment to the aggregator's deal.
    pub comm_pa: Cid,
    /// Padded size of the aggregator's deal in bytes.
    pub size_pa: u64,
}

/// An aggregated inclusion proof, produced by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct InclusionProof {
    /// Proof that the client's piece commitment roots a subtree of the
    /// aggregator's tree.
    pub proof_subtree: ProofData,
    /// Proof that the client's data-segment index entry is a leaf of the
    /// aggregator's tree.
    pub proof_index: ProofData,
}

impl InclusionProof {
    /// Pair a subtree proof with an index-entry proof.
    pub fn new(proof_subtree: ProofData, proof_index: ProofData) -> Self {
        InclusionProof {
            proof_subtree,
            proof_index,
        }
    }

    /// Derive the aggregator commitment and size this proof commits to.
    ///
    /// The subtree proof is replayed on the client's commitment; the index
    /// proof is replayed on the entry rebuilt from the commitment and the
    /// offset implied by the subtree proof's position. Both replays must
    /// reach the same root, and the sizes implied by the two proof depths
    /// must agree.
    pub fn compute_expected_aux_data(
        &self,
        verifier_data: &InclusionVerifierData,
    ) -> Result<InclusionAuxData, DataSegmentError> {
        let comm_pc = cid_to_piece_commitment(&verifier_data.comm_pc)?;

        // First derivation: the client's commitment through the subtree
        // proof.
        let assumed_comm_pa = self
            .proof_subtree
            .compute_root(&comm_pc)
            .map_err(DataSegmentError::SubtreeProofInvalid)?;

        let subtree_depth = self.proof_subtree.depth();
        let assumed_size_pa = scaled_size(subtree_depth, verifier_data.size_pc)?;
        // The replay above already bounds the index below 1 << depth, so
        // the offset cannot exceed the size computed from the same depth.
        let data_offset = self
            .proof_subtree
            .index()
            .checked_mul(verifier_data.size_pc)
            .ok_or(DataSegmentError::SizeOverflow {
                depth: subtree_depth,
                size: verifier_data.size_pc,
            })?;

        // Second derivation: the rebuilt index entry through the index
        // proof.
        let entry =
            SegmentDescriptor::new(Fr32::from(comm_pc), data_offset, verifier_data.size_pc)?;
        let assumed_comm_pa2 = self
            .proof_index
            .compute_root(&entry.leaf_node())
            .map_err(DataSegmentError::IndexProofInvalid)?;

        if assumed_comm_pa != assumed_comm_pa2 {
            return Err(DataSegmentError::CommitmentMismatch {
                subtree: hex::encode(assumed_comm_pa.as_bytes()),
                index: hex::encode(assumed_comm_pa2.as_bytes()),
            });
        }

        let assumed_size_pa2 = scaled_size(self.proof_index.depth(), BYTES_IN_INDEX_ENTRY as u64)?;
        if assumed_size_pa != assumed_size_pa2 {
            return Err(DataSegmentError::SizeMismatch {
                subtree: assumed_size_pa,
                index: assumed_size_pa2,
            });
        }

        Ok(InclusionAuxData {
            comm_pa: piece_commitment_to_cid(&assumed_comm_pa)?,
            size_pa: assumed_size_pa,
        })
    }

    /// Serialize this proof to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, DataSegmentError> {
        bincode::encode_to_vec(self, bincode_config())
            .map_err(|e| DataSegmentError::DecodeError(format!("encode error: {}", e)))
    }

    /// Deserialize a proof from bytes.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, DataSegmentError> {
        let (proof, _) = bincode::decode_from_slice(bytes, bincode_config())
            .map_err(|e| DataSegmentError::DecodeError(format!("decode error: {}", e)))?;
        Ok(proof)
    }
}

fn bincode_config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_big_endian()
        .with_limit::<MAX_DECODE_BYTES>()
}

/// `(1 << depth) * size`, failing on anything past `2^63` bytes.
fn scaled_size(depth: usize, size: u64) -> Result<u64, DataSegmentError> {
    if depth >= u64::BITS as usize {
        return Err(DataSegmentError::SizeOverflow { depth, size });
    }
    (1u64 << depth)
        .checked_mul(size)
        .filter(|total| *total <= MAX_PADDED_SIZE)
        .ok_or(DataSegmentError::SizeOverflow { depth, size })
}
