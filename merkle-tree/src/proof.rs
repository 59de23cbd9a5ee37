//! Merkle proofs: single-node paths, batched range proofs, and replay.
//!
//! A proof path holds one sibling per level: entry `l - 1` is the sibling
//! recorded on level `l`, so the front of the vector sits just below the
//! root and the back sits on the target's own level. Replay walks the path
//! back to front. The all-zero node marks a sibling that does not exist in
//! the tree (an odd-width row); replay then rehashes the lone child into
//! its parent instead of combining a pair.

use bincode::{Decode, Encode};

use crate::{
    error::MerkleTreeError,
    helper::sibling_index,
    node::{combine, truncated_hash, Node},
};

/// Cap on bytes accepted by proof decoding, so a crafted length header
/// cannot force a huge allocation.
const MAX_DECODE_BYTES: usize = 100 * 1024 * 1024;

fn bincode_config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_big_endian()
        .with_limit::<MAX_DECODE_BYTES>()
}

/// A Merkle proof of a single node (a leaf or a whole subtree root).
///
/// The target's level is implied by the path length; storing it separately
/// would only introduce an inconsistency to validate away.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ProofData {
    path: Vec<Node>,
    idx: u64,
}

impl ProofData {
    /// Assemble a proof from a sibling path and the target's index within
    /// its level.
    pub fn new(path: Vec<Node>, idx: u64) -> Self {
        ProofData { path, idx }
    }

    /// The sibling path; entry `l - 1` is the sibling on level `l`.
    pub fn path(&self) -> &[Node] {
        &self.path
    }

    /// The target's level, equal to the path length.
    pub fn level(&self) -> usize {
        self.path.len()
    }

    /// Number of levels the proof spans; an alias of [`level`](Self::level)
    /// kept for callers thinking in subtree depths.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The target's index within its level.
    pub fn index(&self) -> u64 {
        self.idx
    }

    /// Replay the proof on `subtree` and return the root it commits to.
    ///
    /// The parity of the index at each step decides which side the sibling
    /// joins on, so the proof attests the target's position as well as its
    /// value. Fails when the stored index cannot exist on a level reached
    /// by a path of this length.
    pub fn compute_root(&self, subtree: &Node) -> Result<Node, MerkleTreeError> {
        if self.path.len() >= u64::BITS as usize || self.idx >= 1u64 << self.path.len() {
            return Err(MerkleTreeError::IndexTooLargeForPath {
                index: self.idx,
                path_len: self.path.len(),
            });
        }

        let mut current = *subtree;
        let mut current_idx = self.idx;
        for sibling in self.path.iter().rev() {
            current = if sibling.is_zero() {
                // Absent sibling: the lone child is rehashed into its parent.
                truncated_hash(current.as_bytes())
            } else if sibling_index(current_idx) % 2 == 1 {
                combine(&current, sibling)
            } else {
                combine(sibling, &current)
            };
            current_idx >>= 1;
        }
        Ok(current)
    }

    /// Replay the proof on `subtree` and compare the result against `root`.
    ///
    /// Total: any replay inconsistency yields `false`, never an error.
    pub fn validate_subtree(&self, subtree: &Node, root: &Node) -> bool {
        self.compute_root(subtree)
            .is_ok_and(|computed| computed == *root)
    }

    /// Hash `leaf_data` into a leaf node and validate it against `root`.
    pub fn validate_leaf(&self, leaf_data: &[u8], root: &Node) -> bool {
        self.validate_subtree(&truncated_hash(leaf_data), root)
    }

    /// Serialize this proof to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, MerkleTreeError> {
        bincode::encode_to_vec(self, bincode_config())
            .map_err(|e| MerkleTreeError::DecodeError(format!("encode error: {}", e)))
    }

    /// Deserialize a proof from bytes.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, MerkleTreeError> {
        let (proof, _) = bincode::decode_from_slice(bytes, bincode_config())
            .map_err(|e| MerkleTreeError::DecodeError(format!("decode error: {}", e)))?;
        Ok(proof)
    }
}

/// A batched proof of two nodes in the same tree.
///
/// The two single-proof paths are stored as the sibling run they share from
/// the root's children downward plus the two divergent remainders; the
/// original paths are recovered as `common ‖ left` and `common ‖ right`.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct BatchedProofData {
    common_path: Vec<Node>,
    left_path: Vec<Node>,
    right_path: Vec<Node>,
    left_idx: u64,
    right_idx: u64,
}

impl BatchedProofData {
    /// Split two single proofs into their shared prefix and divergent
    /// suffixes.
    ///
    /// The prefix is the run of byte-equal siblings starting at the front
    /// of both paths (the root's children); zero sentinels compare like any
    /// other entry.
    pub fn from_single_proofs(left: ProofData, right: ProofData) -> Self {
        let shared = left
            .path()
            .iter()
            .zip(right.path().iter())
            .take_while(|(l, r)| l == r)
            .count();
        BatchedProofData {
            common_path: left.path()[..shared].to_vec(),
            left_path: left.path()[shared..].to_vec(),
            right_path: right.path()[shared..].to_vec(),
            left_idx: left.index(),
            right_idx: right.index(),
        }
    }

    /// The sibling run shared by both paths, root's children first.
    pub fn common_path(&self) -> &[Node] {
        &self.common_path
    }

    /// The left proof's divergent remainder.
    pub fn left_path(&self) -> &[Node] {
        &self.left_path
    }

    /// The right proof's divergent remainder.
    pub fn right_path(&self) -> &[Node] {
        &self.right_path
    }

    /// The left target's index within its level.
    pub fn left_index(&self) -> u64 {
        self.left_idx
    }

    /// The right target's index within its level.
    pub fn right_index(&self) -> u64 {
        self.right_idx
    }

    /// Reassemble the left endpoint's single proof (`common ‖ left`).
    pub fn left_proof(&self) -> ProofData {
        let mut path = self.common_path.clone();
        path.extend_from_slice(&self.left_path);
        ProofData::new(path, self.left_idx)
    }

    /// Reassemble the right endpoint's single proof (`common ‖ right`).
    pub fn right_proof(&self) -> ProofData {
        let mut path = self.common_path.clone();
        path.extend_from_slice(&self.right_path);
        ProofData::new(path, self.right_idx)
    }

    /// Validate both endpoints of the batch against one root.
    pub fn validate_sequence(
        &self,
        left_subtree: &Node,
        right_subtree: &Node,
        root: &Node,
    ) -> bool {
        self.left_proof().validate_subtree(left_subtree, root)
            && self.right_proof().validate_subtree(right_subtree, root)
    }

    /// Serialize this proof to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, MerkleTreeError> {
        bincode::encode_to_vec(self, bincode_config())
            .map_err(|e| MerkleTreeError::DecodeError(format!("encode error: {}", e)))
    }

    /// Deserialize a batched proof from bytes.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, MerkleTreeError> {
        let (proof, _) = bincode::decode_from_slice(bytes, bincode_config())
            .map_err(|e| MerkleTreeError::DecodeError(format!("decode error: {}", e)))?;
        Ok(proof)
    }
}
