use thiserror::Error;

/// Errors from tree construction, proof extraction, and proof replay.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleTreeError {
    /// Tree construction was given zero leaves.
    #[error("cannot grow a tree from empty input")]
    EmptyInput,
    /// Proof extraction was asked for a level outside `1..depth`.
    #[error("level {level} is out of range for a tree of depth {depth}")]
    LevelOutOfRange {
        /// The requested level.
        level: usize,
        /// The depth of the tree the proof was requested from.
        depth: usize,
    },
    /// Proof extraction was asked for an index beyond the level width.
    #[error("index {index} does not exist on level {level} (width {width})")]
    IndexOutOfRange {
        /// The requested index.
        index: u64,
        /// The level the index was requested on.
        level: usize,
        /// The actual width of that level.
        width: usize,
    },
    /// Proof replay was given an index that cannot exist on a level reached
    /// by a path of the stored length.
    #[error("index {index} does not fit a proof path of length {path_len}")]
    IndexTooLargeForPath {
        /// The stored target index.
        index: u64,
        /// The stored path length.
        path_len: usize,
    },
    /// A proof could not be decoded from bytes.
    #[error("failed to decode proof: {0}")]
    DecodeError(String),
}
