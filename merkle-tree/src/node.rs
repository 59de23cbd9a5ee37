//! Tree nodes and the 254-bit truncated SHA-256 digest primitive.
//!
//! Every node is a SHA-256 digest with the two most significant bits of the
//! final byte cleared, leaving 254 effective bits. The all-zero node is
//! reserved as the "absent sibling" sentinel in proof paths; a legitimately
//! produced digest collides with it only with negligible probability, and
//! callers feeding externally sourced nodes into a tree must uphold that
//! precondition.

use std::fmt;

use bincode::{Decode, Encode};
use sha2::{Digest, Sha256};

/// Size of a node digest in bytes.
pub const NODE_SIZE: usize = 32;

/// Clears the two most significant bits of the final digest byte.
const TRUNCATION_MASK: u8 = 0b0011_1111;

/// A 32-byte tree node holding a 254-bit truncated SHA-256 digest.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Encode, Decode)]
pub struct Node([u8; NODE_SIZE]);

impl Node {
    /// The all-zero node, used as the absent-sibling sentinel in proofs.
    pub const ZERO: Node = Node([0u8; NODE_SIZE]);

    /// Wrap raw digest bytes as a node.
    pub const fn from_bytes(bytes: [u8; NODE_SIZE]) -> Self {
        Node(bytes)
    }

    /// The raw digest bytes.
    pub const fn as_bytes(&self) -> &[u8; NODE_SIZE] {
        &self.0
    }

    /// Whether this node is the absent-sibling sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; NODE_SIZE]
    }
}

impl From<[u8; NODE_SIZE]> for Node {
    fn from(bytes: [u8; NODE_SIZE]) -> Self {
        Node(bytes)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Node({})", hex::encode(self.0))
    }
}

/// Compute the 254-bit truncated SHA-256 digest of `data`.
pub fn truncated_hash(data: &[u8]) -> Node {
    let mut digest: [u8; NODE_SIZE] = Sha256::digest(data).into();
    digest[NODE_SIZE - 1] &= TRUNCATION_MASK;
    Node(digest)
}

/// Hash two sibling nodes into their parent: `truncated_hash(left || right)`.
pub fn combine(left: &Node, right: &Node) -> Node {
    let mut input = [0u8; 2 * NODE_SIZE];
    input[..NODE_SIZE].copy_from_slice(left.as_bytes());
    input[NODE_SIZE..].copy_from_slice(right.as_bytes());
    truncated_hash(&input)
}
