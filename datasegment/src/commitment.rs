//! CID encoding of piece commitments.
//!
//! A v1 piece commitment travels as a CID pairing the
//! `fil-commitment-unsealed` multicodec with the `sha2-256-trunc254-padded`
//! multihash over the 32-byte tree root. Anything else is rejected before
//! the digest reaches the verifier.

use cid::Cid;
use datasegment_merkle_tree::{Node, NODE_SIZE};
use multihash::Multihash;

use crate::error::DataSegmentError;

/// Multicodec code for unsealed piece commitments.
pub const FIL_COMMITMENT_UNSEALED: u64 = 0xf101;

/// Multihash code for 254-bit truncated, Fr32-padded SHA-256.
pub const SHA2_256_TRUNC254_PADDED: u64 = 0x1012;

/// Extract the 32-byte piece commitment from a v1 piece-commitment CID.
pub fn cid_to_piece_commitment(cid: &Cid) -> Result<Node, DataSegmentError> {
    if cid.codec() != FIL_COMMITMENT_UNSEALED {
        return Err(DataSegmentError::InvalidPieceCommitment(format!(
            "unexpected multicodec 0x{:x}",
            cid.codec()
        )));
    }
    let hash = cid.hash();
    if hash.code() != SHA2_256_TRUNC254_PADDED {
        return Err(DataSegmentError::InvalidPieceCommitment(format!(
            "unexpected multihash 0x{:x}",
            hash.code()
        )));
    }
    let digest: [u8; NODE_SIZE] = hash.digest().try_into().map_err(|_| {
        DataSegmentError::InvalidPieceCommitment(format!(
            "digest is {} bytes, expected {}",
            hash.digest().len(),
            NODE_SIZE
        ))
    })?;
    Ok(Node::from_bytes(digest))
}

/// Wrap a 32-byte piece commitment in a v1 piece-commitment CID.
pub fn piece_commitment_to_cid(commitment: &Node) -> Result<Cid, DataSegmentError> {
    let hash = Multihash::<64>::wrap(SHA2_256_TRUNC254_PADDED, commitment.as_bytes())
        .map_err(|e| DataSegmentError::InvalidPieceCommitment(e.to_string()))?;
    Ok(Cid::new_v1(FIL_COMMITMENT_UNSEALED, hash))
}

#[cfg(test)]
mod tests {
    use datasegment_merkle_tree::truncated_hash;

    use super::*;

    #[test]
    fn test_commitment_cid_roundtrip() {
        let commitment = truncated_hash(b"piece data");
        let cid = piece_commitment_to_cid(&commitment).expect("encode cid");
        assert_eq!(cid.codec(), FIL_COMMITMENT_UNSEALED);
        assert_eq!(cid.hash().code(), SHA2_256_TRUNC254_PADDED);

        let decoded = cid_to_piece_commitment(&cid).expect("decode cid");
        assert_eq!(decoded, commitment);
    }

    #[test]
    fn test_rejects_wrong_codec() {
        let commitment = truncated_hash(b"piece data");
        let hash = Multihash::<64>::wrap(SHA2_256_TRUNC254_PADDED, commitment.as_bytes())
            .expect("wrap digest");
        // 0x55 is the raw-bytes codec.
        let cid = Cid::new_v1(0x55, hash);
        assert!(matches!(
            cid_to_piece_commitment(&cid).expect_err("raw codec"),
            DataSegmentError::InvalidPieceCommitment(_)
        ));
    }

    #[test]
    fn test_rejects_wrong_multihash() {
        let commitment = truncated_hash(b"piece data");
        // 0x12 is plain sha2-256.
        let hash = Multihash::<64>::wrap(0x12, commitment.as_bytes()).expect("wrap digest");
        let cid = Cid::new_v1(FIL_COMMITMENT_UNSEALED, hash);
        assert!(matches!(
            cid_to_piece_commitment(&cid).expect_err("plain sha2-256"),
            DataSegmentError::InvalidPieceCommitment(_)
        ));
    }

    #[test]
    fn test_rejects_short_digest() {
        let hash =
            Multihash::<64>::wrap(SHA2_256_TRUNC254_PADDED, &[0xAB; 16]).expect("wrap digest");
        let cid = Cid::new_v1(FIL_COMMITMENT_UNSEALED, hash);
        let err = cid_to_piece_commitment(&cid).expect_err("16-byte digest");
        assert!(err.to_string().contains("16 bytes"), "got: {}", err);
    }
}
