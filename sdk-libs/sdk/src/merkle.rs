use solana_program::keccak;

pub type Node = [u8; 32];

/// Recomputes the root of a keccak merkle tree from a leaf and its proof.
///
/// `proof` is ordered from the leaf level upwards. The bit of `leaf_index`
/// at each level selects whether the running hash is the left or right child.
pub fn recompute_root(leaf: &Node, proof: &[Node], leaf_index: u32) -> Node {
    let mut computed_hash = *leaf;
    for (level, sibling) in proof.iter().enumerate() {
        let is_left = (u64::from(leaf_index) >> level) & 1 == 0;
        computed_hash = if is_left {
            keccak::hashv(&[&computed_hash[..], &sibling[..]]).to_bytes()
        } else {
            keccak::hashv(&[&sibling[..], &computed_hash[..]]).to_bytes()
        };
    }
    computed_hash
}

pub fn verify_proof(root: &Node, leaf: &Node, proof: &[Node], leaf_index: u32) -> bool {
    recompute_root(leaf, proof, leaf_index) == *root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_pair(left: &Node, right: &Node) -> Node {
        keccak::hashv(&[&left[..], &right[..]]).to_bytes()
    }

    /// Builds every layer of a full tree of depth 2 and checks each leaf's proof.
    #[test]
    fn test_recompute_root_depth_two() {
        let leaves: Vec<Node> = (1u8..=4).map(|i| [i; 32]).collect();
        let l1 = [
            hash_pair(&leaves[0], &leaves[1]),
            hash_pair(&leaves[2], &leaves[3]),
        ];
        let root = hash_pair(&l1[0], &l1[1]);

        let proofs = [
            vec![leaves[1], l1[1]],
            vec![leaves[0], l1[1]],
            vec![leaves[3], l1[0]],
            vec![leaves[2], l1[0]],
        ];
        for (index, proof) in proofs.iter().enumerate() {
            assert!(verify_proof(&root, &leaves[index], proof, index as u32));
        }
        assert!(!verify_proof(&root, &leaves[0], &proofs[0], 1));
        assert!(!verify_proof(&root, &[9; 32], &proofs[0], 0));
    }

    #[test]
    fn test_empty_proof_is_leaf() {
        assert_eq!(recompute_root(&[5; 32], &[], 0), [5; 32]);
    }
}
