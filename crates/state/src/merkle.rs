//! Fixed-depth sparse binary Merkle tree.
//!
//! The tree commits to `2^depth` leaf slots. Unoccupied subtrees hash to
//! precomputed zero digests, so the structure only materializes nodes along
//! paths that have been written.

use std::collections::HashMap;

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use oc20_primitives::{Buf32, sha256_tagged};
use serde::{Deserialize, Serialize};

/// Digest of an unoccupied leaf slot.
fn empty_leaf_digest() -> Buf32 {
    sha256_tagged(b"oc20:leaf:empty", &[])
}

fn node_digest(left: &Buf32, right: &Buf32) -> Buf32 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left.as_slice());
    buf[32..].copy_from_slice(right.as_slice());
    sha256_tagged(b"oc20:node", &buf)
}

/// Sparse Merkle tree over `2^depth` slots.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SparseMerkleTree {
    depth: u8,

    /// Digests of empty subtrees by level, `zero[0]` being the empty leaf.
    zero: Vec<Buf32>,

    /// Materialized nodes, keyed by `(level, index)`. Level 0 is the leaves.
    nodes: HashMap<(u8, u64), Buf32>,
}

impl SparseMerkleTree {
    /// Creates an empty tree of the given depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth` exceeds 63, which no valid capacity configuration
    /// can reach.
    pub fn new(depth: u8) -> Self {
        assert!(depth < 64, "merkle: depth out of range");
        let mut zero = Vec::with_capacity(depth as usize + 1);
        zero.push(empty_leaf_digest());
        for level in 0..depth {
            let z = zero[level as usize];
            zero.push(node_digest(&z, &z));
        }
        Self {
            depth,
            zero,
            nodes: HashMap::new(),
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Number of addressable leaf slots.
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    pub fn root(&self) -> Buf32 {
        self.node(self.depth, 0)
    }

    fn node(&self, level: u8, index: u64) -> Buf32 {
        *self
            .nodes
            .get(&(level, index))
            .unwrap_or(&self.zero[level as usize])
    }

    /// Writes a leaf digest and recomputes the path to the root.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the tree's capacity; slot allocation
    /// upstream is responsible for never handing out such an index.
    pub fn set_leaf(&mut self, index: u64, digest: Buf32) {
        assert!(index < self.capacity(), "merkle: leaf index out of range");
        self.nodes.insert((0, index), digest);

        let mut idx = index;
        for level in 0..self.depth {
            let parent_idx = idx >> 1;
            let (l, r) = if idx & 1 == 0 {
                (self.node(level, idx), self.node(level, idx | 1))
            } else {
                (self.node(level, idx & !1), self.node(level, idx))
            };
            self.nodes.insert((level + 1, parent_idx), node_digest(&l, &r));
            idx = parent_idx;
        }
    }

    /// Produces the inclusion proof for a leaf slot against the current root.
    ///
    /// Unoccupied slots open to the empty-leaf digest, which is how absence
    /// is proven.
    pub fn open(&self, index: u64) -> MerkleProof {
        assert!(index < self.capacity(), "merkle: leaf index out of range");
        let mut siblings = Vec::with_capacity(self.depth as usize);
        let mut idx = index;
        for level in 0..self.depth {
            siblings.push(self.node(level, idx ^ 1));
            idx >>= 1;
        }
        MerkleProof { index, siblings }
    }
}

/// Inclusion proof for one leaf slot.
#[derive(
    Clone,
    Debug,
    Eq,
    PartialEq,
    Arbitrary,
    BorshDeserialize,
    BorshSerialize,
    Deserialize,
    Serialize,
)]
pub struct MerkleProof {
    index: u64,
    siblings: Vec<Buf32>,
}

impl MerkleProof {
    pub fn new(index: u64, siblings: Vec<Buf32>) -> Self {
        Self { index, siblings }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn siblings(&self) -> &[Buf32] {
        &self.siblings
    }

    /// Folds the leaf digest up to the root this proof implies.
    pub fn compute_root(&self, leaf: Buf32) -> Buf32 {
        let mut acc = leaf;
        let mut idx = self.index;
        for sibling in &self.siblings {
            acc = if idx & 1 == 0 {
                node_digest(&acc, sibling)
            } else {
                node_digest(sibling, &acc)
            };
            idx >>= 1;
        }
        acc
    }

    /// Checks the proof binds `leaf` at this proof's slot under `root`.
    pub fn verify(&self, root: &Buf32, leaf: Buf32) -> bool {
        self.compute_root(leaf) == *root
    }
}
