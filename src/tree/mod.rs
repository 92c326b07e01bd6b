//! Huffman tree construction.
//!
//! The tree is stored as an arena: every node lives in one `Vec` and refers to
//! its children by index. Leaves are created first, in ascending order of their
//! symbol, and internal nodes are appended as they are merged. The root is
//! always the last node that was created.
use crate::frequency::FrequencyTable;
use alloc::vec::Vec;

/// Index of a node inside the arena of a [`HuffmanTree`]
pub type NodeIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        frequency: usize,
    },
    Internal {
        frequency: usize,
        left: NodeIndex,
        right: NodeIndex,
    },
}

impl Node {
    pub fn frequency(&self) -> usize {
        match self {
            Node::Leaf { frequency, .. } => *frequency,
            Node::Internal { frequency, .. } => *frequency,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeIndex,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two nodes with the lowest frequency.
    ///
    /// Each merge scans the remaining nodes linearly. On equal frequencies the node that
    /// comes first in the working set wins, which makes the resulting shape reproducible.
    /// The first node taken becomes the left child, the second one the right child.
    ///
    /// A table with a single symbol produces a tree that only consists of one leaf.
    pub fn build(frequencies: &FrequencyTable) -> HuffmanTree {
        let distinct = frequencies.distinct_symbols();
        let mut nodes = Vec::with_capacity(2 * distinct - 1);
        let mut working_set = Vec::with_capacity(distinct);

        for (symbol, frequency) in frequencies.iter() {
            working_set.push(nodes.len());
            nodes.push(Node::Leaf { symbol, frequency });
        }

        while working_set.len() > 1 {
            let left = take_minimum(&nodes, &mut working_set);
            let right = take_minimum(&nodes, &mut working_set);
            let frequency = nodes[left].frequency() + nodes[right].frequency();

            working_set.push(nodes.len());
            nodes.push(Node::Internal {
                frequency,
                left,
                right,
            });
        }

        let root = working_set[0];
        HuffmanTree { nodes, root }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx]
    }

    pub fn frequency(&self, idx: NodeIndex) -> usize {
        self.nodes[idx].frequency()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Length of the longest path from the root to a leaf. A tree that is a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.depth_of(self.root)
    }

    fn depth_of(&self, idx: NodeIndex) -> usize {
        match self.nodes[idx] {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => {
                1 + usize::max(self.depth_of(left), self.depth_of(right))
            }
        }
    }
}

/// Removes the node with the lowest frequency from `working_set` and returns it.
/// `working_set` must not be empty.
fn take_minimum(nodes: &[Node], working_set: &mut Vec<NodeIndex>) -> NodeIndex {
    let mut min_pos = 0;
    for pos in 1..working_set.len() {
        if nodes[working_set[pos]].frequency() < nodes[working_set[min_pos]].frequency() {
            min_pos = pos;
        }
    }
    working_set.remove(min_pos)
}
