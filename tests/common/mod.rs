#![allow(dead_code)]
//! Small random game trees implementing `Position`, plus a brute-force
//! minimax with the same quiescence rules the search uses.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use panterfish::search::Position;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Debug)]
pub struct NodeData {
    pub score: i32,
    /// (move value, child id)
    pub children: Vec<(i32, usize)>,
}

#[derive(Debug)]
pub struct Tree {
    pub nodes: Vec<NodeData>,
    /// Reported by every node as its null-move material.
    pub null_material: bool,
}

/// A tree node, or its null-move mirror (`flipped`), which has no moves.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: usize,
    pub flipped: bool,
    pub tree: Arc<Tree>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.flipped == other.flipped
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.flipped.hash(state);
    }
}

impl Node {
    fn data(&self) -> &NodeData {
        &self.tree.nodes[self.id]
    }
}

impl Position for Node {
    type Move = usize;

    fn score(&self) -> i32 {
        if self.flipped { -self.data().score } else { self.data().score }
    }

    fn rotate(&self, _null_move: bool) -> Self {
        Node { id: self.id, flipped: !self.flipped, tree: self.tree.clone() }
    }

    fn make_move(&self, m: usize) -> Self {
        Node { id: self.data().children[m].1, flipped: false, tree: self.tree.clone() }
    }

    fn gen_moves(&self) -> Vec<usize> {
        if self.flipped { Vec::new() } else { (0..self.data().children.len()).collect() }
    }

    fn value(&self, m: usize) -> i32 {
        self.data().children[m].0
    }

    fn has_null_move_material(&self) -> bool {
        self.tree.null_material
    }
}

/// Child scores follow the incremental rule `child = -(parent + value)`.
pub fn random_tree(seed: u64, height: u32, max_branching: usize) -> Node {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut nodes = vec![NodeData { score: rng.gen_range(-50..=50), children: Vec::new() }];
    let mut frontier = vec![(0usize, 0u32)];
    while let Some((id, level)) = frontier.pop() {
        if level == height { continue; }
        let branching = rng.gen_range(0..=max_branching);
        for _ in 0..branching {
            let value = rng.gen_range(-40..=120);
            let child = nodes.len();
            nodes.push(NodeData { score: -(nodes[id].score + value), children: Vec::new() });
            nodes[id].children.push((value, child));
            frontier.push((child, level + 1));
        }
    }
    Node { id: 0, flipped: false, tree: Arc::new(Tree { nodes, null_material: false }) }
}

/// A root whose moves (one per entry of `values`) all lead to leaves.
pub fn star(root_score: i32, values: &[i32], null_material: bool) -> Node {
    let mut nodes = vec![NodeData { score: root_score, children: Vec::new() }];
    for &value in values {
        let child = nodes.len();
        nodes.push(NodeData { score: -(root_score + value), children: Vec::new() });
        nodes[0].children.push((value, child));
    }
    Node { id: 0, flipped: false, tree: Arc::new(Tree { nodes, null_material }) }
}

/// Fixed-depth negamax; depth 0 stands pat or plays moves worth at least `qs`.
/// Scores stay far from mate, so a node without moves is a stalemate.
pub fn minimax(node: &Node, depth: i32, qs: i32) -> i32 {
    let moves = node.gen_moves();
    if depth <= 0 {
        let mut best = node.score();
        for m in moves {
            if node.value(m) >= qs {
                best = best.max(-minimax(&node.make_move(m), 0, qs));
            }
        }
        return best;
    }
    if moves.is_empty() {
        return 0;
    }
    moves.into_iter().map(|m| -minimax(&node.make_move(m), depth - 1, qs)).max().unwrap_or(0)
}
