//! Arena-backed search tree.
//!
//! Nodes live in one `Vec`. The children of a node occupy a contiguous index
//! range and point back to their parent by index, so the tree is released in
//! one piece when the arena is dropped.

use std::ops::Range;

use make7_core::{GameResult, Make7Error, Make7Result, Move, Outcome, Position};
use serde::{Deserialize, Serialize};

/// Index into the node arena.
pub type NodeIdx = usize;

pub const ROOT: NodeIdx = 0;

/// Game-theoretic state of a node, for the player to move there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Proven {
    #[default]
    Unsolved,
    Win,
    Draw,
    Loss,
}

impl Proven {
    pub fn is_solved(self) -> bool {
        self != Proven::Unsolved
    }

    /// Derives a parent's state from the states of all its children.
    ///
    /// One child lost for its mover wins the parent. Otherwise the parent
    /// is settled only when every child is: a draw if any child draws,
    /// else a loss.
    pub fn from_children<I>(children: I) -> Proven
    where
        I: IntoIterator<Item = Proven>,
    {
        let mut any = false;
        let mut all_solved = true;
        let mut any_draw = false;
        for child in children {
            any = true;
            match child {
                Proven::Loss => return Proven::Win,
                Proven::Draw => any_draw = true,
                Proven::Unsolved => all_solved = false,
                Proven::Win => {}
            }
        }
        match (any && all_solved, any_draw) {
            (false, _) => Proven::Unsolved,
            (true, true) => Proven::Draw,
            (true, false) => Proven::Loss,
        }
    }

    /// How attractive a child in this state is to the parent's mover.
    pub(crate) fn preference(self) -> u8 {
        match self {
            Proven::Loss => 3,
            Proven::Unsolved => 2,
            Proven::Draw => 1,
            Proven::Win => 0,
        }
    }

    pub fn to_result(self) -> GameResult {
        let outcome = match self {
            Proven::Unsolved => Outcome::Unknown,
            Proven::Win => Outcome::Win,
            Proven::Draw => Outcome::Draw,
            Proven::Loss => Outcome::Loss,
        };
        GameResult { outcome, plies: None }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    /// Drop leading here; None at the root.
    pub mv: Option<Move>,
    pub parent: Option<NodeIdx>,
    first_child: NodeIdx,
    child_count: u8,
    pub visits: u64,
    /// Sum of rewards, seen by the player who moved into this node.
    pub points: i64,
    pub proven: Proven,
}

impl Node {
    fn new(mv: Option<Move>, parent: Option<NodeIdx>) -> Self {
        Self {
            mv,
            parent,
            first_child: 0,
            child_count: 0,
            visits: 0,
            points: 0,
            proven: Proven::Unsolved,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.child_count > 0
    }

    pub fn children(&self) -> Range<NodeIdx> {
        self.first_child..self.first_child + self.child_count as usize
    }

    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.points as f64 / self.visits as f64
        }
    }

    /// Upper confidence bound of this node as seen from its parent.
    #[inline]
    pub fn uct(&self, parent_visits: u64, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let visits = self.visits as f64;
        self.mean_reward() + exploration * ((parent_visits as f64).ln() / visits).sqrt()
    }
}

#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    max_nodes: usize,
}

impl Tree {
    /// A tree holding only the root, capped at `max_nodes` nodes.
    pub fn new(max_nodes: usize) -> Self {
        Self {
            nodes: vec![Node::new(None, None)],
            max_nodes: max_nodes.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx]
    }

    pub fn children(&self, idx: NodeIdx) -> &[Node] {
        &self.nodes[self.nodes[idx].children()]
    }

    /// Walks down from the root, playing each chosen drop on `pos`.
    ///
    /// Descends into the unsolved child with the best UCT score. Stops at an
    /// unexpanded node, at a node with an unvisited unsolved child, or at a
    /// node none of whose children is eligible.
    pub fn select(&self, pos: &mut Position, exploration: f64) -> NodeIdx {
        let mut current = ROOT;
        loop {
            let node = &self.nodes[current];
            if !node.is_expanded() {
                return current;
            }

            let mut best: Option<(NodeIdx, f64)> = None;
            for idx in node.children() {
                let child = &self.nodes[idx];
                if child.proven.is_solved() {
                    continue;
                }
                if child.visits == 0 {
                    return current;
                }
                let score = child.uct(node.visits, exploration);
                if best.is_none_or(|(_, s)| score > s) {
                    best = Some((idx, score));
                }
            }

            let Some((next, _)) = best else {
                return current;
            };
            if let Some(mv) = self.nodes[next].mv {
                pos.drop(mv);
            }
            current = next;
        }
    }

    /// Unsolved children of `idx` that have never been visited.
    pub fn unvisited_children(&self, idx: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
        self.nodes[idx]
            .children()
            .filter(|&i| self.nodes[i].visits == 0 && !self.nodes[i].proven.is_solved())
    }

    /// Creates one child of `idx` per move, returning the first child's index.
    ///
    /// # Errors
    /// `NodeAllocation` when the arena cap is reached or the allocator
    /// refuses to grow. The tree is left unchanged.
    pub fn expand(&mut self, idx: NodeIdx, moves: &[Move]) -> Make7Result<NodeIdx> {
        let first = self.nodes.len();
        if first + moves.len() > self.max_nodes {
            return Err(Make7Error::NodeAllocation { nodes: first });
        }
        self.nodes
            .try_reserve(moves.len())
            .map_err(|_| Make7Error::NodeAllocation { nodes: first })?;

        self.nodes.extend(moves.iter().map(|&mv| Node::new(Some(mv), Some(idx))));
        let node = &mut self.nodes[idx];
        node.first_child = first;
        node.child_count = moves.len() as u8;
        Ok(first)
    }

    /// Adds one visit and the reward along the path to the root, flipping
    /// the sign at every level.
    pub fn backpropagate(&mut self, idx: NodeIdx, mut reward: i64) {
        let mut current = Some(idx);
        while let Some(i) = current {
            let node = &mut self.nodes[i];
            node.visits = node.visits.saturating_add(1);
            node.points = node.points.saturating_add(reward);
            reward = -reward;
            current = node.parent;
        }
    }

    pub fn set_proven(&mut self, idx: NodeIdx, proven: Proven) {
        self.nodes[idx].proven = proven;
    }

    /// Re-derives the proven state of `idx` and each of its ancestors.
    pub fn refresh_proven(&mut self, idx: NodeIdx) {
        let mut current = Some(idx);
        while let Some(i) = current {
            let node = &self.nodes[i];
            if node.is_expanded() && !node.proven.is_solved() {
                let derived = Proven::from_children(self.children(i).iter().map(|c| c.proven));
                self.nodes[i].proven = derived;
            }
            current = self.nodes[i].parent;
        }
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tree_tests;
