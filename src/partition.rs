// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Bipartition state over a module's nodes.
//!
//! [`PartitionData`] owns the two node sets and the snapshot discipline
//! that makes a run of trial moves revertible. [`Partition`] wraps it
//! with the dense side/area caches the move loop needs, plus the
//! balance-bounds computation.

use crate::module::{EdgeId, Module, NodeId};
use indexmap::IndexSet;

/// The two sides of a bipartition ("A" and "B" in the FM literature).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapState {
    Real,
    Pretending,
}

/// The two disjoint node sets, together covering every node, plus a
/// one-level snapshot used to revert a run of trial moves.
///
/// In `Real` state the backup slot is empty; in `Pretending` state it
/// holds the pre-trial copy of both sets. The snapshot is released on
/// both [`commit`](PartitionData::commit) and
/// [`restore`](PartitionData::restore).
#[derive(Debug, Default)]
pub struct PartitionData {
    left: IndexSet<NodeId>,
    right: IndexSet<NodeId>,
    state: SnapState,
    backup: Option<Box<(IndexSet<NodeId>, IndexSet<NodeId>)>>,
}

impl Default for SnapState {
    fn default() -> Self {
        SnapState::Real
    }
}

impl PartitionData {
    fn insert(&mut self, v: NodeId, side: Side) {
        match side {
            Side::Left => self.left.insert(v),
            Side::Right => self.right.insert(v),
        };
    }

    /// Move `v` to the side it is not currently on.
    fn transfer(&mut self, v: NodeId, from: Side) {
        match from {
            Side::Left => {
                self.left.swap_remove(&v);
                self.right.insert(v);
            }
            Side::Right => {
                self.right.swap_remove(&v);
                self.left.insert(v);
            }
        }
    }

    /// Enter the pretending state, snapshotting both sets.
    fn pretend(&mut self) {
        debug_assert_eq!(self.state, SnapState::Real);
        self.backup = Some(Box::new((self.left.clone(), self.right.clone())));
        self.state = SnapState::Pretending;
    }

    /// Keep the trial moves; drop the snapshot.
    fn commit(&mut self) {
        debug_assert_eq!(self.state, SnapState::Pretending);
        self.backup = None;
        self.state = SnapState::Real;
    }

    /// Discard the trial moves; reinstate the snapshot.
    fn restore(&mut self) {
        debug_assert_eq!(self.state, SnapState::Pretending);
        if let Some(backup) = self.backup.take() {
            let (left, right) = *backup;
            self.left = left;
            self.right = right;
        }
        self.state = SnapState::Real;
    }
}

/// Balance window for one FM pass, fixed at pass entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaBounds {
    /// Side-L area at pass entry; prefix tie-breaks pull towards it.
    pub target: u64,
    pub lower: u64,
    pub upper: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PartitionError {
    /// The module has no nodes to partition.
    EmptyModule,
}

impl std::fmt::Display for PartitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionError::EmptyModule => write!(f, "cannot partition an empty module"),
        }
    }
}

impl std::error::Error for PartitionError {}

/// A bipartition of a module, with the dense caches the FM inner loop
/// reads: per-node side and the running side-L area.
pub struct Partition<'m> {
    module: &'m Module,
    data: PartitionData,
    side: Vec<Side>,
    area_left: u64,
}

impl<'m> Partition<'m> {
    /// Seed a bipartition by breadth-first traversal from node 0.
    ///
    /// The first `⌊N/2⌋` discovered nodes go right, the rest left. When
    /// a BFS front is exhausted with nodes still undiscovered (the
    /// graph is disconnected), the lowest-indexed remaining node seeds
    /// the next front, so every node lands on exactly one side.
    pub fn initial(module: &'m Module) -> Result<Partition<'m>, PartitionError> {
        let n = module.num_nodes();
        if n == 0 {
            return Err(PartitionError::EmptyModule);
        }
        let mut data = PartitionData::default();
        let mut side = vec![Side::Left; n];
        let mut visited = vec![false; n];
        let mut queue = std::collections::VecDeque::new();
        let mut visit_idx = 0usize;
        let mut area_left = 0u64;
        let mut next_seed = 0;

        while visit_idx < n {
            while next_seed < n && visited[next_seed] {
                next_seed += 1;
            }
            visited[next_seed] = true;
            queue.push_back(next_seed);
            while let Some(v) = queue.pop_front() {
                visit_idx += 1;
                let s = if visit_idx <= n / 2 {
                    Side::Right
                } else {
                    Side::Left
                };
                side[v] = s;
                data.insert(v, s);
                if s == Side::Left {
                    area_left += module.node_area(v);
                }
                for &w in &module.nodes[v].neighbors {
                    if !visited[w] {
                        visited[w] = true;
                        queue.push_back(w);
                    }
                }
            }
        }

        Ok(Partition {
            module,
            data,
            side,
            area_left,
        })
    }

    pub fn module(&self) -> &'m Module {
        self.module
    }

    #[inline]
    pub fn side_of(&self, v: NodeId) -> Side {
        self.side[v]
    }

    /// Total footprint area currently on the left side.
    pub fn area_left(&self) -> u64 {
        self.area_left
    }

    pub fn area_right(&self) -> u64 {
        self.module.area() - self.area_left
    }

    /// Nodes currently on the left side. Iteration order is
    /// deterministic but moves permute it (removal swaps in the last
    /// element), so callers must not rely on insertion order.
    pub fn left(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.data.left.iter().copied()
    }

    /// Nodes currently on the right side. Same ordering caveat as
    /// [`left`](Partition::left).
    pub fn right(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.data.right.iter().copied()
    }

    /// Balance window derived from the current state: the entry side-L
    /// area plus/minus the largest single node area.
    pub fn bounds(&self) -> AreaBounds {
        let max = self.module.max_node_area();
        AreaBounds {
            target: self.area_left,
            lower: self.area_left.saturating_sub(max),
            upper: self.area_left + max,
        }
    }

    /// Whether a hypernet currently has members on both sides.
    pub fn is_cut(&self, e: EdgeId) -> bool {
        let members = &self.module.raw_edges[e].members;
        let first = self.side[members[0]];
        members[1..].iter().any(|&v| self.side[v] != first)
    }

    /// Number of cut hypernets.
    pub fn cut_size(&self) -> usize {
        (0..self.module.num_edges())
            .filter(|&e| self.is_cut(e))
            .count()
    }

    /// Move `v` to the opposite side, keeping all caches in step.
    pub fn move_node(&mut self, v: NodeId) {
        let from = self.side[v];
        self.data.transfer(v, from);
        self.side[v] = from.other();
        match from {
            Side::Left => self.area_left -= self.module.node_area(v),
            Side::Right => self.area_left += self.module.node_area(v),
        }
    }

    /// Snapshot the current state; trial moves until
    /// [`restore`](Partition::restore) or [`commit`](Partition::commit).
    pub fn pretend(&mut self) {
        self.data.pretend();
    }

    pub fn commit(&mut self) {
        self.data.commit();
    }

    /// Revert to the snapshot and rebuild the dense caches from it.
    pub fn restore(&mut self) {
        self.data.restore();
        self.area_left = 0;
        for &v in &self.data.left {
            self.side[v] = Side::Left;
            self.area_left += self.module.node_area(v);
        }
        for &v in &self.data.right {
            self.side[v] = Side::Right;
        }
    }
}
