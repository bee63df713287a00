// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Fiduccia–Mattheyses move-based bipartition refinement.
//!
//! One pass tentatively moves every node once, highest-gain-first under
//! the balance bounds, then keeps the prefix of the move sequence with
//! the best cumulative gain. The driver repeats passes until one stops
//! improving. Gains are maintained incrementally: committing a move only
//! touches peers on nets that are critical around the moved node.

use crate::module::NodeId;
use crate::partition::{AreaBounds, Partition, Side};

/// One committed move inside a pass, in move order.
struct MoveRecord {
    node: NodeId,
    /// Gain the node had when it was selected.
    gain: i64,
    /// Side-L area right after the move.
    area_left: u64,
}

/// Cell gain of every node: cut nets that moving the node would free,
/// minus uncut nets it would newly cut.
fn compute_gains(p: &Partition) -> Vec<i64> {
    let module = p.module();
    let mut gains = vec![0i64; module.num_nodes()];
    for v in 0..module.num_nodes() {
        let side = p.side_of(v);
        let mut g = 0i64;
        for &e in &module.incidence[v] {
            let members = &module.raw_edges[e].members;
            let same = members
                .iter()
                .filter(|&&u| u != v && p.side_of(u) == side)
                .count();
            if same == 0 {
                // v is the net's only member on this side.
                g += 1;
            } else if same == members.len() - 1 {
                // Net entirely on v's side; moving v cuts it.
                g -= 1;
            }
        }
        gains[v] = g;
    }
    gains
}

struct Candidate {
    node: NodeId,
    gain: i64,
    area_after: u64,
}

/// Pick the non-fixed node with the highest gain whose move keeps the
/// side-L area strictly inside the balance window. Ties go to the
/// candidate landing closest to the pass target, then to the lowest
/// node index.
fn find_highest_gain_cell(
    p: &Partition,
    gains: &[i64],
    fixed: &[bool],
    bounds: &AreaBounds,
) -> Option<Candidate> {
    let module = p.module();
    let mut best: Option<Candidate> = None;
    for v in 0..module.num_nodes() {
        if fixed[v] {
            continue;
        }
        let area_after = match p.side_of(v) {
            Side::Left => p.area_left() - module.node_area(v),
            Side::Right => p.area_left() + module.node_area(v),
        };
        if area_after <= bounds.lower || area_after >= bounds.upper {
            continue;
        }
        let better = match &best {
            None => true,
            Some(b) => {
                gains[v] > b.gain
                    || (gains[v] == b.gain
                        && area_after.abs_diff(bounds.target) < b.area_after.abs_diff(bounds.target))
            }
        };
        if better {
            best = Some(Candidate {
                node: v,
                gain: gains[v],
                area_after,
            });
        }
    }
    best
}

/// Critical-net gain adjustment after `v` has been moved and fixed.
///
/// With `v` now on side T (previously F), a net around `v` only changes
/// any peer's contribution when one of its side counts is at the 0/1
/// boundary: T held 0 or 1 members before the move, or F holds 0 or 1
/// after it. All other nets keep every peer's gain unchanged.
fn update_gains_after_move(p: &Partition, v: NodeId, fixed: &[bool], gains: &mut [i64]) {
    let module = p.module();
    let to = p.side_of(v);
    let from = to.other();
    for &e in &module.incidence[v] {
        let members = &module.raw_edges[e].members;
        let to_excl = members
            .iter()
            .filter(|&&u| u != v && p.side_of(u) == to)
            .count();
        if to_excl == 0 {
            for &u in members.iter().filter(|&&u| u != v) {
                if !fixed[u] {
                    gains[u] += 1;
                }
            }
        } else if to_excl == 1 {
            let u = *members
                .iter()
                .find(|&&u| u != v && p.side_of(u) == to)
                .unwrap();
            if !fixed[u] {
                gains[u] -= 1;
            }
        }
        let from_cnt = members.iter().filter(|&&u| p.side_of(u) == from).count();
        if from_cnt == 0 {
            for &u in members.iter().filter(|&&u| u != v) {
                if !fixed[u] {
                    gains[u] -= 1;
                }
            }
        } else if from_cnt == 1 {
            let u = *members.iter().find(|&&u| p.side_of(u) == from).unwrap();
            if !fixed[u] {
                gains[u] += 1;
            }
        }
    }
}

/// One FM pass. Returns the best cumulative gain over any prefix of the
/// attempted move sequence; the partition ends up reflecting exactly
/// that prefix (unchanged when the best is 0).
pub fn fm_step(partition: &mut Partition) -> i64 {
    let n = partition.module().num_nodes();
    let bounds = partition.bounds();

    partition.pretend();
    let mut fixed = vec![false; n];
    let mut gains = compute_gains(partition);
    let mut moves: Vec<MoveRecord> = Vec::new();

    while let Some(c) = find_highest_gain_cell(partition, &gains, &fixed, &bounds) {
        partition.move_node(c.node);
        fixed[c.node] = true;
        update_gains_after_move(partition, c.node, &fixed, &mut gains);
        moves.push(MoveRecord {
            node: c.node,
            gain: c.gain,
            area_left: c.area_after,
        });
    }

    // Best prefix; the empty prefix (gain 0, entry area) is the baseline,
    // so a pass that cannot improve leaves the partition untouched.
    let mut best_len = 0usize;
    let mut best_gain = 0i64;
    let mut best_dist = 0u64;
    let mut running = 0i64;
    for (i, m) in moves.iter().enumerate() {
        running += m.gain;
        let dist = m.area_left.abs_diff(bounds.target);
        if running > best_gain || (running == best_gain && dist < best_dist) {
            best_len = i + 1;
            best_gain = running;
            best_dist = dist;
        }
    }

    partition.restore();
    for m in &moves[..best_len] {
        partition.move_node(m.node);
    }
    best_gain
}

/// Run FM passes until one returns a non-positive gain. Returns the
/// per-pass gain history; the last entry is the terminating pass.
pub fn fm_algorithm(partition: &mut Partition) -> Vec<i64> {
    let mut history = Vec::new();
    loop {
        let gain = fm_step(partition);
        clilog::debug!(
            "FM pass {}: gain {}, cut {}, area L {}",
            history.len(),
            gain,
            partition.cut_size(),
            partition.area_left()
        );
        history.push(gain);
        if gain <= 0 {
            break;
        }
    }
    history
}
