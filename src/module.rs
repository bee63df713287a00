// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Partitioner view of a netlist: a flat node set plus two adjacency
//! structures, a pair-wise neighbour list used for BFS seeding and a
//! hypernet incidence used by the gain model.

use crate::netlist::{GateId, NetId, Netlist};
use smallvec::SmallVec;

/// Dense node handle. Node `i` corresponds to gate `i` in the netlist;
/// the module builder relies on that correspondence.
pub type NodeId = usize;
/// Dense handle into [`Module::raw_edges`].
pub type EdgeId = usize;

/// A gate as the partitioner sees it.
#[derive(Debug, Clone)]
pub struct Node {
    pub gate: GateId,
    /// Pair-wise adjacency. Symmetric, no self-loops; two nodes sharing
    /// several nets appear several times. Only used for seeding.
    pub neighbors: Vec<NodeId>,
}

/// All nodes electrically on one net. Immutable once built; every
/// hyperedge is one allocation referenced by index from the incidence
/// lists and from [`Module::raw_edges`].
#[derive(Debug)]
pub struct HyperNet {
    /// Source net in the netlist, for diagnostics.
    pub net: NetId,
    pub members: SmallVec<[NodeId; 4]>,
}

/// Flattened netlist: nodes, hypernets, and their incidence.
#[derive(Debug, Default)]
pub struct Module {
    pub nodes: Vec<Node>,
    /// Every net with at least two bound gates, as a hyperedge.
    pub raw_edges: Vec<HyperNet>,
    /// `incidence[v]` lists the hypernets node `v` participates in.
    pub incidence: Vec<SmallVec<[EdgeId; 4]>>,
    node_area: Vec<u64>,
}

impl Module {
    /// Flatten a netlist. One node per gate, in gate order; one
    /// hyperedge per net with two or more members.
    pub fn from_netlist(netlist: &Netlist) -> Module {
        let n = netlist.num_gates();
        let mut module = Module {
            nodes: (0..n)
                .map(|g| Node {
                    gate: g,
                    neighbors: Vec::new(),
                })
                .collect(),
            raw_edges: Vec::new(),
            incidence: vec![SmallVec::new(); n],
            node_area: netlist.gates.iter().map(|g| g.area()).collect(),
        };

        for (net_id, net) in netlist.nets.iter().enumerate() {
            for &g in &net.binds {
                for &h in &net.binds {
                    if g != h {
                        module.nodes[g].neighbors.push(h);
                    }
                }
            }
            if net.binds.len() >= 2 {
                let edge = module.raw_edges.len();
                module.raw_edges.push(HyperNet {
                    net: net_id,
                    members: net.binds.iter().copied().collect(),
                });
                for &g in &net.binds {
                    module.incidence[g].push(edge);
                }
            }
        }
        module
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.raw_edges.len()
    }

    /// Footprint area of one node.
    #[inline]
    pub fn node_area(&self, v: NodeId) -> u64 {
        self.node_area[v]
    }

    /// Total footprint area over all nodes.
    pub fn area(&self) -> u64 {
        self.node_area.iter().sum()
    }

    /// Largest single node area; 0 for an empty module.
    pub fn max_node_area(&self) -> u64 {
        self.node_area.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiger::parse_aag;
    use crate::netlist::Netlist;

    const HALF_ADDER: &str = "\
aag 7 2 0 2 3
2
4
6
12
6 13 15
12 2 4
14 3 5
";

    fn build(src: &str) -> Module {
        Module::from_netlist(&Netlist::from_aiger(&parse_aag(src).unwrap()))
    }

    #[test]
    fn test_half_adder_module() {
        let m = build(HALF_ADDER);
        assert_eq!(m.num_nodes(), 5);
        assert_eq!(m.num_edges(), 4);
        assert_eq!(m.area(), 3 * 18 + 2 * 3);
        assert_eq!(m.max_node_area(), 18);
        // The sum gate touches only single-member nets.
        assert!(m.incidence[0].is_empty());
        assert!(m.nodes[0].neighbors.is_empty());
    }

    #[test]
    fn test_edges_shared_by_incidence() {
        let m = build(HALF_ADDER);
        for (v, edges) in m.incidence.iter().enumerate() {
            for &e in edges {
                assert!(m.raw_edges[e].members.contains(&v));
            }
        }
        for (e, edge) in m.raw_edges.iter().enumerate() {
            assert!(edge.members.len() >= 2);
            for &v in &edge.members {
                assert!(m.incidence[v].contains(&e));
            }
        }
    }

    #[test]
    fn test_adjacency_symmetric() {
        let m = build(HALF_ADDER);
        for (v, node) in m.nodes.iter().enumerate() {
            for &w in &node.neighbors {
                assert_ne!(v, w);
                assert!(m.nodes[w].neighbors.contains(&v));
            }
        }
    }

    #[test]
    fn test_isolated_gates_have_no_edges() {
        let m = build("aag 6 4 0 2 2\n2\n4\n6\n8\n10\n12\n10 2 4\n12 6 8\n");
        assert_eq!(m.num_nodes(), 2);
        assert_eq!(m.num_edges(), 0);
    }

    #[test]
    fn test_chain_of_three() {
        // g1 -> g2 -> g3 through two shared nets.
        let m = build("aag 5 2 0 1 3\n2\n4\n10\n6 2 4\n8 6 4\n10 8 4\n");
        assert_eq!(m.num_nodes(), 3);
        // Shared nets: the two internal ones plus input y feeding all three.
        assert!(m.num_edges() >= 2);
        assert!(m.nodes[1].neighbors.contains(&0));
        assert!(m.nodes[1].neighbors.contains(&2));
    }

    #[test]
    fn test_empty_module() {
        let m = build("aag 0 0 0 0 0\n");
        assert_eq!(m.num_nodes(), 0);
        assert_eq!(m.area(), 0);
        assert_eq!(m.max_node_area(), 0);
    }
}
