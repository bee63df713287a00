// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Graphviz dumps of the netlist, plain or coloured by partition side.

use crate::netlist::{GateKind, NetId, Netlist};
use crate::partition::{Partition, Side};
use std::fmt::Write;

const AND_NODE_FORMAT: &str = "shape=box";
const INV_NODE_FORMAT: &str = "shape=invtriangle";
const SOURCE_NODE_FORMAT: &str = "shape=plaintext";
const CUT_EDGE_FORMAT: &str = "color=red, style=bold";

fn gate_format(kind: GateKind) -> &'static str {
    match kind {
        GateKind::And2 => AND_NODE_FORMAT,
        GateKind::Inv => INV_NODE_FORMAT,
    }
}

/// The gate driving a net, if any.
fn driver_of(netlist: &Netlist, net: NetId) -> Option<usize> {
    netlist.nets[net]
        .binds
        .iter()
        .copied()
        .find(|&g| netlist.gates[g].outputs.contains(&net))
}

fn write_net_edges(out: &mut String, netlist: &Netlist, net: NetId, attr: &str) {
    let n = &netlist.nets[net];
    if n.binds.is_empty() {
        return;
    }
    let source = match driver_of(netlist, net) {
        Some(g) => format!("g{}", g),
        None => {
            // Driverless net (primary input or unconnected polarity):
            // give it a plaintext source node carrying the net name.
            let _ = writeln!(out, "  \"{}\" [{}];", n.name, SOURCE_NODE_FORMAT);
            format!("\"{}\"", n.name)
        }
    };
    for &g in &n.binds {
        if !netlist.gates[g].inputs.contains(&net) {
            continue;
        }
        let _ = writeln!(
            out,
            "  {} -> g{} [label=\"{}\"{}{}];",
            source,
            g,
            n.name,
            if attr.is_empty() { "" } else { ", " },
            attr
        );
    }
}

/// Render the gate/net graph as Graphviz.
pub fn netlist_dot(netlist: &Netlist) -> String {
    let mut out = String::from("digraph netlist {\n  rankdir=LR;\n");
    for (g, gate) in netlist.gates.iter().enumerate() {
        let _ = writeln!(
            out,
            "  g{} [label=\"{}\", {}];",
            g,
            gate.name,
            gate_format(gate.kind)
        );
    }
    for net in 0..netlist.num_nets() {
        write_net_edges(&mut out, netlist, net, "");
    }
    out.push_str("}\n");
    out
}

/// Render the netlist with the two partition sides as clusters and cut
/// nets highlighted.
pub fn partition_dot(netlist: &Netlist, partition: &Partition) -> String {
    let mut out = String::from("digraph partition {\n  rankdir=LR;\n");
    for (name, side) in [("left", Side::Left), ("right", Side::Right)] {
        let _ = writeln!(out, "  subgraph cluster_{} {{", name);
        let _ = writeln!(out, "    label=\"{}\";", name);
        let nodes: Box<dyn Iterator<Item = usize> + '_> = match side {
            Side::Left => Box::new(partition.left()),
            Side::Right => Box::new(partition.right()),
        };
        for v in nodes {
            let gate = &netlist.gates[v];
            let _ = writeln!(
                out,
                "    g{} [label=\"{}\", {}];",
                v,
                gate.name,
                gate_format(gate.kind)
            );
        }
        out.push_str("  }\n");
    }
    // A net is cut when its bound gates straddle the sides.
    for (net_id, net) in netlist.nets.iter().enumerate() {
        let cut = net
            .binds
            .windows(2)
            .any(|w| partition.side_of(w[0]) != partition.side_of(w[1]));
        write_net_edges(&mut out, netlist, net_id, if cut { CUT_EDGE_FORMAT } else { "" });
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiger::parse_aag;
    use crate::module::Module;

    const HALF_ADDER: &str = "\
aag 7 2 0 2 3
2
4
6
12
6 13 15
12 2 4
14 3 5
i0 x
i1 y
";

    #[test]
    fn test_netlist_dot_mentions_every_gate() {
        let nl = Netlist::from_aiger(&parse_aag(HALF_ADDER).unwrap());
        let dot = netlist_dot(&nl);
        assert!(dot.starts_with("digraph netlist {"));
        for g in 0..nl.num_gates() {
            assert!(dot.contains(&format!("g{} [", g)));
        }
        assert!(dot.contains("inv_x"));
        assert!(dot.contains("\"x\" [shape=plaintext]"));
    }

    #[test]
    fn test_partition_dot_has_clusters() {
        let nl = Netlist::from_aiger(&parse_aag(HALF_ADDER).unwrap());
        let module = Module::from_netlist(&nl);
        let p = Partition::initial(&module).unwrap();
        let dot = partition_dot(&nl, &p);
        assert!(dot.contains("subgraph cluster_left"));
        assert!(dot.contains("subgraph cluster_right"));
        // The initial seed cuts the two input nets.
        assert!(dot.contains(CUT_EDGE_FORMAT));
    }
}
