// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Gate/net graph lifted from an AIGER.
//!
//! Nets are interned per signal polarity: the tag of the unnegated
//! polarity of variable `v` is `(v << 1) | 1`, the negated polarity is
//! `v << 1`, and the constants keep tags 0 and 1. An inverter gate is
//! materialised between the two polarity nets of a variable the moment
//! both polarities have been consumed as and-gate fanins, and for any
//! negated polarity a primary output references, so every polarity in
//! active use has a concrete driver and each pair is connected through
//! exactly one INV.

use crate::aiger::{lit_is_const, lit_is_negated, lit_var, Aiger, Lit};
use indexmap::IndexMap;
use smallvec::{smallvec, SmallVec};
use std::collections::HashMap;

/// Dense handle into [`Netlist::gates`]. Stable for the netlist lifetime.
pub type GateId = usize;
/// Dense handle into [`Netlist::nets`]. Stable for the netlist lifetime.
pub type NetId = usize;

/// Polarity-aware net tag for a literal.
#[inline]
pub fn net_tag(l: Lit) -> u64 {
    if lit_is_const(l) {
        l
    } else {
        l ^ 1
    }
}

/// Atomic combinational element kinds. The kind fixes the pin arity and
/// the physical footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    Inv,
    And2,
}

impl GateKind {
    /// Physical footprint `(w, h)`.
    pub fn footprint(self) -> (u64, u64) {
        match self {
            GateKind::Inv => (1, 3),
            GateKind::And2 => (6, 3),
        }
    }

    pub fn area(self) -> u64 {
        let (w, h) = self.footprint();
        w * h
    }

    pub fn num_inputs(self) -> usize {
        match self {
            GateKind::Inv => 1,
            GateKind::And2 => 2,
        }
    }

    pub fn num_outputs(self) -> usize {
        1
    }
}

/// One placed-to-be gate instance.
#[derive(Debug, Clone)]
pub struct Gate {
    pub kind: GateKind,
    /// Symbolic label for diagnostics and dumps.
    pub name: String,
    pub inputs: SmallVec<[NetId; 2]>,
    pub outputs: SmallVec<[NetId; 1]>,
}

impl Gate {
    pub fn area(&self) -> u64 {
        self.kind.area()
    }
}

/// One equipotential connection, unique per polarity tag.
#[derive(Debug, Clone)]
pub struct Net {
    pub tag: u64,
    pub name: String,
    /// Gates electrically on this net. A gate appears at most once even
    /// when it touches the net through several pins.
    pub binds: Vec<GateId>,
    /// Construction-only: this polarity has been consumed as a fanin.
    used_as_fanin: bool,
    /// Construction-only: the INV between this net and its complement
    /// has been materialised.
    has_inverted_net: bool,
}

/// Ordered gate and net storage. Read-only after construction.
#[derive(Debug, Default)]
pub struct Netlist {
    pub gates: Vec<Gate>,
    pub nets: Vec<Net>,
    /// Tag interner; enforces net-tag uniqueness.
    nets_check: IndexMap<u64, NetId>,
}

impl Netlist {
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn num_nets(&self) -> usize {
        self.nets.len()
    }

    /// Look up a net by polarity tag.
    pub fn net_by_tag(&self, tag: u64) -> Option<NetId> {
        self.nets_check.get(&tag).copied()
    }

    /// Build the gate/net graph for the combinational part of an AIGER.
    /// Latches are discarded.
    pub fn from_aiger(aig: &Aiger) -> Netlist {
        let mut b = Builder {
            nl: Netlist::default(),
            var_names: HashMap::new(),
        };
        for (idx, &l) in aig.inputs.iter().enumerate() {
            if let Some(label) = aig.input_labels.get(&idx) {
                b.var_names.insert(lit_var(l), label.clone());
            }
        }

        for &l in aig.inputs.iter().chain(aig.outputs.iter()) {
            b.add_or_get_net(net_tag(l));
        }

        for and in &aig.ands {
            let out = b.add_or_get_net(net_tag(and.out));
            let a = b.add_or_get_net(net_tag(and.a));
            let bn = b.add_or_get_net(net_tag(and.b));
            if !lit_is_const(and.a) {
                b.add_negated_net(and.a);
            }
            if !lit_is_const(and.b) {
                b.add_negated_net(and.b);
            }
            let name = format!("and_{}", b.base_name(lit_var(and.out)));
            let gate = b.nl.push_gate(Gate {
                kind: GateKind::And2,
                name,
                inputs: smallvec![a, bn],
                outputs: smallvec![out],
            });
            b.nl.bind(a, gate);
            b.nl.bind(bn, gate);
            b.nl.bind(out, gate);
        }

        // A negated primary output references the inverted polarity
        // directly; make sure that net has a driver even when no
        // and-gate fanin materialised the pair.
        for &l in &aig.outputs {
            if !lit_is_const(l) && lit_is_negated(l) {
                b.ensure_output_inverter(l);
            }
        }

        b.nl
    }

    fn push_gate(&mut self, gate: Gate) -> GateId {
        self.gates.push(gate);
        self.gates.len() - 1
    }

    /// Record `gate` on `net.binds` unless the gate's previous pin
    /// already did (a gate binding the same net twice in a row).
    fn bind(&mut self, net: NetId, gate: GateId) {
        let binds = &mut self.nets[net].binds;
        if binds.last() != Some(&gate) {
            binds.push(gate);
        }
    }

    /// Validate the netlist invariants: tag uniqueness, gate↔net bind
    /// symmetry, and kind-determined pin arity.
    pub fn check(&self) -> Result<(), String> {
        for (i, net) in self.nets.iter().enumerate() {
            if self.nets_check.get(&net.tag) != Some(&i) {
                return Err(format!("net {} tag {} not uniquely interned", i, net.tag));
            }
        }
        for (g, gate) in self.gates.iter().enumerate() {
            if gate.inputs.len() != gate.kind.num_inputs()
                || gate.outputs.len() != gate.kind.num_outputs()
            {
                return Err(format!("gate {} has wrong arity for {:?}", g, gate.kind));
            }
            for &n in gate.inputs.iter().chain(gate.outputs.iter()) {
                let count = self.nets[n].binds.iter().filter(|&&x| x == g).count();
                if count != 1 {
                    return Err(format!(
                        "gate {} bound {} times on net {}, expected once",
                        g, count, n
                    ));
                }
            }
        }
        for (n, net) in self.nets.iter().enumerate() {
            for &g in &net.binds {
                let gate = &self.gates[g];
                if !gate.inputs.contains(&n) && !gate.outputs.contains(&n) {
                    return Err(format!("net {} binds gate {} without a pin", n, g));
                }
            }
        }
        Ok(())
    }
}

struct Builder {
    nl: Netlist,
    var_names: HashMap<u64, String>,
}

impl Builder {
    fn base_name(&self, var: u64) -> String {
        match self.var_names.get(&var) {
            Some(name) => name.clone(),
            None => format!("v{}", var),
        }
    }

    fn net_name(&self, tag: u64) -> String {
        match tag {
            0 => "const0".to_string(),
            1 => "const1".to_string(),
            t if t & 1 == 1 => self.base_name(t >> 1),
            t => format!("{}_b", self.base_name(t >> 1)),
        }
    }

    fn add_or_get_net(&mut self, tag: u64) -> NetId {
        if let Some(&id) = self.nl.nets_check.get(&tag) {
            return id;
        }
        let id = self.nl.nets.len();
        self.nl.nets.push(Net {
            tag,
            name: self.net_name(tag),
            binds: Vec::new(),
            used_as_fanin: false,
            has_inverted_net: false,
        });
        self.nl.nets_check.insert(tag, id);
        id
    }

    /// Intern the inverse-polarity net of fanin literal `l` and, once
    /// both polarities of the variable have been seen as fanins,
    /// materialise the single INV driving the negated net from the
    /// unnegated one.
    fn add_negated_net(&mut self, l: Lit) {
        let tag = net_tag(l);
        let this = self.add_or_get_net(tag);
        let comp = self.add_or_get_net(tag ^ 1);
        self.nl.nets[this].used_as_fanin = true;
        if self.nl.nets[comp].used_as_fanin && !self.nl.nets[this].has_inverted_net {
            self.materialise_inverter(tag, this, comp);
        }
    }

    /// Give the negated polarity referenced by output literal `l` a
    /// driver. Negated nets are only ever driven by an INV, so an output
    /// like `3` (not-x) would otherwise leave its net gateless when no
    /// and-gate fanin triggers the inversion pair.
    fn ensure_output_inverter(&mut self, l: Lit) {
        let tag = net_tag(l);
        let this = self.add_or_get_net(tag);
        let comp = self.add_or_get_net(tag ^ 1);
        if !self.nl.nets[this].has_inverted_net {
            self.materialise_inverter(tag, this, comp);
        }
    }

    /// Create the single INV between a polarity pair, binding both nets.
    /// The `has_inverted_net` flag on both sides keeps it unique.
    fn materialise_inverter(&mut self, tag: u64, this: NetId, comp: NetId) {
        let var = tag >> 1;
        let (unneg, neg) = if tag & 1 == 1 { (this, comp) } else { (comp, this) };
        let name = format!("inv_{}", self.base_name(var));
        let gate = self.nl.push_gate(Gate {
            kind: GateKind::Inv,
            name,
            inputs: smallvec![unneg],
            outputs: smallvec![neg],
        });
        self.nl.bind(unneg, gate);
        self.nl.bind(neg, gate);
        self.nl.nets[this].has_inverted_net = true;
        self.nl.nets[comp].has_inverted_net = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiger::parse_aag;

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

    fn kind_count(nl: &Netlist, kind: GateKind) -> usize {
        nl.gates.iter().filter(|g| g.kind == kind).count()
    }

    #[test]
    fn test_half_adder_gates() {
        let nl = Netlist::from_aiger(&parse_aag(HALF_ADDER).unwrap());
        assert_eq!(nl.num_gates(), 5);
        assert_eq!(kind_count(&nl, GateKind::And2), 3);
        assert_eq!(kind_count(&nl, GateKind::Inv), 2);
        nl.check().unwrap();
    }

    #[test]
    fn test_half_adder_inverters_drive_input_polarity() {
        let nl = Netlist::from_aiger(&parse_aag(HALF_ADDER).unwrap());
        // Inverters exist exactly for the two primary inputs x and y,
        // from the unnegated net to the negated one.
        for gate in nl.gates.iter().filter(|g| g.kind == GateKind::Inv) {
            let tag_in = nl.nets[gate.inputs[0]].tag;
            let tag_out = nl.nets[gate.outputs[0]].tag;
            assert_eq!(tag_in & 1, 1);
            assert_eq!(tag_out, tag_in ^ 1);
            assert!(tag_in >> 1 == 1 || tag_in >> 1 == 2);
        }
    }

    #[test]
    fn test_tag_uniqueness() {
        let nl = Netlist::from_aiger(&parse_aag(HALF_ADDER).unwrap());
        let mut tags: Vec<u64> = nl.nets.iter().map(|n| n.tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), nl.num_nets());
    }

    #[test]
    fn test_single_inverter_for_both_polarities() {
        // One and gate consuming both polarities of the same variable.
        let src = "aag 3 1 0 1 1\n2\n6\n6 2 3\n";
        let nl = Netlist::from_aiger(&parse_aag(src).unwrap());
        assert_eq!(kind_count(&nl, GateKind::Inv), 1);
        assert_eq!(kind_count(&nl, GateKind::And2), 1);
        assert_eq!(nl.num_nets(), 3);
        let inv = nl.gates.iter().find(|g| g.kind == GateKind::Inv).unwrap();
        assert_eq!(nl.nets[inv.inputs[0]].tag, 3);
        assert_eq!(nl.nets[inv.outputs[0]].tag, 2);
        nl.check().unwrap();
    }

    #[test]
    fn test_negated_output_materialises_inverter() {
        // Pure inverter: the output is the negated polarity of the
        // input and nothing else references it.
        let src = "aag 1 1 0 1 0\n2\n3\n";
        let nl = Netlist::from_aiger(&parse_aag(src).unwrap());
        assert_eq!(nl.num_gates(), 1);
        assert_eq!(kind_count(&nl, GateKind::Inv), 1);
        let inv = &nl.gates[0];
        assert_eq!(nl.nets[inv.inputs[0]].tag, 3);
        assert_eq!(nl.nets[inv.outputs[0]].tag, 2);
        let out = nl.net_by_tag(2).unwrap();
        assert_eq!(nl.nets[out].binds.len(), 1);
        nl.check().unwrap();
    }

    #[test]
    fn test_negated_output_reuses_fanin_inverter() {
        // The and gate already forces the inverter for x; the negated
        // output must not add a second one.
        let src = "aag 3 1 0 2 1\n2\n3\n6\n6 2 3\n";
        let nl = Netlist::from_aiger(&parse_aag(src).unwrap());
        assert_eq!(kind_count(&nl, GateKind::Inv), 1);
        assert_eq!(nl.num_gates(), 2);
        nl.check().unwrap();
    }

    #[test]
    fn test_no_inverter_for_single_polarity() {
        // Two isolated and gates, all fanins positive.
        let src = "aag 6 4 0 2 2\n2\n4\n6\n8\n10\n12\n10 2 4\n12 6 8\n";
        let nl = Netlist::from_aiger(&parse_aag(src).unwrap());
        assert_eq!(kind_count(&nl, GateKind::Inv), 0);
        assert_eq!(nl.num_gates(), 2);
        nl.check().unwrap();
    }

    #[test]
    fn test_constant_fanin() {
        let src = "aag 2 1 0 1 1\n2\n4\n4 2 0\n";
        let nl = Netlist::from_aiger(&parse_aag(src).unwrap());
        assert_eq!(kind_count(&nl, GateKind::Inv), 0);
        let c0 = nl.net_by_tag(0).unwrap();
        assert_eq!(nl.nets[c0].binds.len(), 1);
        nl.check().unwrap();
    }

    #[test]
    fn test_same_net_twice_binds_once() {
        // a AND a: the gate touches the net through both input pins.
        let src = "aag 2 1 0 1 1\n2\n4\n4 2 2\n";
        let nl = Netlist::from_aiger(&parse_aag(src).unwrap());
        let a = nl.net_by_tag(3).unwrap();
        assert_eq!(nl.nets[a].binds.len(), 1);
        nl.check().unwrap();
    }

    #[test]
    fn test_net_names_from_symbols() {
        let nl = Netlist::from_aiger(&parse_aag(HALF_ADDER).unwrap());
        let x = nl.net_by_tag(3).unwrap();
        let x_b = nl.net_by_tag(2).unwrap();
        assert_eq!(nl.nets[x].name, "x");
        assert_eq!(nl.nets[x_b].name, "x_b");
    }

    #[test]
    fn test_renumbered_graph_is_isomorphic() {
        // The same half adder with renumbered variables and the
        // positive-fanin gate listed first. Gate/net structure must
        // match up to handle renumbering.
        let renumbered = "aag 5 2 0 2 3\n2\n4\n10\n6\n6 2 4\n8 3 5\n10 7 9\n";
        let a = Netlist::from_aiger(&parse_aag(HALF_ADDER).unwrap());
        let b = Netlist::from_aiger(&parse_aag(renumbered).unwrap());
        assert_eq!(a.num_gates(), b.num_gates());
        assert_eq!(kind_count(&a, GateKind::And2), kind_count(&b, GateKind::And2));
        assert_eq!(kind_count(&a, GateKind::Inv), kind_count(&b, GateKind::Inv));
        let bind_profile = |nl: &Netlist| {
            let mut sizes: Vec<usize> = nl
                .nets
                .iter()
                .map(|n| n.binds.len())
                .filter(|&s| s >= 2)
                .collect();
            sizes.sort_unstable();
            sizes
        };
        assert_eq!(bind_profile(&a), bind_profile(&b));
    }

    #[test]
    fn test_gate_node_order_stable() {
        // The two inverters materialise while the third and gate's
        // fanins are processed, before the gate itself is appended.
        let nl = Netlist::from_aiger(&parse_aag(HALF_ADDER).unwrap());
        let kinds: Vec<GateKind> = nl.gates.iter().map(|g| g.kind).collect();
        assert_eq!(
            kinds,
            vec![
                GateKind::And2,
                GateKind::And2,
                GateKind::Inv,
                GateKind::Inv,
                GateKind::And2
            ]
        );
    }
}
