// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! CLI for the heddle netlist bipartitioner.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use heddle::aiger::Aiger;
use heddle::dot;
use heddle::fm::fm_algorithm;
use heddle::module::Module;
use heddle::netlist::Netlist;
use heddle::partition::{Partition, PartitionError};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "heddle", about = "heddle — AIG netlist bipartitioner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition an AIGER netlist into two balanced halves.
    ///
    /// Reads a combinational `.aag` file, materialises the gate/net
    /// graph, and refines a BFS-seeded bipartition with FM passes until
    /// no positive-gain pass remains.
    Part(PartArgs),

    /// Dump the netlist as a Graphviz graph without partitioning.
    Dot(DotArgs),
}

#[derive(Parser)]
struct PartArgs {
    /// Input AIGER (.aag) path.
    input: PathBuf,

    /// Write a JSON report of the final partition.
    #[clap(long)]
    json: Option<PathBuf>,

    /// Write the partitioned netlist as a Graphviz graph with the two
    /// sides clustered and cut nets highlighted.
    #[clap(long)]
    dot: Option<PathBuf>,
}

#[derive(Parser)]
struct DotArgs {
    /// Input AIGER (.aag) path.
    input: PathBuf,

    /// Output Graphviz path.
    output: PathBuf,
}

#[derive(Serialize)]
struct SideReport {
    gates: Vec<String>,
    area: u64,
}

#[derive(Serialize)]
struct PartitionReport {
    left: SideReport,
    right: SideReport,
    cut_nets: Vec<String>,
    pass_gains: Vec<i64>,
}

fn load_netlist(input: &PathBuf) -> Netlist {
    let aig = Aiger::from_file(input).unwrap_or_else(|e| {
        clilog::error!("{}", e);
        std::process::exit(1);
    });
    if !aig.latches.is_empty() {
        clilog::warn!(
            "{} latches in {}: sequential logic is discarded",
            aig.latches.len(),
            input.display()
        );
    }
    let netlist = Netlist::from_aiger(&aig);
    clilog::info!(
        "netlist has {} gates, {} nets",
        netlist.num_gates(),
        netlist.num_nets()
    );
    netlist
}

fn cmd_part(args: PartArgs) {
    let netlist = load_netlist(&args.input);
    let module = Module::from_netlist(&netlist);
    clilog::info!(
        "module has {} nodes, {} hypernets, total area {}",
        module.num_nodes(),
        module.num_edges(),
        module.area()
    );

    let mut partition = match Partition::initial(&module) {
        Ok(p) => p,
        Err(PartitionError::EmptyModule) => {
            clilog::warn!("{}: nothing to partition", args.input.display());
            return;
        }
    };
    clilog::info!("seed cut {}", partition.cut_size());

    let timer_fm = clilog::stimer!("fm partition");
    let pass_gains = fm_algorithm(&mut partition);
    clilog::finish!(timer_fm);

    println!(
        "cut {} after {} passes; area L {} / R {}",
        partition.cut_size(),
        pass_gains.len(),
        partition.area_left(),
        partition.area_right()
    );

    if let Some(path) = &args.json {
        let side_report = |nodes: Vec<usize>| SideReport {
            area: nodes.iter().map(|&v| module.node_area(v)).sum(),
            gates: nodes.into_iter().map(|v| netlist.gates[v].name.clone()).collect(),
        };
        let report = PartitionReport {
            left: side_report(partition.left().collect()),
            right: side_report(partition.right().collect()),
            cut_nets: module
                .raw_edges
                .iter()
                .enumerate()
                .filter(|&(e, _)| partition.is_cut(e))
                .map(|(_, edge)| netlist.nets[edge.net].name.clone())
                .collect(),
            pass_gains,
        };
        let f = std::fs::File::create(path).expect("cannot create json report");
        serde_json::to_writer_pretty(std::io::BufWriter::new(f), &report)
            .expect("cannot write json report");
        clilog::info!("wrote report to {}", path.display());
    }

    if let Some(path) = &args.dot {
        std::fs::write(path, dot::partition_dot(&netlist, &partition))
            .expect("cannot write dot file");
        clilog::info!("wrote graph to {}", path.display());
    }
}

fn cmd_dot(args: DotArgs) {
    let netlist = load_netlist(&args.input);
    std::fs::write(&args.output, dot::netlist_dot(&netlist)).expect("cannot write dot file");
    clilog::info!("wrote graph to {}", args.output.display());
}

fn main() {
    clilog::init_stderr_color_debug();
    match Cli::parse().command {
        Commands::Part(args) => cmd_part(args),
        Commands::Dot(args) => cmd_dot(args),
    }
}
