// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Benchmarks for the FM partitioning core.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use heddle::aiger::parse_aag;
use heddle::fm::fm_algorithm;
use heddle::module::Module;
use heddle::netlist::Netlist;
use heddle::partition::Partition;

/// Deterministic synthetic AIG with shared fanouts and mixed polarities.
fn synth_aag(num_inputs: usize, num_ands: usize) -> String {
    let max_var = num_inputs + num_ands;
    let mut s = format!("aag {} {} 0 1 {}\n", max_var, num_inputs, num_ands);
    for i in 0..num_inputs {
        s.push_str(&format!("{}\n", 2 * (i + 1)));
    }
    s.push_str(&format!("{}\n", 2 * max_var));
    for i in 0..num_ands {
        let out = num_inputs + 1 + i;
        let av = 1 + (i * 7 + 3) % (out - 1);
        let bv = 1 + (i * 5 + 1) % (out - 1);
        let an = (i / 3) & 1;
        let bn = (i >> 2) & 1;
        s.push_str(&format!("{} {} {}\n", 2 * out, 2 * av + an, 2 * bv + bn));
    }
    s
}

fn bench_fm(c: &mut Criterion) {
    let mut group = c.benchmark_group("fm");

    for num_ands in [64, 256, 1024] {
        let src = synth_aag(16, num_ands);
        let netlist = Netlist::from_aiger(&parse_aag(&src).unwrap());
        let module = Module::from_netlist(&netlist);

        group.bench_with_input(
            BenchmarkId::new("fm_algorithm", num_ands),
            &module,
            |b, m| {
                b.iter(|| {
                    let mut p = Partition::initial(m).unwrap();
                    black_box(fm_algorithm(&mut p));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_fm);
criterion_main!(benches);
