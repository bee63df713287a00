// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Front-end of a spatial-mapping pipeline: reads a combinational AIGER,
//! lifts it into a gate/net graph, and bipartitions it with the
//! Fiduccia–Mattheyses heuristic.

pub mod aiger;

pub mod netlist;

pub mod module;

pub mod partition;

pub mod fm;

pub mod dot;
