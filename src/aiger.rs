// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Reader for the ASCII AIGER (`aag`) format.
//!
//! Parses the header `aag M I L O A`, the four body sections (inputs,
//! latches, outputs, and gates) and the optional symbol table. Latches
//! are parsed for completeness but the downstream netlist builder only
//! consumes the combinational part.

use indexmap::IndexMap;
use std::path::Path;

/// An AIGER literal: variable index shifted left once, low bit = negation.
/// Literal 0 is constant false, literal 1 is constant true.
pub type Lit = u64;

/// Variable index of a literal.
#[inline]
pub fn lit_var(l: Lit) -> u64 {
    l >> 1
}

/// Whether the literal carries the negation bit.
#[inline]
pub fn lit_is_negated(l: Lit) -> bool {
    l & 1 != 0
}

/// Whether the literal is one of the constants 0/1.
#[inline]
pub fn lit_is_const(l: Lit) -> bool {
    lit_var(l) == 0
}

/// A latch definition `q next`. The optional AIGER 1.9 reset value is
/// accepted on input and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latch {
    pub q: Lit,
    pub next: Lit,
}

/// An and-gate definition `out a b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AndGate {
    pub out: Lit,
    pub a: Lit,
    pub b: Lit,
}

/// Parsed AIGER file: header counts plus the four ordered body sections
/// and any symbol labels, keyed by position within their section.
#[derive(Debug, Default, PartialEq)]
pub struct Aiger {
    /// Maximum variable index declared in the header.
    pub max_var: u64,
    pub inputs: Vec<Lit>,
    pub latches: Vec<Latch>,
    pub outputs: Vec<Lit>,
    pub ands: Vec<AndGate>,
    /// Symbol labels from `i<n> <label>` lines.
    pub input_labels: IndexMap<usize, String>,
    /// Symbol labels from `l<n> <label>` lines.
    pub latch_labels: IndexMap<usize, String>,
    /// Symbol labels from `o<n> <label>` lines.
    pub output_labels: IndexMap<usize, String>,
}

impl Aiger {
    /// Read and parse an `.aag` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AigerError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AigerError::Io(format!("{}: {}", path.display(), e)))?;
        parse_aag(&content)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AigerError {
    /// The input has no header line (or the header is incomplete).
    MissingHeader,
    /// The header does not start with the `aag` magic.
    NoMagic,
    /// More than five header numbers: AIGER 1.9 binary extensions.
    UnsupportedVersion(usize),
    /// A literal exceeds the `2 * max_var + 1` bound from the header.
    TooManyLiterals(Lit),
    /// Malformed body line (non-numeric token, wrong arity, bad polarity).
    BadLiteral(String, usize),
    /// The body ended before all declared sections were read.
    UnexpectedEof,
    /// Symbol line target is not one of `i`, `o`, `l`.
    InvalidSymbolTarget(char),
    /// Symbol line shorter than target-plus-index.
    SymbolTooShort(String),
    /// Symbol line has a target but no index digits.
    SymbolMissingIndex(String),
    /// Symbol line has no label after the index.
    SymbolMissingLabel(String),
    /// Symbol index is non-numeric or out of range for its section.
    SymbolInvalidIndex(String),
    Io(String),
}

impl std::fmt::Display for AigerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AigerError::MissingHeader => write!(f, "aag: missing or incomplete header"),
            AigerError::NoMagic => write!(f, "aag: header does not start with 'aag'"),
            AigerError::UnsupportedVersion(n) => {
                write!(f, "aag: {} header fields, binary 1.9 extensions unsupported", n)
            }
            AigerError::TooManyLiterals(l) => {
                write!(f, "aag: literal {} exceeds declared variable count", l)
            }
            AigerError::BadLiteral(msg, line) => {
                write!(f, "aag syntax error at line {}: {}", line, msg)
            }
            AigerError::UnexpectedEof => write!(f, "aag: unexpected end of file in body"),
            AigerError::InvalidSymbolTarget(c) => {
                write!(f, "aag: symbol target '{}', expected i/o/l", c)
            }
            AigerError::SymbolTooShort(s) => write!(f, "aag: symbol line '{}' too short", s),
            AigerError::SymbolMissingIndex(s) => {
                write!(f, "aag: symbol line '{}' has no index", s)
            }
            AigerError::SymbolMissingLabel(s) => {
                write!(f, "aag: symbol line '{}' has no label", s)
            }
            AigerError::SymbolInvalidIndex(s) => {
                write!(f, "aag: symbol line '{}' has an invalid index", s)
            }
            AigerError::Io(msg) => write!(f, "aag I/O error: {}", msg),
        }
    }
}

impl std::error::Error for AigerError {}

struct Header {
    max_var: u64,
    num_inputs: usize,
    num_latches: usize,
    num_outputs: usize,
    num_ands: usize,
}

fn parse_header(line: &str, line_no: usize) -> Result<Header, AigerError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens[0] != "aag" {
        return Err(AigerError::NoMagic);
    }
    if tokens.len() > 6 {
        return Err(AigerError::UnsupportedVersion(tokens.len() - 1));
    }
    if tokens.len() < 6 {
        return Err(AigerError::MissingHeader);
    }
    let mut nums = [0u64; 5];
    for (i, tok) in tokens[1..].iter().enumerate() {
        nums[i] = tok.parse::<u64>().map_err(|_| {
            AigerError::BadLiteral(format!("header field '{}' is not a number", tok), line_no)
        })?;
    }
    Ok(Header {
        max_var: nums[0],
        num_inputs: nums[1] as usize,
        num_latches: nums[2] as usize,
        num_outputs: nums[3] as usize,
        num_ands: nums[4] as usize,
    })
}

fn parse_lit(tok: &str, max_var: u64, line_no: usize) -> Result<Lit, AigerError> {
    let l = tok
        .parse::<u64>()
        .map_err(|_| AigerError::BadLiteral(format!("'{}' is not a literal", tok), line_no))?;
    if l > 2 * max_var + 1 {
        return Err(AigerError::TooManyLiterals(l));
    }
    Ok(l)
}

/// Parse the ASCII AIGER format from a string.
///
/// Empty lines in the body are skipped and `# ...` trailing comments are
/// stripped everywhere. The optional symbol section runs until a line
/// starting with `c` (or the end of input); everything after `c` is the
/// free-form comment section and is ignored.
pub fn parse_aag(content: &str) -> Result<Aiger, AigerError> {
    // Pre-clean: drop comments and blank lines, keep 1-based line numbers.
    let mut lines: Vec<(usize, &str)> = Vec::new();
    for (i, raw) in content.lines().enumerate() {
        let line = match raw.find('#') {
            Some(p) => &raw[..p],
            None => raw,
        };
        let line = line.trim();
        if !line.is_empty() {
            lines.push((i + 1, line));
        }
    }
    let mut it = lines.into_iter();

    let (hline_no, hline) = it.next().ok_or(AigerError::MissingHeader)?;
    let header = parse_header(hline, hline_no)?;

    let mut aig = Aiger {
        max_var: header.max_var,
        ..Default::default()
    };

    for _ in 0..header.num_inputs {
        let (no, line) = it.next().ok_or(AigerError::UnexpectedEof)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 1 {
            return Err(AigerError::BadLiteral(
                format!("input line has {} tokens, expected 1", tokens.len()),
                no,
            ));
        }
        let l = parse_lit(tokens[0], header.max_var, no)?;
        if lit_is_negated(l) || lit_is_const(l) {
            return Err(AigerError::BadLiteral(
                format!("input literal {} must be an unnegated variable", l),
                no,
            ));
        }
        aig.inputs.push(l);
    }

    for _ in 0..header.num_latches {
        let (no, line) = it.next().ok_or(AigerError::UnexpectedEof)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 || tokens.len() > 3 {
            return Err(AigerError::BadLiteral(
                format!("latch line has {} tokens, expected 2 or 3", tokens.len()),
                no,
            ));
        }
        let q = parse_lit(tokens[0], header.max_var, no)?;
        let next = parse_lit(tokens[1], header.max_var, no)?;
        if lit_is_negated(q) || lit_is_const(q) {
            return Err(AigerError::BadLiteral(
                format!("latch output {} must be an unnegated variable", q),
                no,
            ));
        }
        if tokens.len() == 3 {
            // AIGER 1.9 reset value; accepted, not kept.
            tokens[2].parse::<u64>().map_err(|_| {
                AigerError::BadLiteral(format!("latch reset '{}' is not a number", tokens[2]), no)
            })?;
        }
        aig.latches.push(Latch { q, next });
    }

    for _ in 0..header.num_outputs {
        let (no, line) = it.next().ok_or(AigerError::UnexpectedEof)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 1 {
            return Err(AigerError::BadLiteral(
                format!("output line has {} tokens, expected 1", tokens.len()),
                no,
            ));
        }
        aig.outputs.push(parse_lit(tokens[0], header.max_var, no)?);
    }

    for _ in 0..header.num_ands {
        let (no, line) = it.next().ok_or(AigerError::UnexpectedEof)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 3 {
            return Err(AigerError::BadLiteral(
                format!("and line has {} tokens, expected 3", tokens.len()),
                no,
            ));
        }
        let out = parse_lit(tokens[0], header.max_var, no)?;
        let a = parse_lit(tokens[1], header.max_var, no)?;
        let b = parse_lit(tokens[2], header.max_var, no)?;
        if lit_is_negated(out) || lit_is_const(out) {
            return Err(AigerError::BadLiteral(
                format!("and output {} must be an unnegated variable", out),
                no,
            ));
        }
        aig.ands.push(AndGate { out, a, b });
    }

    // Optional symbol section, terminated by the `c` comment section.
    for (_, line) in it {
        if line.starts_with('c') {
            break;
        }
        parse_symbol_line(line, &mut aig)?;
    }

    Ok(aig)
}

fn parse_symbol_line(line: &str, aig: &mut Aiger) -> Result<(), AigerError> {
    let target = line.chars().next().unwrap();
    if !matches!(target, 'i' | 'o' | 'l') {
        return Err(AigerError::InvalidSymbolTarget(target));
    }
    if line.len() < 2 {
        return Err(AigerError::SymbolTooShort(line.to_string()));
    }
    let head = line.split_whitespace().next().unwrap();
    let idx_str = &head[1..];
    if idx_str.is_empty() {
        return Err(AigerError::SymbolMissingIndex(line.to_string()));
    }
    let idx = idx_str
        .parse::<usize>()
        .map_err(|_| AigerError::SymbolInvalidIndex(line.to_string()))?;
    let label = line[head.len()..].trim();
    if label.is_empty() {
        return Err(AigerError::SymbolMissingLabel(line.to_string()));
    }
    let (map, count) = match target {
        'i' => (&mut aig.input_labels, aig.inputs.len()),
        'o' => (&mut aig.output_labels, aig.outputs.len()),
        _ => (&mut aig.latch_labels, aig.latches.len()),
    };
    if idx >= count {
        return Err(AigerError::SymbolInvalidIndex(line.to_string()));
    }
    map.insert(idx, label.to_string());
    Ok(())
}
