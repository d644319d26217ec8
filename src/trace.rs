//! Scripted branch traces.
//!
//! A text trace has one record per line:
//!
//! ```text
//! # pc     outcome  target
//! 0b1100   T        0b10100
//! 0x3      N
//! ```
//!
//! Numbers may be decimal, `0x` hexadecimal or `0b` binary. A taken record
//! may omit its target. Everything after `#` is ignored.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::branch::*;

/// Errors produced while loading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("line {line}: {kind}")]
    Parse {
        line: usize,
        kind: ParseErrorKind,
    },
}

/// The reason a single trace line was rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("expected '<pc> <outcome> [target]'")]
    MissingOutcome,

    #[error("invalid address '{0}'")]
    BadNumber(String),

    #[error("invalid outcome '{0}' (expected T/N/1/0)")]
    BadOutcome(String),

    #[error("unexpected trailing field '{0}'")]
    TrailingField(String),
}

/// Parse an address written in decimal, hexadecimal (`0x`) or binary (`0b`).
pub fn parse_address(s: &str) -> Result<usize, ParseErrorKind> {
    let digits: String = s.chars().filter(|c| *c != '_').collect();
    let lower = digits.to_ascii_lowercase();
    let res = if let Some(hex) = lower.strip_prefix("0x") {
        usize::from_str_radix(hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        usize::from_str_radix(bin, 2)
    } else {
        lower.parse::<usize>()
    };
    res.map_err(|_| ParseErrorKind::BadNumber(s.to_string()))
}

/// Parse a branch outcome.
pub fn parse_outcome(s: &str) -> Result<Outcome, ParseErrorKind> {
    match s.to_ascii_lowercase().as_str() {
        "t" | "1" | "taken" => Ok(Outcome::T),
        "n" | "0" | "not-taken" | "nt" => Ok(Outcome::N),
        _ => Err(ParseErrorKind::BadOutcome(s.to_string())),
    }
}

/// Parse a single line. Returns `None` for blank lines and comments.
fn parse_line(line: &str) -> Result<Option<BranchRecord>, ParseErrorKind> {
    let content = match line.split_once('#') {
        Some((before, _)) => before,
        None => line,
    };
    let fields = content.split_whitespace().collect_vec();
    let (pc, outcome, tgt) = match fields.as_slice() {
        [] => return Ok(None),
        [_] => return Err(ParseErrorKind::MissingOutcome),
        [pc, outcome] => (pc, outcome, None),
        [pc, outcome, tgt] => (pc, outcome, Some(tgt)),
        [_, _, _, extra, ..] => {
            return Err(ParseErrorKind::TrailingField(extra.to_string()))
        },
    };
    let pc = parse_address(pc)?;
    let outcome = parse_outcome(outcome)?;
    let tgt = tgt.map(|t| parse_address(t)).transpose()?;
    Ok(Some(BranchRecord::new(pc, outcome, tgt)))
}

/// An ordered list of branch records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace {
    name: String,
    records: Vec<BranchRecord>,
}
impl Trace {
    pub fn new(name: impl ToString, records: Vec<BranchRecord>) -> Self {
        Self { name: name.to_string(), records }
    }

    /// The six-branch reference trace: a branch at `0b1100` which is taken
    /// to `0b10100` twice and then falls through, interleaved with three
    /// other branches.
    pub fn reference() -> Self {
        Self::new("reference", vec![
            BranchRecord::taken(0b1100, 0b10100),
            BranchRecord::not_taken(0b0011),
            BranchRecord::taken(0b1010, 0b11110),
            BranchRecord::not_taken(0b0101),
            BranchRecord::taken(0b1100, 0b10100),
            BranchRecord::not_taken(0b1100),
        ])
    }

    /// Generate `len` records drawn from `num_pcs` distinct branches.
    ///
    /// Each branch has a fixed target and a fixed bias towards being taken,
    /// so the trace has learnable structure. The same seed always produces
    /// the same trace.
    pub fn random(len: usize, num_pcs: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let num_pcs = num_pcs.max(1);
        let branches: Vec<(usize, usize, f64)> = (0..num_pcs)
            .map(|_| {
                let pc = rng.gen_range(0..0x1_0000usize);
                let tgt = rng.gen_range(0..0x1_0000usize);
                let bias = rng.gen_range(0.0..=1.0);
                (pc, tgt, bias)
            })
            .collect();

        let records = (0..len)
            .map(|_| {
                let (pc, tgt, bias) = branches[rng.gen_range(0..num_pcs)];
                if rng.gen_bool(bias) {
                    BranchRecord::taken(pc, tgt)
                } else {
                    BranchRecord::not_taken(pc)
                }
            })
            .collect();
        Self::new(format!("random-{}", seed), records)
    }

    /// Read a text trace from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            TraceError::Io { path: path.to_path_buf(), source }
        })?;
        let mut trace: Trace = text.parse()?;
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            trace.name = name.to_string();
        }
        Ok(trace)
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn records(&self) -> &[BranchRecord] { &self.records }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn iter(&self) -> std::slice::Iter<'_, BranchRecord> {
        self.records.iter()
    }
}

impl FromStr for Trace {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut records = Vec::new();
        for (num, line) in s.lines().enumerate() {
            let res = parse_line(line).map_err(|kind| {
                TraceError::Parse { line: num + 1, kind }
            })?;
            records.extend(res);
        }
        Ok(Self::new("trace", records))
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a BranchRecord;
    type IntoIter = std::slice::Iter<'a, BranchRecord>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}
