//! Implementation of a gshare branch predictor and its tables.

pub mod table;
pub mod counter;
pub mod bht;
pub mod pht;
pub mod btb;
pub mod gshare;

pub use table::*;
pub use counter::*;
pub use bht::*;
pub use pht::*;
pub use btb::*;
pub use gshare::{GShareIndex, GSharePredictor, PredictorConfig};

use crate::branch::Outcome;

/// Interface to a predictor with some internal state which is only subject to
/// change by the correct branch outcome.
pub trait StatefulPredictor {
    fn name(&self) -> &'static str;

    /// Reset the internal state of the predictor.
    fn reset(&mut self);

    /// Return the current predicted outcome.
    fn predict(&self) -> Outcome;

    /// Update the internal state of the predictor with the correct outcome.
    fn update(&mut self, outcome: Outcome);
}

/// Interface to a predictor which is indexed by the program counter and
/// also predicts a target address.
pub trait BranchPredictor {
    fn name(&self) -> &'static str;

    /// Reset the internal state of the predictor.
    fn reset(&mut self);

    /// Predict the direction and next fetch address for the branch at `pc`.
    fn predict(&self, pc: usize) -> Prediction;

    /// Train the predictor with the resolved outcome (and target, when one
    /// is known) of the branch at `pc`.
    fn update(&mut self, pc: usize, outcome: Outcome, tgt: Option<usize>);
}

/// The result of a prediction.
///
/// A taken prediction without a cached target is kept distinct from a
/// not-taken prediction, even though both fall through to `pc + 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prediction {
    /// Predicted not-taken; fetch continues sequentially.
    NotTaken { next: usize },

    /// Predicted taken, and the BTB supplied a target.
    Taken { target: usize },

    /// Predicted taken, but no target is cached. `fallback` is the
    /// sequential address.
    TakenUnknownTarget { fallback: usize },
}
impl Prediction {
    /// The predicted direction.
    pub fn direction(&self) -> Outcome {
        match self {
            Self::NotTaken { .. } => Outcome::N,
            Self::Taken { .. } | Self::TakenUnknownTarget { .. } => Outcome::T,
        }
    }

    pub fn is_taken(&self) -> bool { self.direction().is_taken() }

    /// The address fetch would continue from.
    pub fn next_address(&self) -> usize {
        match *self {
            Self::NotTaken { next } => next,
            Self::Taken { target } => target,
            Self::TakenUnknownTarget { fallback } => fallback,
        }
    }

    /// The predicted target, if the predictor knew one.
    pub fn target(&self) -> Option<usize> {
        match *self {
            Self::Taken { target } => Some(target),
            _ => None,
        }
    }
}
