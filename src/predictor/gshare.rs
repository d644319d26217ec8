//! Implementation of a gshare predictor.
//!
//! The low bits of the program counter select a per-address history register
//! in the BHT. That history is XOR'ed with the same low bits to select a
//! counter in the PHT. When the counter predicts taken, the BTB is consulted
//! for a target.

use tracing::trace;

use crate::branch::Outcome;
use crate::predictor::*;

/// Configuration for building a [GSharePredictor].
///
/// The table dimensions are fixed; only the BTB replacement behavior can be
/// selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PredictorConfig {
    pub btb_policy: BtbPolicy,
}
impl PredictorConfig {
    pub fn build(self) -> GSharePredictor {
        GSharePredictor::with_config(self)
    }
}

/// The pair of table indices used for a particular program counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GShareIndex {
    /// Index into the BHT (the low bits of the program counter)
    pub bht: usize,
    /// Index into the PHT (`bht ^ history`)
    pub pht: usize,
}

/// A gshare direction predictor combined with a branch target buffer.
#[derive(Clone, Debug)]
pub struct GSharePredictor {
    bht: BranchHistoryTable,
    pht: PatternHistoryTable,
    btb: BranchTargetBuffer,
}
impl GSharePredictor {
    /// Create a predictor with zeroed history, weakly not-taken counters,
    /// and an empty BTB.
    pub fn new() -> Self {
        Self::with_config(PredictorConfig::default())
    }

    pub fn with_config(cfg: PredictorConfig) -> Self {
        Self {
            bht: BranchHistoryTable::new(),
            pht: PatternHistoryTable::new(),
            btb: BranchTargetBuffer::new(cfg.btb_policy),
        }
    }

    pub fn bht(&self) -> &BranchHistoryTable { &self.bht }
    pub fn pht(&self) -> &PatternHistoryTable { &self.pht }
    pub fn btb(&self) -> &BranchTargetBuffer { &self.btb }

    /// Compute the BHT and PHT indices for `pc` from the current history.
    pub fn index(&self, pc: usize) -> GShareIndex {
        let bht = self.bht.get_index(pc);
        let history = self.bht.get_history(bht) as usize;
        let pht = self.pht.get_index(bht ^ history);
        GShareIndex { bht, pht }
    }

    /// Predict the branch at `pc`.
    pub fn predict(&self, pc: usize) -> Prediction {
        let idx = self.index(pc);
        let state = self.pht.get_state(idx.pht);
        let next = pc.wrapping_add(1);

        let res = if self.pht.predict(idx.pht).is_taken() {
            match self.btb.lookup(pc) {
                Some(target) => Prediction::Taken { target },
                None => Prediction::TakenUnknownTarget { fallback: next },
            }
        } else {
            Prediction::NotTaken { next }
        };
        trace!(pc, bht_idx = idx.bht, pht_idx = idx.pht, state, ?res, "predict");
        res
    }

    /// Train the predictor with the resolved outcome of the branch at `pc`.
    ///
    /// The PHT index is formed from the history *before* this outcome is
    /// shifted in. The target is only recorded for taken branches.
    pub fn update(&mut self, pc: usize, outcome: Outcome, tgt: Option<usize>) {
        let idx = self.index(pc);
        let taken = outcome.is_taken();

        self.pht.update_state(idx.pht, taken);
        self.bht.update_history(idx.bht, taken);
        if let (true, Some(tgt)) = (taken, tgt) {
            self.btb.update(pc, tgt);
        }
        trace!(pc, ?outcome, ?tgt, bht_idx = idx.bht, pht_idx = idx.pht,
            state = self.pht.get_state(idx.pht),
            history = self.bht.get_history(idx.bht),
            "update"
        );
    }

    /// Return every table to its initial state.
    pub fn reset(&mut self) {
        self.bht.reset();
        self.pht.reset();
        self.btb.reset();
    }
}

impl Default for GSharePredictor {
    fn default() -> Self { Self::new() }
}

impl BranchPredictor for GSharePredictor {
    fn name(&self) -> &'static str { "GSharePredictor" }
    fn reset(&mut self) { GSharePredictor::reset(self) }
    fn predict(&self, pc: usize) -> Prediction {
        GSharePredictor::predict(self, pc)
    }
    fn update(&mut self, pc: usize, outcome: Outcome, tgt: Option<usize>) {
        GSharePredictor::update(self, pc, outcome, tgt)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_prediction_is_not_taken() {
        let p = GSharePredictor::new();
        let res = p.predict(0b1100);
        assert_eq!(res, Prediction::NotTaken { next: 13 });
        assert_eq!(res.direction(), Outcome::N);
        assert_eq!(res.next_address(), 13);
    }

    #[test]
    fn update_trains_counter_then_history() {
        let mut p = GSharePredictor::new();
        p.update(12, Outcome::T, Some(20));
        assert_eq!(p.pht().get_state(12), 2);
        assert_eq!(p.bht().get_history(12), 0b0001);
        assert_eq!(p.btb().lookup(12), Some(20));
        assert_eq!(p.index(12), GShareIndex { bht: 12, pht: 13 });
    }

    #[test]
    fn taken_without_target_is_distinct() {
        let mut p = GSharePredictor::new();
        // Train PHT[5] (history 0) towards taken without a target
        p.update(5, Outcome::T, None);
        p.bht.reset();
        let res = p.predict(5);
        assert_eq!(res, Prediction::TakenUnknownTarget { fallback: 6 });
        assert!(res.is_taken());
        assert_eq!(res.target(), None);
        assert!(p.btb().is_empty());
    }

    #[test]
    fn not_taken_never_records_target() {
        let mut p = GSharePredictor::new();
        p.update(7, Outcome::N, Some(40));
        assert!(p.btb().is_empty());
    }

    #[test]
    fn zero_target_is_recorded() {
        let mut p = GSharePredictor::new();
        p.update(2, Outcome::T, Some(0));
        assert_eq!(p.btb().lookup(2), Some(0));
    }

    #[test]
    fn next_address_wraps() {
        let p = GSharePredictor::new();
        assert_eq!(p.predict(usize::MAX).next_address(), 0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut p = GSharePredictor::new();
        p.update(12, Outcome::T, Some(20));
        p.reset();
        assert_eq!(p.pht().get_state(12), 1);
        assert_eq!(p.bht().get_history(12), 0);
        assert!(p.btb().is_empty());
    }
}
