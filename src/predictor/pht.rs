//! Implementation of a pattern history table (PHT).

use crate::branch::Outcome;
use crate::predictor::*;

/// Number of counters in the [PatternHistoryTable].
pub const PHT_SIZE: usize = 16;

/// A table of 2-bit [SaturatingCounter] indexed by the gshare hash.
///
/// States 2 and 3 predict taken; states 0 and 1 predict not-taken.
#[derive(Clone, Debug)]
pub struct PatternHistoryTable {
    /// Table of counters
    data: Vec<SaturatingCounter>,
}
impl PatternHistoryTable {
    /// Create a table where every counter is weakly not-taken.
    pub fn new() -> Self {
        Self {
            data: vec![SaturatingCounterConfig::TWO_BIT.build(); PHT_SIZE],
        }
    }

    /// Return the 2-bit state of the counter at `index`.
    pub fn get_state(&self, index: usize) -> u8 {
        self.get_entry(index).state()
    }

    /// Move the counter at `index` one step towards the observed outcome,
    /// saturating at either end.
    pub fn update_state(&mut self, index: usize, taken: bool) {
        self.get_entry_mut(index).update(Outcome::from(taken));
    }

    /// Return the direction predicted by the counter at `index`.
    pub fn predict(&self, index: usize) -> Outcome {
        self.get_entry(index).predict()
    }

    /// Return every counter to the weakly not-taken state.
    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(|c| c.reset());
    }

    /// Iterate over the 2-bit state of every counter, in index order.
    pub fn states(&self) -> impl Iterator<Item = u8> + '_ {
        self.data.iter().map(|c| c.state())
    }
}

impl Default for PatternHistoryTable {
    fn default() -> Self { Self::new() }
}

impl PredictorTable for PatternHistoryTable {
    type Input<'a> = usize;
    type Index = usize;
    type Entry = SaturatingCounter;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, hash: usize) -> usize {
        hash & self.index_mask()
    }

    fn get_entry(&self, idx: usize) -> &SaturatingCounter {
        let index = idx & self.index_mask();
        &self.data[index]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut SaturatingCounter {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn starts_weakly_not_taken() {
        let pht = PatternHistoryTable::new();
        assert_eq!(pht.size(), 16);
        assert!(pht.states().all(|s| s == 1));
        assert!((0..16).all(|i| pht.predict(i) == Outcome::N));
    }

    #[test]
    fn counters_are_independent() {
        let mut pht = PatternHistoryTable::new();
        pht.update_state(12, true);
        assert_eq!(pht.get_state(12), 2);
        assert_eq!(pht.predict(12), Outcome::T);
        assert_eq!(pht.get_state(13), 1);
        pht.update_state(13, false);
        pht.update_state(13, false);
        assert_eq!(pht.get_state(13), 0);

        pht.reset();
        assert_eq!(pht.get_state(12), 1);
        assert_eq!(pht.get_state(13), 1);
    }
}
