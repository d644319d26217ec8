//! Implementation of a branch history table (BHT).

use crate::branch::Outcome;
use crate::history::HistoryRegister;
use crate::predictor::*;

/// Number of history registers in the [BranchHistoryTable].
pub const BHT_SIZE: usize = 16;

/// Width [in bits] of each history register.
pub const HISTORY_BITS: usize = 4;

/// A table of [HistoryRegister] selected by the low bits of the program
/// counter.
#[derive(Clone, Debug)]
pub struct BranchHistoryTable {
    data: Vec<HistoryRegister>,
}
impl BranchHistoryTable {
    /// Create a table where every register holds zero.
    pub fn new() -> Self {
        Self {
            data: vec![HistoryRegister::new(HISTORY_BITS); BHT_SIZE],
        }
    }

    /// Return the 4-bit history at `index`.
    pub fn get_history(&self, index: usize) -> u8 {
        // Never wider than HISTORY_BITS
        self.get_entry(index).value() as u8
    }

    /// Shift `outcome` into the history at `index`.
    pub fn update_history(&mut self, index: usize, outcome: bool) {
        self.get_entry_mut(index).push(Outcome::from(outcome));
    }

    /// Return a reference to the register at `index`.
    pub fn register(&self, index: usize) -> &HistoryRegister {
        self.get_entry(index)
    }

    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(|r| r.clear());
    }
}

impl Default for BranchHistoryTable {
    fn default() -> Self { Self::new() }
}

impl PredictorTable for BranchHistoryTable {
    type Input<'a> = usize;
    type Index = usize;
    type Entry = HistoryRegister;

    fn size(&self) -> usize { self.data.len() }

    /// The low bits of the program counter select a register.
    fn get_index(&self, pc: usize) -> usize {
        pc & self.index_mask()
    }

    fn get_entry(&self, idx: usize) -> &HistoryRegister {
        let index = idx & self.index_mask();
        &self.data[index]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut HistoryRegister {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}
