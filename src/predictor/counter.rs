//! Implementation of a saturating counter.

use crate::branch::Outcome;
use crate::predictor::StatefulPredictor;

/// Configuration for building a [`SaturatingCounter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounterConfig {
    pub max_t_state: u8,
    pub max_n_state: u8,
    pub default_state: Outcome,
}
impl SaturatingCounterConfig {
    /// The classic 2-bit counter, starting in the weakly not-taken state.
    pub const TWO_BIT: Self = Self {
        max_t_state: 1,
        max_n_state: 1,
        default_state: Outcome::N,
    };

    /// Number of distinct states the counter can be in.
    pub fn num_states(&self) -> usize {
        self.max_t_state as usize + self.max_n_state as usize + 2
    }

    pub fn storage_bits(&self) -> usize {
        self.num_states().next_power_of_two().ilog2() as usize
    }

    /// The largest value returned by [`SaturatingCounter::state`].
    pub fn max_state(&self) -> u8 {
        self.max_t_state + self.max_n_state + 1
    }

    pub fn build(self) -> SaturatingCounter {
        SaturatingCounter {
            cfg: self,
            state: self.default_state,
            ctr: 0,
        }
    }
}

/// An N-bit saturating counter used to follow the behavior of a branch.
///
/// The counter is kept as a predicted direction plus a strength. The strength
/// is clamped to the limit for the current direction, so the counter can
/// never leave its range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounter {
    cfg: SaturatingCounterConfig,
    state: Outcome,
    ctr: u8,
}
impl SaturatingCounter {
    fn limit(&self) -> u8 {
        match self.state {
            Outcome::T => self.cfg.max_t_state,
            Outcome::N => self.cfg.max_n_state,
        }
    }

    pub fn strengthen(&mut self) {
        self.ctr = self.ctr.saturating_add(1).min(self.limit());
    }

    pub fn weaken(&mut self) {
        if let Some(next) = self.ctr.checked_sub(1) {
            self.ctr = next;
        } else {
            self.state = !self.state;
        }
    }

    /// Set the strength of the current prediction.
    pub fn set_strength(&mut self, val: u8) {
        self.ctr = val.min(self.limit());
    }

    /// Set the current predicted direction.
    pub fn set_direction(&mut self, outcome: Outcome) {
        self.state = outcome;
        self.ctr = self.ctr.min(self.limit());
    }

    /// Return the counter as a single integer.
    ///
    /// Zero is the strongest not-taken state and [`SaturatingCounterConfig::max_state`]
    /// is the strongest taken state. For a 2-bit counter: 0=strongly-not-taken,
    /// 1=weakly-not-taken, 2=weakly-taken, 3=strongly-taken.
    pub fn state(&self) -> u8 {
        match self.state {
            Outcome::N => self.cfg.max_n_state - self.ctr,
            Outcome::T => self.cfg.max_n_state + 1 + self.ctr,
        }
    }

    /// Move the counter into the state with the given integer encoding.
    /// Values past the strongest taken state saturate.
    pub fn set_state(&mut self, val: u8) {
        let val = val.min(self.cfg.max_state());
        if val > self.cfg.max_n_state {
            self.set_direction(Outcome::T);
            self.set_strength(val - self.cfg.max_n_state - 1);
        } else {
            self.set_direction(Outcome::N);
            self.set_strength(self.cfg.max_n_state - val);
        }
    }
}

impl StatefulPredictor for SaturatingCounter {
    fn name(&self) -> &'static str { "SaturatingCounter" }
    fn predict(&self) -> Outcome { self.state }
    fn reset(&mut self) {
        self.state = self.cfg.default_state;
        self.ctr = 0;
    }
    fn update(&mut self, outcome: Outcome) {
        let prediction = self.predict();
        if outcome != prediction {
            self.weaken();
        } else {
            self.strengthen();
        }
    }
}
