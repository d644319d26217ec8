//! Replaying a [Trace] against a [BranchPredictor].

use tracing::debug;

use crate::branch::*;
use crate::predictor::*;
use crate::trace::Trace;

/// How a single prediction compares with the resolved branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The direction was right and, for a taken branch with a known target,
    /// so was the target.
    Correct,

    /// The predicted direction was wrong.
    WrongDirection,

    /// The branch was predicted taken to a cached target, but it went
    /// somewhere else.
    WrongTarget { expected: usize },

    /// The branch was correctly predicted taken, but no target was cached.
    UnknownTarget,
}
impl Verdict {
    /// Score a prediction against a resolved branch.
    ///
    /// A taken record without a target can only be scored on direction.
    pub fn judge(prediction: &Prediction, record: &BranchRecord) -> Self {
        match (prediction, record.outcome) {
            (Prediction::NotTaken { .. }, Outcome::N) => Self::Correct,
            (Prediction::NotTaken { .. }, Outcome::T) => Self::WrongDirection,
            (_, Outcome::N) => Self::WrongDirection,
            (Prediction::Taken { target }, Outcome::T) => match record.tgt {
                Some(expected) if expected != *target => {
                    Self::WrongTarget { expected }
                },
                _ => Self::Correct,
            },
            (Prediction::TakenUnknownTarget { .. }, Outcome::T) => {
                Self::UnknownTarget
            },
        }
    }

    pub fn is_correct(&self) -> bool { *self == Self::Correct }
}

/// The result of replaying one [BranchRecord].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchReport {
    pub record: BranchRecord,
    pub prediction: Prediction,
    pub verdict: Verdict,
}

fn fmt_target(tgt: Option<usize>) -> String {
    match tgt {
        Some(t) => format!("{:04b}", t),
        None => "an unknown target".to_string(),
    }
}

impl std::fmt::Display for BranchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "PC: {:04b} - Prediction: ", self.record.pc)?;
        match self.prediction {
            Prediction::NotTaken { .. } => write!(f, "NOT-TAKEN")?,
            Prediction::Taken { target } => write!(f, "TAKEN to {:04b}", target)?,
            Prediction::TakenUnknownTarget { .. } => {
                write!(f, "TAKEN to an unknown target")?
            },
        }
        match self.verdict {
            Verdict::Correct => write!(f, " - Correct"),
            Verdict::WrongDirection if self.record.is_taken() => {
                write!(f, " - Incorrect, should be TAKEN to {}",
                    fmt_target(self.record.tgt))
            },
            Verdict::WrongDirection => {
                write!(f, " - Incorrect, should be NOT-TAKEN")
            },
            Verdict::WrongTarget { expected } => {
                write!(f, " - Incorrect, should be {:04b}", expected)
            },
            Verdict::UnknownTarget => {
                write!(f, " - Direction correct, should be TAKEN to {}",
                    fmt_target(self.record.tgt))
            },
        }
    }
}

/// Drives a predictor through a trace: predict, score, then train.
#[derive(Debug)]
pub struct Simulator<P: BranchPredictor> {
    predictor: P,
}
impl<P: BranchPredictor> Simulator<P> {
    pub fn new(predictor: P) -> Self {
        Self { predictor }
    }

    pub fn predictor(&self) -> &P { &self.predictor }
    pub fn into_inner(self) -> P { self.predictor }

    /// Replay a single branch.
    pub fn step(&mut self, record: &BranchRecord) -> BranchReport {
        let prediction = self.predictor.predict(record.pc);
        let verdict = Verdict::judge(&prediction, record);
        debug!(pc = record.pc, ?prediction, ?verdict, "{}", self.predictor.name());
        self.predictor.update(record.pc, record.outcome, record.tgt);
        BranchReport { record: *record, prediction, verdict }
    }

    /// Replay every branch in a trace, in order.
    pub fn run(&mut self, trace: &Trace) -> Vec<BranchReport> {
        trace.iter().map(|record| self.step(record)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn judge_every_case() {
        let taken = BranchRecord::taken(12, 20);
        let not_taken = BranchRecord::not_taken(12);
        let nt = Prediction::NotTaken { next: 13 };
        let hit = Prediction::Taken { target: 20 };
        let bad = Prediction::Taken { target: 24 };
        let unk = Prediction::TakenUnknownTarget { fallback: 13 };

        assert_eq!(Verdict::judge(&nt, &not_taken), Verdict::Correct);
        assert_eq!(Verdict::judge(&nt, &taken), Verdict::WrongDirection);
        assert_eq!(Verdict::judge(&hit, &taken), Verdict::Correct);
        assert_eq!(Verdict::judge(&hit, &not_taken), Verdict::WrongDirection);
        assert_eq!(Verdict::judge(&bad, &taken),
            Verdict::WrongTarget { expected: 20 });
        assert_eq!(Verdict::judge(&unk, &taken), Verdict::UnknownTarget);
        assert_eq!(Verdict::judge(&unk, &not_taken), Verdict::WrongDirection);

        let no_tgt = BranchRecord::new(12, Outcome::T, None);
        assert_eq!(Verdict::judge(&hit, &no_tgt), Verdict::Correct);
    }

    #[test]
    fn report_display() {
        let report = BranchReport {
            record: BranchRecord::taken(12, 20),
            prediction: Prediction::NotTaken { next: 13 },
            verdict: Verdict::WrongDirection,
        };
        assert_eq!(report.to_string(),
            "PC: 1100 - Prediction: NOT-TAKEN - Incorrect, should be TAKEN to 10100");

        let report = BranchReport {
            record: BranchRecord::not_taken(3),
            prediction: Prediction::NotTaken { next: 4 },
            verdict: Verdict::Correct,
        };
        assert_eq!(report.to_string(), "PC: 0011 - Prediction: NOT-TAKEN - Correct");

        let report = BranchReport {
            record: BranchRecord::taken(12, 20),
            prediction: Prediction::TakenUnknownTarget { fallback: 13 },
            verdict: Verdict::UnknownTarget,
        };
        assert_eq!(report.to_string(),
            "PC: 1100 - Prediction: TAKEN to an unknown target \
             - Direction correct, should be TAKEN to 10100");
    }

    #[test]
    fn step_trains_after_predicting() {
        let mut sim = Simulator::new(GSharePredictor::new());
        let report = sim.step(&BranchRecord::taken(12, 20));
        assert_eq!(report.prediction, Prediction::NotTaken { next: 13 });
        assert_eq!(sim.predictor().pht().get_state(12), 2);
        assert_eq!(sim.predictor().btb().lookup(12), Some(20));
    }
}
