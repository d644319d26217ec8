//! Types for representing branches and branch outcomes.

/// A branch outcome.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Outcome {
    /// Not taken
    #[default]
    N = 0,
    /// Taken
    T = 1,
}

impl Outcome {
    pub fn from_bool(b: bool) -> Self {
        match b {
            true => Self::T,
            false => Self::N,
        }
    }

    pub fn is_taken(&self) -> bool { *self == Self::T }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::T => "t",
            Self::N => "n",
        };
        write!(f, "{}", s)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::T => "TAKEN",
            Self::N => "NOT-TAKEN",
        };
        write!(f, "{}", s)
    }
}

impl std::ops::Not for Outcome {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::N => Self::T,
            Self::T => Self::N,
        }
    }
}

impl From<bool> for Outcome {
    fn from(x: bool) -> Self { Self::from_bool(x) }
}

impl From<Outcome> for bool {
    fn from(x: Outcome) -> bool {
        match x {
            Outcome::T => true,
            Outcome::N => false,
        }
    }
}

/// A record of branch execution: one entry in a trace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BranchRecord {
    /// The program counter value for this branch
    pub pc: usize,

    /// The outcome evaluated for this branch
    pub outcome: Outcome,

    /// The target address evaluated for this branch, if one is known.
    /// Zero is a legitimate target.
    pub tgt: Option<usize>,
}
impl BranchRecord {
    pub fn new(pc: usize, outcome: Outcome, tgt: Option<usize>) -> Self {
        Self { pc, outcome, tgt }
    }

    /// A taken branch to some target.
    pub fn taken(pc: usize, tgt: usize) -> Self {
        Self::new(pc, Outcome::T, Some(tgt))
    }

    /// A branch which was not taken.
    pub fn not_taken(pc: usize) -> Self {
        Self::new(pc, Outcome::N, None)
    }

    pub fn is_taken(&self) -> bool { self.outcome.is_taken() }
}
