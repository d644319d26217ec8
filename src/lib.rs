//! A gshare branch predictor with a branch target buffer, and a harness for
//! replaying scripted branch traces against it.

pub mod branch;
pub mod history;
pub mod predictor;
pub mod trace;
pub mod sim;

pub use branch::*;
pub use history::*;
pub use predictor::*;
pub use trace::*;
pub use sim::*;
