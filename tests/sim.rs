//! Replaying traces end to end.

use gshare_bp::*;
use pretty_assertions::assert_eq;

fn verdicts(reports: &[BranchReport]) -> Vec<Verdict> {
    reports.iter().map(|r| r.verdict).collect()
}

#[test]
fn reference_trace_is_cold() {
    let mut sim = Simulator::new(GSharePredictor::new());
    let reports = sim.run(&Trace::reference());

    // Every branch lands on an untrained counter, so nothing is predicted
    // taken on the first pass.
    assert!(reports.iter().all(|r| !r.prediction.is_taken()));
    assert_eq!(verdicts(&reports), vec![
        Verdict::WrongDirection,
        Verdict::Correct,
        Verdict::WrongDirection,
        Verdict::Correct,
        Verdict::WrongDirection,
        Verdict::Correct,
    ]);

    let lines: Vec<String> = reports.iter().map(|r| r.to_string()).collect();
    assert_eq!(lines, vec![
        "PC: 1100 - Prediction: NOT-TAKEN - Incorrect, should be TAKEN to 10100",
        "PC: 0011 - Prediction: NOT-TAKEN - Correct",
        "PC: 1010 - Prediction: NOT-TAKEN - Incorrect, should be TAKEN to 11110",
        "PC: 0101 - Prediction: NOT-TAKEN - Correct",
        "PC: 1100 - Prediction: NOT-TAKEN - Incorrect, should be TAKEN to 10100",
        "PC: 1100 - Prediction: NOT-TAKEN - Correct",
    ]);

    let p = sim.into_inner();
    assert_eq!(p.bht().get_history(12), 0b0110);
    assert_eq!(p.pht().get_state(12), 2);
    assert_eq!(p.pht().get_state(13), 2);
    assert_eq!(p.pht().get_state(15), 0);
    assert_eq!(p.btb().lookup(12), Some(20));
    assert_eq!(p.btb().lookup(10), Some(30));
}

#[test]
fn trace_file_matches_builtin_reference() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/traces/reference.txt");
    let trace = Trace::from_file(path).unwrap();
    assert_eq!(trace.name(), "reference.txt");
    assert_eq!(trace.records(), Trace::reference().records());
}

#[test]
fn loop_branch_warms_up() {
    // A loop branch taken seven times, then falling through, repeated.
    let mut records = Vec::new();
    for _ in 0..8 {
        for _ in 0..7 {
            records.push(BranchRecord::taken(0x40, 0x20));
        }
        records.push(BranchRecord::not_taken(0x40));
    }
    let trace = Trace::new("loop", records);
    let mut sim = Simulator::new(GSharePredictor::new());
    let reports = sim.run(&trace);

    // Cold on the first iteration, predicting the target by the last.
    assert_eq!(reports[0].verdict, Verdict::WrongDirection);
    let last = &reports[reports.len() - 8..reports.len() - 1];
    assert!(last.iter().all(|r| r.verdict == Verdict::Correct));
    assert!(last.iter().all(|r| r.prediction == Prediction::Taken { target: 0x20 }));
}

#[test]
fn random_trace_replays_deterministically() {
    let trace = Trace::random(256, 6, 42);
    let a = Simulator::new(GSharePredictor::new()).run(&trace);
    let b = Simulator::new(GSharePredictor::new()).run(&trace);
    assert_eq!(a, b);
    assert_eq!(a.len(), 256);
}
