//! Replay a branch trace against a gshare predictor and report, for every
//! branch, whether the prediction was correct.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

use gshare_bp::*;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// Append every update; duplicate addresses may coexist.
    Fifo,
    /// Replace an existing entry for the same address.
    MoveToNewest,
}
impl From<PolicyArg> for BtbPolicy {
    fn from(x: PolicyArg) -> Self {
        match x {
            PolicyArg::Fifo => BtbPolicy::Fifo,
            PolicyArg::MoveToNewest => BtbPolicy::MoveToNewest,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "gshare-sim",
    version,
    about = "Replay a branch trace against a gshare predictor",
    long_about = "Replay a branch trace against a gshare predictor.\n\n\
        Without --trace or --random, the built-in reference trace is used.\n\n\
        Trace files hold one '<pc> <T|N> [target]' record per line."
)]
struct Cli {
    /// Text trace file to replay.
    #[arg(short, long, conflicts_with = "random")]
    trace: Option<PathBuf>,

    /// Replay a random trace with this many records.
    #[arg(short, long)]
    random: Option<usize>,

    /// Number of distinct branches in a random trace.
    #[arg(long, default_value_t = 8)]
    pcs: usize,

    /// Seed for a random trace.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// BTB replacement behavior for repeated addresses.
    #[arg(long, value_enum, default_value_t = PolicyArg::MoveToNewest)]
    btb_policy: PolicyArg,

    /// Print the history and counter touched by each branch after training.
    #[arg(long)]
    show_state: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_trace(cli: &Cli) -> Result<Trace, TraceError> {
    if let Some(path) = &cli.trace {
        Trace::from_file(path)
    } else if let Some(len) = cli.random {
        Ok(Trace::random(len, cli.pcs, cli.seed))
    } else {
        Ok(Trace::reference())
    }
}

/// The history and counter selected by `idx`, and the BTB contents.
/// Addresses are printed in binary, like the report lines.
fn state_line(p: &GSharePredictor, idx: GShareIndex) -> String {
    let btb = p.btb().iter()
        .map(|e| format!("{:04b}->{:04b}", e.pc, e.tgt))
        .join(" ");
    format!("BHT[{:2}]={} PHT[{:2}]={:02b} BTB=[{}]",
        idx.bht, p.bht().register(idx.bht),
        idx.pht, p.pht().get_state(idx.pht),
        btb,
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let trace = match load_trace(&cli) {
        Ok(trace) => trace,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        },
    };
    tracing::info!(name = trace.name(), records = trace.len(), "loaded trace");

    let cfg = PredictorConfig { btb_policy: cli.btb_policy.into() };
    let mut sim = Simulator::new(cfg.build());

    println!("Branch Prediction Simulation ({}):", trace.name());
    println!();
    for record in trace.iter() {
        let idx = sim.predictor().index(record.pc);
        let report = sim.step(record);
        println!("{}", report);

        if cli.show_state {
            println!("    {}", state_line(sim.predictor(), idx));
        }
    }

    ExitCode::SUCCESS
}
