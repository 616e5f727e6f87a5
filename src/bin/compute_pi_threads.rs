//! Shared-memory π estimate on a rayon pool of `PI_NUM_PROCS` threads.
use anyhow::Result;
use rust_minuit::quadrature::{QuadratureOptions, compute_pi_threads, report};

fn main() -> Result<()> {
    let opts = QuadratureOptions::from_env()?;
    let rep = report(|| compute_pi_threads(&opts))?;
    println!("{rep}");
    Ok(())
}
