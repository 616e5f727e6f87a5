//! Monte-Carlo π estimate split over `PI_NUM_PROCS` workers.
//!
//! Total trials from `PI_NUM_STEPS` (default 100_000_000).
use anyhow::Result;
use rust_minuit::quadrature::{QuadratureOptions, monte_carlo_pi_pooled, report};

const SEED: u64 = 0x5eed;

fn main() -> Result<()> {
    let opts = QuadratureOptions::from_env()?;
    let rep = report(|| monte_carlo_pi_pooled(opts.num_steps, opts.num_procs, SEED))?;
    println!("{rep}");
    Ok(())
}
