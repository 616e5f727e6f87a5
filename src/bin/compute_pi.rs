//! Serial midpoint-rule π estimate.
//!
//! Step count from `PI_NUM_STEPS` (default 100_000_000).
use anyhow::Result;
use rust_minuit::quadrature::{QuadratureOptions, compute_pi, report};

fn main() -> Result<()> {
    let opts = QuadratureOptions::from_env()?;
    let rep = report(|| compute_pi(opts.num_steps))?;
    println!("{rep}");
    Ok(())
}
