//! Message-passing π estimate: every rank sums its own partition and the
//! totals are reduced onto rank 0, which reports.
//!
//! Default build: `PI_NUM_PROCS` in-process ranks. With the `mpi` feature
//! the ranks are the processes started by `mpiexec -n <procs>`.
use anyhow::Result;
use rust_minuit::quadrature::{Collective, PiReport, QuadratureOptions, rank_pi};

fn greet_and_run<C: Collective>(comm: &C, num_steps: u64) -> Result<Option<PiReport>> {
    println!("Hello from {} of {}", comm.rank(), comm.size());
    Ok(rank_pi(comm, num_steps)?)
}

#[cfg(feature = "mpi")]
fn main() -> Result<()> {
    use rust_minuit::quadrature::mpi::MpiWorld;

    let opts = QuadratureOptions::from_env()?;
    let world = MpiWorld::init()?;
    if let Some(rep) = greet_and_run(&world, opts.num_steps)? {
        println!("{rep}");
    }
    Ok(())
}

#[cfg(not(feature = "mpi"))]
fn main() -> Result<()> {
    use anyhow::Context;
    use rust_minuit::quadrature::World;

    let opts = QuadratureOptions::from_env()?;
    let world = World::new(opts.num_procs)?;
    let reports = world.run(|comm| greet_and_run(comm, opts.num_steps))?;

    let mut root = None;
    for rep in reports {
        if let Some(rep) = rep? {
            root = Some(rep);
        }
    }
    let rep = root.context("rank 0 produced no result")?;
    println!("{rep}");
    Ok(())
}
