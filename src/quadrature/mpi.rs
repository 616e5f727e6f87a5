//! MPI backend for the rank estimator (feature `mpi`).
//!
//! The world is whatever the launcher started (`mpiexec -n <procs>`), so
//! `PI_NUM_PROCS` plays no part here. MPI is initialized in
//! [`MpiWorld::init`] and finalized when the world is dropped.
use ferrompi::{Mpi, ReduceOp};

use crate::quadrature::{
    distributed::{Collective, ROOT},
    errors::QuadratureResult,
};

/// `MPI_COMM_WORLD` behind the [`Collective`] trait.
pub struct MpiWorld {
    // Declared before `_mpi` so the communicator is released before
    // finalization.
    world: ferrompi::Communicator,
    _mpi: Mpi,
}

impl MpiWorld {
    /// Initialize MPI and take the world communicator.
    ///
    /// # Errors
    /// `Mpi` when the runtime cannot be initialized.
    pub fn init() -> QuadratureResult<Self> {
        let mpi = Mpi::init()?;
        let world = mpi.world();
        Ok(Self { world, _mpi: mpi })
    }
}

impl Collective for MpiWorld {
    fn rank(&self) -> usize {
        self.world.rank() as usize
    }

    fn size(&self) -> usize {
        self.world.size() as usize
    }

    fn barrier(&self) -> QuadratureResult<()> {
        Ok(self.world.barrier()?)
    }

    /// `MPI_Reduce` with `MPI_SUM` onto [`ROOT`].
    fn reduce_sum(&self, value: f64) -> QuadratureResult<Option<f64>> {
        let total = self.world.reduce_scalar(value, ReduceOp::Sum, ROOT as i32)?;
        Ok(self.is_root().then_some(total))
    }
}
