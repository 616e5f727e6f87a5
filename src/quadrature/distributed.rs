//! distributed — a fixed world of ranks with a collective sum reduction.
//!
//! Purpose
//! -------
//! Run the message-passing flavor of the π estimator. Ranks talk through
//! the [`Collective`] trait; [`World`] implements it inside one process
//! with a rank thread per member, and the `mpi` feature adds an MPI
//! backend (`quadrature::mpi`) whose world comes from the launcher.
//!
//! Key behaviors
//! -------------
//! - Every non-root rank owns a channel to rank 0 and a release channel
//!   back from it.
//! - Rank 0 receives one contribution per peer in rank order and adds them
//!   after its own, so the result does not depend on arrival order. It then
//!   releases every peer: nobody leaves `reduce_sum` before the coordinator
//!   has the total.
//! - A rank that leaves (returns or panics) drops its channels. Peers
//!   blocked in a collective with it fail with `ChannelClosed` instead of
//!   waiting forever.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every rank calls the collectives in the same order.
//! - Ranks run on dedicated OS threads (`std::thread::scope`), never on a
//!   work-stealing pool, since they block on each other.
use std::{
    sync::mpsc::{self, Receiver, Sender},
    time::Instant,
};

use crate::quadrature::{
    errors::{QuadratureError, QuadratureResult},
    options::QuadratureOptions,
    partition::partition,
    report::PiReport,
    serial::partial_sum,
};

/// Rank of the coordinator that receives reductions.
pub const ROOT: usize = 0;

/// Collective operations shared by the in-process and MPI rank worlds.
pub trait Collective {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Block until every rank reaches this point.
    ///
    /// # Errors
    /// The backend's failure when a peer is gone.
    fn barrier(&self) -> QuadratureResult<()>;

    /// Sum `value` over all ranks onto [`ROOT`].
    ///
    /// Returns `Some(total)` on the coordinator and `None` elsewhere.
    ///
    /// # Errors
    /// The backend's failure when a peer is gone.
    fn reduce_sum(&self, value: f64) -> QuadratureResult<Option<f64>>;

    fn is_root(&self) -> bool {
        self.rank() == ROOT
    }
}

/// One rank of the π estimator: synchronize, sum the own partition of
/// `num_steps`, reduce onto [`ROOT`].
///
/// The coordinator gets the [`PiReport`], timed from the barrier to the
/// end of the reduction; other ranks get `None`.
///
/// # Errors
/// Any failure of the collectives.
pub fn rank_pi<C: Collective + ?Sized>(
    comm: &C, num_steps: u64,
) -> QuadratureResult<Option<PiReport>> {
    if num_steps == 0 {
        return Err(QuadratureError::ZeroSteps);
    }
    let step = 1.0 / num_steps as f64;
    comm.barrier()?;
    let start = Instant::now();
    let local = partial_sum(partition(comm.rank(), comm.size(), num_steps), step);
    let total = comm.reduce_sum(local)?;
    Ok(total.map(|sum| PiReport { pi: step * sum, elapsed: start.elapsed() }))
}

enum Link {
    Root { inboxes: Vec<Receiver<f64>>, releases: Vec<Sender<()>> },
    Peer { to_root: Sender<f64>, release: Receiver<()> },
}

/// One rank's handle on an in-process [`World`].
pub struct Communicator {
    rank: usize,
    size: usize,
    link: Link,
}

impl Collective for Communicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) -> QuadratureResult<()> {
        self.reduce_sum(0.0).map(|_| ())
    }

    /// # Errors
    /// `ChannelClosed` naming the peer that left mid-collective (the
    /// coordinator, as seen from the other ranks).
    fn reduce_sum(&self, value: f64) -> QuadratureResult<Option<f64>> {
        match &self.link {
            Link::Root { inboxes, releases } => {
                let mut total = value;
                for (k, inbox) in inboxes.iter().enumerate() {
                    total +=
                        inbox.recv().map_err(|_| QuadratureError::ChannelClosed { rank: k + 1 })?;
                }
                for release in releases {
                    // A peer that already left needs no release.
                    let _ = release.send(());
                }
                Ok(Some(total))
            }
            Link::Peer { to_root, release } => {
                to_root.send(value).map_err(|_| QuadratureError::ChannelClosed { rank: ROOT })?;
                release.recv().map_err(|_| QuadratureError::ChannelClosed { rank: ROOT })?;
                Ok(None)
            }
        }
    }
}

/// A fixed set of cooperating ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct World {
    size: usize,
}

impl World {
    /// # Errors
    /// `ZeroWorkers` for `size == 0`.
    pub fn new(size: usize) -> QuadratureResult<Self> {
        if size == 0 {
            return Err(QuadratureError::ZeroWorkers);
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run `body` once on every rank and collect the results in rank order.
    ///
    /// Every rank is joined before results are inspected. Ranks that were
    /// blocked in a collective with a rank that panicked return
    /// `ChannelClosed` from it rather than hanging.
    ///
    /// # Errors
    /// `WorkerPanicked` naming the lowest rank that panicked.
    pub fn run<T, F>(&self, body: F) -> QuadratureResult<Vec<T>>
    where
        T: Send,
        F: Fn(&Communicator) -> T + Sync,
    {
        let mut inboxes = Vec::with_capacity(self.size - 1);
        let mut releases = Vec::with_capacity(self.size - 1);
        let mut peers = Vec::with_capacity(self.size - 1);
        for _ in 1..self.size {
            let (to_root, inbox) = mpsc::channel();
            let (release_tx, release) = mpsc::channel();
            inboxes.push(inbox);
            releases.push(release_tx);
            peers.push(Link::Peer { to_root, release });
        }
        let comms: Vec<Communicator> = std::iter::once(Link::Root { inboxes, releases })
            .chain(peers)
            .enumerate()
            .map(|(rank, link)| Communicator { rank, size: self.size, link })
            .collect();

        let body = &body;
        std::thread::scope(|s| {
            let handles: Vec<_> =
                comms.into_iter().map(|comm| s.spawn(move || body(&comm))).collect();
            let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
            joined
                .into_iter()
                .enumerate()
                .map(|(rank, res)| res.map_err(|_| QuadratureError::WorkerPanicked { rank }))
                .collect()
        })
    }
}

/// π estimate from a world of `opts.num_procs` ranks, each summing its own
/// partition and reducing onto rank 0.
///
/// # Errors
/// `ZeroWorkers`, a failed collective, or `MissingReduction` when no rank
/// reports a total.
pub fn compute_pi_ranks(opts: &QuadratureOptions) -> QuadratureResult<f64> {
    let world = World::new(opts.num_procs)?;
    let results = world.run(|comm| rank_pi(comm, opts.num_steps))?;
    let mut root = None;
    for res in results {
        if let Some(rep) = res? {
            root = Some(rep.pi);
        }
    }
    root.ok_or(QuadratureError::MissingReduction)
}
