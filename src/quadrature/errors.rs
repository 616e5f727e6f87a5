//! Errors for the π estimators (configuration, worker pools, and the rank
//! world's collective operations).
//!
//! [`QuadratureError`] implements `Display`/`Error`; the binaries surface it
//! through `anyhow`.

/// Result alias for quadrature operations.
pub type QuadratureResult<T> = Result<T, QuadratureError>;

#[derive(Debug, Clone, PartialEq)]
pub enum QuadratureError {
    // ---- Configuration ----
    /// At least one integration step is required.
    ZeroSteps,

    /// At least one worker is required.
    ZeroWorkers,

    /// Each worker needs at least one Monte-Carlo trial.
    TooFewTrials { trials: u64, workers: usize },

    /// Environment variable could not be parsed.
    InvalidEnv { var: &'static str, value: String },

    // ---- Workers ----
    /// Thread pool could not be built.
    ThreadPool { text: String },

    /// A rank thread panicked before finishing.
    WorkerPanicked { rank: usize },

    /// `rank` left while a collective operation was waiting on it.
    ChannelClosed { rank: usize },

    /// The MPI runtime reported a failure.
    Mpi { text: String },

    /// The coordinator rank produced no reduced value.
    MissingReduction,
}

impl std::error::Error for QuadratureError {}

impl std::fmt::Display for QuadratureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            QuadratureError::ZeroSteps => {
                write!(f, "Number of steps must be > 0.")
            }
            QuadratureError::ZeroWorkers => {
                write!(f, "Number of workers must be > 0.")
            }
            QuadratureError::TooFewTrials { trials, workers } => {
                write!(f, "{trials} trials cannot be split across {workers} workers.")
            }
            QuadratureError::InvalidEnv { var, value } => {
                write!(f, "Environment variable {var} must be a positive integer; got: '{value}'")
            }
            // ---- Workers ----
            QuadratureError::ThreadPool { text } => {
                write!(f, "Failed to build thread pool: {text}")
            }
            QuadratureError::WorkerPanicked { rank } => {
                write!(f, "Rank {rank} panicked.")
            }
            QuadratureError::ChannelClosed { rank } => {
                write!(f, "Rank {rank} left during a collective operation.")
            }
            QuadratureError::Mpi { text } => {
                write!(f, "MPI failure: {text}")
            }
            QuadratureError::MissingReduction => {
                write!(f, "Coordinator rank returned no reduced value.")
            }
        }
    }
}

#[cfg(feature = "mpi")]
impl From<ferrompi::Error> for QuadratureError {
    fn from(err: ferrompi::Error) -> Self {
        QuadratureError::Mpi { text: err.to_string() }
    }
}

impl From<rayon::ThreadPoolBuildError> for QuadratureError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        QuadratureError::ThreadPool { text: err.to_string() }
    }
}
