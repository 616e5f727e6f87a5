//! Minimization strategy levels.
//!
//! - 0 (low): fewest function calls, single pass, short L-BFGS history.
//! - 1 (medium): the default.
//! - 2 (high): longer history, Hager–Zhang line search, up to three passes.
use crate::{
    minuit::errors::{MinuitError, MinuitResult},
    optimization::migrad::LineSearcher,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MnStrategy {
    level: u32,
}

impl MnStrategy {
    /// # Errors
    /// `InvalidStrategy` for levels above 2.
    pub fn new(level: u32) -> MinuitResult<Self> {
        if level > 2 {
            return Err(MinuitError::InvalidStrategy { level });
        }
        Ok(Self { level })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_low(&self) -> bool {
        self.level == 0
    }

    pub fn is_medium(&self) -> bool {
        self.level == 1
    }

    pub fn is_high(&self) -> bool {
        self.level >= 2
    }

    /// L-BFGS history size.
    pub fn lbfgs_mem(&self) -> usize {
        match self.level {
            0 => 5,
            1 => 7,
            _ => 11,
        }
    }

    /// Passes allowed while the EDM target is missed.
    pub fn max_passes(&self) -> usize {
        self.level as usize + 1
    }

    pub fn line_searcher(&self) -> LineSearcher {
        if self.is_high() { LineSearcher::HagerZhang } else { LineSearcher::MoreThuente }
    }
}

impl Default for MnStrategy {
    fn default() -> Self {
        Self { level: 1 }
    }
}

impl TryFrom<u32> for MnStrategy {
    type Error = MinuitError;

    fn try_from(level: u32) -> MinuitResult<Self> {
        Self::new(level)
    }
}
