//! Timing and the one-line result report printed by the binaries.
use std::{
    fmt,
    time::{Duration, Instant},
};

/// A π estimate with the wall-clock time it took.
///
/// `elapsed` is wall time from [`Instant`], not process CPU time: for the
/// threaded and rank estimators the two differ by roughly the worker count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiReport {
    pub pi: f64,
    /// Wall-clock duration of the estimate.
    pub elapsed: Duration,
}

impl fmt::Display for PiReport {
    /// `pi is <estimate> in <wall seconds>s!`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pi is {:.6} in {:.6}s!", self.pi, self.elapsed.as_secs_f64())
    }
}

/// Run `body` and pair its result with the elapsed wall-clock time.
pub fn timed<T, E, F: FnOnce() -> Result<T, E>>(body: F) -> Result<(T, Duration), E> {
    let start = Instant::now();
    let out = body()?;
    Ok((out, start.elapsed()))
}

/// Time an estimator and wrap the result in a [`PiReport`].
pub fn report<E, F: FnOnce() -> Result<f64, E>>(estimator: F) -> Result<PiReport, E> {
    let (pi, elapsed) = timed(estimator)?;
    Ok(PiReport { pi, elapsed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The report line uses six decimals for both fields.
    //
    // Given
    // -----
    // - π ≈ 3.14159265 computed in 1.5 s.
    //
    // Expect
    // ------
    // - `"pi is 3.141593 in 1.500000s!"`.
    fn report_line_format() {
        // Arrange
        let rep = PiReport { pi: 3.141_592_65, elapsed: Duration::from_millis(1500) };

        // Act / Assert
        assert_eq!(rep.to_string(), "pi is 3.141593 in 1.500000s!");
    }

    #[test]
    // Purpose
    // -------
    // Errors from the timed body pass through untouched.
    //
    // Given
    // -----
    // - One body returning `Ok(2.0)` and one returning `Err("boom")`.
    //
    // Expect
    // ------
    // - The value is kept; the error is returned as is.
    fn report_propagates_body_result() {
        // Act
        let ok = report(|| Ok::<_, &str>(2.0)).expect("ok body");
        let err = report(|| Err::<f64, _>("boom"));

        // Assert
        assert_eq!(ok.pi, 2.0);
        assert_eq!(err, Err("boom"));
    }
}
