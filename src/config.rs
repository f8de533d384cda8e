//! Configuration for solver backends and the big-M linearization

use crate::error::{Error, Result};

/// Backend-agnostic solver configuration, passed through to the adapter.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Number of worker threads the backend may use (0 = use all available cores)
    pub threads: usize,

    /// Numeric tolerance for treating a near-0/1 solved value as exact
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            tolerance: 1e-6,
        }
    }
}

impl SolverConfig {
    /// Create a configuration with custom values
    pub fn new(threads: usize, tolerance: f64) -> Self {
        Self { threads, tolerance }
    }

    /// Resolve the configured thread count to an actual number of workers
    pub fn worker_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            num_cpus::get()
        }
    }
}

/// Named constants of the big-M indicator linearization.
///
/// These are an implementation detail of the encoding, not a problem
/// parameter, so they are configurable rather than hard-coded.
#[derive(Debug, Clone, Copy)]
pub struct BigMConfig {
    /// The big-M constant deactivating one side of each indicator row
    pub big_m: f64,

    /// Separation epsilon keeping the two sides of the threshold apart
    pub epsilon: f64,
}

impl Default for BigMConfig {
    fn default() -> Self {
        Self {
            big_m: 10.0,
            epsilon: 0.5,
        }
    }
}

impl BigMConfig {
    /// Check the correctness preconditions of the linearization.
    ///
    /// The pairwise sum of a triple lies in [0, 3] and is compared against
    /// the threshold 1: epsilon must stay inside (0, 1) so no integral sum
    /// lands between the two sides, and M must dominate the largest possible
    /// slack, `3 - (1 - epsilon) = 2 + epsilon`.
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: format!("must lie in (0, 1), got {}", self.epsilon),
            });
        }
        if self.big_m < 2.0 + self.epsilon {
            return Err(Error::InvalidParameter {
                name: "big_m",
                message: format!(
                    "must be at least 2 + epsilon = {}, got {}",
                    2.0 + self.epsilon,
                    self.big_m
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_big_m_config_is_valid() {
        assert!(BigMConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_epsilon_outside_unit_interval() {
        let cfg = BigMConfig {
            big_m: 10.0,
            epsilon: 1.0,
        };
        assert!(matches!(
            cfg.validate(),
            Err(Error::InvalidParameter { name: "epsilon", .. })
        ));
    }

    #[test]
    fn rejects_too_small_big_m() {
        let cfg = BigMConfig {
            big_m: 2.0,
            epsilon: 0.5,
        };
        assert!(matches!(
            cfg.validate(),
            Err(Error::InvalidParameter { name: "big_m", .. })
        ));
    }
}
