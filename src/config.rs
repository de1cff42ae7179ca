//! Per-call kernel settings.

use crate::kernels::SimdLevel;
use std::thread;

/// How a kernel call spreads its work.
///
/// ```
/// use semiring_kernels::{KernelConfig, kernels::SimdLevel};
///
/// let config = KernelConfig::default()
///     .with_threads(4)
///     .with_simd(SimdLevel::Scalar)
///     .with_adaptive(false);
/// assert_eq!(config.num_threads, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelConfig {
    /// Upper bound on worker threads.
    pub num_threads: usize,
    /// Forced inner-loop level. `None` picks the best the CPU supports.
    pub simd: Option<SimdLevel>,
    /// Scale the worker count down for small problems.
    pub adaptive: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            num_threads: thread::available_parallelism().map_or(1, |n| n.get()),
            simd: None,
            adaptive: true,
        }
    }
}

impl KernelConfig {
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads.max(1);
        self
    }

    pub fn with_simd(mut self, level: SimdLevel) -> Self {
        self.simd = Some(level);
        self
    }

    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    /// The level kernels will actually run: the forced one if the CPU
    /// supports it, otherwise the best detected.
    pub fn simd_level(&self) -> SimdLevel {
        self.simd.map_or_else(SimdLevel::detect, SimdLevel::supported)
    }
}
