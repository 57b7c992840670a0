//! Hardware abstraction boundary.
//!
//! Pins and delays come from embedded-hal 1.0. The two collaborators that
//! embedded-hal does not cover, a monotonic microsecond clock and a
//! quadrature encoder counter, are defined here.

/// Monotonic microsecond time source.
pub trait MonotonicClock {
    /// Microseconds since an arbitrary fixed origin. Never decreases.
    fn now_us(&self) -> u64;
}

/// Quadrature encoder counter attached to a motor shaft.
pub trait QuadratureEncoder {
    /// Current count.
    fn count(&self) -> i64;

    /// Zero the counter, returning the count held before the reset.
    fn reset(&mut self) -> i64;
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for &C {
    #[inline]
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Clock backed by `std::time::Instant`.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Start a clock at zero.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl MonotonicClock for StdClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}
