//! Low-memory solicit/release protocol (spec §4.1 "Low-memory handler
//! registration").

/// Registered with the process-wide low-memory handler. `solicit` reports
/// how much could be reclaimed right now; `release` is invoked with a
/// target byte count to actually reclaim.
pub trait LowMemoryHandler {
    /// Bytes reclaimable by a full purge, or `None` if purging is
    /// unsafe right now (construction in progress, cache empty, or
    /// compression already exhausted).
    fn solicit(&self) -> Option<usize>;

    /// Reclaim at least `target` bytes via purge. Returns bytes actually
    /// reclaimed.
    fn release(&mut self, target: usize) -> usize;
}
