use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// A cancellation token shared between a caller and the engine it waits for.
///
/// A stop condition is reached either when [`cancel`](Self::cancel) has been called on one of its clones,
/// or when its optional deadline has elapsed.
/// Engines poll it: the embedded SAT solver through its termination callback,
/// external engines by killing their process.
///
/// # Example
///
/// ```
/// # use tcpc::utils::StopCondition;
/// # use std::time::Duration;
/// let stop = StopCondition::with_timeout(Duration::from_secs(3600));
/// let other = stop.clone();
/// assert!(!stop.is_stopped());
/// other.cancel();
/// assert!(stop.is_stopped());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopCondition {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl StopCondition {
    /// Builds a stop condition that is only reached by an explicit cancellation.
    pub fn never() -> Self {
        Self::default()
    }

    /// Builds a stop condition reached after the given duration (or by an explicit cancellation).
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Builds a stop condition from an optional timeout.
    pub fn with_optional_timeout(timeout: Option<Duration>) -> Self {
        match timeout {
            Some(t) => Self::with_timeout(t),
            None => Self::never(),
        }
    }

    /// Requests the engines sharing this condition to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` iff a cancellation was requested or the deadline elapsed.
    pub fn is_stopped(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }

    /// Returns the time left before the deadline, if any.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never() {
        let stop = StopCondition::never();
        assert!(!stop.is_stopped());
        assert_eq!(None, stop.remaining());
    }

    #[test]
    fn test_cancel_is_shared() {
        let stop = StopCondition::never();
        let clone = stop.clone();
        clone.cancel();
        assert!(stop.is_stopped());
    }

    #[test]
    fn test_elapsed_timeout() {
        let stop = StopCondition::with_timeout(Duration::ZERO);
        assert!(stop.is_stopped());
        assert_eq!(Some(Duration::ZERO), stop.remaining());
    }

    #[test]
    fn test_pending_timeout() {
        let stop = StopCondition::with_optional_timeout(Some(Duration::from_secs(3600)));
        assert!(!stop.is_stopped());
        assert!(stop.remaining().unwrap() > Duration::from_secs(3000));
    }
}
