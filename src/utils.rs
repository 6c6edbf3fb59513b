use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::RoutingError;

/// Cooperative cancellation shared between the caller and a running computation.
/// Cancelled once `cancel` is called on any clone or the deadline passes.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    should_interrupt: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            should_interrupt: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancel(&self) {
        self.should_interrupt.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.should_interrupt.load(Ordering::Relaxed)
            || self.deadline.map_or(false, |deadline| Instant::now() >= deadline)
    }

    pub fn check(&self) -> Result<(), RoutingError> {
        if self.is_cancelled() {
            Err(RoutingError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_visible_through_clones() {
        let cancellation = Cancellation::new();
        let handle = cancellation.clone();
        assert!(cancellation.check().is_ok());

        handle.cancel();
        assert_eq!(cancellation.check(), Err(RoutingError::Cancelled));
    }

    #[test]
    fn elapsed_deadline_cancels() {
        let cancellation = Cancellation::with_timeout(Duration::ZERO);
        assert!(cancellation.is_cancelled());
    }
}
