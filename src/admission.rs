//! Bounded admission gate for processing passes
//!
//! Capacity is fixed at construction. [`AdmissionController::try_reserve`] is a
//! single atomic reserve-or-fail step on a semaphore, so concurrent callers can
//! never push occupancy past capacity. The returned [`Reservation`] holds the
//! slot and gives it back when dropped, which covers every exit path of the
//! processing pass that owns it, panics included.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

/// Counting gate limiting how many processing passes run at once
#[derive(Clone, Debug)]
pub struct AdmissionController {
    slots: Arc<Semaphore>,
    capacity: usize,
}

/// A held admission slot, released on drop
#[derive(Debug)]
#[must_use = "dropping a reservation releases the slot immediately"]
pub struct Reservation {
    _permit: OwnedSemaphorePermit,
}

impl Reservation {
    /// Give the slot back explicitly
    pub fn release(self) {}
}

impl AdmissionController {
    /// Create a gate with `capacity` slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Try to take a slot without waiting
    ///
    /// Returns `None` when every slot is held. There is no queueing; callers
    /// report the denial rather than retrying.
    pub fn try_reserve(&self) -> Option<Reservation> {
        match self.slots.clone().try_acquire_owned() {
            Ok(permit) => Some(Reservation { _permit: permit }),
            Err(TryAcquireError::NoPermits) => None,
            Err(TryAcquireError::Closed) => {
                tracing::error!("admission semaphore closed unexpectedly");
                None
            }
        }
    }

    /// Configured number of slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently held
    pub fn in_use(&self) -> usize {
        self.capacity.saturating_sub(self.slots.available_permits())
    }

    /// Whether every slot is currently held
    ///
    /// A plain occupancy read; the answer can be stale by the time it is used.
    pub fn is_saturated(&self) -> bool {
        self.slots.available_permits() == 0
    }
}
