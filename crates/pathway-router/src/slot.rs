// File: src/slot.rs
// Purpose: Process-scoped "one router at a time" registry slot

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::RouterError;

static GLOBAL: Lazy<Arc<InstanceSlot>> = Lazy::new(|| Arc::new(InstanceSlot::new()));

/// A slot that at most one live [`Router`](crate::Router) may occupy
///
/// `Router::new` claims [`InstanceSlot::global`]. Tests and embedders that
/// need several independent routers give each one its own slot.
#[derive(Debug, Default)]
pub struct InstanceSlot {
    taken: AtomicBool,
}

impl InstanceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide slot
    pub fn global() -> Arc<InstanceSlot> {
        Arc::clone(&GLOBAL)
    }

    pub fn is_taken(&self) -> bool {
        self.taken.load(Ordering::SeqCst)
    }

    pub(crate) fn claim(self: &Arc<Self>) -> Result<SlotClaim, RouterError> {
        self.taken
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| RouterError::AlreadyConstructed)?;

        Ok(SlotClaim {
            slot: Arc::clone(self),
        })
    }
}

/// Held by a router for its whole life; frees the slot on drop
#[derive(Debug)]
pub(crate) struct SlotClaim {
    slot: Arc<InstanceSlot>,
}

impl Drop for SlotClaim {
    fn drop(&mut self) {
        self.slot.taken.store(false, Ordering::SeqCst);
    }
}
