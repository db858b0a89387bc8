//! Registry State: identifier → slot.
//!
//! The slot map holds resolved identifiers only. A slot is inserted once,
//! when its implementation is published, and never removed or replaced.
//! Loads in progress are serialized per identifier through a separate
//! pending map whose entries live only while some caller holds them, so
//! unknown or failing identifiers leave nothing behind.
//!
//! ```text
//! slots:   RwLock<HashMap<String, Arc<Slot>>>        Slot { op, counters }
//! pending: Mutex<HashMap<String, Arc<Mutex<()>>>>    one entry per load in flight
//! ```

use std::collections::HashMap;
use std::mem::ManuallyDrop;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use scall_core::{CallResult, Operation, Outcome};

/// Per-operation call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpStats {
    /// Invocations that reached the policy layer.
    pub calls: u64,
    /// Invocations that returned `Err`.
    pub failures: u64,
    /// Invocations that returned `Outcome::Tolerated`.
    pub tolerated: u64,
}

impl OpStats {
    /// Invocations that ended in `Outcome::Done`.
    pub fn done(&self) -> u64 {
        self.calls
            .saturating_sub(self.failures)
            .saturating_sub(self.tolerated)
    }
}

pub(crate) struct Slot {
    op: Arc<dyn Operation>,
    done: AtomicU64,
    failures: AtomicU64,
    tolerated: AtomicU64,
}

impl Slot {
    fn new(op: Arc<dyn Operation>) -> Self {
        Self {
            op,
            done: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            tolerated: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn op(&self) -> &Arc<dyn Operation> {
        &self.op
    }

    /// Exactly one counter moves per call.
    pub(crate) fn record(&self, result: &CallResult) {
        let counter = match result {
            Ok(Outcome::Done(_)) => &self.done,
            Ok(Outcome::Tolerated(_)) => &self.tolerated,
            Err(_) => &self.failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// `calls` is derived from the three outcome counters, so a snapshot
    /// never reports more outcomes than calls.
    pub(crate) fn stats(&self) -> OpStats {
        let done = self.done.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let tolerated = self.tolerated.load(Ordering::Relaxed);
        OpStats {
            calls: done + failures + tolerated,
            failures,
            tolerated,
        }
    }
}

#[derive(Default)]
pub(crate) struct Registry {
    slots: RwLock<HashMap<String, Arc<Slot>>>,
    pending: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Slot for a resolved `name`.
    pub(crate) fn get(&self, name: &str) -> Option<Arc<Slot>> {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        slots.get(name).cloned()
    }

    /// Bind `op` to `name`. Callers hold the pending lock for `name`, so
    /// the entry is still vacant; if not, the existing slot wins.
    pub(crate) fn publish(&self, name: &str, op: Arc<dyn Operation>) -> Arc<Slot> {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Slot::new(op)))
            .clone()
    }

    /// Join the pending load for `name`, creating it if none is in flight.
    pub(crate) fn pending(&self, name: &str) -> PendingLoad<'_> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        let lock = pending.entry(name.to_string()).or_default().clone();
        PendingLoad {
            registry: self,
            name: name.to_string(),
            lock: ManuallyDrop::new(lock),
        }
    }

    /// Resolved identifiers, sorted.
    pub(crate) fn resolved(&self) -> Vec<String> {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = slots.keys().cloned().collect();
        names.sort();
        names
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Membership in the pending load of one identifier. The last member to
/// leave removes the entry.
pub(crate) struct PendingLoad<'a> {
    registry: &'a Registry,
    name: String,
    lock: ManuallyDrop<Arc<Mutex<()>>>,
}

impl PendingLoad<'_> {
    /// Serialize with other members loading the same identifier.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        // Membership only changes under the map lock, so the count is exact.
        let mut pending = self.registry.pending.lock().unwrap_or_else(|e| e.into_inner());
        // SAFETY: `lock` is not touched again after this.
        unsafe { ManuallyDrop::drop(&mut self.lock) };
        let idle = pending
            .get(&self.name)
            .map_or(false, |lock| Arc::strong_count(lock) == 1);
        if idle {
            pending.remove(&self.name);
        }
    }
}
