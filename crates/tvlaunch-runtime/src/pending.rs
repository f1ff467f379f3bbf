use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;
use tracing::{debug, warn};
use tvlaunch_core::models::PlaybackResult;
use tvlaunch_core::normalize::NO_DATA_MESSAGE;
use tvlaunch_core::CallId;

/// The single outstanding player call.
///
/// At most one player is foregrounded at a time, so a new registration
/// replaces the previous one. The replaced caller sees the "no data" result.
#[derive(Debug, Default)]
pub struct PendingSlot {
    next_id: AtomicU64,
    /// Held from id allocation through registration.
    launching: Mutex<()>,
    current: Mutex<Option<PendingCall>>,
}

#[derive(Debug)]
struct PendingCall {
    id: CallId,
    reply: oneshot::Sender<PlaybackResult>,
}

impl PendingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a call id, hand it to `launch` and register the call.
    ///
    /// Overlapping launches run one at a time, so the registered call is
    /// always the last one the host accepted. A failed launch registers
    /// nothing and leaves the current call in place.
    pub fn launch<E>(
        &self,
        launch: impl FnOnce(CallId) -> Result<(), E>,
    ) -> Result<PendingPlayback, E> {
        let _launching = self
            .launching
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = self.next_id();
        launch(id)?;
        Ok(self.register(id))
    }

    fn next_id(&self) -> CallId {
        CallId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn register(&self, id: CallId) -> PendingPlayback {
        let (tx, rx) = oneshot::channel();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(PendingCall { id, reply: tx });
        if let Some(previous) = previous {
            debug!(replaced = %previous.id, call_id = %id, "Pending player call superseded");
        }
        PendingPlayback { call_id: id, rx }
    }

    /// Complete the pending call if `id` is still the current one.
    pub fn fulfill(&self, id: CallId, result: PlaybackResult) -> bool {
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.take() {
            Some(call) if call.id == id => {
                // The caller may have stopped waiting; that is not an error.
                let _ = call.reply.send(result);
                true
            }
            other => {
                *guard = other;
                warn!(call_id = %id, "Result for a call that is no longer pending, ignoring");
                false
            }
        }
    }

    pub fn pending_id(&self) -> Option<CallId> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|c| c.id)
    }
}

/// Handle to a launched player's eventual result.
#[derive(Debug)]
pub struct PendingPlayback {
    call_id: CallId,
    rx: oneshot::Receiver<PlaybackResult>,
}

impl PendingPlayback {
    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    /// Wait for the player to finish. A dropped or superseded call yields the "no data" result.
    pub async fn wait(self) -> PlaybackResult {
        self.rx
            .await
            .unwrap_or_else(|_| PlaybackResult::no_data(NO_DATA_MESSAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvlaunch_core::models::EndReason;

    fn result(position: i64) -> PlaybackResult {
        PlaybackResult {
            position,
            duration: 100,
            end_reason: EndReason::User,
            finished: false,
            message: None,
        }
    }

    #[test]
    fn test_ids_increase() {
        let slot = PendingSlot::new();
        let a = slot.next_id();
        let b = slot.next_id();
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_fulfill_current() {
        let slot = PendingSlot::new();
        let id = slot.next_id();
        let pending = slot.register(id);
        assert_eq!(slot.pending_id(), Some(id));
        assert!(slot.fulfill(id, result(42)));
        assert_eq!(pending.wait().await.position, 42);
        assert_eq!(slot.pending_id(), None);
    }

    #[tokio::test]
    async fn test_superseded_call_gets_no_data() {
        let slot = PendingSlot::new();
        let first = slot.register(slot.next_id());
        let second_id = slot.next_id();
        let second = slot.register(second_id);

        let r = first.wait().await;
        assert_eq!(r.message.as_deref(), Some(NO_DATA_MESSAGE));

        assert!(slot.fulfill(second_id, result(7)));
        assert_eq!(second.wait().await.position, 7);
    }

    #[test]
    fn test_stale_id_ignored() {
        let slot = PendingSlot::new();
        let stale = slot.next_id();
        let current = slot.next_id();
        let _pending = slot.register(current);
        assert!(!slot.fulfill(stale, result(1)));
        assert_eq!(slot.pending_id(), Some(current));
    }

    #[tokio::test]
    async fn test_launch_registers_accepted_call() {
        let slot = PendingSlot::new();
        let pending = slot.launch(|_| Ok::<(), ()>(())).unwrap();
        assert_eq!(slot.pending_id(), Some(pending.call_id()));
        assert!(slot.fulfill(pending.call_id(), result(3)));
        assert_eq!(pending.wait().await.position, 3);
    }

    #[test]
    fn test_failed_launch_keeps_current_call() {
        let slot = PendingSlot::new();
        let current = slot.launch(|_| Ok::<(), ()>(())).unwrap();
        assert!(slot.launch(|_| Err("no activity")).is_err());
        assert_eq!(slot.pending_id(), Some(current.call_id()));
    }

    #[test]
    fn test_fulfill_after_receiver_dropped() {
        let slot = PendingSlot::new();
        let id = slot.next_id();
        drop(slot.register(id));
        assert!(slot.fulfill(id, result(1)));
    }
}
