use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, RwLock};

use crate::models::error::SynthError;
use crate::models::state::LifecyclePhase;

/// Receiver of host foreground/background transitions.
pub trait LifecycleObserver: Send + Sync {
    fn on_phase(&self, phase: LifecyclePhase) -> Result<(), SynthError>;
}

/// Token returned by [`LifecycleSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Host-side fan-out of lifecycle transitions.
///
/// The host runtime calls `on_foreground` / `on_background` from its own
/// callbacks; subscribers are notified in subscription order on the calling
/// thread. Transitions are serialized: a second transition waits until every
/// subscriber has seen the first, so subscribers always end on the phase
/// reported by `current_phase`.
pub struct LifecycleSource {
    observers: RwLock<Vec<(SubscriptionId, Arc<dyn LifecycleObserver>)>>,
    phase: Mutex<Option<LifecyclePhase>>,
    /// Held from the phase update through delivery. Reentrant so a subscriber
    /// may trigger a nested transition.
    transition: ReentrantMutex<()>,
    next_id: AtomicU64,
}

impl LifecycleSource {
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
            phase: Mutex::new(None),
            transition: ReentrantMutex::new(()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn LifecycleObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.write().push((id, observer));
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|(sub, _)| *sub != id);
        observers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.read().len()
    }

    /// Last phase delivered, `None` before the first transition.
    pub fn current_phase(&self) -> Option<LifecyclePhase> {
        *self.phase.lock()
    }

    /// Deliver `phase` to every subscriber.
    ///
    /// Repeated phases are delivered again. All subscribers are notified even
    /// if one fails; the first failure is returned.
    pub fn transition(&self, phase: LifecyclePhase) -> Result<(), SynthError> {
        let _transition = self.transition.lock();
        let previous = self.phase.lock().replace(phase);
        if previous == Some(phase) {
            log::debug!("Repeated lifecycle transition to {}", phase);
        } else {
            log::info!("Lifecycle transition to {}", phase);
        }

        // Snapshot so observers may (un)subscribe while being notified.
        let observers: Vec<_> = self
            .observers
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        let mut first_error = None;
        for observer in observers {
            if let Err(e) = observer.on_phase(phase) {
                log::error!("Lifecycle observer failed on {}: {}", phase, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn on_foreground(&self) -> Result<(), SynthError> {
        self.transition(LifecyclePhase::Foreground)
    }

    pub fn on_background(&self) -> Result<(), SynthError> {
        self.transition(LifecyclePhase::Background)
    }
}

impl Default for LifecycleSource {
    fn default() -> Self {
        Self::new()
    }
}
