//! The range controller.
//!
//! Requests flow in from any thread; measurements run on tokio's blocking
//! pool behind a semaphore; results flow out through an unbounded channel to
//! whoever owns the [`LayoutUpdates`] receiver.
//!
//! ```text
//! request(key) -> ItemState { generation += 1 }
//!   idle item   -> spawn measurement
//!   busy item   -> park as pending (replacing an older pending request)
//! measurement finishes -> deliver if still current, then spawn pending
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lattice::layout::{Layout, LayoutElement, SizeRange};
use lattice::RenderingEnvironment;
use tokio::runtime::Handle;
use tokio::sync::{Notify, Semaphore, mpsc};

use crate::config::RangeControllerConfig;
use crate::error::{RangeError, Result};

/// Builds an item's element tree. Called on a worker, once per measurement.
pub type ElementFactory = Arc<dyn Fn() -> LayoutElement + Send + Sync>;

/// A finished measurement for one item.
#[derive(Debug, Clone)]
pub struct LayoutUpdate<K> {
    pub key: K,
    /// The request generation this layout answers.
    pub generation: u64,
    pub layout: Arc<Layout>,
}

#[derive(Debug, Clone)]
pub enum RangeEvent<K> {
    Measured(LayoutUpdate<K>),
    Failed {
        key: K,
        generation: u64,
        error: RangeError,
    },
}

impl<K> RangeEvent<K> {
    pub fn key(&self) -> &K {
        match self {
            RangeEvent::Measured(update) => &update.key,
            RangeEvent::Failed { key, .. } => key,
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            RangeEvent::Measured(update) => update.generation,
            RangeEvent::Failed { generation, .. } => *generation,
        }
    }
}

/// Receives layouts on the presentation thread.
pub trait LayoutSink<K> {
    fn apply_layout(&mut self, update: LayoutUpdate<K>);

    fn layout_failed(&mut self, key: K, generation: u64, error: RangeError)
    where
        K: Debug,
    {
        tracing::warn!(?key, generation, %error, "layout failed with no failure handler");
    }
}

// =========================================================================
// Per-item bookkeeping
// =========================================================================

struct Request {
    generation: u64,
    factory: ElementFactory,
    range: SizeRange,
}

#[derive(Default)]
struct ItemState {
    /// Bumped by every request, cancel and remove. Only a result carrying the
    /// current generation is delivered.
    generation: u64,
    in_flight: bool,
    pending: Option<Request>,
    factory: Option<ElementFactory>,
    layout: Option<Arc<Layout>>,
    /// Removed while a measurement was running; dropped when it returns.
    retired: bool,
}

struct Inner<K> {
    handle: Handle,
    env: RenderingEnvironment,
    permits: Arc<Semaphore>,
    items: Mutex<HashMap<K, ItemState>>,
    events: mpsc::UnboundedSender<RangeEvent<K>>,
    idle: Notify,
}

impl<K> Inner<K> {
    fn items(&self) -> MutexGuard<'_, HashMap<K, ItemState>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =========================================================================
// Controller
// =========================================================================

/// Measures items off the presentation thread.
///
/// Cloning is cheap; clones share the same items and event stream.
pub struct RangeController<K> {
    inner: Arc<Inner<K>>,
}

impl<K> Clone for RangeController<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K> RangeController<K>
where
    K: Eq + Hash + Clone + Send + Sync + Debug + 'static,
{
    /// Create a controller on the current tokio runtime.
    pub fn new(
        config: RangeControllerConfig,
        env: RenderingEnvironment,
    ) -> Result<(Self, LayoutUpdates<K>)> {
        let handle = Handle::try_current().map_err(|_| RangeError::NoRuntime)?;
        Ok(Self::with_handle(handle, config, env))
    }

    /// Create a controller that spawns onto `handle`.
    pub fn with_handle(
        handle: Handle,
        config: RangeControllerConfig,
        env: RenderingEnvironment,
    ) -> (Self, LayoutUpdates<K>) {
        let (events, rx) = mpsc::unbounded_channel();
        let inner = Inner {
            handle,
            env,
            permits: Arc::new(Semaphore::new(config.permits())),
            items: Mutex::new(HashMap::new()),
            events,
            idle: Notify::new(),
        };
        (
            Self {
                inner: Arc::new(inner),
            },
            LayoutUpdates { rx },
        )
    }

    /// Ask for `key` to be measured within `range`. Returns the request's
    /// generation.
    ///
    /// If the item is already being measured, the request waits behind it and
    /// replaces any request already waiting.
    pub fn request(&self, key: K, factory: ElementFactory, range: SizeRange) -> u64 {
        let mut items = self.inner.items();
        let state = items.entry(key.clone()).or_default();
        state.retired = false;
        state.generation += 1;
        state.factory = Some(Arc::clone(&factory));

        let request = Request {
            generation: state.generation,
            factory,
            range,
        };
        let generation = request.generation;

        if state.in_flight {
            if let Some(old) = state.pending.replace(request) {
                tracing::debug!(?key, superseded = old.generation, generation, "pending request superseded");
            }
            return generation;
        }

        state.in_flight = true;
        drop(items);
        spawn_measurement(Arc::clone(&self.inner), key, request);
        generation
    }

    /// Request every item in order.
    pub fn request_all<I>(&self, items: I) -> Vec<u64>
    where
        I: IntoIterator<Item = (K, ElementFactory, SizeRange)>,
    {
        items
            .into_iter()
            .map(|(key, factory, range)| self.request(key, factory, range))
            .collect()
    }

    /// Re-measure every known item within a new range, reusing each item's
    /// last factory. Returns the number of requests issued.
    pub fn relayout_all(&self, range: SizeRange) -> usize {
        let known: Vec<(K, ElementFactory)> = self
            .inner
            .items()
            .iter()
            .filter(|(_, state)| !state.retired)
            .filter_map(|(key, state)| Some((key.clone(), Arc::clone(state.factory.as_ref()?))))
            .collect();
        let count = known.len();
        for (key, factory) in known {
            self.request(key, factory, range);
        }
        count
    }

    /// Drop any outstanding work for `key`. A measurement already running
    /// finishes but its result is discarded. The cached layout is kept.
    ///
    /// Returns true if there was outstanding work.
    pub fn cancel(&self, key: &K) -> bool {
        let mut items = self.inner.items();
        let Some(state) = items.get_mut(key) else {
            return false;
        };
        let outstanding = state.in_flight || state.pending.is_some();
        state.generation += 1;
        state.pending = None;
        outstanding
    }

    /// Forget `key` entirely, returning its cached layout.
    pub fn remove(&self, key: &K) -> Option<Arc<Layout>> {
        let mut items = self.inner.items();
        let state = items.get_mut(key)?;
        if state.in_flight {
            state.retired = true;
            state.generation += 1;
            state.pending = None;
            state.factory = None;
            return state.layout.take();
        }
        items.remove(key).and_then(|state| state.layout)
    }

    /// The most recently delivered layout for `key`.
    pub fn layout(&self, key: &K) -> Option<Arc<Layout>> {
        self.inner
            .items()
            .get(key)
            .filter(|state| !state.retired)
            .and_then(|state| state.layout.clone())
    }

    /// The generation of the latest request, cancel or remove for `key`.
    pub fn generation(&self, key: &K) -> Option<u64> {
        self.inner.items().get(key).map(|state| state.generation)
    }

    /// Number of items the controller knows about.
    pub fn len(&self) -> usize {
        self.inner.items().values().filter(|state| !state.retired).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when no measurement is running or waiting.
    pub fn is_idle(&self) -> bool {
        self.inner.items().values().all(|state| !state.in_flight)
    }

    /// Wait until [`is_idle`](Self::is_idle) holds.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }
}

fn spawn_measurement<K>(inner: Arc<Inner<K>>, key: K, request: Request)
where
    K: Eq + Hash + Clone + Send + Sync + Debug + 'static,
{
    let handle = inner.handle.clone();
    handle.spawn(async move {
        let Ok(permit) = Arc::clone(&inner.permits).acquire_owned().await else {
            return;
        };

        // Superseded while waiting for a permit.
        if !is_current(&inner, &key, request.generation) {
            drop(permit);
            finish(&inner, key, request.generation, None);
            return;
        }

        let env = inner.env;
        let Request {
            generation,
            factory,
            range,
        } = request;
        let joined = tokio::task::spawn_blocking(move || factory().measure_in(range, &env)).await;
        drop(permit);

        let outcome = match joined {
            Ok(result) => result.map_err(RangeError::from),
            Err(err) => {
                tracing::error!(?key, generation, error = %err, "measurement worker panicked");
                Err(RangeError::WorkerPanicked(err.to_string()))
            }
        };
        finish(&inner, key, generation, Some(outcome));
    });
}

fn is_current<K: Eq + Hash>(inner: &Inner<K>, key: &K, generation: u64) -> bool {
    inner
        .items()
        .get(key)
        .is_some_and(|state| !state.retired && state.generation == generation)
}

/// Record a finished (or skipped) measurement and start whatever waited
/// behind it.
fn finish<K>(
    inner: &Arc<Inner<K>>,
    key: K,
    generation: u64,
    outcome: Option<std::result::Result<Layout, RangeError>>,
) where
    K: Eq + Hash + Clone + Send + Sync + Debug + 'static,
{
    let mut items = inner.items();
    let Some(state) = items.get_mut(&key) else {
        return;
    };
    state.in_flight = false;

    let current = !state.retired && state.generation == generation;
    let event = match outcome {
        Some(outcome) if current => Some(match outcome {
            Ok(layout) => {
                let layout = Arc::new(layout);
                state.layout = Some(Arc::clone(&layout));
                RangeEvent::Measured(LayoutUpdate {
                    key: key.clone(),
                    generation,
                    layout,
                })
            }
            Err(error) => RangeEvent::Failed {
                key: key.clone(),
                generation,
                error,
            },
        }),
        Some(_) => {
            tracing::debug!(?key, generation, latest = state.generation, "discarding stale layout");
            None
        }
        None => None,
    };

    let next = if state.retired {
        items.remove(&key);
        None
    } else {
        let next = state.pending.take();
        state.in_flight = next.is_some();
        next
    };
    let idle = items.values().all(|state| !state.in_flight);
    drop(items);

    if let Some(event) = event {
        let _ = inner.events.send(event);
    }
    match next {
        Some(request) => spawn_measurement(Arc::clone(inner), key, request),
        None if idle => inner.idle.notify_waiters(),
        None => {}
    }
}

// =========================================================================
// Delivery
// =========================================================================

/// The receiving end of a controller's results.
pub struct LayoutUpdates<K> {
    rx: mpsc::UnboundedReceiver<RangeEvent<K>>,
}

impl<K: Debug> LayoutUpdates<K> {
    /// Wait for the next event. Returns `None` once every controller clone
    /// and worker has been dropped.
    pub async fn next(&mut self) -> Option<RangeEvent<K>> {
        self.rx.recv().await
    }

    /// Take every event that is ready without waiting.
    pub fn drain_ready(&mut self) -> Vec<RangeEvent<K>> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Hand every ready event to `sink`. Returns the number of events applied.
    pub fn apply_ready(&mut self, sink: &mut impl LayoutSink<K>) -> usize {
        let events = self.drain_ready();
        let count = events.len();
        for event in events {
            match event {
                RangeEvent::Measured(update) => sink.apply_layout(update),
                RangeEvent::Failed {
                    key,
                    generation,
                    error,
                } => sink.layout_failed(key, generation, error),
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice::layout::LeafElement;
    use lattice::primitives::Size;

    fn leaf(width: f64) -> ElementFactory {
        Arc::new(move || LayoutElement::from(LeafElement::fixed(width, 10.0)))
    }

    fn controller() -> (RangeController<u32>, LayoutUpdates<u32>) {
        RangeController::new(RangeControllerConfig::default(), RenderingEnvironment::default())
            .unwrap()
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let result = RangeController::<u32>::new(
            RangeControllerConfig::default(),
            RenderingEnvironment::default(),
        );
        assert!(matches!(result, Err(RangeError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_generations_increase() {
        let (controller, _updates) = controller();
        assert_eq!(controller.request(1, leaf(10.0), SizeRange::UNCONSTRAINED), 1);
        assert_eq!(controller.request(1, leaf(20.0), SizeRange::UNCONSTRAINED), 2);
        controller.cancel(&1);
        assert_eq!(controller.generation(&1), Some(3));
    }

    #[tokio::test]
    async fn test_measured_layout_is_cached() {
        let (controller, mut updates) = controller();
        controller.request(7, leaf(40.0), SizeRange::UNCONSTRAINED);
        let event = updates.next().await.unwrap();
        assert_eq!(*event.key(), 7);
        assert_eq!(event.generation(), 1);
        controller.wait_idle().await;
        let layout = controller.layout(&7).unwrap();
        assert_eq!(layout.size(), Size::new(40.0, 10.0));
        assert_eq!(controller.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_key() {
        let (controller, _updates) = controller();
        assert!(!controller.cancel(&3));
        assert!(controller.remove(&3).is_none());
        assert!(controller.layout(&3).is_none());
        assert!(controller.is_empty());
        assert!(controller.is_idle());
    }
}
