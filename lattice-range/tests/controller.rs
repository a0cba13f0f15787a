use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use lattice::RenderingEnvironment;
use lattice::layout::{
    IntrinsicContent, LayoutElement, LeafElement, Measurable, SizeRange, StackLayoutSpec,
};
use lattice::primitives::Size;
use lattice_range::{
    ElementFactory, LayoutSink, LayoutUpdate, LayoutUpdates, RangeController,
    RangeControllerConfig, RangeError, RangeEvent,
};
use tokio::time::timeout;

const GUARD: Duration = Duration::from_secs(10);

/// Blocks measuring threads until opened.
#[derive(Default)]
struct Gate {
    open: Mutex<bool>,
    cond: Condvar,
}

impl Gate {
    fn wait(&self) {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.cond.wait(open).unwrap();
        }
    }

    fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.cond.notify_all();
    }
}

fn leaf(width: f64) -> ElementFactory {
    Arc::new(move || LayoutElement::from(LeafElement::fixed(width, 10.0)))
}

fn gated_leaf(gate: &Arc<Gate>, width: f64) -> ElementFactory {
    let gate = Arc::clone(gate);
    Arc::new(move || {
        gate.wait();
        LayoutElement::from(LeafElement::fixed(width, 10.0))
    })
}

fn controller(permits: usize) -> (RangeController<u32>, LayoutUpdates<u32>) {
    let config = RangeControllerConfig {
        max_concurrent_measurements: permits,
    };
    RangeController::new(config, RenderingEnvironment::default()).unwrap()
}

async fn settle(controller: &RangeController<u32>) {
    timeout(GUARD, controller.wait_idle())
        .await
        .expect("controller never became idle");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_latest_request_wins() {
    let (controller, mut updates) = controller(4);
    let gate = Arc::new(Gate::default());

    controller.request(1, gated_leaf(&gate, 10.0), SizeRange::UNCONSTRAINED);
    controller.request(1, leaf(20.0), SizeRange::UNCONSTRAINED);
    let last = controller.request(1, leaf(30.0), SizeRange::UNCONSTRAINED);
    gate.open();
    settle(&controller).await;

    let events = updates.drain_ready();
    assert_eq!(events.len(), 1, "only the latest request is delivered");
    let RangeEvent::Measured(update) = &events[0] else {
        panic!("expected a layout, got {:?}", events[0]);
    };
    assert_eq!(update.generation, last);
    assert_eq!(update.layout.size(), Size::new(30.0, 10.0));
    assert_eq!(controller.layout(&1).unwrap().size().width, 30.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_at_most_one_measurement_per_item() {
    let (controller, _updates) = controller(8);
    let active: Vec<Arc<AtomicUsize>> = (0..4).map(|_| Arc::default()).collect();
    let peak: Vec<Arc<AtomicUsize>> = (0..4).map(|_| Arc::default()).collect();

    for round in 0..10 {
        for key in 0..4u32 {
            let active = Arc::clone(&active[key as usize]);
            let peak = Arc::clone(&peak[key as usize]);
            let factory: ElementFactory = Arc::new(move || {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(5));
                active.fetch_sub(1, Ordering::SeqCst);
                LayoutElement::from(LeafElement::fixed(f64::from(round), 10.0))
            });
            controller.request(key, factory, SizeRange::UNCONSTRAINED);
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    settle(&controller).await;

    for key in 0..4u32 {
        assert_eq!(peak[key as usize].load(Ordering::SeqCst), 1, "item {key}");
        assert_eq!(controller.layout(&key).unwrap().size().width, 9.0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delivery_follows_request_order_per_item() {
    let (controller, mut updates) = controller(2);
    for width in [10.0, 20.0, 30.0, 40.0] {
        controller.request(5, leaf(width), SizeRange::UNCONSTRAINED);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    settle(&controller).await;

    let generations: Vec<u64> = updates.drain_ready().iter().map(RangeEvent::generation).collect();
    assert!(!generations.is_empty());
    assert!(generations.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(generations.last(), Some(&4));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_discards_running_measurement() {
    let (controller, mut updates) = controller(2);
    let gate = Arc::new(Gate::default());

    controller.request(1, gated_leaf(&gate, 10.0), SizeRange::UNCONSTRAINED);
    assert!(controller.cancel(&1));
    gate.open();
    settle(&controller).await;

    assert!(updates.drain_ready().is_empty());
    assert!(controller.layout(&1).is_none());
    assert!(!controller.cancel(&1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_remove_while_in_flight() {
    let (controller, mut updates) = controller(2);
    controller.request(2, leaf(15.0), SizeRange::UNCONSTRAINED);
    settle(&controller).await;
    updates.drain_ready();

    let gate = Arc::new(Gate::default());
    controller.request(2, gated_leaf(&gate, 25.0), SizeRange::UNCONSTRAINED);
    let cached = controller.remove(&2).expect("cached layout is returned");
    assert_eq!(cached.size().width, 15.0);
    assert!(controller.is_empty());

    gate.open();
    settle(&controller).await;
    assert!(updates.drain_ready().is_empty());
    assert_eq!(controller.generation(&2), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_relayout_all_uses_new_range() {
    let (controller, mut updates) = controller(4);
    let generations = controller.request_all(
        (0..3u32).map(|key| (key, leaf(50.0), SizeRange::UNCONSTRAINED)),
    );
    assert_eq!(generations, vec![1, 1, 1]);
    settle(&controller).await;
    assert_eq!(updates.drain_ready().len(), 3);

    let narrow = SizeRange::exact(Size::new(20.0, 10.0));
    assert_eq!(controller.relayout_all(narrow), 3);
    settle(&controller).await;

    for key in 0..3u32 {
        assert_eq!(controller.layout(&key).unwrap().size(), Size::new(20.0, 10.0));
        assert_eq!(controller.generation(&key), Some(2));
    }
}

#[derive(Default)]
struct RecordingSink {
    applied: HashMap<u32, Size>,
    failed: Vec<(u32, RangeError)>,
}

impl LayoutSink<u32> for RecordingSink {
    fn apply_layout(&mut self, update: LayoutUpdate<u32>) {
        self.applied.insert(update.key, update.layout.size());
    }

    fn layout_failed(&mut self, key: u32, _generation: u64, error: RangeError) {
        self.failed.push((key, error));
    }
}

fn duplicated_leaf() -> ElementFactory {
    Arc::new(|| -> LayoutElement {
        let shared: Arc<dyn Measurable> =
            Arc::new(IntrinsicContent::named(Size::new(5.0, 5.0), "dup"));
        StackLayoutSpec::horizontal()
            .child(LeafElement::from_shared(Arc::clone(&shared)))
            .child(LeafElement::from_shared(shared))
            .into()
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_apply_ready_routes_layouts_and_failures() {
    let (controller, mut updates) = controller(2);
    controller.request(1, leaf(40.0), SizeRange::UNCONSTRAINED);
    controller.request(2, duplicated_leaf(), SizeRange::UNCONSTRAINED);
    settle(&controller).await;

    let mut sink = RecordingSink::default();
    assert_eq!(updates.apply_ready(&mut sink), 2);
    assert_eq!(sink.applied.get(&1), Some(&Size::new(40.0, 10.0)));
    assert_eq!(sink.failed.len(), 1);
    assert_eq!(sink.failed[0].0, 2);
    assert!(matches!(sink.failed[0].1, RangeError::Layout(_)));
    assert!(controller.layout(&2).is_none());

    assert_eq!(updates.apply_ready(&mut sink), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_panic_is_reported() {
    let (controller, mut updates) = controller(1);
    controller.request(
        3,
        Arc::new(|| -> LayoutElement { panic!("factory exploded") }),
        SizeRange::UNCONSTRAINED,
    );
    let event = timeout(GUARD, updates.next()).await.unwrap().unwrap();
    assert!(matches!(
        event,
        RangeEvent::Failed {
            key: 3,
            error: RangeError::WorkerPanicked(_),
            ..
        }
    ));

    // The item stays usable.
    controller.request(3, leaf(12.0), SizeRange::UNCONSTRAINED);
    settle(&controller).await;
    assert_eq!(controller.layout(&3).unwrap().size().width, 12.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_updates_end_when_controller_dropped() {
    let (controller, mut updates) = controller(1);
    controller.request(1, leaf(10.0), SizeRange::UNCONSTRAINED);
    settle(&controller).await;
    drop(controller);

    assert!(timeout(GUARD, updates.next()).await.unwrap().is_some());
    assert!(timeout(GUARD, updates.next()).await.unwrap().is_none());
}
