//! Live bounding box of the glass element.
//!
//! The tracker never re-renders anything. Layout events re-query the element
//! and overwrite a shared [`BoundsCell`]; the frame loop reads the cell when it
//! needs the value.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glass_core::ElementBounds;
use parking_lot::RwLock;
use tracing::trace;

/// A host element whose on-screen box can be queried at any time.
pub trait ElementBox: Send + Sync {
    /// Viewport-relative box, visual viewport offsets already applied.
    fn bounding_rect(&self) -> ElementBounds;
}

/// Events after which an element's box may have moved or changed size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutEventKind {
    ElementResize,
    DocumentResize,
    WindowResize,
    WindowScroll,
    ViewportResize,
    ViewportScroll,
}

impl LayoutEventKind {
    pub const ALL: [LayoutEventKind; 6] = [
        LayoutEventKind::ElementResize,
        LayoutEventKind::DocumentResize,
        LayoutEventKind::WindowResize,
        LayoutEventKind::WindowScroll,
        LayoutEventKind::ViewportResize,
        LayoutEventKind::ViewportScroll,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Source of layout events a tracker can subscribe to.
pub trait LayoutEvents: Send + Sync {
    fn add_listener(&self, kind: LayoutEventKind, listener: Listener) -> ListenerId;
    /// Returns false if the id was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

/// In-process listener registry. Hosts forward their layout notifications
/// through [`LayoutEventHub::emit`].
#[derive(Default)]
pub struct LayoutEventHub {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, LayoutEventKind, Listener)>>,
}

impl LayoutEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke every listener registered for `kind`. Returns how many ran.
    pub fn emit(&self, kind: LayoutEventKind) -> usize {
        // listeners run outside the lock so they may (un)register freely
        let matching: Vec<Listener> = self
            .listeners
            .read()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, l)| l.clone())
            .collect();
        for listener in &matching {
            listener();
        }
        matching.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl LayoutEvents for LayoutEventHub {
    fn add_listener(&self, kind: LayoutEventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, kind, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(lid, _, _)| *lid != id);
        listeners.len() != before
    }
}

/// Shared register holding the latest bounds. Cloning shares the register.
#[derive(Clone, Debug, Default)]
pub struct BoundsCell(Arc<RwLock<ElementBounds>>);

impl BoundsCell {
    pub fn get(&self) -> ElementBounds {
        *self.0.read()
    }

    fn set(&self, bounds: ElementBounds) {
        *self.0.write() = bounds;
    }
}

struct Attachment {
    element: Arc<dyn ElementBox>,
    listeners: Vec<ListenerId>,
}

/// Keeps a [`BoundsCell`] in sync with one attached element.
pub struct BoundsTracker {
    events: Arc<dyn LayoutEvents>,
    cell: BoundsCell,
    attached: Option<Attachment>,
}

impl BoundsTracker {
    pub fn new(events: Arc<dyn LayoutEvents>) -> Self {
        Self { events, cell: BoundsCell::default(), attached: None }
    }

    /// Start tracking `element`, replacing any previously attached one.
    pub fn attach(&mut self, element: Arc<dyn ElementBox>) {
        self.detach();
        self.cell.set(element.bounding_rect());

        let listeners = LayoutEventKind::ALL
            .iter()
            .map(|&kind| {
                let element = element.clone();
                let cell = self.cell.clone();
                let listener: Listener = Arc::new(move || {
                    let bounds = element.bounding_rect();
                    trace!(?kind, width = bounds.width, height = bounds.height, "bounds updated");
                    cell.set(bounds);
                });
                self.events.add_listener(kind, listener)
            })
            .collect();

        self.attached = Some(Attachment { element, listeners });
    }

    /// Unsubscribe from every layout event. The last bounds stay readable.
    pub fn detach(&mut self) {
        if let Some(attachment) = self.attached.take() {
            for id in attachment.listeners {
                self.events.remove_listener(id);
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Re-query the attached element outside of any event.
    pub fn refresh(&self) {
        if let Some(attachment) = &self.attached {
            self.cell.set(attachment.element.bounding_rect());
        }
    }

    /// Latest known bounds, `ElementBounds::ZERO` before the first attach.
    pub fn bounds(&self) -> ElementBounds {
        self.cell.get()
    }

    /// Handle for readers that outlive a borrow of the tracker.
    pub fn cell(&self) -> BoundsCell {
        self.cell.clone()
    }
}

impl Drop for BoundsTracker {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeElement {
        rect: RwLock<ElementBounds>,
    }

    impl FakeElement {
        fn at(x: f32, y: f32, w: f32, h: f32) -> Arc<Self> {
            Arc::new(Self { rect: RwLock::new(ElementBounds::from_rect(x, y, w, h)) })
        }

        fn move_to(&self, x: f32, y: f32, w: f32, h: f32) {
            *self.rect.write() = ElementBounds::from_rect(x, y, w, h);
        }
    }

    impl ElementBox for FakeElement {
        fn bounding_rect(&self) -> ElementBounds {
            *self.rect.read()
        }
    }

    fn setup() -> (Arc<LayoutEventHub>, BoundsTracker) {
        let hub = Arc::new(LayoutEventHub::new());
        let tracker = BoundsTracker::new(hub.clone());
        (hub, tracker)
    }

    #[test]
    fn zero_before_attach() {
        let (_hub, tracker) = setup();
        assert_eq!(tracker.bounds(), ElementBounds::ZERO);
        assert!(!tracker.is_attached());
    }

    #[test]
    fn attach_queries_immediately_and_subscribes_every_kind() {
        let (hub, mut tracker) = setup();
        tracker.attach(FakeElement::at(10.0, 20.0, 300.0, 200.0));
        assert_eq!(tracker.bounds(), ElementBounds::from_rect(10.0, 20.0, 300.0, 200.0));
        assert_eq!(hub.listener_count(), LayoutEventKind::ALL.len());
    }

    #[test]
    fn events_refresh_the_cell() {
        let (hub, mut tracker) = setup();
        let el = FakeElement::at(0.0, 0.0, 100.0, 100.0);
        tracker.attach(el.clone());
        let cell = tracker.cell();

        el.move_to(0.0, -250.0, 100.0, 100.0);
        assert_eq!(cell.get().top, 0.0);
        assert_eq!(hub.emit(LayoutEventKind::WindowScroll), 1);
        assert_eq!(cell.get().top, -250.0);

        el.move_to(0.0, -250.0, 140.0, 100.0);
        hub.emit(LayoutEventKind::ViewportResize);
        assert_eq!(tracker.bounds().width, 140.0);
    }

    #[test]
    fn reading_is_idempotent() {
        let (hub, mut tracker) = setup();
        tracker.attach(FakeElement::at(5.0, 5.0, 50.0, 60.0));
        let first = tracker.bounds();
        hub.emit(LayoutEventKind::ElementResize);
        assert_eq!(tracker.bounds(), first);
        assert_eq!(tracker.bounds(), tracker.cell().get());
    }

    #[test]
    fn detach_removes_all_listeners() {
        let (hub, mut tracker) = setup();
        let el = FakeElement::at(0.0, 0.0, 10.0, 10.0);
        tracker.attach(el.clone());
        tracker.detach();
        assert_eq!(hub.listener_count(), 0);

        el.move_to(0.0, 0.0, 99.0, 99.0);
        assert_eq!(hub.emit(LayoutEventKind::WindowResize), 0);
        assert_eq!(tracker.bounds().width, 10.0);
    }

    #[test]
    fn reattach_replaces_previous_listeners() {
        let (hub, mut tracker) = setup();
        let first = FakeElement::at(0.0, 0.0, 10.0, 10.0);
        let second = FakeElement::at(0.0, 0.0, 20.0, 20.0);
        tracker.attach(first.clone());
        tracker.attach(second.clone());
        assert_eq!(hub.listener_count(), LayoutEventKind::ALL.len());
        assert_eq!(tracker.bounds().width, 20.0);

        first.move_to(0.0, 0.0, 77.0, 77.0);
        hub.emit(LayoutEventKind::DocumentResize);
        assert_eq!(tracker.bounds().width, 20.0);
    }

    #[test]
    fn drop_detaches() {
        let (hub, mut tracker) = setup();
        tracker.attach(FakeElement::at(0.0, 0.0, 10.0, 10.0));
        drop(tracker);
        assert_eq!(hub.listener_count(), 0);
    }
}
