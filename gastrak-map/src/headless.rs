//! In-memory surfaces for hosts without a screen: the CLI and the tests.

use std::{
    cell::{Cell, RefCell},
    mem,
};

use crate::{
    marker::InteractiveLabel,
    map::{MapSurface, MapView, MarkerId, TileLayer},
    surface::{
        Dialog, ListenerId, Point, PointerEvent, PointerListener, PointerRoot, Rect, Region,
        ResizeListener, Size, Viewport,
    },
};

/// Listeners keyed by their handles.
///
/// Dispatch moves the listeners out of the cell, so a listener may attach or
/// detach others while it runs.
struct Listeners<L> {
    entries: RefCell<Vec<(ListenerId, L)>>,
    is_dispatching: Cell<bool>,
    detached_while_dispatching: RefCell<Vec<ListenerId>>,
    next_id: Cell<u64>,
    n_attached: Cell<usize>,
    n_detached: Cell<usize>,
}

impl<L> Default for Listeners<L> {
    fn default() -> Self {
        Self {
            entries: RefCell::default(),
            is_dispatching: Cell::default(),
            detached_while_dispatching: RefCell::default(),
            next_id: Cell::default(),
            n_attached: Cell::default(),
            n_detached: Cell::default(),
        }
    }
}

impl<L> Listeners<L> {
    fn add(&self, listener: L) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, listener));
        self.n_attached.set(self.n_attached.get() + 1);
        id
    }

    fn remove(&self, id: ListenerId) {
        let mut entries = self.entries.borrow_mut();
        let n_entries = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        if entries.len() < n_entries {
            self.n_detached.set(self.n_detached.get() + 1);
        } else if self.is_dispatching.get() {
            self.detached_while_dispatching.borrow_mut().push(id);
        }
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    fn dispatch(&self, mut call: impl FnMut(&mut L)) {
        let mut dispatched = mem::take(&mut *self.entries.borrow_mut());
        self.is_dispatching.set(true);
        for (_, listener) in &mut dispatched {
            call(listener);
        }
        self.is_dispatching.set(false);

        let detached = mem::take(&mut *self.detached_while_dispatching.borrow_mut());
        let n_dispatched = dispatched.len();
        dispatched.retain(|(id, _)| !detached.contains(id));
        self.n_detached.set(self.n_detached.get() + n_dispatched - dispatched.len());

        let mut entries = self.entries.borrow_mut();
        let attached = mem::take(&mut *entries);
        *entries = dispatched.into_iter().chain(attached).collect();
    }
}

pub struct HeadlessViewport {
    size: Cell<Size>,
    listeners: Listeners<ResizeListener>,
}

impl HeadlessViewport {
    pub fn new(size: Size) -> Self {
        Self { size: Cell::new(size), listeners: Listeners::default() }
    }

    /// Change the size and notify every attached listener.
    pub fn resize(&self, size: Size) {
        self.size.set(size);
        self.listeners.dispatch(|listener| listener(size));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners ever attached.
    pub fn attached_total(&self) -> usize {
        self.listeners.n_attached.get()
    }

    /// Listeners ever detached.
    pub fn detached_total(&self) -> usize {
        self.listeners.n_detached.get()
    }
}

impl Viewport for HeadlessViewport {
    fn size(&self) -> Size {
        self.size.get()
    }

    fn add_resize_listener(&self, listener: ResizeListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_resize_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

#[derive(Debug)]
pub struct HeadlessDialog {
    bounds: Rect,
    is_visible: bool,
    error: Option<String>,
    n_clears: usize,
}

impl HeadlessDialog {
    pub const fn new(bounds: Rect) -> Self {
        Self { bounds, is_visible: false, error: None, n_clears: 0 }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn n_clears(&self) -> usize {
        self.n_clears
    }
}

impl Region for HeadlessDialog {
    fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }
}

impl Dialog for HeadlessDialog {
    fn is_visible(&self) -> bool {
        self.is_visible
    }

    fn show(&mut self) {
        self.is_visible = true;
    }

    fn hide(&mut self) {
        self.is_visible = false;
    }

    fn clear(&mut self) {
        self.error = None;
        self.n_clears += 1;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }
}

#[derive(Default)]
pub struct HeadlessMap {
    view: Option<MapView>,
    tile_layers: Vec<TileLayer>,
    markers: Vec<InteractiveLabel>,
}

impl HeadlessMap {
    #[must_use]
    pub const fn view(&self) -> Option<MapView> {
        self.view
    }

    #[must_use]
    pub fn tile_layers(&self) -> &[TileLayer] {
        &self.tile_layers
    }

    #[must_use]
    pub fn markers(&self) -> &[InteractiveLabel] {
        &self.markers
    }
}

impl MapSurface for HeadlessMap {
    fn set_view(&mut self, view: MapView) {
        self.view = Some(view);
    }

    fn add_tile_layer(&mut self, layer: TileLayer) {
        self.tile_layers.push(layer);
    }

    fn add_marker(&mut self, label: InteractiveLabel) -> MarkerId {
        self.markers.push(label);
        MarkerId(self.markers.len() - 1)
    }
}

#[derive(Default)]
pub struct HeadlessPointerRoot {
    listeners: Listeners<PointerListener>,
}

impl HeadlessPointerRoot {
    /// Simulate a pointer press.
    pub fn press(&self, position: Point) {
        self.listeners.dispatch(|listener| listener(PointerEvent { position }));
    }
}

impl PointerRoot for HeadlessPointerRoot {
    fn add_pointer_down_listener(&self, listener: PointerListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_pointer_down_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_viewport_dispatch() {
        let viewport = HeadlessViewport::new(Size::new(100.0, 100.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let id = viewport.add_resize_listener({
            let seen = Rc::clone(&seen);
            Box::new(move |size| seen.borrow_mut().push(size))
        });

        viewport.resize(Size::new(200.0, 100.0));
        viewport.remove_resize_listener(id);
        viewport.remove_resize_listener(id);
        viewport.resize(Size::new(300.0, 100.0));

        assert_eq!(*seen.borrow(), vec![Size::new(200.0, 100.0)]);
        assert_eq!(viewport.size(), Size::new(300.0, 100.0));
        assert_eq!(viewport.listener_count(), 0);
        assert_eq!(viewport.attached_total(), 1);
        assert_eq!(viewport.detached_total(), 1);
    }

    #[test]
    fn test_listener_detaching_itself() {
        let root = Rc::new(HeadlessPointerRoot::default());
        let n_presses = Rc::new(Cell::new(0));
        let own_id = Rc::new(Cell::new(None));
        let id = root.add_pointer_down_listener({
            let root = Rc::downgrade(&root);
            let n_presses = Rc::clone(&n_presses);
            let own_id = Rc::clone(&own_id);
            Box::new(move |_| {
                n_presses.set(n_presses.get() + 1);
                if let (Some(root), Some(id)) = (root.upgrade(), own_id.get()) {
                    root.remove_pointer_down_listener(id);
                }
            })
        });
        own_id.set(Some(id));

        root.press(Point::new(1.0, 1.0));
        root.press(Point::new(1.0, 1.0));

        assert_eq!(n_presses.get(), 1);
        assert_eq!(root.listeners.len(), 0);
        assert_eq!(root.listeners.n_detached.get(), 1);
    }

    #[test]
    fn test_dialog() {
        let mut dialog = HeadlessDialog::new(Rect::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0)));
        assert!(!dialog.is_visible());
        assert!(dialog.contains(Point::new(5.0, 5.0)));

        dialog.show_error("boom");
        dialog.show();
        assert!(dialog.is_visible());
        assert_eq!(dialog.error(), Some("boom"));

        dialog.clear();
        dialog.hide();
        assert!(!dialog.is_visible());
        assert_eq!(dialog.error(), None);
        assert_eq!(dialog.n_clears(), 1);
    }
}
