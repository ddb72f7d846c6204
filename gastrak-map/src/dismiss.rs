//! Closing the history panel on a press outside of it.

use std::rc::Rc;

use crate::{
    prelude::*,
    surface::{ListenerId, Point, PointerEvent, PointerRoot},
};

/// Something that occupies a region of the screen and can be dismissed.
pub trait DismissTarget {
    /// Whether the point falls inside the visible target.
    fn hit_test(&self, point: Point) -> bool;

    fn dismiss(&self);
}

pub struct DismissCoordinator {
    target: Rc<dyn DismissTarget>,
}

impl DismissCoordinator {
    pub fn new(target: Rc<dyn DismissTarget>) -> Self {
        Self { target }
    }

    /// Dismiss the target unless the press landed inside it.
    ///
    /// Returns whether the target got dismissed.
    pub fn on_pointer_down(&self, event: PointerEvent) -> bool {
        if self.target.hit_test(event.position) {
            trace!(position = ?event.position, "inside the target");
            false
        } else {
            debug!(position = ?event.position, "outside the target, dismissing");
            self.target.dismiss();
            true
        }
    }

    /// Subscribe to the root for the rest of the session.
    pub fn install(self, root: &impl PointerRoot) -> ListenerId {
        root.add_pointer_down_listener(Box::new(move |event| {
            self.on_pointer_down(event);
        }))
    }
}
