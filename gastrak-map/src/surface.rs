//! Host surfaces the controllers drive: viewport, dialog, and pointer events.
//!
//! All methods take `&self` or `&mut self` on a single thread; hosts use
//! interior mutability where callbacks need to reach back in.

/// Width and height in CSS pixels.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn scale(self, width_fraction: f64, height_fraction: f64) -> Self {
        Self::new(self.width * width_fraction, self.height * height_fraction)
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Rectangle of `size` centred in `outer`.
    pub fn centered(outer: Size, size: Size) -> Self {
        Self::new(
            Point::new((outer.width - size.width) / 2.0, (outer.height - size.height) / 2.0),
            size,
        )
    }
}

/// Hit-test abstraction.
pub trait Region {
    fn contains(&self, point: Point) -> bool;
}

impl Region for Rect {
    /// Left and top edges are inclusive, right and bottom are exclusive.
    fn contains(&self, point: Point) -> bool {
        (self.origin.x..self.origin.x + self.size.width).contains(&point.x)
            && (self.origin.y..self.origin.y + self.size.height).contains(&point.y)
    }
}

/// Handle of an attached listener, needed to detach it.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ListenerId(pub u64);

pub type ResizeListener = Box<dyn FnMut(Size)>;

pub trait Viewport {
    fn size(&self) -> Size;

    fn add_resize_listener(&self, listener: ResizeListener) -> ListenerId;

    /// Detaching an unknown listener is a no-op.
    fn remove_resize_listener(&self, id: ListenerId);
}

/// The single transient surface hosting the history chart.
pub trait Dialog: Region {
    fn is_visible(&self) -> bool;

    fn show(&mut self);

    fn hide(&mut self);

    /// Drop whatever the dialog displays.
    fn clear(&mut self);

    /// Display an inline error instead of a chart.
    fn show_error(&mut self, message: &str);
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
}

pub type PointerListener = Box<dyn FnMut(PointerEvent)>;

/// Document root dispatching pointer presses.
pub trait PointerRoot {
    fn add_pointer_down_listener(&self, listener: PointerListener) -> ListenerId;

    fn remove_pointer_down_listener(&self, id: ListenerId);
}
