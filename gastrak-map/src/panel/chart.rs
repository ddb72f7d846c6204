//! Chart engine contract and the live chart resource.

use std::{cell::RefCell, rc::Rc};

use gastrak_quantities::Dollars;

use crate::{
    history::{HistoryPoint, HistoryQuery},
    prelude::*,
    surface::{ListenerId, Size, Viewport},
};

/// Share of the viewport taken by the chart.
pub const WIDTH_FRACTION: f64 = 0.8;
pub const HEIGHT_FRACTION: f64 = 0.6;

pub fn chart_size(viewport: Size) -> Size {
    viewport.scale(WIDTH_FRACTION, HEIGHT_FRACTION)
}

/// What to draw: a line chart over time, prices on the y-axis.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub points: Vec<HistoryPoint>,

    /// Prices never render on a negative axis.
    pub y_min: Dollars,
}

impl ChartSpec {
    pub fn new(query: &HistoryQuery, points: Vec<HistoryPoint>) -> Self {
        Self { title: query.to_string(), points, y_min: Dollars::ZERO }
    }

    /// Highest price in the series, or [`None`] for an empty one.
    #[must_use]
    pub fn max_price(&self) -> Option<Dollars> {
        self.points.iter().map(|point| point.price).max()
    }

    /// Y-axis tick label, in whole cents.
    #[must_use]
    pub fn format_tick(value: f64) -> String {
        Dollars::from(value).round(2).to_string()
    }
}

pub trait ChartRenderer {
    type Chart: Chart;

    fn create(&self, spec: &ChartSpec, size: Size) -> Result<Self::Chart>;
}

pub trait Chart {
    fn resize(&mut self, size: Size);

    /// Release the graphics resources. Called exactly once per chart.
    fn destroy(&mut self);
}

/// A live chart together with the resize listener keeping it sized.
pub(crate) struct ChartResource<C> {
    chart: Rc<RefCell<C>>,
    resize_listener: ListenerId,
}

impl<C: Chart + 'static> ChartResource<C> {
    pub fn attach(chart: C, viewport: &impl Viewport) -> Self {
        let chart = Rc::new(RefCell::new(chart));
        let weak_chart = Rc::downgrade(&chart);
        let resize_listener = viewport.add_resize_listener(Box::new(move |size| {
            if let Some(chart) = weak_chart.upgrade() {
                chart.borrow_mut().resize(chart_size(size));
            }
        }));
        debug!(?resize_listener, "attached the chart");
        Self { chart, resize_listener }
    }
}

impl<C: Chart> ChartResource<C> {
    pub fn chart(&self) -> &Rc<RefCell<C>> {
        &self.chart
    }

    /// Detach the listener first, then destroy the chart.
    pub fn release(self, viewport: &impl Viewport) {
        viewport.remove_resize_listener(self.resize_listener);
        self.chart.borrow_mut().destroy();
        debug!(resize_listener = ?self.resize_listener, "released the chart");
    }
}
