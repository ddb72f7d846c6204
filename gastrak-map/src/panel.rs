//! The history panel: one dialog, at most one chart.
//!
//! ```text
//! Closed ──request_history / render──▶ Open ──dismiss──▶ Closed
//!    │                                   │
//!    └──────── fetch / render error ──▶ Failed ──dismiss──▶ Closed
//! ```
//!
//! Every transition out of `Open` goes through [`HistoryPanel::dismiss`], which
//! detaches the resize listener and destroys the chart before the dialog is
//! cleared. A new chart is never created while the old one is alive.

pub mod chart;

use std::{
    cell::{Cell, Ref, RefCell},
    rc::Rc,
};

use async_trait::async_trait;

use self::chart::{ChartRenderer, ChartResource, ChartSpec, chart_size};
use crate::{
    api::HistorySource,
    dismiss::DismissTarget,
    grade::Grade,
    history::{HistoryPoint, HistoryQuery},
    marker::HistoryRequester,
    prelude::*,
    surface::{Dialog, Point, Viewport},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PanelStatus {
    /// No chart, dialog hidden.
    Closed,

    /// Chart live, dialog visible, resize listener attached.
    Open,

    /// Dialog visible with an inline error, no chart.
    Failed,
}

enum PanelState<C> {
    Closed,
    Open(ChartResource<C>),
    Failed,
}

/// Monotonic request sequence number.
///
/// Only the response to the latest request may reach the dialog.
#[derive(Copy, Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
struct Ticket(u64);

/// Dropping an open panel releases its chart, like [`HistoryPanel::dismiss`]
/// minus the dialog updates.
pub struct HistoryPanel<S, R: ChartRenderer, D, V: Viewport> {
    source: S,
    renderer: R,
    dialog: RefCell<D>,
    viewport: Rc<V>,
    state: RefCell<PanelState<R::Chart>>,
    latest_ticket: Cell<Ticket>,
}

impl<S, R, D, V> HistoryPanel<S, R, D, V>
where
    S: HistorySource,
    R: ChartRenderer,
    R::Chart: 'static,
    D: Dialog,
    V: Viewport,
{
    pub fn new(source: S, renderer: R, dialog: D, viewport: Rc<V>) -> Self {
        Self {
            source,
            renderer,
            dialog: RefCell::new(dialog),
            viewport,
            state: RefCell::new(PanelState::Closed),
            latest_ticket: Cell::default(),
        }
    }

    /// Fetch the series and show it, unless a newer request or render has
    /// happened in the meantime.
    ///
    /// An in-flight fetch is not cancelled by [`Self::dismiss`]: if it is
    /// still the latest request when it resolves, the panel opens.
    #[instrument(skip_all, fields(station = %query.station_name, grade = %query.grade))]
    pub async fn request_history(&self, query: HistoryQuery) {
        let ticket = self.issue_ticket();
        let result = self.source.fetch(&query).await;

        let latest_ticket = self.latest_ticket.get();
        if ticket != latest_ticket {
            debug!(?ticket, ?latest_ticket, "superseded, dropping the response");
            return;
        }
        match result {
            Ok(series) => self.show(&query, series),
            Err(error) => self.fail(&error.context(format!("failed to load the history of {query}"))),
        }
    }

    /// Show the series right away. Supersedes any outstanding request.
    pub fn render(&self, name: &str, grade: Grade, series: Vec<HistoryPoint>) {
        self.issue_ticket();
        self.show(&HistoryQuery::new(name, grade), series);
    }

    /// Close the panel and release the chart. No-op when already closed.
    pub fn dismiss(&self) {
        let state = self.state.replace(PanelState::Closed);
        match state {
            PanelState::Closed => return,
            PanelState::Open(resource) => resource.release(&*self.viewport),
            PanelState::Failed => {}
        }
        let mut dialog = self.dialog.borrow_mut();
        dialog.clear();
        dialog.hide();
        info!("dismissed");
    }

    pub fn status(&self) -> PanelStatus {
        match &*self.state.borrow() {
            PanelState::Closed => PanelStatus::Closed,
            PanelState::Open(_) => PanelStatus::Open,
            PanelState::Failed => PanelStatus::Failed,
        }
    }

    pub fn dialog(&self) -> Ref<'_, D> {
        self.dialog.borrow()
    }

    /// Inspect the live chart, if any.
    pub fn with_chart<T>(&self, f: impl FnOnce(&R::Chart) -> T) -> Option<T> {
        match &*self.state.borrow() {
            PanelState::Open(resource) => Some(f(&resource.chart().borrow())),
            PanelState::Closed | PanelState::Failed => None,
        }
    }

    fn issue_ticket(&self) -> Ticket {
        let ticket = Ticket(self.latest_ticket.get().0 + 1);
        self.latest_ticket.set(ticket);
        ticket
    }

    fn show(&self, query: &HistoryQuery, series: Vec<HistoryPoint>) {
        self.dismiss();

        let spec = ChartSpec::new(query, series);
        let size = chart_size(self.viewport.size());
        let chart = match self.renderer.create(&spec, size) {
            Ok(chart) => chart,
            Err(error) => {
                self.fail(&error.context(format!("failed to render the history of {query}")));
                return;
            }
        };

        let resource = ChartResource::attach(chart, &*self.viewport);
        self.dialog.borrow_mut().show();
        *self.state.borrow_mut() = PanelState::Open(resource);
        info!(title = %spec.title, n_points = spec.points.len(), "opened");
    }

    fn fail(&self, error: &Error) {
        warn!("{error:#}");
        self.dismiss();
        let mut dialog = self.dialog.borrow_mut();
        dialog.show_error(&format!("{error:#}"));
        dialog.show();
        *self.state.borrow_mut() = PanelState::Failed;
    }
}

impl<S, R: ChartRenderer, D, V: Viewport> Drop for HistoryPanel<S, R, D, V> {
    fn drop(&mut self) {
        if let PanelState::Open(resource) = self.state.replace(PanelState::Closed) {
            resource.release(&*self.viewport);
        }
    }
}

#[async_trait(?Send)]
impl<S, R, D, V> HistoryRequester for HistoryPanel<S, R, D, V>
where
    S: HistorySource,
    R: ChartRenderer,
    R::Chart: 'static,
    D: Dialog,
    V: Viewport,
{
    async fn request(&self, query: HistoryQuery) {
        self.request_history(query).await;
    }
}

impl<S, R, D, V> DismissTarget for HistoryPanel<S, R, D, V>
where
    S: HistorySource,
    R: ChartRenderer,
    R::Chart: 'static,
    D: Dialog,
    V: Viewport,
{
    fn hit_test(&self, point: Point) -> bool {
        let dialog = self.dialog.borrow();
        dialog.is_visible() && dialog.contains(point)
    }

    fn dismiss(&self) {
        Self::dismiss(self);
    }
}
