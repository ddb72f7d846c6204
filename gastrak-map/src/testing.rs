//! Test doubles shared by the unit tests.

use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::Rc,
};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::{
    api::HistorySource,
    history::{HistoryPoint, HistoryQuery, decoder::HistoryDecoder},
    marker::HistoryRequester,
    panel::chart::{Chart, ChartRenderer, ChartSpec},
    prelude::*,
    surface::Size,
};

#[derive(Default)]
pub struct RecordingRequester(RefCell<Vec<HistoryQuery>>);

impl RecordingRequester {
    pub fn queries(&self) -> Vec<HistoryQuery> {
        self.0.borrow().clone()
    }
}

#[async_trait(?Send)]
impl HistoryRequester for RecordingRequester {
    async fn request(&self, query: HistoryQuery) {
        self.0.borrow_mut().push(query);
    }
}

/// Answers every fetch by decoding the same body.
pub struct StaticSource {
    pub body: &'static str,
    pub decoder: Box<dyn HistoryDecoder>,
    pub queries: RefCell<Vec<HistoryQuery>>,
}

impl StaticSource {
    pub fn new(body: &'static str, decoder: Box<dyn HistoryDecoder>) -> Self {
        Self { body, decoder, queries: RefCell::default() }
    }
}

#[async_trait(?Send)]
impl HistorySource for StaticSource {
    async fn fetch(&self, query: &HistoryQuery) -> Result<Vec<HistoryPoint>> {
        self.queries.borrow_mut().push(query.clone());
        self.decoder.decode(self.body.as_bytes(), query.grade)
    }
}

pub type Response = Result<Vec<HistoryPoint>>;

/// Each fetch waits for the next scripted response, delivered by the test in any order.
#[derive(Default)]
pub struct ScriptedSource(RefCell<VecDeque<oneshot::Receiver<Response>>>);

impl ScriptedSource {
    pub fn with_responses(n_responses: usize) -> (Self, Vec<oneshot::Sender<Response>>) {
        let (senders, receivers): (Vec<_>, VecDeque<_>) =
            (0..n_responses).map(|_| oneshot::channel()).unzip();
        (Self(RefCell::new(receivers)), senders)
    }
}

#[async_trait(?Send)]
impl HistorySource for ScriptedSource {
    async fn fetch(&self, _query: &HistoryQuery) -> Result<Vec<HistoryPoint>> {
        let receiver = self.0.borrow_mut().pop_front().context("no more scripted responses")?;
        receiver.await.context("the test dropped the response")?
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartEvent {
    Created { title: String, size: Size },
    Resized(Size),
    Destroyed,
}

#[derive(Clone, Default)]
pub struct RecordingRenderer {
    events: Rc<RefCell<Vec<ChartEvent>>>,
    specs: Rc<RefCell<Vec<ChartSpec>>>,
    pub fail: bool,
}

impl RecordingRenderer {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn events(&self) -> Vec<ChartEvent> {
        self.events.borrow().clone()
    }

    pub fn specs(&self) -> Vec<ChartSpec> {
        self.specs.borrow().clone()
    }

    pub fn n_live_charts(&self) -> usize {
        let events = self.events.borrow();
        let created = events.iter().filter(|event| matches!(event, ChartEvent::Created { .. })).count();
        let destroyed = events.iter().filter(|event| **event == ChartEvent::Destroyed).count();
        created - destroyed
    }
}

impl ChartRenderer for RecordingRenderer {
    type Chart = RecordingChart;

    fn create(&self, spec: &ChartSpec, size: Size) -> Result<RecordingChart> {
        ensure!(!self.fail, "the chart engine is broken");
        self.specs.borrow_mut().push(spec.clone());
        self.events.borrow_mut().push(ChartEvent::Created { title: spec.title.clone(), size });
        Ok(RecordingChart { events: Rc::clone(&self.events), title: spec.title.clone() })
    }
}

pub struct RecordingChart {
    events: Rc<RefCell<Vec<ChartEvent>>>,
    pub title: String,
}

impl Chart for RecordingChart {
    fn resize(&mut self, size: Size) {
        self.events.borrow_mut().push(ChartEvent::Resized(size));
    }

    fn destroy(&mut self) {
        self.events.borrow_mut().push(ChartEvent::Destroyed);
    }
}
