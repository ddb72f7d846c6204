//! The station map: view, base tiles, and one label per station.

use std::rc::Rc;

use crate::{
    feed::FeedEnvelope,
    geo::Coordinates,
    grade::Grade,
    marker::{HistoryRequester, InteractiveLabel, MarkerViewBuilder},
    navigation::Platform,
    prelude::*,
};

pub const DEFAULT_ZOOM: f64 = 12.0;

/// Slippy-map tile source.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TileLayer {
    /// `{s}` is the subdomain, `{z}/{x}/{y}` the tile address.
    pub url_template: &'static str,
    pub max_zoom: u8,
    pub attribution: &'static str,
}

impl TileLayer {
    pub const OPEN_STREET_MAP: Self = Self {
        url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
        max_zoom: 16,
        attribution: r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#,
    };
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: f64,

    /// Zoom levels snap to multiples of this, `0.0` disables snapping.
    pub zoom_snap: f64,

    pub zoom_animation: bool,
}

impl MapView {
    pub const fn centered_on(center: Coordinates) -> Self {
        Self { center, zoom: DEFAULT_ZOOM, zoom_snap: 0.0, zoom_animation: false }
    }
}

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct MarkerId(pub usize);

/// Host map widget.
pub trait MapSurface {
    fn set_view(&mut self, view: MapView);

    fn add_tile_layer(&mut self, layer: TileLayer);

    fn add_marker(&mut self, label: InteractiveLabel) -> MarkerId;
}

/// An initialized map, together with the labels placed on it.
pub struct MapHandle<S> {
    pub surface: S,
    pub markers: Vec<(MarkerId, InteractiveLabel)>,
}

impl<S> MapHandle<S> {
    /// First marker with the given station name.
    #[must_use]
    pub fn find(&self, station_name: &str) -> Option<&InteractiveLabel> {
        self.markers.iter().map(|(_, label)| label).find(|label| label.name == station_name)
    }
}

pub struct MapController {
    builder: MarkerViewBuilder,
}

impl MapController {
    pub fn new(requester: Rc<dyn HistoryRequester>, platform: Platform) -> Self {
        Self { builder: MarkerViewBuilder::new(requester, platform) }
    }

    /// Grade requested when a price is activated, `regular` by default.
    #[must_use]
    pub fn with_grade(mut self, grade: Grade) -> Self {
        self.builder = self.builder.with_grade(grade);
        self
    }

    #[instrument(skip_all, fields(origin = %envelope.origin(), n_stations = envelope.stations.len()))]
    pub fn initialize<S: MapSurface>(&self, envelope: &FeedEnvelope, mut surface: S) -> MapHandle<S> {
        surface.set_view(MapView::centered_on(envelope.origin()));
        surface.add_tile_layer(TileLayer::OPEN_STREET_MAP);
        let markers = envelope
            .stations
            .iter()
            .map(|station| {
                let label = self.builder.build(station);
                (surface.add_marker(label.clone()), label)
            })
            .collect();
        info!("initialized the map");
        MapHandle { surface, markers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        headless::HeadlessMap,
        history::HistoryQuery,
        marker::{PriceText, TooltipOptions},
        testing::RecordingRequester,
    };

    // language=JSON
    const FEED: &str = r#"
        {
            "Latitude": 40.0,
            "Longitude": -75.0,
            "Time": 1704067200000,
            "Data": [
                {"Name": "A", "Latitude": 40.1, "Longitude": -75.1, "RegularPrice": 3.49},
                {"Name": "B", "Latitude": 40.2, "Longitude": -75.2}
            ]
        }
    "#;

    #[test]
    fn test_initialize() -> Result {
        let envelope = FeedEnvelope::from_json(FEED.as_bytes())?;
        let controller = MapController::new(Rc::new(RecordingRequester::default()), Platform::Other);

        let handle = controller.initialize(&envelope, HeadlessMap::default());

        assert_eq!(
            handle.surface.view(),
            Some(MapView {
                center: Coordinates::new(40.0, -75.0),
                zoom: 12.0,
                zoom_snap: 0.0,
                zoom_animation: false,
            }),
        );
        assert_eq!(handle.surface.tile_layers(), [TileLayer::OPEN_STREET_MAP]);
        assert_eq!(handle.markers.len(), 2);

        let (id, label) = &handle.markers[0];
        assert_eq!(*id, MarkerId(0));
        assert_eq!(label.name, "A");
        assert_eq!(label.anchor, Coordinates::new(40.1, -75.1));
        assert_eq!(label.price.to_string(), "$3.49");
        assert_eq!(label.options, TooltipOptions::STATION_LABEL);

        let (_, label) = &handle.markers[1];
        assert_eq!(label.name, "B");
        assert_eq!(label.price, PriceText::Unknown);
        assert_eq!(label.price.to_string(), "N/A");

        assert_eq!(handle.surface.markers().len(), 2);
        Ok(())
    }

    #[test]
    fn test_initialize_empty() -> Result {
        // language=JSON
        let envelope = FeedEnvelope::from_json(br#"{"Latitude": 1.5, "Longitude": 2.5, "Data": []}"#)?;
        let controller = MapController::new(Rc::new(RecordingRequester::default()), Platform::Other);
        let handle = controller.initialize(&envelope, HeadlessMap::default());
        assert!(handle.markers.is_empty());
        assert_eq!(handle.surface.view().map(|view| view.center), Some(Coordinates::new(1.5, 2.5)));
        Ok(())
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_marker_activation_requests_regular_history() -> Result {
        let envelope = FeedEnvelope::from_json(FEED.as_bytes())?;
        let requester = Rc::new(RecordingRequester::default());
        let controller = MapController::new(requester.clone(), Platform::Android);
        let handle = controller.initialize(&envelope, HeadlessMap::default());

        let label = handle.find("B").context("no marker for B")?;
        assert_eq!(label.link.as_str(), "google.navigation:q=40.2,-75.2");
        label.action.activate().await;

        assert_eq!(requester.queries(), vec![HistoryQuery::new("B", Grade::Regular)]);
        Ok(())
    }
}
