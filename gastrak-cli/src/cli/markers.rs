use std::{fs, fs::File, path::PathBuf, rc::Rc};

use chrono::{DateTime, Utc};
use clap::Parser;
use gastrak_map::{
    feed::FeedEnvelope,
    geo::Coordinates,
    grade::Grade,
    headless::HeadlessMap,
    map::MapController,
    navigation::Platform,
};

use crate::{cli::panel::PanelArgs, prelude::*, tables::build_markers_table};

#[derive(Parser)]
pub struct MarkersArgs {
    #[clap(flatten)]
    source: FeedArgs,

    /// User agent of the pretended browser, picks the navigation link flavour.
    #[clap(long, env = "GASTRAK_USER_AGENT", default_value = "")]
    user_agent: String,

    /// Grade requested when a price gets activated.
    #[clap(long, default_value = "regular")]
    grade: Grade,

    /// Activate the price of this station, as if it were clicked.
    #[clap(long, value_name = "STATION")]
    activate: Option<String>,

    #[clap(flatten)]
    panel: PanelArgs,
}

impl MarkersArgs {
    pub async fn run(self) -> Result {
        let envelope = self.source.load()?;
        let platform = Platform::from_user_agent(&self.user_agent);
        info!(?platform, n_stations = envelope.stations.len(), "loaded the snapshot");

        let panel = Rc::new(self.panel.build()?);
        let handle = MapController::new(panel.clone(), platform)
            .with_grade(self.grade)
            .initialize(&envelope, HeadlessMap::default());
        println!("{}", build_markers_table(&handle.markers));

        if let Some(station_name) = &self.activate {
            handle
                .find(station_name)
                .with_context(|| format!("there is no station named `{station_name}`"))?
                .action
                .activate()
                .await;
            self.panel.report(&panel)?;
        }
        Ok(())
    }
}

/// Where the station snapshot comes from.
#[derive(Parser)]
pub struct FeedArgs {
    /// JSON snapshot: `{"Latitude", "Longitude", "Time", "Data": [...]}`.
    #[clap(long, env = "GASTRAK_FEED", conflicts_with = "csv", required_unless_present = "csv")]
    feed: Option<PathBuf>,

    /// Raw snapshot CSV, the map origin comes from `--latitude` and `--longitude`.
    #[clap(long, requires_all = ["latitude", "longitude"])]
    csv: Option<PathBuf>,

    #[clap(long, allow_negative_numbers = true)]
    latitude: Option<f64>,

    #[clap(long, allow_negative_numbers = true)]
    longitude: Option<f64>,
}

impl FeedArgs {
    #[instrument(skip_all)]
    fn load(&self) -> Result<FeedEnvelope> {
        match (&self.feed, &self.csv, self.latitude, self.longitude) {
            (Some(path), None, _, _) => {
                let body = fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
                FeedEnvelope::from_json(&body)
            }
            (None, Some(path), Some(latitude), Some(longitude)) => {
                let file = File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
                // The snapshot is as fresh as the file.
                let captured_at = file
                    .metadata()
                    .and_then(|metadata| metadata.modified())
                    .ok()
                    .map(DateTime::<Utc>::from);
                FeedEnvelope::from_csv(Coordinates::new(latitude, longitude), captured_at, file)
            }
            _ => bail!("either `--feed` or `--csv` with `--latitude` and `--longitude` is required"),
        }
    }
}
