use clap::Parser;
use gastrak_map::{grade::Grade, history::HistoryQuery};

use crate::{cli::panel::PanelArgs, prelude::*};

#[derive(Parser)]
pub struct HistoryArgs {
    /// Station name, as it appears in the snapshot.
    #[clap(long)]
    station: String,

    #[clap(long, default_value = "regular")]
    grade: Grade,

    #[clap(flatten)]
    panel: PanelArgs,
}

impl HistoryArgs {
    #[instrument(skip_all, fields(station = %self.station, grade = %self.grade))]
    pub async fn run(self) -> Result {
        let panel = self.panel.build()?;
        panel.request_history(HistoryQuery::new(self.station.as_str(), self.grade)).await;
        self.panel.report(&panel)
    }
}
