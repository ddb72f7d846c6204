mod history;
mod markers;
mod panel;

use clap::{Parser, Subcommand};

use crate::cli::{history::HistoryArgs, markers::MarkersArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a station snapshot and place the markers.
    #[clap(name = "markers")]
    Markers(Box<MarkersArgs>),

    /// Fetch the price history of one station and render the chart.
    #[clap(name = "history")]
    History(Box<HistoryArgs>),
}
