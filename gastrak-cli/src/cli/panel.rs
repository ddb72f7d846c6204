use std::{fs, path::PathBuf, rc::Rc, str::FromStr};

use clap::Parser;
use gastrak_map::{
    api,
    headless::{HeadlessDialog, HeadlessViewport},
    history::decoder::HistoryFormat,
    panel::{HistoryPanel, PanelStatus, chart::chart_size},
    surface::{Rect, Size},
};
use reqwest::Url;

use crate::{chart::SvgChartRenderer, prelude::*, tables::build_history_table};

pub type Panel = HistoryPanel<api::Client, SvgChartRenderer, HeadlessDialog, HeadlessViewport>;

#[derive(Parser)]
pub struct PanelArgs {
    /// Base URL of the server exposing the `/history` endpoint.
    #[clap(long = "history-url", env = "GASTRAK_HISTORY_URL", default_value = "http://localhost:8000")]
    history_url: Url,

    #[clap(long = "history-format", env = "GASTRAK_HISTORY_FORMAT", default_value = "json")]
    history_format: HistoryFormat,

    #[clap(long = "history-timeout", env = "GASTRAK_HISTORY_TIMEOUT", default_value = "10s")]
    history_timeout: humantime::Duration,

    /// Viewport the chart is sized against, as `WIDTHxHEIGHT`.
    #[clap(long, default_value = "1000x800")]
    viewport: Dimensions,

    /// Where to write the rendered chart.
    #[clap(long, default_value = "chart.svg")]
    output: PathBuf,
}

impl PanelArgs {
    pub fn build(&self) -> Result<Panel> {
        let client = api::Client::builder()
            .base_url(self.history_url.clone())
            .format(self.history_format)
            .timeout(self.history_timeout.into())
            .build()?;
        let viewport = Rc::new(HeadlessViewport::new(self.viewport.0));
        let dialog = HeadlessDialog::new(Rect::centered(self.viewport.0, chart_size(self.viewport.0)));
        Ok(HistoryPanel::new(client, SvgChartRenderer, dialog, viewport))
    }

    /// Print and save whatever the panel ended up showing.
    pub fn report(&self, panel: &Panel) -> Result {
        match panel.status() {
            PanelStatus::Open => {
                let (svg, table) = panel
                    .with_chart(|chart| (chart.svg().to_owned(), build_history_table(&chart.spec().points)))
                    .context("the panel is open without a chart")?;
                println!("{table}");
                fs::write(&self.output, svg)
                    .with_context(|| format!("failed to write `{}`", self.output.display()))?;
                info!(output = %self.output.display(), "saved the chart");
                Ok(())
            }
            PanelStatus::Failed => {
                bail!("{}", panel.dialog().error().unwrap_or("the panel failed"))
            }
            PanelStatus::Closed => {
                warn!("the panel stayed closed");
                Ok(())
            }
        }
    }
}

/// `WIDTHxHEIGHT` in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dimensions(pub Size);

impl FromStr for Dimensions {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let (width, height) = value
            .split_once(['x', 'X'])
            .with_context(|| format!("expected `WIDTHxHEIGHT`, got `{value}`"))?;
        let width: f64 = width.trim().parse().with_context(|| format!("invalid width `{width}`"))?;
        let height: f64 = height.trim().parse().with_context(|| format!("invalid height `{height}`"))?;
        if width <= 0.0 || height <= 0.0 {
            bail!("the viewport must not be empty, got `{value}`");
        }
        Ok(Self(Size::new(width, height)))
    }
}
