//! SVG line charts drawn with `plotters`.

use std::ops::Range;

use chrono::{DateTime, TimeDelta, Utc};
use gastrak_map::{
    panel::chart::{Chart, ChartRenderer, ChartSpec},
    surface::Size,
};
use plotters::prelude::*;

use crate::prelude::*;

/// Headroom above the highest price.
const Y_PADDING: f64 = 1.1;

pub struct SvgChartRenderer;

impl ChartRenderer for SvgChartRenderer {
    type Chart = SvgChart;

    fn create(&self, spec: &ChartSpec, size: Size) -> Result<SvgChart> {
        let svg = draw(spec, size)?;
        Ok(SvgChart { spec: spec.clone(), svg })
    }
}

/// The chart markup, redrawn on every resize.
pub struct SvgChart {
    spec: ChartSpec,
    svg: String,
}

impl SvgChart {
    pub const fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }
}

impl Chart for SvgChart {
    fn resize(&mut self, size: Size) {
        match draw(&self.spec, size) {
            Ok(svg) => self.svg = svg,
            Err(error) => warn!("failed to redraw the chart: {error:#}"),
        }
    }

    fn destroy(&mut self) {
        self.svg.clear();
    }
}

#[instrument(skip_all, fields(title = %spec.title, n_points = spec.points.len()))]
fn draw(spec: &ChartSpec, size: Size) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, pixels(size)).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 20.0).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range(spec), y_range(spec))?;
        chart
            .configure_mesh()
            .x_label_formatter(&|timestamp: &DateTime<Utc>| timestamp.format("%b %d").to_string())
            .y_label_formatter(&|price: &f64| ChartSpec::format_tick(*price))
            .draw()?;
        chart.draw_series(LineSeries::new(
            spec.points.iter().map(|point| (point.timestamp, f64::from(point.price))),
            &BLUE,
        ))?;
        root.present()?;
    }
    Ok(svg)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixels(size: Size) -> (u32, u32) {
    (size.width.round().max(1.0) as u32, size.height.round().max(1.0) as u32)
}

/// Time span of the series, widened to a day when it collapses to a point.
fn x_range(spec: &ChartSpec) -> Range<DateTime<Utc>> {
    let (start, end) = match (spec.points.first(), spec.points.last()) {
        (Some(first), Some(last)) => (first.timestamp, last.timestamp),
        _ => {
            let now = Utc::now();
            (now - TimeDelta::days(7), now)
        }
    };
    if start < end { start..end } else { start..start + TimeDelta::days(1) }
}

/// From the price floor to a bit above the highest price.
fn y_range(spec: &ChartSpec) -> Range<f64> {
    let y_min = f64::from(spec.y_min);
    let y_max = spec.max_price().map_or(0.0, |price| f64::from(price * Y_PADDING));
    if y_max > y_min { y_min..y_max } else { y_min..y_min + 1.0 }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;
    use gastrak_map::{
        grade::Grade,
        history::{HistoryPoint, HistoryQuery},
    };

    use super::*;

    fn spec(prices: &[f64]) -> ChartSpec {
        let points = prices
            .iter()
            .zip(1..)
            .map(|(price, day)| {
                HistoryPoint::new(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(), (*price).into())
            })
            .collect();
        ChartSpec::new(&HistoryQuery::new("A", Grade::Regular), points)
    }

    #[test]
    fn test_create() -> Result {
        let chart = SvgChartRenderer.create(&spec(&[3.10, 3.20]), Size::new(800.0, 480.0))?;
        assert!(chart.svg().starts_with("<svg"));
        assert!(chart.svg().contains(r#"width="800""#));
        assert!(chart.svg().contains("A (regular)"));
        Ok(())
    }

    #[test]
    fn test_resize_and_destroy() -> Result {
        let mut chart = SvgChartRenderer.create(&spec(&[3.10, 3.20]), Size::new(800.0, 480.0))?;
        chart.resize(Size::new(400.0, 300.0));
        assert!(chart.svg().contains(r#"width="400""#));
        chart.destroy();
        assert!(chart.svg().is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_series() -> Result {
        let chart = SvgChartRenderer.create(&spec(&[]), Size::new(800.0, 480.0))?;
        assert!(chart.svg().starts_with("<svg"));
        Ok(())
    }

    #[test]
    fn test_y_range_starts_at_zero() {
        let range = y_range(&spec(&[3.10, 3.20]));
        assert_abs_diff_eq!(range.start, 0.0);
        assert_abs_diff_eq!(range.end, 3.52, epsilon = 1e-9);
        assert_eq!(y_range(&spec(&[])), 0.0..1.0);
    }

    #[test]
    fn test_x_range_of_single_point() {
        let range = x_range(&spec(&[3.10]));
        assert_eq!(range.end - range.start, TimeDelta::days(1));
    }

    #[test]
    fn test_pixels() {
        assert_eq!(pixels(Size::new(799.6, 0.2)), (800, 1));
    }
}
