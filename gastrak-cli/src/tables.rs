use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use gastrak_map::{
    history::HistoryPoint,
    map::MarkerId,
    marker::{InteractiveLabel, PriceText},
};
use gastrak_quantities::Dollars;
use itertools::Itertools;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn build_markers_table(markers: &[(MarkerId, InteractiveLabel)]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Station", "Location", "Price", "Navigation"]);
    for (id, label) in markers {
        table.add_row(vec![
            Cell::new(id.0).add_attribute(Attribute::Dim),
            Cell::new(&label.name).add_attribute(Attribute::Bold),
            Cell::new(label.anchor),
            Cell::new(label.price).set_alignment(CellAlignment::Right).fg(match label.price {
                PriceText::Known(_) => Color::Reset,
                PriceText::Unknown => Color::DarkGrey,
            }),
            Cell::new(&label.link).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

/// One row per point, with the change since the previous one.
pub fn build_history_table(points: &[HistoryPoint]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Time", "Price", "Change"]);
    let changes = std::iter::once(None).chain(
        points.iter().tuple_windows().map(|(previous, next)| Some((next.price - previous.price).round(3))),
    );
    for (point, change) in points.iter().zip(changes) {
        table.add_row(vec![
            Cell::new(point.timestamp.format("%b %d")),
            Cell::new(point.timestamp.format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(point.price).set_alignment(CellAlignment::Right),
            change.map_or_else(
                || Cell::new(""),
                |change| {
                    Cell::new(change).set_alignment(CellAlignment::Right).fg(
                        if change > Dollars::ZERO {
                            Color::Red
                        } else if change < Dollars::ZERO {
                            Color::Green
                        } else {
                            Color::Reset
                        },
                    )
                },
            ),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_history_table() {
        let points = [3.10, 3.20, 3.15].iter().zip(1..).map(|(price, day)| {
            HistoryPoint::new(Utc.with_ymd_and_hms(2024, 1, day, 12, 30, 0).unwrap(), (*price).into())
        });
        let table = build_history_table(&points.collect::<Vec<_>>());
        assert_eq!(table.row_count(), 3);

        let rendered = table.to_string();
        assert!(rendered.contains("Jan 02"));
        assert!(rendered.contains("$3.20"));
        assert!(rendered.contains("$0.10"));
        assert!(rendered.contains("-$0.05"));
    }

    #[test]
    fn test_empty_history_table() {
        assert_eq!(build_history_table(&[]).row_count(), 0);
    }
}
