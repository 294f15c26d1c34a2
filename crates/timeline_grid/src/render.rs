//! Plain-text rendering of a month grid. Every day column is `DAY_WIDTH`
//! characters wide and an occupied cell is drawn as one bar across all the
//! columns it spans.

use std::fmt::Write;

use crate::timeline_grid::GridCell;
use crate::timeline_grid::GridRow;
use crate::timeline_grid::TimelineGridBuilder;

pub const DAY_WIDTH: usize = 3;
pub const LABEL_WIDTH: usize = 20;

/// Header line with the month name followed by the day numbers.
pub fn render_header(builder: &TimelineGridBuilder) -> String
{
    let mut line = pad(&builder.window().first_day().format("%B %Y").to_string(), LABEL_WIDTH);
    for day in 1..=builder.days_in_month() {
        let _ = write!(line, "{day:>DAY_WIDTH$}");
    }
    line
}

/// One line per row, labelled with the item's title.
pub fn render_grid(builder: &TimelineGridBuilder, rows: &[GridRow]) -> String
{
    let mut lines = vec![render_header(builder)];
    for row in rows {
        let mut line = pad(&row.item.title(), LABEL_WIDTH);
        line.push_str(&render_cells(&row.cells));
        lines.push(line);
    }
    lines.join("\n")
}

/// A single shared row, as used by the worker and order calendars.
pub fn render_single_row(builder: &TimelineGridBuilder, label: &str, cells: &[GridCell]) -> String
{
    format!("{}\n{}{}", render_header(builder), pad(label, LABEL_WIDTH), render_cells(cells))
}

fn render_cells(cells: &[GridCell]) -> String
{
    let mut rendered = String::new();
    for cell in cells {
        match cell {
            GridCell::Empty => {
                let _ = write!(rendered, "{:>DAY_WIDTH$}", ".");
            }
            GridCell::Occupied { item, span } => {
                let inner = *span as usize * DAY_WIDTH - 2;
                let text = truncate(item.status(), inner);
                let _ = write!(rendered, "[{text:=<inner$}]");
            }
        }
    }
    rendered
}

fn truncate(text: &str, width: usize) -> String
{
    text.chars().take(width).collect()
}

fn pad(text: &str, width: usize) -> String
{
    let cut = truncate(text, width - 1);
    format!("{cut:<width$}")
}
