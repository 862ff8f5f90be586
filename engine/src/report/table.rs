// Text rendering of a prepared series: input columns followed by the SMA columns
use prettytable::{format, Cell, Row, Table};
use shared::models::PriceSeries;
use shared::utils::format_optional;

use crate::services::series_preparer::DATE_COLUMN;

const SMA_DECIMALS: usize = 2;

/// Renders `series` as a text table. With `max_rows`, only the most recent
/// rows (the tail of the input) are shown.
pub fn render_table(series: &PriceSeries, max_rows: Option<usize>) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    let titles = series
        .columns
        .iter()
        .map(String::as_str)
        .chain(series.indicators.iter().map(|ind| ind.name.as_str()))
        .map(Cell::new)
        .collect();
    table.set_titles(Row::new(titles));

    // The Date column shows the parsed calendar date rather than the raw text
    let date_idx = series.columns.iter().position(|c| c == DATE_COLUMN);
    let skip = max_rows.map_or(0, |limit| series.len().saturating_sub(limit));

    for (i, row) in series.rows.iter().enumerate().skip(skip) {
        let mut cells: Vec<Cell> = row
            .fields
            .iter()
            .enumerate()
            .map(|(col, field)| {
                if Some(col) == date_idx {
                    let date = row.record.date.map(|d| d.format("%Y-%m-%d").to_string());
                    Cell::new(&date.unwrap_or_default())
                } else {
                    Cell::new(field.trim())
                }
            })
            .collect();
        for indicator in &series.indicators {
            let value = indicator.values.get(i).copied().flatten();
            cells.push(Cell::new(&format_optional(value, SMA_DECIMALS)).style_spec("r"));
        }
        table.add_row(Row::new(cells));
    }

    table.to_string()
}
