//! Markup helpers shared by the HTML adapters.

use scraper::{ElementRef, Html, Selector};

use crate::metrics::RawTable;
use crate::{SourceError, SourceId};

const MAX_COLSPAN: usize = 64;

pub(crate) fn selector(css: &str, source_id: SourceId) -> Result<Selector, SourceError> {
    Selector::parse(css)
        .map_err(|e| SourceError::decode(source_id, format!("invalid selector '{css}': {e}")))
}

/// Selector for `tag` elements carrying `class`.
pub(crate) fn class_selector(
    tag: &str,
    class: &str,
    source_id: SourceId,
) -> Result<Selector, SourceError> {
    selector(&format!("{tag}.{class}"), source_id)
}

/// Element text with whitespace runs collapsed and ends trimmed.
pub(crate) fn collapsed_text(element: ElementRef<'_>) -> String {
    normalize_ws(&element.text().collect::<String>())
}

pub(crate) fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Every `<table>` as a grid of cells. `colspan` cells are repeated across
/// the columns they span.
pub(crate) fn extract_tables(document: &Html) -> Result<Vec<(String, RawTable)>, SourceError> {
    let table_sel = selector("table", SourceId::SmartLab)?;
    let row_sel = selector("tr", SourceId::SmartLab)?;

    let tables = document
        .select(&table_sel)
        .map(|table| {
            let rows = table
                .select(&row_sel)
                .map(|row| {
                    let mut cells = Vec::new();
                    for cell in row.children().filter_map(ElementRef::wrap) {
                        if !matches!(cell.value().name(), "td" | "th") {
                            continue;
                        }
                        let span = cell
                            .value()
                            .attr("colspan")
                            .and_then(|value| value.trim().parse::<usize>().ok())
                            .unwrap_or(1)
                            .clamp(1, MAX_COLSPAN);
                        let text = collapsed_text(cell);
                        let value = (!text.is_empty()).then_some(text);
                        cells.extend(std::iter::repeat(value).take(span));
                    }
                    cells
                })
                .filter(|cells| !cells.is_empty())
                .collect();
            (collapsed_text(table), RawTable::new(rows))
        })
        .collect();

    Ok(tables)
}
