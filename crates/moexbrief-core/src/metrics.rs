//! Metrics table cleanup.
//!
//! Scraped financial tables carry their period labels in one of the first
//! rows rather than in a proper header, mix wanted and unwanted line items,
//! and sometimes gain noise columns from broken markup. [`MetricsNormalizer`]
//! turns such a [`RawTable`] into a [`MetricsTable`]:
//!
//! 1. [`detect_header`](MetricsNormalizer::detect_header) finds the period row.
//! 2. Rows after it are kept when their label matches a keyword.
//! 3. Unlabeled, `nan` and noise columns are dropped.

use crate::config::MetricsConfig;
use crate::{MetricRow, MetricsTable};

/// Label of the first column after header promotion.
pub const METRIC_COLUMN: &str = "Metric";

/// Cells as parsed from markup, `None` for blank cells. Rows are padded to equal width.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(mut rows: Vec<Vec<Option<String>>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, None);
        }
        Self { rows }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }
}

/// Outcome of looking for the period header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderDetection {
    /// Index of the row holding the period labels.
    Found(usize),
    /// No candidate row; columns are labeled by position.
    NotFound,
}

#[derive(Debug, Clone)]
pub struct MetricsNormalizer {
    header_markers: Vec<String>,
    header_scan_rows: usize,
    keywords: Vec<String>,
    noise_marker: String,
}

impl MetricsNormalizer {
    pub fn from_config(config: &MetricsConfig) -> Self {
        Self {
            header_markers: config.header_markers.clone(),
            header_scan_rows: config.header_scan_rows,
            keywords: config.keywords.iter().map(|k| k.to_lowercase()).collect(),
            noise_marker: config.noise_marker.clone(),
        }
    }

    /// First of the leading rows with a cell containing any header marker.
    pub fn detect_header(&self, table: &RawTable) -> HeaderDetection {
        table
            .rows
            .iter()
            .take(self.header_scan_rows)
            .position(|row| {
                row.iter().any(|cell| {
                    let text = cell_text(cell);
                    self.header_markers
                        .iter()
                        .any(|marker| text.contains(marker.as_str()))
                })
            })
            .map_or(HeaderDetection::NotFound, HeaderDetection::Found)
    }

    pub fn normalize(&self, table: &RawTable) -> (MetricsTable, HeaderDetection) {
        let detection = self.detect_header(table);

        let (header, body): (Vec<Option<String>>, &[Vec<Option<String>>]) = match detection {
            HeaderDetection::Found(idx) => {
                let mut header = table.rows[idx].clone();
                if let Some(first) = header.first_mut() {
                    *first = Some(String::from(METRIC_COLUMN));
                }
                (header, &table.rows[idx + 1..])
            }
            HeaderDetection::NotFound => {
                let header = (0..table.width())
                    .map(|idx| match idx {
                        0 => Some(String::from(METRIC_COLUMN)),
                        _ => Some(idx.to_string()),
                    })
                    .collect();
                (header, &table.rows[..])
            }
        };

        let kept_columns: Vec<usize> = header
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, name)| self.keeps_column(name.as_deref()))
            .map(|(idx, _)| idx)
            .collect();

        let mut columns = vec![String::from(METRIC_COLUMN)];
        columns.extend(kept_columns.iter().filter_map(|&idx| header[idx].clone()));

        let rows = body
            .iter()
            .filter_map(|row| {
                let label = row.first()?.as_deref()?;
                if !self.is_key_metric(label) {
                    return None;
                }
                Some(MetricRow {
                    label: label.to_string(),
                    values: kept_columns
                        .iter()
                        .map(|&idx| row.get(idx).cloned().flatten())
                        .collect(),
                })
            })
            .collect();

        (MetricsTable { columns, rows }, detection)
    }

    pub fn is_key_metric(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| label.contains(keyword.as_str()))
    }

    fn keeps_column(&self, name: Option<&str>) -> bool {
        match name {
            None => false,
            Some(name) => name != "nan" && !name.contains(self.noise_marker.as_str()),
        }
    }
}

fn cell_text(cell: &Option<String>) -> &str {
    cell.as_deref().unwrap_or("nan")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                        .collect()
                })
                .collect(),
        )
    }

    fn normalizer() -> MetricsNormalizer {
        MetricsNormalizer::from_config(&MetricsConfig::default())
    }

    #[test]
    fn keyword_filter_keeps_profit_and_drops_share_count() {
        let table = raw(&[
            &["", "2022", "2023"],
            &["Чистая прибыль, млрд руб.", "1 270", "1 508"],
            &["Среднее количество акций", "21,6", "21,6"],
        ]);

        let (metrics, _) = normalizer().normalize(&table);

        assert_eq!(metrics.rows.len(), 1);
        assert_eq!(metrics.rows[0].label, "Чистая прибыль, млрд руб.");
    }

    #[test]
    fn keyword_match_ignores_case() {
        assert!(normalizer().is_key_metric("чистый ДОЛГ, млрд"));
        assert!(normalizer().is_key_metric("Ebitda"));
        assert!(!normalizer().is_key_metric("Выручка"));
    }

    #[test]
    fn header_row_with_ltm_is_promoted() {
        let table = raw(&[
            &["", "", ""],
            &["", "", ""],
            &["Отчетность", "2022", "2023 LTM"],
            &["EBITDA, млрд руб", "10", "12"],
        ]);

        let (metrics, detection) = normalizer().normalize(&table);

        assert_eq!(detection, HeaderDetection::Found(2));
        assert_eq!(metrics.columns, vec!["Metric", "2022", "2023 LTM"]);
        assert_eq!(metrics.rows.len(), 1);
        assert_eq!(
            metrics.rows[0].values,
            vec![Some(String::from("10")), Some(String::from("12"))]
        );
    }

    #[test]
    fn header_scan_is_limited_to_leading_rows() {
        let table = raw(&[
            &["a", "b"],
            &["a", "b"],
            &["a", "b"],
            &["a", "b"],
            &["a", "b"],
            &["Период", "2023"],
        ]);

        let detection = normalizer().detect_header(&table);
        assert_eq!(detection, HeaderDetection::NotFound);
    }

    #[test]
    fn missing_header_falls_back_to_positional_columns() {
        let table = raw(&[
            &["Показатель", "Q1", "Q2"],
            &["ROE, %", "18", "19"],
            &["P/E", "4.1", "3.9"],
        ]);

        let (metrics, detection) = normalizer().normalize(&table);

        assert_eq!(detection, HeaderDetection::NotFound);
        assert_eq!(metrics.columns, vec!["Metric", "1", "2"]);
        assert_eq!(metrics.rows.len(), 2);
        assert_eq!(metrics.rows[1].label, "P/E");
    }

    #[test]
    fn unlabeled_nan_and_noise_columns_are_dropped() {
        let table = raw(&[
            &["", "2022", "", "nan", "smart-lab.ru", "2023"],
            &["FCF, млрд", "5", "x", "y", "z", "6"],
        ]);

        let (metrics, _) = normalizer().normalize(&table);

        assert_eq!(metrics.columns, vec!["Metric", "2022", "2023"]);
        assert_eq!(
            metrics.rows[0].values,
            vec![Some(String::from("5")), Some(String::from("6"))]
        );
    }

    #[test]
    fn ragged_rows_are_padded() {
        let table = raw(&[&["", "2022", "2023"], &["EPS, руб", "33"]]);

        let (metrics, _) = normalizer().normalize(&table);

        assert_eq!(metrics.rows[0].values, vec![Some(String::from("33")), None]);
    }
}
