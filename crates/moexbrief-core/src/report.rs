//! Plain-text report rendering and prompt assembly.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::{MetricsTable, Portfolio, TickerReport, ValidationError};

const SEPARATOR_WIDTH: usize = 30;
const MISSING_CELL: &str = "NaN";

pub const DEFAULT_PROMPT: &str = "\
Сегодня {date}. Ключевая ставка ЦБ РФ: {key_rate}.

Ты опытный аналитик российского фондового рынка. Ниже приведены данные по акциям \
из индекса Мосбиржи ({tickers}): ключевые показатели отчетности по МСФО, текущая \
цена акции и замечания инвесторов.

Задача:
1. Для каждой компании кратко оцени финансовое состояние и динамику показателей.
2. Сравни дивидендную и прибыльную доходность акций с ключевой ставкой.
3. Выдели компании с переоценкой и недооценкой, объясни почему.
4. Составь итоговый рейтинг привлекательности и предложи распределение портфеля.

Данные:
{report}
";

const REPORT_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day].[month].[year]");

/// Calendar date printed as `DD.MM.YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReportDate(Date);

impl ReportDate {
    /// Local date, or the UTC date when the local offset cannot be determined.
    pub fn today() -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self(now.date())
    }

    /// Strict `DD.MM.YYYY`: zero-padded, unsigned, calendar-valid.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidReportDate {
            value: input.to_owned(),
        };

        let trimmed = input.trim();
        if !trimmed.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            return Err(invalid());
        }

        Date::parse(trimmed, REPORT_DATE_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub fn into_inner(self) -> Date {
        self.0
    }
}

impl From<Date> for ReportDate {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl Display for ReportDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = self.0.format(REPORT_DATE_FORMAT).map_err(|_| std::fmt::Error)?;
        f.write_str(&text)
    }
}

impl TryFrom<String> for ReportDate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReportDate> for String {
    fn from(value: ReportDate) -> Self {
        value.to_string()
    }
}

/// Renders collected ticker data into the report body.
#[derive(Debug, Clone)]
pub struct ReportComposer {
    source_label: String,
}

impl ReportComposer {
    /// `source_label` names the site the pros and cons were taken from.
    pub fn new(source_label: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
        }
    }

    pub fn render_body(&self, portfolio: &Portfolio) -> String {
        let total = portfolio.len();
        let mut out = format!("📊 Портфель по {total} тикерам:\n");
        for (idx, report) in portfolio.reports.iter().enumerate() {
            out.push_str(&self.render_ticker(idx + 1, total, report));
        }
        out
    }

    /// Block for one ticker: position, table, price, factors, separator.
    pub fn render_ticker(&self, position: usize, total: usize, report: &TickerReport) -> String {
        let mut out = format!("📊 Портфель {position}/{total}: {}\n", report.ticker);
        out.push_str(&render_table(&report.table));
        out.push('\n');
        out.push_str(&format!("Цена акции: {}\n", report.price));
        out.push_str(&format!("Замечания с сайта {}\n", self.source_label));
        for pro in &report.factors.pros {
            out.push_str(&format!("✅ {pro}\n"));
        }
        for con in &report.factors.cons {
            out.push_str(&format!("❌ {con}\n"));
        }
        out.push_str(&"-".repeat(SEPARATOR_WIDTH));
        out.push('\n');
        out
    }
}

/// Header plus rows, each column right-aligned to its widest cell.
pub fn render_table(table: &MetricsTable) -> String {
    let mut grid: Vec<Vec<&str>> = Vec::with_capacity(table.rows.len() + 1);
    grid.push(table.columns.iter().map(String::as_str).collect());
    for row in &table.rows {
        let mut cells = vec![row.label.as_str()];
        cells.extend(
            row.values
                .iter()
                .map(|value| value.as_deref().unwrap_or(MISSING_CELL)),
        );
        grid.push(cells);
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..width)
        .map(|col| {
            grid.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    grid.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:>w$}"))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Values substituted into a [`PromptTemplate`].
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub date: ReportDate,
    pub key_rate: &'a str,
    pub tickers: &'a str,
    pub report: &'a str,
}

/// Prompt text with `{date}`, `{key_rate}`, `{tickers}` and `{report}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            text: String::from(DEFAULT_PROMPT),
        }
    }
}

impl PromptTemplate {
    pub fn parse(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if !text.contains("{report}") {
            return Err(ValidationError::TemplateMissingReport);
        }
        Ok(Self { text })
    }

    /// Single pass substitution; substituted values are never rescanned.
    /// Unknown `{...}` sequences are kept verbatim.
    pub fn render(&self, context: &PromptContext<'_>) -> String {
        let date = context.date.to_string();
        let mut out = String::with_capacity(self.text.len() + context.report.len());
        let mut rest = self.text.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];
            let replacement = [
                ("{date}", date.as_str()),
                ("{key_rate}", context.key_rate),
                ("{tickers}", context.tickers),
                ("{report}", context.report),
            ]
            .into_iter()
            .find(|(placeholder, _)| tail.starts_with(placeholder));

            match replacement {
                Some((placeholder, value)) => {
                    out.push_str(value);
                    rest = &tail[placeholder.len()..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}
