use crate::domain::model::{
    parse_intensity, DateRange, DayRecord, YearExtraction, YearLink, YearSummary,
};
use crate::domain::ports::{HttpFetch, MarkupAdapter, YearPage};
use crate::utils::error::Result;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static TOTAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9,]+)\s").expect("total pattern is valid"));

const SNIPPET_CHARS: usize = 2000;

/// Parses the leading `1,234` of the yearly heading. Anything else is 0.
pub fn parse_total(heading: &str) -> u64 {
    TOTAL_PATTERN
        .captures(heading.trim())
        .and_then(|caps| caps[1].replace(',', "").parse().ok())
        .unwrap_or(0)
}

fn snippet(body: &str) -> &str {
    match body.char_indices().nth(SNIPPET_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Normalizes the raw cells of one year page.
///
/// Cells without a readable date are dropped, a repeated date keeps its first
/// cell, a missing or unreadable count is 0. `range` is taken from the first
/// and last kept cell in page order.
pub fn extract_year(page: YearPage, label: &str) -> YearExtraction {
    let total = parse_total(&page.heading);
    let mut seen = HashSet::with_capacity(page.cells.len());
    let mut contributions = Vec::with_capacity(page.cells.len());

    for cell in page.cells {
        let Some(raw_date) = cell.date.as_deref() else {
            tracing::warn!("⚠️ {}: day cell without data-date, skipping", label);
            continue;
        };
        let date = match NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!("⚠️ {}: unreadable date '{}': {}", label, raw_date, e);
                continue;
            }
        };
        if !seen.insert(date) {
            tracing::warn!("⚠️ {}: duplicate day cell for {}, keeping first", label, date);
            continue;
        }

        let count = match cell.count.as_deref() {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::debug!("{}: unreadable count '{}' on {}, using 0", label, raw, date);
                0
            }),
            None => 0,
        };

        contributions.push(DayRecord::new(date, count, parse_intensity(cell.level.as_deref())));
    }

    let range = DateRange {
        start: contributions.first().map(|d| d.date),
        end: contributions.last().map(|d| d.date),
    };

    YearExtraction {
        summary: YearSummary {
            year: label.to_string(),
            total,
            range,
        },
        contributions,
    }
}

/// Fetches one year page and extracts it. An empty calendar is logged and
/// returned as an empty extraction.
pub async fn fetch_year<F, M>(fetcher: &F, markup: &M, link: &YearLink) -> Result<YearExtraction>
where
    F: HttpFetch + ?Sized,
    M: MarkupAdapter + ?Sized,
{
    tracing::debug!("📡 Fetching year {} from {}", link.label, link.href);
    let body = fetcher.fetch(&link.href).await?;
    let page = markup.year_page(&body)?;

    if page.cells.is_empty() {
        tracing::warn!(
            "⚠️ No contribution days found for {} ({})",
            link.href,
            link.label
        );
        tracing::debug!("HTML snippet: {}", snippet(&body));
    }

    Ok(extract_year(page, &link.label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::DayCell;

    fn cell(date: &str, count: Option<&str>, level: Option<&str>) -> DayCell {
        DayCell {
            date: Some(date.to_string()),
            count: count.map(str::to_string),
            level: level.map(str::to_string),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_total() {
        assert_eq!(parse_total("1,234 contributions in the last year"), 1234);
        assert_eq!(parse_total("  12 contributions in 2023\n"), 12);
        assert_eq!(parse_total("1,234,567 contributions"), 1234567);
        assert_eq!(parse_total("No contributions"), 0);
        assert_eq!(parse_total("contributions: 55"), 0);
        assert_eq!(parse_total("42"), 0);
        assert_eq!(parse_total(""), 0);
    }

    #[test]
    fn test_extract_year_defaults() {
        let page = YearPage {
            heading: "5 contributions in 2024".to_string(),
            cells: vec![
                cell("2024-01-01", Some("3"), Some("2")),
                cell("2024-01-02", None, Some("0")),
                cell("2024-01-03", Some("2"), None),
                cell("2024-01-04", Some("oops"), Some("9")),
            ],
        };

        let extraction = extract_year(page, "2024");

        assert_eq!(extraction.summary.year, "2024");
        assert_eq!(extraction.summary.total, 5);
        assert_eq!(extraction.summary.range.start, Some(date("2024-01-01")));
        assert_eq!(extraction.summary.range.end, Some(date("2024-01-04")));

        let days = &extraction.contributions;
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].count, 3);
        assert_eq!(days[0].color.as_deref(), Some("#40c463"));
        assert_eq!(days[1].count, 0);
        assert_eq!(days[1].intensity, Some(0));
        assert_eq!(days[1].color.as_deref(), Some("#ebedf0"));
        assert_eq!(days[2].intensity, None);
        assert_eq!(days[2].color, None);
        assert_eq!(days[3].count, 0);
        assert_eq!(days[3].intensity, Some(9));
        assert_eq!(days[3].color, None);
    }

    #[test]
    fn test_range_follows_page_order() {
        let page = YearPage {
            heading: String::new(),
            cells: vec![
                cell("2024-12-31", Some("1"), Some("1")),
                cell("2024-01-01", Some("1"), Some("1")),
            ],
        };

        let extraction = extract_year(page, "2024");

        assert_eq!(extraction.summary.range.start, Some(date("2024-12-31")));
        assert_eq!(extraction.summary.range.end, Some(date("2024-01-01")));
        assert_eq!(extraction.chronological_range().start, Some(date("2024-01-01")));
    }

    #[test]
    fn test_bad_and_duplicate_cells_are_skipped() {
        let page = YearPage {
            heading: String::new(),
            cells: vec![
                DayCell::default(),
                cell("not-a-date", Some("1"), Some("1")),
                cell("2024-02-01", Some("1"), Some("1")),
                cell("2024-02-01", Some("7"), Some("4")),
            ],
        };

        let extraction = extract_year(page, "2024");

        assert_eq!(extraction.contributions.len(), 1);
        assert_eq!(extraction.contributions[0].count, 1);
    }

    #[test]
    fn test_empty_page_is_a_valid_extraction() {
        let extraction = extract_year(YearPage::default(), "2025");

        assert_eq!(extraction.summary.total, 0);
        assert_eq!(extraction.summary.range, DateRange::default());
        assert!(extraction.contributions.is_empty());
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let body = "é".repeat(SNIPPET_CHARS + 10);
        assert_eq!(snippet(&body).chars().count(), SNIPPET_CHARS);
        assert_eq!(snippet("short"), "short");
    }
}
