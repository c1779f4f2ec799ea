use crate::domain::model::YearLink;
use crate::domain::ports::{DayCell, MarkupAdapter, YearPage};
use crate::utils::error::{EtlError, Result};
use scraper::{ElementRef, Html, Selector};

const YEAR_LINK_SELECTOR: &str = ".js-year-link.filter-item";
const DAY_CELL_SELECTOR: &str = "table.ContributionCalendar-grid td.ContributionCalendar-day";
const HEADING_SELECTOR: &str = ".js-yearly-contributions h2";

/// Adapter for the contribution calendar markup: year filter anchors plus a
/// `ContributionCalendar` table whose cells carry `data-date`, `data-count`
/// and `data-level`.
pub struct CalendarMarkup {
    year_link: Selector,
    day_cell: Selector,
    heading: Selector,
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| EtlError::markup(format!("invalid selector '{}': {}", selector, e)))
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

impl CalendarMarkup {
    pub fn new() -> Result<Self> {
        Ok(Self {
            year_link: parse_selector(YEAR_LINK_SELECTOR)?,
            day_cell: parse_selector(DAY_CELL_SELECTOR)?,
            heading: parse_selector(HEADING_SELECTOR)?,
        })
    }
}

impl MarkupAdapter for CalendarMarkup {
    fn year_links(&self, html: &str) -> Result<Vec<YearLink>> {
        let document = Html::parse_document(html);

        let links = document
            .select(&self.year_link)
            .filter_map(|anchor| match anchor.value().attr("href") {
                Some(href) => Some(YearLink {
                    href: href.to_string(),
                    label: trimmed_text(anchor),
                }),
                None => {
                    tracing::warn!("⚠️ Year link without href: '{}'", trimmed_text(anchor));
                    None
                }
            })
            .collect();

        Ok(links)
    }

    fn year_page(&self, html: &str) -> Result<YearPage> {
        let document = Html::parse_document(html);

        // 多個標題時比照 DOM text() 串接
        let heading = document
            .select(&self.heading)
            .map(|h| h.text().collect::<String>())
            .collect::<String>()
            .trim()
            .to_string();

        let cells = document
            .select(&self.day_cell)
            .map(|cell| {
                let attrs = cell.value();
                DayCell {
                    date: attrs.attr("data-date").map(str::to_string),
                    count: attrs.attr("data-count").map(str::to_string),
                    level: attrs.attr("data-level").map(str::to_string),
                }
            })
            .collect();

        Ok(YearPage { heading, cells })
    }
}
