use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 強度 0-4 對應的顯示顏色
pub const COLOR_MAP: [&str; 5] = ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"];

/// Maps an intensity bucket to its display color. Buckets outside 0-4 have no color.
pub fn color_for_intensity(intensity: Option<u8>) -> Option<&'static str> {
    intensity.and_then(|level| COLOR_MAP.get(level as usize).copied())
}

/// Normalizes a raw `data-level` attribute. Absent or non-numeric values become `None`.
pub fn parse_intensity(raw: Option<&str>) -> Option<u8> {
    raw.and_then(|value| value.trim().parse::<u8>().ok())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub intensity: Option<u8>,
}

impl DayRecord {
    pub fn new(date: NaiveDate, count: u64, intensity: Option<u8>) -> Self {
        Self {
            date,
            count,
            color: color_for_intensity(intensity).map(str::to_string),
            intensity,
        }
    }

    /// Canonical `YYYY-MM-DD` form.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// A year filter link found on the profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearLink {
    pub href: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: String,
    pub total: u64,
    pub range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearExtraction {
    pub summary: YearSummary,
    pub contributions: Vec<DayRecord>,
}

impl YearExtraction {
    /// `summary.range` keeps the upstream cell order; this one is always `start <= end`.
    pub fn chronological_range(&self) -> DateRange {
        DateRange {
            start: self.contributions.iter().map(|d| d.date).min(),
            end: self.contributions.iter().map(|d| d.date).max(),
        }
    }
}

/// year → month → day → record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributionTree(pub BTreeMap<i32, BTreeMap<u32, BTreeMap<u32, DayRecord>>>);

impl ContributionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同一路徑已有資料時直接覆寫
    pub fn insert(&mut self, record: DayRecord) {
        let (y, m, d) = (record.date.year(), record.date.month(), record.date.day());
        self.0
            .entry(y)
            .or_default()
            .entry(m)
            .or_default()
            .insert(d, record);
    }

    pub fn get(&self, year: i32, month: u32, day: u32) -> Option<&DayRecord> {
        self.0.get(&year)?.get(&month)?.get(&day)
    }

    pub fn records(&self) -> impl Iterator<Item = &DayRecord> {
        self.0
            .values()
            .flat_map(|months| months.values())
            .flat_map(|days| days.values())
    }

    pub fn len(&self) -> usize {
        self.records().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<DayRecord> for ContributionTree {
    fn from_iter<I: IntoIterator<Item = DayRecord>>(iter: I) -> Self {
        let mut tree = Self::new();
        for record in iter {
            tree.insert(record);
        }
        tree
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserData {
    Flat {
        years: Vec<YearSummary>,
        contributions: Vec<DayRecord>,
    },
    Nested {
        years: BTreeMap<String, YearSummary>,
        contributions: ContributionTree,
    },
}

impl UserData {
    pub fn format(&self) -> OutputFormat {
        match self {
            Self::Flat { .. } => OutputFormat::Flat,
            Self::Nested { .. } => OutputFormat::Nested,
        }
    }

    /// Flat 依日期新到舊；Nested 依樹的順序（舊到新）
    pub fn day_records(&self) -> Box<dyn Iterator<Item = &DayRecord> + '_> {
        match self {
            Self::Flat { contributions, .. } => Box::new(contributions.iter()),
            Self::Nested { contributions, .. } => Box::new(contributions.records()),
        }
    }

    pub fn year_summaries(&self) -> Box<dyn Iterator<Item = &YearSummary> + '_> {
        match self {
            Self::Flat { years, .. } => Box::new(years.iter()),
            Self::Nested { years, .. } => Box::new(years.values()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResult {
    pub username: String,
    pub data: UserData,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Flat,
    Nested,
}

impl OutputFormat {
    /// Only the literal `nested` selects the tree shape.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("nested") => Self::Nested,
            _ => Self::Flat,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_param(Some(s)))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => write!(f, "flat"),
            Self::Nested => write!(f, "nested"),
        }
    }
}
