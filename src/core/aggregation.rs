use crate::domain::model::{ContributionTree, OutputFormat, UserData, YearExtraction};
use std::collections::BTreeMap;

/// Merges the per-year extractions of one identifier into the requested shape.
pub fn aggregate(extractions: Vec<YearExtraction>, format: OutputFormat) -> UserData {
    match format {
        OutputFormat::Flat => flatten(extractions),
        OutputFormat::Nested => nest(extractions),
    }
}

/// Years in discovery order, every day record in one list sorted newest first.
fn flatten(extractions: Vec<YearExtraction>) -> UserData {
    let mut years = Vec::with_capacity(extractions.len());
    let mut contributions = Vec::new();

    for extraction in extractions {
        years.push(extraction.summary);
        contributions.extend(extraction.contributions);
    }

    contributions.sort_by(|a, b| b.date.cmp(&a.date));

    UserData::Flat {
        years,
        contributions,
    }
}

/// Years keyed by label, days merged into one tree. Later extractions win on
/// a colliding key.
fn nest(extractions: Vec<YearExtraction>) -> UserData {
    let mut years = BTreeMap::new();
    let mut contributions = ContributionTree::new();

    for extraction in extractions {
        for record in extraction.contributions {
            contributions.insert(record);
        }
        years.insert(extraction.summary.year.clone(), extraction.summary);
    }

    UserData::Nested {
        years,
        contributions,
    }
}
