pub mod aggregation;
pub mod discovery;
pub mod etl;
pub mod export;
pub mod extraction;
pub mod pipeline;
pub mod render;

pub use crate::domain::model::{
    DayRecord, OutputFormat, UserData, UserResult, YearExtraction, YearLink, YearSummary,
};
pub use crate::domain::ports::{
    ChartRenderer, ConfigProvider, DrawOptions, HttpFetch, MarkupAdapter, Pipeline, Storage,
};
pub use crate::domain::roster::Roster;
pub use crate::utils::error::Result;
