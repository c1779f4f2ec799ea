pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "server")]
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LocalStorage, TomlConfig};

pub use core::{etl::EtlEngine, pipeline::ContributionPipeline};
pub use domain::model::{DayRecord, OutputFormat, UserData, UserResult, YearSummary};
pub use domain::roster::Roster;
pub use utils::error::{EtlError, Result};
