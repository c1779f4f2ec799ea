#[cfg(feature = "cli")]
pub mod cli;
pub mod storage;
pub mod toml_config;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_USER_AGENT: &str = concat!("contrib-chart/", env!("CARGO_PKG_VERSION"));

pub use storage::LocalStorage;
pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
