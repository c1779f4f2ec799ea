use crate::core::{Storage, UserResult};
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const JSON_FILENAME: &str = "contributions.json";
pub const CSV_FILENAME: &str = "contributions.csv";
pub const ARCHIVE_FILENAME: &str = "contributions.zip";

pub const SUPPORTED_FORMATS: [&str; 2] = ["json", "csv"];

/// Load phase: writes a run's results through a `Storage`.
pub struct Exporter<S: Storage> {
    storage: S,
    output_path: String,
}

impl<S: Storage> Exporter<S> {
    pub fn new(storage: S, output_path: impl Into<String>) -> Self {
        Self {
            storage,
            output_path: output_path.into(),
        }
    }

    /// Writes every requested format, plus the per-identifier archive when
    /// `archive` is set. Returns the path of the first file written.
    pub async fn load(
        &self,
        results: &[UserResult],
        formats: &[String],
        archive: bool,
    ) -> Result<String> {
        let mut written = Vec::new();

        for format in formats {
            match format.as_str() {
                "json" => {
                    let json = serde_json::to_vec_pretty(results)?;
                    self.storage.write_file(JSON_FILENAME, &json).await?;
                    written.push(JSON_FILENAME);
                }
                "csv" => {
                    let csv = to_csv(results)?;
                    self.storage.write_file(CSV_FILENAME, &csv).await?;
                    written.push(CSV_FILENAME);
                }
                other => {
                    return Err(EtlError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: format!(
                            "Unsupported format. Valid formats: {}",
                            SUPPORTED_FORMATS.join(", ")
                        ),
                    });
                }
            }
        }

        if archive {
            let zip_data = to_archive(results)?;
            tracing::debug!("Writing archive ({} bytes) to storage", zip_data.len());
            self.storage.write_file(ARCHIVE_FILENAME, &zip_data).await?;
            written.push(ARCHIVE_FILENAME);
        }

        let first = written.first().ok_or_else(|| EtlError::ConfigError {
            message: "No output format selected".to_string(),
        })?;
        tracing::debug!("Wrote {} output files", written.len());

        Ok(format!("{}/{}", self.output_path.trim_end_matches('/'), first))
    }
}

/// One row per day record: `username,date,count,intensity,color`.
pub fn to_csv(results: &[UserResult]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["username", "date", "count", "intensity", "color"])?;

    for result in results {
        for day in result.data.day_records() {
            writer.write_record([
                result.username.clone(),
                day.date_key(),
                day.count.to_string(),
                day.intensity.map(|i| i.to_string()).unwrap_or_default(),
                day.color.clone().unwrap_or_default(),
            ])?;
        }
    }

    writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush CSV output: {}", e),
    })
}

/// One `<username>.json` entry per identifier.
pub fn to_archive(results: &[UserResult]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for result in results {
        zip.start_file(format!("{}.json", result.username), SimpleFileOptions::default())?;
        let json = serde_json::to_vec_pretty(result)?;
        zip.write_all(&json)?;
    }

    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
