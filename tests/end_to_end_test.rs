use chrono::{Datelike, NaiveDate};
use contrib_chart::app::{build_engine, run_and_export};
use contrib_chart::core::Pipeline;
use contrib_chart::{OutputFormat, Roster, TomlConfig, UserData, UserResult};
use httpmock::prelude::*;
use tempfile::TempDir;

/// A year page with one cell per day of `year`.
fn year_page(year: i32, total: &str) -> String {
    let cells: String = NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap()
        .iter_days()
        .take_while(|d| d.year() == year)
        .map(|d| {
            let count = d.ordinal() % 5;
            format!(
                r#"<td class="ContributionCalendar-day" data-date="{}" data-count="{}" data-level="{}"></td>"#,
                d.format("%Y-%m-%d"),
                count,
                count.min(4)
            )
        })
        .collect();

    format!(
        r#"<html><body><div class="js-yearly-contributions">
             <h2 class="f4 text-normal mb-2">{total} contributions in {year}</h2>
             <table class="ContributionCalendar-grid"><tbody><tr>{cells}</tr></tbody></table>
           </div></body></html>"#
    )
}

fn profile_page(username: &str, years: &[i32]) -> String {
    years
        .iter()
        .map(|y| {
            format!(
                r#"<a class="js-year-link filter-item" href="/users/{username}/contributions?tab=overview&amp;from={y}-01-01&amp;to={y}-12-31">{y}</a>"#
            )
        })
        .collect()
}

fn mock_user(server: &MockServer, username: &str) {
    let profile = profile_page(username, &[2024, 2023]);
    let profile_path = format!("/{}", username);
    server.mock(|when, then| {
        when.method(GET)
            .path(profile_path.as_str())
            .query_param("tab", "contributions")
            .header("x-requested-with", "XMLHttpRequest");
        then.status(200).body(profile);
    });

    let year_path = format!("/users/{}/contributions", username);
    for (year, total) in [(2023, "1,204"), (2024, "2,048")] {
        let from = format!("{}-01-01", year);
        let body = year_page(year, total);
        server.mock(|when, then| {
            when.method(GET)
                .path(year_path.as_str())
                .query_param("tab", "contributions")
                .query_param("from", from.as_str());
            then.status(200).body(body);
        });
    }
}

fn config_for(server: &MockServer, output_path: &str, extra: &str) -> TomlConfig {
    TomlConfig::from_toml_str(&format!(
        r#"
[source]
base_url = "{}"
timeout_seconds = 5

[discovery]
retry_attempts = 2
retry_delay_ms = 0

[roster]
usernames = ["alice"]
pacing_ms = 0

[load]
output_path = "{}"
output_formats = ["json", "csv"]
{}
"#,
        server.base_url(),
        output_path.replace('\\', "/"),
        extra
    ))
    .unwrap()
}

#[tokio::test]
async fn test_flat_format_two_years() {
    let server = MockServer::start();
    mock_user(&server, "alice");
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, temp_dir.path().to_str().unwrap(), "");

    let engine = build_engine(&config, false).unwrap();
    let data = engine
        .pipeline()
        .fetch_data_for_all_years("alice", OutputFormat::Flat)
        .await
        .unwrap();

    let UserData::Flat {
        years,
        contributions,
    } = data
    else {
        panic!("expected flat data");
    };

    // 依探索順序
    assert_eq!(years.len(), 2);
    assert_eq!(years[0].year, "2024");
    assert_eq!(years[0].total, 2048);
    assert_eq!(years[1].year, "2023");
    assert_eq!(years[1].total, 1204);
    assert_eq!(
        years[1].range.start,
        NaiveDate::from_ymd_opt(2023, 1, 1)
    );

    assert_eq!(contributions.len(), 731);
    assert!(contributions
        .windows(2)
        .all(|pair| pair[0].date_key() > pair[1].date_key()));
    assert_eq!(contributions[0].date_key(), "2024-12-31");
}

#[tokio::test]
async fn test_nested_format_two_years() {
    let server = MockServer::start();
    mock_user(&server, "alice");
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, temp_dir.path().to_str().unwrap(), "");

    let engine = build_engine(&config, false).unwrap();
    let data = engine
        .pipeline()
        .fetch_data_for_all_years("alice", OutputFormat::Nested)
        .await
        .unwrap();

    let UserData::Nested {
        years,
        contributions,
    } = data
    else {
        panic!("expected nested data");
    };

    assert_eq!(years["2023"].total, 1204);
    assert_eq!(years["2024"].total, 2048);

    let day = contributions.get(2024, 3, 15).unwrap();
    assert_eq!(day.date_key(), "2024-03-15");
    // 3 月 15 日是 2024 年第 75 天
    assert_eq!(day.count, 75 % 5);
    assert_eq!(contributions.len(), 731);
}

#[tokio::test]
async fn test_run_and_export_writes_files() {
    let server = MockServer::start();
    mock_user(&server, "alice");
    mock_user(&server, "bob");
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let mut config = config_for(&server, &output_path, "archive = true");
    config.roster.usernames = vec!["alice".to_string(), "bob".to_string(), "ALICE".to_string()];

    let written = run_and_export(&config, false).await.unwrap();
    assert!(written.ends_with("contributions.json"));

    let json = std::fs::read(temp_dir.path().join("contributions.json")).unwrap();
    let results: Vec<UserResult> = serde_json::from_slice(&json).unwrap();
    let names: Vec<&str> = results.iter().map(|r| r.username.as_str()).collect();
    assert_eq!(names, ["alice", "bob"]);

    let csv = std::fs::read_to_string(temp_dir.path().join("contributions.csv")).unwrap();
    // 表頭加上兩人各 731 天
    assert_eq!(csv.lines().count(), 1 + 2 * 731);

    let zip_data = std::fs::read(temp_dir.path().join("contributions.zip")).unwrap();
    let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 2);
}

#[tokio::test]
async fn test_missing_profile_aborts_the_run() {
    let server = MockServer::start();
    mock_user(&server, "alice");
    server.mock(|when, then| {
        when.method(GET).path("/ghost");
        then.status(404);
    });
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, temp_dir.path().to_str().unwrap(), "");

    let engine = build_engine(&config, false).unwrap();
    let result = engine
        .run(&Roster::new(["ghost", "alice"]), OutputFormat::Flat)
        .await;

    let err = result.unwrap_err();
    assert_eq!(
        err.category(),
        contrib_chart::utils::error::ErrorCategory::Network
    );
    assert!(!temp_dir.path().join("contributions.json").exists());
}
