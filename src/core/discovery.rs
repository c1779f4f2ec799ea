use crate::domain::model::YearLink;
use crate::domain::ports::{HttpFetch, MarkupAdapter};
use crate::utils::error::Result;
use chrono::Datelike;
use std::time::Duration;
use url::Url;

/// Fixed-count, fixed-interval retry for year discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval: Duration::from_secs(2),
        }
    }
}

/// Profile location that, fetched with the XHR header, lists the year links.
pub fn profile_location(username: &str) -> String {
    format!("/{}?tab=contributions", username)
}

pub fn current_year_label() -> String {
    chrono::Local::now().year().to_string()
}

/// Forces `tab=contributions` on a year link so the fetched page carries the
/// daily calendar instead of the overview.
///
/// The first `tab` parameter is replaced in place and later ones removed; if
/// none exists it is appended. Returns path plus query.
pub fn normalize_year_href(href: &str) -> Result<String> {
    // 相對連結需要一個 origin 才能解析，host 本身不會輸出
    let mut url = Url::parse("https://github.com")?.join(href)?;

    let mut replaced = false;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter_map(|(key, value)| {
            if key == "tab" {
                if replaced {
                    return None;
                }
                replaced = true;
                return Some((key.into_owned(), "contributions".to_string()));
            }
            Some((key.into_owned(), value.into_owned()))
        })
        .collect();

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (key, value) in &pairs {
            query.append_pair(key, value);
        }
        if !replaced {
            query.append_pair("tab", "contributions");
        }
    }

    Ok(match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    })
}

/// Finds the year ranges a profile exposes.
///
/// The upstream sometimes answers with a page that has no year links at all,
/// so the fetch is repeated up to `policy.max_attempts` times, sleeping
/// `policy.interval` between attempts. When every attempt comes back empty the
/// current year is assumed. Fetch errors are not retried.
pub async fn discover_years<F, M>(
    fetcher: &F,
    markup: &M,
    username: &str,
    policy: &RetryPolicy,
) -> Result<Vec<YearLink>>
where
    F: HttpFetch + ?Sized,
    M: MarkupAdapter + ?Sized,
{
    let location = profile_location(username);
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let body = fetcher.fetch(&location).await?;
        let links = markup.year_links(&body)?;

        if !links.is_empty() {
            tracing::debug!(
                "🔎 {}: found {} year links on attempt {}",
                username,
                links.len(),
                attempt
            );
            return links
                .into_iter()
                .map(|link| {
                    Ok(YearLink {
                        href: normalize_year_href(&link.href)?,
                        label: link.label,
                    })
                })
                .collect();
        }

        tracing::warn!(
            "⚠️ {}: no year links found (attempt {}/{})",
            username,
            attempt,
            max_attempts
        );

        if attempt < max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    let year = current_year_label();
    tracing::warn!(
        "No years found for {} after {} attempts. Using fallback year: {}",
        username,
        max_attempts,
        year
    );

    Ok(vec![YearLink {
        href: location,
        label: year,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::CalendarMarkup;
    use crate::utils::error::EtlError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Serves queued bodies in order, repeating the last one.
    struct ScriptedFetcher {
        bodies: Mutex<VecDeque<Result<String>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn new(bodies: Vec<Result<String>>) -> Self {
            Self {
                bodies: Mutex::new(bodies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpFetch for ScriptedFetcher {
        async fn fetch(&self, location: &str) -> Result<String> {
            self.calls.lock().unwrap().push(location.to_string());
            let mut bodies = self.bodies.lock().unwrap();
            if bodies.len() > 1 {
                bodies.pop_front().unwrap()
            } else {
                match bodies.front().unwrap() {
                    Ok(body) => Ok(body.clone()),
                    Err(_) => Err(EtlError::HttpStatusError {
                        url: location.to_string(),
                        status: 502,
                    }),
                }
            }
        }
    }

    const EMPTY: &str = "<html><body></body></html>";
    const WITH_YEARS: &str = r#"
        <a class="js-year-link filter-item" href="/alice?tab=overview&amp;from=2024-12-01&amp;to=2024-12-31">2024</a>
        <a class="js-year-link filter-item" href="/alice?from=2023-12-01&amp;to=2023-12-31">2023</a>
    "#;

    #[test]
    fn test_normalize_replaces_tab_in_place() {
        assert_eq!(
            normalize_year_href("/alice?tab=overview&from=2024-12-01&to=2024-12-31").unwrap(),
            "/alice?tab=contributions&from=2024-12-01&to=2024-12-31"
        );
    }

    #[test]
    fn test_normalize_appends_missing_tab() {
        assert_eq!(
            normalize_year_href("/alice?from=2023-12-01&to=2023-12-31").unwrap(),
            "/alice?from=2023-12-01&to=2023-12-31&tab=contributions"
        );
        assert_eq!(
            normalize_year_href("/alice").unwrap(),
            "/alice?tab=contributions"
        );
    }

    #[test]
    fn test_normalize_drops_duplicate_tabs() {
        assert_eq!(
            normalize_year_href("/alice?tab=a&x=1&tab=b").unwrap(),
            "/alice?tab=contributions&x=1"
        );
    }

    #[tokio::test]
    async fn test_links_found_on_first_attempt() {
        let fetcher = ScriptedFetcher::new(vec![Ok(WITH_YEARS.to_string())]);
        let markup = CalendarMarkup::new().unwrap();

        let years = discover_years(&fetcher, &markup, "alice", &RetryPolicy::default())
            .await
            .unwrap();

        assert_eq!(fetcher.calls(), vec!["/alice?tab=contributions"]);
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].label, "2024");
        assert_eq!(
            years[0].href,
            "/alice?tab=contributions&from=2024-12-01&to=2024-12-31"
        );
        assert_eq!(years[1].label, "2023");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_links_appear() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(EMPTY.to_string()),
            Ok(EMPTY.to_string()),
            Ok(WITH_YEARS.to_string()),
        ]);
        let markup = CalendarMarkup::new().unwrap();
        let start = tokio::time::Instant::now();

        let years = discover_years(&fetcher, &markup, "alice", &RetryPolicy::default())
            .await
            .unwrap();

        assert_eq!(fetcher.calls().len(), 3);
        assert_eq!(years.len(), 2);
        assert!(start.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_falls_back_to_current_year_after_all_attempts() {
        let fetcher = ScriptedFetcher::new(vec![Ok(EMPTY.to_string())]);
        let markup = CalendarMarkup::new().unwrap();
        let start = tokio::time::Instant::now();

        let years = discover_years(&fetcher, &markup, "alice", &RetryPolicy::default())
            .await
            .unwrap();

        // 20 次嘗試，之間 19 次等待
        assert_eq!(fetcher.calls().len(), 20);
        assert!(start.elapsed() >= Duration::from_secs(38));
        assert!(start.elapsed() < Duration::from_secs(40));

        assert_eq!(years.len(), 1);
        assert_eq!(years[0].label, current_year_label());
        assert_eq!(years[0].label.len(), 4);
        assert_eq!(years[0].href, "/alice?tab=contributions");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_retried() {
        let fetcher = ScriptedFetcher::new(vec![Err(EtlError::HttpStatusError {
            url: "/alice".to_string(),
            status: 502,
        })]);
        let markup = CalendarMarkup::new().unwrap();

        let result = discover_years(&fetcher, &markup, "alice", &RetryPolicy::default()).await;

        assert!(matches!(
            result,
            Err(EtlError::HttpStatusError { status: 502, .. })
        ));
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_fetches_once() {
        let fetcher = ScriptedFetcher::new(vec![Ok(EMPTY.to_string())]);
        let markup = CalendarMarkup::new().unwrap();
        let policy = RetryPolicy {
            max_attempts: 0,
            interval: Duration::ZERO,
        };

        let years = discover_years(&fetcher, &markup, "alice", &policy).await.unwrap();

        assert_eq!(fetcher.calls().len(), 1);
        assert_eq!(years.len(), 1);
    }
}
