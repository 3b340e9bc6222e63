use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::client::{parse_url, GithubHttp};
use crate::error::GithubApiError;
use crate::metrics;
use crate::model::Budget;

/// Items gathered across every page of a listing.
///
/// `incomplete` means pagination stopped because the rate limit ran out while
/// a next page still existed. `total_count` is only set for search endpoints
/// and is what GitHub reports, which can exceed `items.len()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub incomplete: bool,
    pub total_count: Option<u64>,
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            incomplete: false,
            total_count: None,
        }
    }
}

impl<T> Paged<T> {
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Paged<U>, E> {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(Paged {
            items,
            incomplete: self.incomplete,
            total_count: self.total_count,
        })
    }
}

/// Follows `Link: rel="next"` from `start` until the listing ends or the
/// rate limit is exhausted. With `key`, items are read from that field of
/// each page body (search endpoints use `items`); otherwise the body itself
/// must be an array.
#[instrument(skip(http), fields(url = %start))]
pub async fn collect_pages(
    http: &GithubHttp,
    start: Url,
    key: Option<&str>,
) -> Result<Paged<Value>, GithubApiError> {
    let is_search = start.path().contains("/search/");
    let budget = Budget::classify(start.path(), None);
    let mut next = Some(start);
    let mut paged = Paged::default();
    let mut pages = 0u32;

    while let Some(url) = next.take() {
        let response = http.get(url).await?;
        pages += 1;
        metrics::PAGES_TOTAL
            .with_label_values(&[budget.as_str()])
            .inc();

        // Contributors of an empty repository come back as 204 with no body.
        let empty = response.status == StatusCode::NO_CONTENT
            || response.body.iter().all(u8::is_ascii_whitespace);
        if empty {
            debug!(endpoint = %response.endpoint, "empty page");
            if is_search {
                paged.total_count.get_or_insert(0);
            }
        } else {
            let body: Value = response.json()?;
            if is_search {
                paged.total_count = Some(body.get("total_count").and_then(Value::as_u64).unwrap_or(0));
            }
            paged
                .items
                .extend(extract_items(body, key, &response.endpoint)?);
        }

        let Some(link) = response.next_link() else {
            break;
        };
        if response.remaining() == Some(0) {
            warn!(
                endpoint = %response.endpoint,
                pages,
                items = paged.items.len(),
                "rate limit exhausted; returning partial listing"
            );
            metrics::TRUNCATED_TOTAL
                .with_label_values(&[budget.as_str()])
                .inc();
            paged.incomplete = true;
            break;
        }
        next = Some(parse_url(&link)?);
    }

    debug!(pages, items = paged.items.len(), incomplete = paged.incomplete, "pagination finished");
    Ok(paged)
}

fn extract_items(body: Value, key: Option<&str>, endpoint: &str) -> Result<Vec<Value>, GithubApiError> {
    let list = match key {
        Some(key) => match body {
            Value::Object(mut map) => map.remove(key).unwrap_or(Value::Null),
            _ => Value::Null,
        },
        None => body,
    };
    match list {
        Value::Array(items) => Ok(items),
        Value::Null if key.is_none() => Ok(Vec::new()),
        _ => Err(GithubApiError::Shape {
            endpoint: endpoint.to_string(),
            expected: "array of items",
        }),
    }
}
