use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::Deserialize;
use serde_json::Value;
use upscan_core::{RetrievalError, Transaction};

/// One page of transactions plus the server's continuation link
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub transactions: Vec<Transaction>,
    /// Absent on the last page of an account
    pub next_link: Option<String>,
}

/// Time bounds sent as `filter[since]` / `filter[until]` on the first request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub since: Option<DateTime<FixedOffset>>,
    pub until: Option<DateTime<FixedOffset>>,
}

impl DateWindow {
    pub fn new(since: Option<DateTime<FixedOffset>>, until: Option<DateTime<FixedOffset>>) -> Self {
        Self { since, until }
    }

    /// RFC3339 with an explicit offset (never `Z`)
    pub fn since_param(&self) -> Option<String> {
        self.since.map(rfc3339)
    }

    pub fn until_param(&self) -> Option<String> {
        self.until.map(rfc3339)
    }
}

fn rfc3339(ts: DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Which accounts a retrieval covers, in the order they are fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountSelector {
    Single(String),
    Many(Vec<String>),
    /// Every account in the registry, in registry order
    All,
}

#[derive(Debug, Deserialize)]
struct PageBody {
    data: Vec<Value>,
    #[serde(default)]
    links: Option<PageLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct PageLinks {
    #[serde(default)]
    next: Option<String>,
}

/// Parse a success body (`{ "data": [...], "links": { "next": ... } }`).
///
/// A body without a `data` array is `NoData`. Individual elements that are not
/// transaction objects are dropped.
pub fn parse_page(body: &str) -> Result<Page, RetrievalError> {
    let parsed: PageBody =
        serde_json::from_str(body).map_err(|e| RetrievalError::NoData(e.to_string()))?;

    let mut transactions = Vec::with_capacity(parsed.data.len());
    for (index, item) in parsed.data.into_iter().enumerate() {
        match serde_json::from_value::<Transaction>(item) {
            Ok(txn) => transactions.push(txn),
            Err(err) => tracing::warn!("skipping malformed transaction at index {index}: {err}"),
        }
    }

    let next_link = parsed
        .links
        .and_then(|l| l.next)
        .filter(|link| !link.is_empty());

    Ok(Page {
        transactions,
        next_link,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_page_with_next() {
        let body = r#"{
            "data": [
                { "type": "transactions", "id": "a", "attributes": { "description": "Coles" } },
                { "type": "transactions", "id": "b", "attributes": { "description": "Rent" } }
            ],
            "links": { "prev": null, "next": "https://api.example/next?page[after]=x" }
        }"#;
        let page = parse_page(body).unwrap();
        assert_eq!(page.transactions.len(), 2);
        assert_eq!(page.transactions[1].id, "b");
        assert_eq!(page.next_link.as_deref(), Some("https://api.example/next?page[after]=x"));
    }

    #[test]
    fn test_parse_page_last() {
        let page = parse_page(r#"{ "data": [], "links": { "next": null } }"#).unwrap();
        assert!(page.transactions.is_empty());
        assert!(page.next_link.is_none());

        let page = parse_page(r#"{ "data": [] }"#).unwrap();
        assert!(page.next_link.is_none());

        let page = parse_page(r#"{ "data": [], "links": { "next": "" } }"#).unwrap();
        assert!(page.next_link.is_none());
    }

    #[test]
    fn test_parse_page_without_data_is_no_data() {
        let err = parse_page(r#"{ "errors": [] }"#).unwrap_err();
        assert_eq!(err.reason(), "no_data");
        assert!(parse_page("not json").is_err());
    }

    #[test]
    fn test_parse_page_skips_non_objects() {
        let page = parse_page(r#"{ "data": [42, { "id": "ok" }] }"#).unwrap();
        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.transactions[0].id, "ok");
    }

    #[test]
    fn test_window_params_keep_offset() {
        let brisbane = FixedOffset::east_opt(10 * 3600).unwrap();
        let since = brisbane.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let until = utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap();
        let window = DateWindow::new(Some(since), Some(until));
        assert_eq!(window.since_param().as_deref(), Some("2024-03-01T00:00:00+10:00"));
        assert_eq!(window.until_param().as_deref(), Some("2024-03-31T23:59:59+00:00"));
        assert!(DateWindow::default().since_param().is_none());
    }
}
