//! One request per page, plus a lazy cursor that follows `links.next`.

use upscan_core::RetrievalError;

use crate::transport::{BearerToken, HttpRequest, Transport};
use crate::types::{DateWindow, Page, parse_page};

pub const DEFAULT_BASE_URL: &str = "https://api.up.com.au/api/v1";
pub const DEFAULT_PAGE_SIZE: u32 = 100;

pub struct PageFetcher<'a, T: Transport> {
    transport: &'a T,
    token: &'a BearerToken,
    base_url: &'a str,
    page_size: u32,
}

impl<'a, T: Transport> PageFetcher<'a, T> {
    pub fn new(transport: &'a T, token: &'a BearerToken, base_url: &'a str, page_size: u32) -> Self {
        Self {
            transport,
            token,
            base_url,
            page_size,
        }
    }

    /// First page for an account: date filters plus the page-size hint
    pub fn first(&self, account_id: &str, window: &DateWindow) -> Result<Page, RetrievalError> {
        let url = format!(
            "{}/accounts/{}/transactions",
            self.base_url.trim_end_matches('/'),
            account_id
        );

        let mut query = Vec::new();
        if let Some(since) = window.since_param() {
            query.push(("filter[since]".to_string(), since));
        }
        if let Some(until) = window.until_param() {
            query.push(("filter[until]".to_string(), until));
        }
        query.push(("page[size]".to_string(), self.page_size.to_string()));

        self.fetch(url, query)
    }

    /// Continuation page: the server link is used verbatim, with no extra parameters
    pub fn next(&self, link: &str) -> Result<Page, RetrievalError> {
        self.fetch(link.to_string(), Vec::new())
    }

    /// Lazy sequence of an account's pages. Stops after the first error or the
    /// first page without a next link.
    pub fn pages(&self, account_id: &str, window: DateWindow) -> PageCursor<'_, 'a, T> {
        PageCursor {
            fetcher: self,
            account_id: account_id.to_string(),
            window,
            state: CursorState::First,
        }
    }

    fn fetch(&self, url: String, query: Vec<(String, String)>) -> Result<Page, RetrievalError> {
        tracing::debug!(url = %url, params = query.len(), "GET transactions page");

        let request = HttpRequest {
            url,
            token: self.token.clone(),
            query,
        };
        let response = self.transport.get(&request)?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "transactions request failed");
            return Err(RetrievalError::Transport {
                status: response.status,
                body: response.body,
            });
        }

        parse_page(&response.body)
    }
}

enum CursorState {
    First,
    Next(String),
    Done,
}

pub struct PageCursor<'f, 'a, T: Transport> {
    fetcher: &'f PageFetcher<'a, T>,
    account_id: String,
    window: DateWindow,
    state: CursorState,
}

impl<T: Transport> Iterator for PageCursor<'_, '_, T> {
    type Item = Result<Page, RetrievalError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match std::mem::replace(&mut self.state, CursorState::Done) {
            CursorState::First => self.fetcher.first(&self.account_id, &self.window),
            CursorState::Next(link) => self.fetcher.next(&link),
            CursorState::Done => return None,
        };

        if let Ok(page) = &result {
            if let Some(link) = &page.next_link {
                self.state = CursorState::Next(link.clone());
            }
        }

        Some(result)
    }
}

impl<T: Transport> std::iter::FusedIterator for PageCursor<'_, '_, T> {}
