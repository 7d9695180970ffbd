//! Retrieval engine: pages every selected account through the fetcher and keeps
//! the records that pass all active criteria.
//!
//! Retrieval is sequential and all-or-nothing. The first failed page aborts the
//! whole call and anything accumulated so far is dropped.

use upscan_core::{
    FilterCriteria, FoodRules, RetrievalError, Transaction, amount_match, category_match,
    description_match, food_match,
};

use crate::fetcher::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, PageFetcher};
use crate::registry::AccountRegistry;
use crate::transport::{BearerToken, Transport};
use crate::types::{AccountSelector, DateWindow};

/// Matching records in delivery order: account, then page, then position in page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalResult {
    transactions: Vec<Transaction>,
    pages_fetched: usize,
}

impl RetrievalResult {
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Number of page requests that succeeded
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }
}

impl IntoIterator for RetrievalResult {
    type Item = Transaction;
    type IntoIter = std::vec::IntoIter<Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.into_iter()
    }
}

impl<'r> IntoIterator for &'r RetrievalResult {
    type Item = &'r Transaction;
    type IntoIter = std::slice::Iter<'r, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

#[derive(Debug, Clone)]
pub struct RetrievalEngine<T: Transport, R: AccountRegistry> {
    transport: T,
    token: BearerToken,
    registry: R,
    base_url: String,
    page_size: u32,
    food_rules: FoodRules,
}

impl<T: Transport, R: AccountRegistry> RetrievalEngine<T, R> {
    pub fn new(transport: T, token: BearerToken, registry: R) -> Self {
        Self {
            transport,
            token,
            registry,
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            food_rules: FoodRules::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_food_rules(mut self, food_rules: FoodRules) -> Self {
        self.food_rules = food_rules;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn food_rules(&self) -> &FoodRules {
        &self.food_rules
    }

    /// Fetch and filter. Zero selected accounts, or zero matches, is an empty result.
    pub fn retrieve(
        &self,
        selector: &AccountSelector,
        window: DateWindow,
        criteria: &FilterCriteria,
    ) -> Result<RetrievalResult, RetrievalError> {
        let account_ids = self.resolve(selector)?;
        let fetcher = PageFetcher::new(&self.transport, &self.token, &self.base_url, self.page_size);

        let mut result = RetrievalResult::default();

        for account_id in &account_ids {
            let before = result.transactions.len();
            let mut pages = 0usize;

            for page in fetcher.pages(account_id, window) {
                let page = page?;
                pages += 1;
                result.transactions.extend(
                    page.transactions
                        .into_iter()
                        .filter(|txn| passes(txn, criteria, &self.food_rules)),
                );
            }

            result.pages_fetched += pages;
            tracing::info!(
                account = %account_id,
                pages,
                kept = result.transactions.len() - before,
                "account retrieved"
            );
        }

        Ok(result)
    }

    fn resolve(&self, selector: &AccountSelector) -> Result<Vec<String>, RetrievalError> {
        match selector {
            AccountSelector::Single(id) => check_ids(std::slice::from_ref(id)),
            AccountSelector::Many(ids) => check_ids(ids),
            AccountSelector::All => self
                .registry
                .accounts()
                .into_iter()
                .map(|a| {
                    if a.id.trim().is_empty() {
                        Err(RetrievalError::InvalidAccount(a.name))
                    } else {
                        Ok(a.id)
                    }
                })
                .collect(),
        }
    }
}

fn check_ids(ids: &[String]) -> Result<Vec<String>, RetrievalError> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            if id.trim().is_empty() {
                Err(RetrievalError::InvalidAccount(format!("account #{}", i + 1)))
            } else {
                Ok(id.clone())
            }
        })
        .collect()
}

/// AND over the criteria that are present. Absent criteria are not evaluated.
pub fn passes(txn: &Transaction, criteria: &FilterCriteria, food_rules: &FoodRules) -> bool {
    if let Some(allowed) = criteria.categories() {
        if !category_match(txn.category(), txn.parent_category(), allowed) {
            return false;
        }
    }

    if let Some(needle) = criteria.description() {
        if !description_match(txn.description(), needle) {
            return false;
        }
    }

    if let Some(range) = criteria.amount_range() {
        if !amount_match(txn.amount_value(), range.min, range.max) {
            return false;
        }
    }

    if criteria.food_related()
        && !food_match(
            txn.description(),
            txn.category(),
            txn.parent_category(),
            food_rules,
        )
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn txn(value: serde_json::Value) -> Transaction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_no_criteria_keeps_everything() {
        let t = txn(json!({ "id": "x" }));
        assert!(passes(&t, &FilterCriteria::new(), &FoodRules::default()));
    }

    #[test]
    fn test_criteria_are_conjunctive() {
        let t = txn(json!({
            "id": "x",
            "attributes": { "description": "Woolworths Metro", "amount": { "value": "-20.00" } }
        }));
        let rules = FoodRules::default();

        let both = FilterCriteria::new()
            .with_description("woolworths")
            .with_amount_range(Some(-30.0), Some(0.0));
        assert!(passes(&t, &both, &rules));

        let amount_fails = both.clone().with_amount_range(Some(-10.0), None);
        assert!(!passes(&t, &amount_fails, &rules));

        let desc_fails = both.with_description("coles");
        assert!(!passes(&t, &desc_fails, &rules));
    }

    #[test]
    fn test_empty_category_set_excludes_all() {
        let t = txn(json!({
            "id": "x",
            "relationships": { "category": { "data": { "id": "takeaway" } } }
        }));
        let c = FilterCriteria::new().with_categories(Vec::<String>::new());
        assert!(!passes(&t, &c, &FoodRules::default()));
    }

    #[test]
    fn test_missing_amount_passes_range() {
        let t = txn(json!({ "id": "x", "attributes": { "description": "Pending" } }));
        let c = FilterCriteria::new().with_amount_range(Some(1000.0), Some(2000.0));
        assert!(passes(&t, &c, &FoodRules::default()));
    }

    #[test]
    fn test_all_selector_rejects_blank_ids() {
        use crate::registry::Account;
        use crate::transport::{HttpRequest, HttpResponse};

        struct Unreachable;
        impl Transport for Unreachable {
            fn get(&self, _: &HttpRequest) -> Result<HttpResponse, RetrievalError> {
                panic!("no request expected");
            }
        }

        let registry = vec![Account::new("RENT", "id-r"), Account::new("GIFTS", "")];
        let engine = RetrievalEngine::new(Unreachable, BearerToken::new("t"), registry);
        let err = engine
            .retrieve(&AccountSelector::All, DateWindow::default(), &FilterCriteria::new())
            .unwrap_err();
        assert_eq!(err, RetrievalError::InvalidAccount("GIFTS".to_string()));
    }
}
