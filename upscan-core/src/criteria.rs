//! Filter criteria selected by the caller for one retrieval.
//!
//! Every criterion is optional. An absent criterion is never evaluated; a
//! present one must pass for a record to be kept.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Inclusive amount bounds; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AmountRange {
    /// Returns `None` when both bounds are open (no amount filter requested)
    pub fn new(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            None
        } else {
            Some(Self { min, max })
        }
    }
}

/// Immutable once built. Use the `with_*` builders, then hand it to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    categories: Option<BTreeSet<String>>,
    description: Option<String>,
    amount: Option<AmountRange>,
    food_related: bool,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep records whose category or parent category is in `ids`.
    ///
    /// An empty set is still an active filter and excludes every record.
    pub fn with_categories<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_description(mut self, needle: impl Into<String>) -> Self {
        self.description = Some(needle.into());
        self
    }

    /// Open on both sides means no amount filter
    pub fn with_amount_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.amount = AmountRange::new(min, max);
        self
    }

    pub fn with_food_related(mut self, enabled: bool) -> Self {
        self.food_related = enabled;
        self
    }

    pub fn categories(&self) -> Option<&BTreeSet<String>> {
        self.categories.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn amount_range(&self) -> Option<AmountRange> {
        self.amount
    }

    pub fn food_related(&self) -> bool {
        self.food_related
    }

    /// True when no criterion is active (every record passes)
    pub fn is_empty(&self) -> bool {
        self.categories.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && !self.food_related
    }
}
