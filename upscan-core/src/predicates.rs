//! Pure predicates, one filter dimension each.
//!
//! Composition (AND across active criteria) happens in the retrieval engine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::transaction::{CategoryRef, parse_amount};

/// Signals used by the food-purchase heuristic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodRules {
    /// Matched as lower-case substrings of the description
    pub keywords: Vec<String>,
    pub child_categories: BTreeSet<String>,
    pub parent_category: String,
}

impl Default for FoodRules {
    fn default() -> Self {
        Self {
            keywords: vec!["coles".to_string(), "woolworths".to_string()],
            child_categories: ["restaurants-and-cafes", "takeaway"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            parent_category: "good-life".to_string(),
        }
    }
}

/// True iff `allowed` is non-empty and either reference's id is in it.
/// An absent reference never matches.
pub fn category_match(
    category: Option<&CategoryRef>,
    parent_category: Option<&CategoryRef>,
    allowed: &BTreeSet<String>,
) -> bool {
    if allowed.is_empty() {
        return false;
    }
    let hit = |r: Option<&CategoryRef>| r.is_some_and(|r| allowed.contains(&r.id));
    hit(parent_category) || hit(category)
}

/// Case- and whitespace-insensitive substring containment
pub fn description_match(text: &str, needle: &str) -> bool {
    squash(text).contains(&squash(needle))
}

/// Inclusive range check. A missing or unparseable amount always passes.
pub fn amount_match(amount: Option<&str>, min: Option<f64>, max: Option<f64>) -> bool {
    let Some(value) = amount.and_then(parse_amount) else {
        return true;
    };
    if min.is_some_and(|min| value < min) {
        return false;
    }
    if max.is_some_and(|max| value > max) {
        return false;
    }
    true
}

/// Keyword hit in the description OR (child category in the food set AND parent is the food parent).
pub fn food_match(
    text: &str,
    category: Option<&CategoryRef>,
    parent_category: Option<&CategoryRef>,
    rules: &FoodRules,
) -> bool {
    let text = text.to_lowercase();
    let keyword_hit = rules
        .keywords
        .iter()
        .any(|k| text.contains(&k.to_lowercase()));

    let structural_hit = match (category, parent_category) {
        (Some(child), Some(parent)) => {
            rules.child_categories.contains(&child.id) && parent.id == rules.parent_category
        }
        _ => false,
    };

    keyword_hit || structural_hit
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
