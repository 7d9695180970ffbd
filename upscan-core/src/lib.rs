//! upscan-core: transaction model, filter criteria, and predicates

pub mod criteria;
pub mod error;
pub mod predicates;
pub mod transaction;

pub use criteria::{AmountRange, FilterCriteria};
pub use error::RetrievalError;
pub use predicates::{FoodRules, amount_match, category_match, description_match, food_match};
pub use transaction::{
    CategoryRef, Money, Relationship, Transaction, TransactionAttributes, TransactionRelationships,
};
