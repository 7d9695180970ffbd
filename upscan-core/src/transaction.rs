//! Transaction records as delivered by the Up banking API.
//!
//! Records are read-only views over the JSON:API resource. Only the fields the
//! filters and downstream tabulation need are typed; everything else is kept in
//! `extra` maps so a record can be re-emitted as JSON without loss.
//!
//! Field-level malformation never fails deserialization: a value of the wrong
//! JSON type is read as absent.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One transaction resource (`data[]` element of a transactions page)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub attributes: TransactionAttributes,
    #[serde(default, deserialize_with = "lenient::object")]
    pub relationships: TransactionRelationships,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAttributes {
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::object_opt")]
    pub amount: Option<Money>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub settled_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Signed amount; `value` is a decimal string such as `"-12.50"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    #[serde(default, deserialize_with = "lenient::string")]
    pub currency_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub value_in_base_units: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRelationships {
    #[serde(default, deserialize_with = "lenient::object_opt")]
    pub category: Option<Relationship>,
    #[serde(default, deserialize_with = "lenient::object_opt")]
    pub parent_category: Option<Relationship>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `relationships.<name>`: `{ "data": { "type": ..., "id": ... } | null }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default, deserialize_with = "lenient::category_ref")]
    pub data: Option<CategoryRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to a category by identifier (e.g. `takeaway`, `good-life`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl CategoryRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: Some("categories".to_string()),
        }
    }
}

impl Transaction {
    /// Description text, empty when the API omitted it
    pub fn description(&self) -> &str {
        self.attributes.description.as_deref().unwrap_or("")
    }

    /// Raw `amount.value`, if present
    pub fn amount_value(&self) -> Option<&str> {
        self.attributes
            .amount
            .as_ref()
            .and_then(|m| m.value.as_deref())
    }

    /// `amount.value` as a finite signed number; `None` when absent or unparseable
    pub fn amount(&self) -> Option<f64> {
        parse_amount(self.amount_value()?)
    }

    pub fn category(&self) -> Option<&CategoryRef> {
        self.relationships
            .category
            .as_ref()
            .and_then(|r| r.data.as_ref())
    }

    pub fn parent_category(&self) -> Option<&CategoryRef> {
        self.relationships
            .parent_category
            .as_ref()
            .and_then(|r| r.data.as_ref())
    }

    /// `createdAt` parsed as RFC3339; `None` when absent or malformed
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.attributes.created_at.as_deref()?)
    }

    /// `settledAt` parsed as RFC3339; `None` when absent (pending) or malformed
    pub fn settled_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.attributes.settled_at.as_deref()?)
    }
}

/// Parse a decimal amount string. Non-finite values (`NaN`, `inf`) count as unparseable.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok()
}

mod lenient {
    use super::*;

    pub fn string<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn string_or_empty<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(string(d)?.unwrap_or_default())
    }

    pub fn integer<'de, D>(d: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Value>::deserialize(d)?.and_then(|v| v.as_i64()))
    }

    pub fn object_opt<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: serde::de::DeserializeOwned,
    {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
            _ => None,
        })
    }

    pub fn object<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: serde::de::DeserializeOwned + Default,
    {
        Ok(object_opt(d)?.unwrap_or_default())
    }

    pub fn category_ref<'de, D>(d: D) -> Result<Option<CategoryRef>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(Value::Object(map)) = Option::<Value>::deserialize(d)? else {
            return Ok(None);
        };
        let Some(id) = map.get("id").and_then(Value::as_str) else {
            return Ok(None);
        };
        Ok(Some(CategoryRef {
            id: id.to_string(),
            kind: map.get("type").and_then(Value::as_str).map(str::to_string),
        }))
    }
}
