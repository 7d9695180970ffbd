use serde::{Deserialize, Serialize};

/// Human-readable account name mapped to the API's account id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    #[serde(default)]
    pub id: String,
}

impl Account {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Source of "all known accounts"
pub trait AccountRegistry {
    /// Registry order is fetch order for an `All` selection
    fn accounts(&self) -> Vec<Account>;

    /// Case-insensitive lookup by name
    fn find(&self, name: &str) -> Option<Account> {
        let name = name.trim();
        self.accounts()
            .into_iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

impl AccountRegistry for Vec<Account> {
    fn accounts(&self) -> Vec<Account> {
        self.clone()
    }
}

impl AccountRegistry for [Account] {
    fn accounts(&self) -> Vec<Account> {
        self.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_case_insensitive() {
        let registry = vec![
            Account::new("GROCERIES", "id-g"),
            Account::new("RENT", "id-r"),
        ];
        assert_eq!(registry.find("groceries").unwrap().id, "id-g");
        assert_eq!(registry.find(" Rent ").unwrap().id, "id-r");
        assert!(registry.find("HOLIDAYS").is_none());
    }
}
