use serde::{Deserialize, Serialize};

use super::ids::EntryId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub id: EntryId,
    pub description: String,
    pub amount: f64,
}

impl IncomeEntry {
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        Self {
            id: EntryId::new(),
            description: description.into(),
            amount,
        }
    }
}
