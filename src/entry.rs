// 🧾 Entry Model - one recorded income or expense
//
// Identity is a UUID assigned at creation and never reused.
// Classification is derived from the sign of the amount, never stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// IDENTITY
// ============================================================================

/// Stable entry identity
///
/// Row actions carry this instead of a list position, so a stale action can
/// never hit the wrong entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(uuid::Uuid);

impl EntryId {
    pub fn new() -> Self {
        EntryId(uuid::Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Zero or positive amount
    Income,
    /// Negative amount
    Expense,
}

impl Classification {
    pub fn of(amount: Decimal) -> Self {
        if amount.is_sign_negative() && !amount.is_zero() {
            Classification::Expense
        } else {
            Classification::Income
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Income => "income",
            Classification::Expense => "expense",
        }
    }
}

// ============================================================================
// ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Missing in ledgers written before ids existed; a fresh one is minted on load
    #[serde(default)]
    pub id: EntryId,

    pub description: String,

    /// Full precision; only the balance is rounded, and only for display
    pub amount: Decimal,

    /// Serialized as YYYY-MM-DD
    pub date: NaiveDate,
}

impl Entry {
    /// Build an entry with a freshly minted id. Performs no validation.
    pub fn new(description: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Entry {
            id: EntryId::new(),
            description: description.into(),
            amount,
            date,
        }
    }

    pub fn classification(&self) -> Classification {
        Classification::of(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_by_sign() {
        assert_eq!(Classification::of(Decimal::new(350, 2)), Classification::Income);
        assert_eq!(Classification::of(Decimal::ZERO), Classification::Income);
        assert_eq!(Classification::of(Decimal::new(-1, 2)), Classification::Expense);

        // -0.00 is still zero
        let mut negative_zero = Decimal::new(0, 2);
        negative_zero.set_sign_negative(true);
        assert_eq!(Classification::of(negative_zero), Classification::Income);

        assert_eq!(Classification::Income.label(), "income");
        assert_eq!(Classification::Expense.label(), "expense");
    }

    #[test]
    fn test_new_entries_get_distinct_ids() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let a = Entry::new("Coffee", Decimal::new(350, 2), date);
        let b = Entry::new("Coffee", Decimal::new(350, 2), date);

        assert_ne!(a.id, b.id, "Identical values must still have distinct identity");
    }

    #[test]
    fn test_entry_json_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let entry = Entry::new("Coffee", Decimal::new(350, 2), date);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["description"], "Coffee");
        assert_eq!(json["amount"], "3.50");
        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["id"], entry.id.to_string());
    }

    #[test]
    fn test_legacy_entry_without_id_or_string_amount() {
        // Shape written by the browser version: numeric amount, no id
        let legacy = r#"{"description":"Salary","amount":1000,"date":"2024-02-01"}"#;
        let entry: Entry = serde_json::from_str(legacy).unwrap();

        assert_eq!(entry.description, "Salary");
        assert_eq!(entry.amount, Decimal::new(1000, 0));
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert!(!entry.id.to_string().is_empty());
    }
}
