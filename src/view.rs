// 🖼️ View Renderer - projects the ledger into display rows
//
// Pure: the shell persists right before it calls render, so the view,
// the ledger and the mirror always agree after a mutation.

use crate::balance;
use crate::entry::{Classification, Entry, EntryId};

/// Row-local action, bound to the entry's stable id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit(EntryId),
    Delete(EntryId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Position at render time, for display only
    pub index: usize,
    pub id: EntryId,
    pub date: String,
    pub description: String,
    /// Raw, unrounded
    pub amount: String,
    pub classification: Classification,
    pub actions: [RowAction; 2],
}

impl Row {
    pub fn edit(&self) -> RowAction {
        self.actions[0]
    }

    pub fn delete(&self) -> RowAction {
        self.actions[1]
    }

    /// `2024-01-15 - Coffee: 3.50`
    pub fn line(&self) -> String {
        format!("{} - {}: {}", self.date, self.description, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LedgerView {
    pub rows: Vec<Row>,
    /// Formatted to two fraction digits
    pub balance: String,
}

impl LedgerView {
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }
}

/// Rebuild the whole view; nothing from a previous render is reused
pub fn render(entries: &[Entry]) -> LedgerView {
    let rows = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| Row {
            index,
            id: entry.id,
            date: entry.date.format("%Y-%m-%d").to_string(),
            description: entry.description.clone(),
            amount: entry.amount.to_string(),
            classification: entry.classification(),
            actions: [RowAction::Edit(entry.id), RowAction::Delete(entry.id)],
        })
        .collect();

    LedgerView {
        rows,
        balance: balance::format_balance(balance::compute(entries)),
    }
}
