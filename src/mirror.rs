// 🪞 Persistence Mirror - the durable copy of the ledger
//
// Whole-sequence JSON under one fixed key. No versioning, no partial writes.
// Reads never fail: unreadable elements are skipped, an unreadable slot is
// an empty ledger, and the report says whether anything was dropped.

use crate::entry::Entry;
use crate::storage::KeyValueStore;
use anyhow::{Context, Result};

/// Fixed slot key
pub const STORAGE_KEY: &str = "expenses";

/// What `load_report` recovered from the slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub entries: Vec<Entry>,
    /// False when stored data was unreadable, in part or in whole
    pub lossless: bool,
}

impl LoadReport {
    fn lossless(entries: Vec<Entry>) -> Self {
        LoadReport { entries, lossless: true }
    }

    fn lossy(entries: Vec<Entry>) -> Self {
        LoadReport { entries, lossless: false }
    }
}

pub struct PersistenceMirror<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PersistenceMirror<S> {
    pub fn new(store: S) -> Self {
        PersistenceMirror { store }
    }

    /// Stored sequence, or empty if absent or malformed
    pub fn load(&self) -> Vec<Entry> {
        self.load_report().entries
    }

    /// Like `load`, but flags data that could not be read so callers can
    /// avoid overwriting it
    pub fn load_report(&self) -> LoadReport {
        let raw = match self.store.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("No stored ledger found, starting empty");
                return LoadReport::lossless(Vec::new());
            }
            Err(err) => {
                log::warn!("Could not read stored ledger, starting empty: {:#}", err);
                return LoadReport::lossy(Vec::new());
            }
        };

        // Elements are decoded one by one so a single bad amount (e.g. 1e30
        // from the browser version) costs only that entry
        let values = match serde_json::from_str::<Option<Vec<serde_json::Value>>>(&raw) {
            Ok(Some(values)) => values,
            // "null" is what a cleared browser slot held
            Ok(None) => return LoadReport::lossless(Vec::new()),
            Err(err) => {
                log::warn!("Stored ledger is malformed, starting empty: {}", err);
                return LoadReport::lossy(Vec::new());
            }
        };

        let total = values.len();
        let mut entries = Vec::with_capacity(total);
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<Entry>(value) {
                Ok(entry) => entries.push(entry),
                Err(err) => log::warn!("Skipping unreadable stored entry #{}: {}", index, err),
            }
        }

        log::info!("Loaded {} of {} entries", entries.len(), total);
        if entries.len() == total {
            LoadReport::lossless(entries)
        } else {
            LoadReport::lossy(entries)
        }
    }

    /// Serialize the full sequence and overwrite the slot
    pub fn save(&mut self, entries: &[Entry]) -> Result<()> {
        let json = serde_json::to_string(entries).context("Failed to serialize ledger")?;
        self.store.set_item(STORAGE_KEY, &json)?;
        log::debug!("Ledger saved ({} entries)", entries.len());
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SqliteStore};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn sample_entries() -> Vec<Entry> {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        vec![
            Entry::new("Coffee", Decimal::new(350, 2), day(1)),
            Entry::new("Refund", Decimal::new(-1999, 2), day(2)),
            Entry::new("Salary", Decimal::new(1000, 0), day(3)),
            // More precision than display ever shows
            Entry::new("Split bill", Decimal::new(3333333, 6), day(3)),
        ]
    }

    #[test]
    fn test_round_trip_preserves_order_and_values() {
        let mut mirror = PersistenceMirror::new(SqliteStore::open_in_memory().unwrap());
        let entries = sample_entries();

        mirror.save(&entries).unwrap();
        let loaded = mirror.load();

        assert_eq!(loaded, entries);
        println!("✅ Mirror round-trip test PASSED");
    }

    #[test]
    fn test_absent_slot_loads_empty() {
        let mirror = PersistenceMirror::new(MemoryStore::new());
        assert!(mirror.load().is_empty());
    }

    #[test]
    fn test_malformed_slot_loads_empty() {
        for garbage in ["not json", "{\"a\":1}", "[{\"description\":1}]", "null", ""] {
            let mut store = MemoryStore::new();
            store.set_item(STORAGE_KEY, garbage).unwrap();
            let mirror = PersistenceMirror::new(store);

            assert!(mirror.load().is_empty(), "'{}' should load as empty", garbage);
        }
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let mut mirror = PersistenceMirror::new(MemoryStore::new());
        let entries = sample_entries();

        mirror.save(&entries).unwrap();
        mirror.save(&entries[..1]).unwrap();

        assert_eq!(mirror.load(), entries[..1].to_vec());
    }

    #[test]
    fn test_out_of_range_element_skipped_alone() {
        let mut store = MemoryStore::new();
        store
            .set_item(
                STORAGE_KEY,
                r#"[{"description":"Coffee","amount":3.5,"date":"2024-03-01"},{"description":"Lottery","amount":1e30,"date":"2024-03-02"},{"description":"Salary","amount":1000,"date":"2024-03-03"}]"#,
            )
            .unwrap();
        let mirror = PersistenceMirror::new(store);

        let report = mirror.load_report();
        let names: Vec<_> = report.entries.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["Coffee", "Salary"]);
        assert!(!report.lossless);
    }

    #[test]
    fn test_load_report_flags() {
        let mirror = PersistenceMirror::new(MemoryStore::new());
        assert!(mirror.load_report().lossless, "Absent slot loses nothing");

        let mut store = MemoryStore::new();
        store.set_item(STORAGE_KEY, "{oops").unwrap();
        assert!(!PersistenceMirror::new(store).load_report().lossless);

        let mut mirror = PersistenceMirror::new(MemoryStore::new());
        mirror.save(&sample_entries()).unwrap();
        let report = mirror.load_report();
        assert!(report.lossless);
        assert_eq!(report.entries.len(), sample_entries().len());
    }

    #[test]
    fn test_loads_browser_written_array() {
        let mut store = MemoryStore::new();
        store
            .set_item(
                STORAGE_KEY,
                r#"[{"description":"Coffee","amount":3.5,"date":"2024-03-01"},{"description":"Salary","amount":1000,"date":"2024-03-02"}]"#,
            )
            .unwrap();
        let mirror = PersistenceMirror::new(store);

        let loaded = mirror.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].description, "Coffee");
        assert_eq!(loaded[0].amount, Decimal::new(35, 1));
        assert_eq!(loaded[1].amount, Decimal::new(1000, 0));
        assert_ne!(loaded[0].id, loaded[1].id);
    }
}
