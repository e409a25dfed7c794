// Expense Ledger - Core Library
// Exposes all modules for use in the terminal UI, the CLI and tests

pub mod entry;
pub mod storage;
pub mod mirror;
pub mod ledger;
pub mod balance;
pub mod view;
pub mod form;
pub mod app;
pub mod config;

// Re-export commonly used types
pub use entry::{Classification, Entry, EntryId};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use mirror::{LoadReport, PersistenceMirror, STORAGE_KEY};
pub use ledger::Ledger;
pub use view::{render, LedgerView, Row, RowAction};
pub use form::{
    Clock, EditMode, FixedClock, FormController, FormFields, SystemClock, ValidationError,
};
pub use app::ExpenseApp;
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Open the configured ledger and build the application around it
pub fn open_app(config: &Config) -> anyhow::Result<ExpenseApp<SqliteStore, SystemClock>> {
    let store = SqliteStore::open(&config.db_path)?;
    let ledger = Ledger::open(PersistenceMirror::new(store));
    let form = FormController::new(SystemClock, config.edit_mode);
    Ok(ExpenseApp::new(ledger, form))
}
