// ✍️ Entry Form Controller - validates input and drives ledger mutations
//
// The form is the only gate into the ledger: append trusts whatever it is
// given, so every check lives here and runs at submission time.

use crate::balance;
use crate::entry::{Entry, EntryId};
use crate::ledger::Ledger;
use crate::storage::KeyValueStore;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CLOCK
// ============================================================================

/// Source of "today" for the future-date check
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar day
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyDescription,
    InvalidAmount,
    NegativeAmount,
    MissingDate,
    InvalidDate,
    FutureDate,
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyDescription => "description",
            ValidationError::InvalidAmount | ValidationError::NegativeAmount => "amount",
            ValidationError::MissingDate
            | ValidationError::InvalidDate
            | ValidationError::FutureDate => "date",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FutureDate => write!(f, "Future dates are not allowed."),
            _ => write!(f, "Please fill all fields with valid data."),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Raw text as typed into the three inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub description: String,
    pub amount: String,
    pub date: String,
}

impl FormFields {
    pub fn new(description: &str, amount: &str, date: &str) -> Self {
        FormFields {
            description: description.to_string(),
            amount: amount.to_string(),
            date: date.to_string(),
        }
    }

    fn prefill(entry: &Entry) -> Self {
        FormFields {
            description: entry.description.clone(),
            amount: entry.amount.to_string(),
            date: entry.date.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn clear(&mut self) {
        *self = FormFields::default();
    }
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Check the fields against `today` and build a new entry
pub fn validate(fields: &FormFields, today: NaiveDate) -> Result<Entry, ValidationError> {
    let description = fields.description.trim();
    if description.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }

    let amount = parse_amount(&fields.amount).ok_or(ValidationError::InvalidAmount)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::NegativeAmount);
    }

    let raw_date = fields.date.trim();
    if raw_date.is_empty() {
        return Err(ValidationError::MissingDate);
    }
    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate)?;
    if date > today {
        return Err(ValidationError::FutureDate);
    }

    Ok(Entry::new(description, amount, date))
}

// ============================================================================
// EDIT MODE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Starting an edit removes the entry at once; abandoning the edit loses it
    #[default]
    RemoveOnStart,
    /// The entry stays until the edited form is submitted
    DeferUntilSave,
}

impl FromStr for EditMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "remove-on-start" | "remove" => Ok(EditMode::RemoveOnStart),
            "defer" | "defer-until-save" => Ok(EditMode::DeferUntilSave),
            other => Err(anyhow::anyhow!(
                "Unknown edit mode '{}' (expected 'remove-on-start' or 'defer')",
                other
            )),
        }
    }
}

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct FormController<C: Clock> {
    clock: C,
    fields: FormFields,
    max_date: NaiveDate,
    edit_mode: EditMode,
    pending_edit: Option<EntryId>,
}

impl<C: Clock> FormController<C> {
    pub fn new(clock: C, edit_mode: EditMode) -> Self {
        // Fixed once; submit re-checks against the clock
        let max_date = clock.today();
        FormController {
            clock,
            fields: FormFields::default(),
            max_date,
            edit_mode,
            pending_edit: None,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    /// Latest date the date input offers, as of startup
    pub fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    pub fn pending_edit(&self) -> Option<EntryId> {
        self.pending_edit
    }

    /// Validate, then append (or replace a deferred edit) and clear the fields.
    /// An amount that would push the balance out of range is rejected.
    /// On error nothing changes, fields included.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        ledger: &mut Ledger<S>,
    ) -> Result<EntryId, ValidationError> {
        let entry = validate(&self.fields, self.clock.today())?;

        // The balance must stay representable, or every later render saturates
        let pending = self.pending_edit;
        let others = ledger
            .all()
            .iter()
            .filter(|e| Some(e.id) != pending)
            .map(|e| &e.amount);
        if balance::checked_compute(others.chain(std::iter::once(&entry.amount))).is_none() {
            return Err(ValidationError::InvalidAmount);
        }

        let id = match self.pending_edit.take() {
            Some(original) if ledger.replace(original, entry.clone()) => original,
            // Pending entry deleted meanwhile, or no edit in progress
            _ => {
                let id = entry.id;
                ledger.append(entry);
                id
            }
        };

        self.fields.clear();
        Ok(id)
    }

    /// Copy the entry into the fields. Returns false for an unknown id.
    pub fn start_edit<S: KeyValueStore>(&mut self, ledger: &mut Ledger<S>, id: EntryId) -> bool {
        let entry = match ledger.get(id) {
            Some(entry) => entry,
            None => {
                log::debug!("edit({}) ignored, no such entry", id);
                return false;
            }
        };
        self.fields = FormFields::prefill(entry);

        match self.edit_mode {
            EditMode::RemoveOnStart => {
                ledger.remove(id);
            }
            EditMode::DeferUntilSave => {
                self.pending_edit = Some(id);
            }
        }
        true
    }

    /// Drop a pending edit and clear the fields. Under RemoveOnStart the
    /// original entry is already gone.
    pub fn cancel_edit(&mut self) {
        self.pending_edit = None;
        self.fields.clear();
    }

    /// No confirmation step
    pub fn delete_entry<S: KeyValueStore>(
        &mut self,
        ledger: &mut Ledger<S>,
        id: EntryId,
    ) -> Option<Entry> {
        if self.pending_edit == Some(id) {
            self.pending_edit = None;
        }
        ledger.remove(id)
    }
}
