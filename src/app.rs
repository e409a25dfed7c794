// 🧭 Application Shell - ledger, mirror and view kept in lockstep
//
// Every user intent runs mutate -> persist -> render to completion before
// the next one is looked at. The shell owns the current view so actions
// can only come from the latest render.

use crate::entry::EntryId;
use crate::form::{Clock, FormController, FormFields};
use crate::ledger::Ledger;
use crate::storage::KeyValueStore;
use crate::view::{self, LedgerView, RowAction};

pub struct ExpenseApp<S: KeyValueStore, C: Clock> {
    ledger: Ledger<S>,
    form: FormController<C>,
    view: LedgerView,
    notification: Option<String>,
}

impl<S: KeyValueStore, C: Clock> ExpenseApp<S, C> {
    pub fn new(ledger: Ledger<S>, form: FormController<C>) -> Self {
        let mut app = ExpenseApp {
            ledger,
            form,
            view: LedgerView::default(),
            notification: None,
        };
        // Startup render writes the mirror back once (ids minted on load),
        // unless that would overwrite stored data we could not read
        if app.ledger.loaded_lossless() {
            app.ledger.persist();
        } else {
            log::warn!("Stored ledger was only partly readable; leaving it untouched until the next change");
        }
        app.refresh();
        app
    }

    /// Rebuild the view. Mutations have already persisted by now.
    pub fn refresh(&mut self) {
        self.view = view::render(self.ledger.all());
    }

    /// Returns the new (or replaced) entry's id; on failure the message is
    /// queued as a blocking notification and nothing else changes.
    pub fn submit(&mut self) -> Option<EntryId> {
        match self.form.submit(&mut self.ledger) {
            Ok(id) => {
                log::info!("Entry {} saved", id);
                self.refresh();
                Some(id)
            }
            Err(err) => {
                log::debug!("Rejected submission: {} ({})", err, err.field());
                self.notification = Some(err.to_string());
                None
            }
        }
    }

    pub fn dispatch(&mut self, action: RowAction) {
        log::debug!("Row action {:?}", action);
        match action {
            RowAction::Edit(id) => {
                self.form.start_edit(&mut self.ledger, id);
            }
            RowAction::Delete(id) => {
                self.form.delete_entry(&mut self.ledger, id);
            }
        }
        self.refresh();
    }

    pub fn cancel_edit(&mut self) {
        self.form.cancel_edit();
    }

    pub fn view(&self) -> &LedgerView {
        &self.view
    }

    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    pub fn form(&self) -> &FormController<C> {
        &self.form
    }

    pub fn fields(&self) -> &FormFields {
        self.form.fields()
    }

    pub fn fields_mut(&mut self) -> &mut FormFields {
        self.form.fields_mut()
    }

    /// Pending blocking notification, if any
    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }
}
