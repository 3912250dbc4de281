//! Form-mode state machine for the contact page.
//!
//! # Responsibility
//! - Validate form input and route submits to add or update.
//! - Keep the card list, persisted list and banners consistent per event.
//!
//! # Invariants
//! - Mode returns to `Adding` after every successful submit or cancel.
//! - Rejected input changes neither mode, storage nor cards.
//! - Store failures leave the mode unchanged and surface a danger banner.

use crate::kv::KeyValueStore;
use crate::model::record::{Record, RecordValidationError};
use crate::store::record_store::{RecordStore, StoreError};
use crate::ui::view::{CardId, Presentation, Severity};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MSG_USER_ADDED: &str = "User added";
pub const MSG_USER_UPDATED: &str = "User updated";
pub const MSG_USER_DELETED: &str = "User deleted";
pub const MSG_FILL_ALL_FIELDS: &str = "Please fill in all fields";

/// What a form submit currently does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Adding,
    /// Editing the record that had `original_email` when Edit was clicked.
    Editing { original_email: String },
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adding => "adding",
            Self::Editing { .. } => "editing",
        }
    }
}

/// Result of a form submit that did not hit a store failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added,
    /// Number of persisted records rewritten; 0 when the original vanished.
    Updated(usize),
    Rejected(RecordValidationError),
}

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Controller-level failure.
#[derive(Debug)]
pub enum ControllerError {
    Store(StoreError),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ControllerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Wires user events to a record store and a presentation.
pub struct Controller<K: KeyValueStore, P: Presentation> {
    store: RecordStore<K>,
    view: P,
    mode: Mode,
}

impl<K: KeyValueStore, P: Presentation> Controller<K, P> {
    /// Creates a controller in `Mode::Adding`.
    pub fn new(store: RecordStore<K>, view: P) -> Self {
        Self {
            store,
            view,
            mode: Mode::Adding,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn store(&self) -> &RecordStore<K> {
        &self.store
    }

    pub fn view(&self) -> &P {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut P {
        &mut self.view
    }

    /// Page load: renders every persisted record.
    pub fn load(&mut self) -> ControllerResult<usize> {
        let records = match self.store.list() {
            Ok(records) => records,
            Err(err) => return Err(self.fail("load", err)),
        };
        self.view.render_all(&records);
        info!(
            "event=page_load module=controller status=ok cards={}",
            records.len()
        );
        Ok(records.len())
    }

    /// Form submit with the current input values.
    pub fn submit(&mut self, name: &str, email: &str) -> ControllerResult<SubmitOutcome> {
        let record = match Record::try_new(name, email) {
            Ok(record) => record,
            Err(err) => {
                self.view.notify(MSG_FILL_ALL_FIELDS, Severity::Danger);
                debug!(
                    "event=submit module=controller status=rejected mode={} reason={:?}",
                    self.mode.as_str(),
                    err
                );
                return Ok(SubmitOutcome::Rejected(err));
            }
        };

        match self.mode.clone() {
            Mode::Adding => self.submit_add(record),
            Mode::Editing { original_email } => self.submit_update(&original_email, record),
        }
    }

    /// Edit control on card `card`: loads its record into the form.
    ///
    /// Returns `false` and changes nothing when the card is gone.
    pub fn begin_edit(&mut self, card: CardId) -> bool {
        let Some(record) = self.view.card_record(card) else {
            debug!("event=edit_begin module=controller status=skipped reason=unknown_card");
            return false;
        };
        self.view.enter_edit_mode(&record);
        self.mode = Mode::Editing {
            original_email: record.email,
        };
        debug!("event=edit_begin module=controller status=ok");
        true
    }

    /// Delete control on card `card`; valid in any mode.
    ///
    /// The store drops every record sharing the card's email, so every card
    /// showing that email goes too. Returns how many persisted records were
    /// removed; an unknown card removes nothing.
    pub fn delete(&mut self, card: CardId) -> ControllerResult<usize> {
        let Some(record) = self.view.card_record(card) else {
            debug!("event=delete module=controller status=skipped reason=unknown_card");
            return Ok(0);
        };
        self.view.remove_cards_for(&record.email);
        let removed = match self.store.remove(&record.email) {
            Ok(removed) => removed,
            Err(err) => return Err(self.fail("delete", err)),
        };
        self.view.notify(MSG_USER_DELETED, Severity::Success);
        Ok(removed)
    }

    /// Primary add button: abandons an edit and clears the form.
    pub fn cancel(&mut self) {
        if matches!(self.mode, Mode::Editing { .. }) {
            self.view.exit_edit_mode();
            self.mode = Mode::Adding;
            debug!("event=edit_cancel module=controller status=ok");
        }
        self.view.clear_form();
    }

    fn submit_add(&mut self, record: Record) -> ControllerResult<SubmitOutcome> {
        let card = self.view.render_one(&record);
        if let Err(err) = self.store.add(record) {
            self.view.remove_card(card);
            return Err(self.fail("submit_add", err));
        }

        self.view.notify(MSG_USER_ADDED, Severity::Success);
        self.view.clear_form();
        Ok(SubmitOutcome::Added)
    }

    fn submit_update(
        &mut self,
        original_email: &str,
        record: Record,
    ) -> ControllerResult<SubmitOutcome> {
        let updated = match self
            .store
            .update(original_email, &record.name, &record.email)
        {
            Ok(updated) => updated,
            Err(err) => return Err(self.fail("submit_update", err)),
        };
        let records = match self.store.list() {
            Ok(records) => records,
            Err(err) => return Err(self.fail("submit_update", err)),
        };

        self.view.render_all(&records);
        self.view.notify(MSG_USER_UPDATED, Severity::Info);
        self.view.clear_form();
        self.view.exit_edit_mode();
        self.mode = Mode::Adding;
        Ok(SubmitOutcome::Updated(updated))
    }

    fn fail(&mut self, operation: &'static str, err: StoreError) -> ControllerError {
        error!(
            "event={} module=controller status=error mode={} error={}",
            operation,
            self.mode.as_str(),
            err
        );
        self.view
            .notify(&format!("Storage error: {err}"), Severity::Danger);
        ControllerError::Store(err)
    }
}
