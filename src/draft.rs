//! Draft state for the agreement form
//!
//! A draft is the in-memory record of the volunteer-entered field values for
//! the agreement being viewed. There is exactly one draft per store, it is
//! never persisted, and the only writer is [`DraftStore::update`]. Readers
//! receive clones so nothing outside the store can mutate shared state.

use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Suffix appended to the underscored name to form the digital signature
pub const SIGNATURE_SUFFIX: &str = "_Accepted";

/// Marker displayed in the signature slot while the name field is empty
pub const PENDING_SIGNATURE: &str = "(Pending Signature)";

/// Wire format produced by date-picking inputs
const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

type OnChangeHandler = Arc<dyn Fn(&AgreementDraft) + Send + Sync>;

/// The three editable fields of an agreement draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Email,
    Date,
}

/// Volunteer-entered values for the agreement
///
/// All text is accepted verbatim; an empty `name` means the agreement is
/// unsigned. `date` defaults to the current local date at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementDraft {
    /// Volunteer full name; empty means "unsigned"
    pub name: String,
    /// Volunteer email address, unvalidated
    pub email: String,
    /// Signature date for the volunteer block
    pub date: NaiveDate,
}

impl Default for AgreementDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            date: Local::now().date_naive(),
        }
    }
}

impl AgreementDraft {
    /// Derived digital-signature text, or `None` while the draft is unsigned.
    ///
    /// Whitespace runs in the name are collapsed to single underscores and the
    /// fixed acceptance suffix is appended, e.g. `Jane Doe` becomes
    /// `Jane_Doe_Accepted`.
    pub fn signature_text(&self) -> Option<String> {
        if self.name.is_empty() {
            return None;
        }
        Some(format!("{}{}", underscore_name(&self.name), SIGNATURE_SUFFIX))
    }
}

/// Collapse every whitespace run in `name` to a single underscore.
///
/// Shared by the signature text and the export filename so the two never
/// disagree on how a name is flattened.
pub fn underscore_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

/// Load a prepared draft from a JSON file.
///
/// Loading is a convenience for seeding the form; drafts are never written
/// back.
pub fn load_draft(path: &Path) -> Result<AgreementDraft> {
    let data = std::fs::read_to_string(path)?;
    serde_json::from_str(&data)
        .map_err(|e| Error::ConfigError(format!("Invalid draft file {}: {}", path.display(), e)))
}

/// Owner of the single agreement draft
///
/// `update` replaces exactly one scalar and then fires the registered change
/// handler synchronously with a snapshot, so the rendered document always
/// reflects the latest edit before the next event is processed.
#[derive(Default)]
pub struct DraftStore {
    draft: AgreementDraft,
    on_change: Option<OnChangeHandler>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with an existing draft (e.g. loaded from JSON)
    pub fn with_draft(draft: AgreementDraft) -> Self {
        Self {
            draft,
            on_change: None,
        }
    }

    /// Replace exactly one field, leaving the others untouched.
    ///
    /// Name and email accept any text. A date value is parsed in the
    /// `%Y-%m-%d` wire format of date inputs; a value that does not parse
    /// leaves the stored date unchanged, since a date-picking input cannot
    /// emit malformed values and the store has no error conditions.
    pub fn update(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::Name => self.draft.name = value.to_string(),
            DraftField::Email => self.draft.email = value.to_string(),
            DraftField::Date => {
                if let Ok(date) = NaiveDate::parse_from_str(value, DATE_INPUT_FORMAT) {
                    self.draft.date = date;
                }
            }
        }

        if let Some(cb) = &self.on_change {
            cb(&self.draft);
        }
    }

    /// Current full draft snapshot
    pub fn snapshot(&self) -> AgreementDraft {
        self.draft.clone()
    }

    /// Register a callback invoked synchronously after every update.
    /// The callback receives the updated draft.
    pub fn on_change<F>(&mut self, cb: F)
    where
        F: Fn(&AgreementDraft) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(cb));
    }

    /// Remove a previously registered change callback if any
    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn update_round_trips_each_field() {
        let mut store = DraftStore::new();
        store.update(DraftField::Name, "Jane Doe");
        store.update(DraftField::Email, "jane@example.com");
        store.update(DraftField::Date, "2025-06-01");

        let snap = store.snapshot();
        assert_eq!(snap.name, "Jane Doe");
        assert_eq!(snap.email, "jane@example.com");
        assert_eq!(snap.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn update_touches_only_the_named_field() {
        let mut store = DraftStore::new();
        store.update(DraftField::Name, "Jane Doe");
        let before = store.snapshot();

        store.update(DraftField::Email, "jane@example.com");
        let after = store.snapshot();
        assert_eq!(after.name, before.name);
        assert_eq!(after.date, before.date);
    }

    #[test]
    fn unparseable_date_leaves_date_unchanged() {
        let mut store = DraftStore::new();
        store.update(DraftField::Date, "2025-06-01");
        store.update(DraftField::Date, "not a date");
        assert_eq!(
            store.snapshot().date,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
    }

    #[test]
    fn change_callback_fires_synchronously_with_snapshot() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let mut store = DraftStore::new();
        store.on_change(move |draft| {
            seen_clone.lock().unwrap().push(draft.name.clone());
        });

        store.update(DraftField::Name, "A");
        store.update(DraftField::Name, "B");
        assert_eq!(*seen.lock().unwrap(), vec!["A".to_string(), "B".to_string()]);

        store.clear_on_change();
        store.update(DraftField::Name, "C");
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn snapshot_is_independent_of_later_updates() {
        let mut store = DraftStore::new();
        store.update(DraftField::Name, "Jane");
        let snap = store.snapshot();
        store.update(DraftField::Name, "Joan");
        assert_eq!(snap.name, "Jane");
    }

    #[test]
    fn signature_text_collapses_whitespace_runs() {
        let mut draft = AgreementDraft::default();
        draft.name = "Jane Doe".to_string();
        assert_eq!(draft.signature_text().as_deref(), Some("Jane_Doe_Accepted"));

        draft.name = "Jane\t  van  Doe".to_string();
        assert_eq!(
            draft.signature_text().as_deref(),
            Some("Jane_van_Doe_Accepted")
        );
    }

    #[test]
    fn empty_name_has_no_signature() {
        let draft = AgreementDraft::default();
        assert!(draft.signature_text().is_none());
    }

    #[test]
    fn default_date_is_today() {
        let draft = AgreementDraft::default();
        assert_eq!(draft.date, Local::now().date_naive());
    }

    #[test]
    fn draft_json_round_trip() {
        let mut draft = AgreementDraft::default();
        draft.name = "Jane Doe".to_string();
        draft.email = "jane@example.com".to_string();
        draft.date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let json = serde_json::to_string(&draft).unwrap();
        let parsed: AgreementDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, draft);
    }
}
