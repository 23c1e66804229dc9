//! Per-session root state.
//!
//! One `Session` per user (or browser tab). It owns its own `FieldStore`, so
//! sessions never see each other's data; dropping the session discards
//! everything that was not submitted.

use std::fmt;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::catalog::OptionCatalog;
use crate::core::effects::Effect;
use crate::core::intent::Intent;
use crate::core::reducer::reduce;
use crate::core::view::SessionView;
use crate::error::IntakeError;
use crate::groups::{SubcategoryCount, expand};
use crate::record::SubmissionRecord;
use crate::steps::{Step, StepController};
use crate::store::FieldStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) store: FieldStore,
    pub(crate) steps: StepController,
    pub(crate) catalog: OptionCatalog,
    /// Last rejection, shown until the next successful intent.
    pub(crate) message: Option<String>,
    pub(crate) submitted: Option<SubmissionRecord>,
}

impl Session {
    pub fn new(catalog: OptionCatalog) -> Self {
        let mut store = FieldStore::new();
        // a fresh session shows the default single group, ready to fill
        let count = SubcategoryCount::current(&store);
        expand(&mut store, count);
        Self {
            id: SessionId::generate(),
            store,
            steps: StepController::new(),
            catalog,
            message: None,
            submitted: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn step(&self) -> Step {
        self.steps.current()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The record handed to the sink, once submitted.
    pub fn submitted(&self) -> Option<&SubmissionRecord> {
        self.submitted.as_ref()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted.is_some()
    }

    /// Apply one inbound event.
    ///
    /// Rejections are returned as structured errors and remembered as the
    /// message of the next view; the session is unchanged in that case.
    pub fn apply(&mut self, intent: Intent) -> Result<Vec<Effect>, IntakeError> {
        match reduce(self, intent) {
            Ok(effects) => {
                self.message = None;
                Ok(effects)
            }
            Err(e) => {
                warn!(session = %self.id, error = %e, "intent rejected");
                self.message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Outbound snapshot for re-rendering.
    pub fn view(&self) -> SessionView {
        SessionView::of(self)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(OptionCatalog::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKey, FieldValue};
    use crate::groups::active_groups;

    #[test]
    fn new_session_starts_at_background_with_one_group() {
        let s = Session::default();
        assert_eq!(s.step(), Step::Background);
        assert_eq!(active_groups(s.store()).len(), 1);
        assert!(!s.is_submitted());
        assert!(s.message().is_none());
    }

    #[test]
    fn sessions_are_isolated() {
        let mut a = Session::default();
        let b = Session::default();
        a.apply(Intent::set(FieldKey::ClientName, FieldValue::text("Acme")))
            .unwrap();
        assert_eq!(b.store().text(&FieldKey::ClientName), "");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn rejection_is_remembered_until_next_success() {
        let mut s = Session::default();
        assert!(s.apply(Intent::Advance).is_err());
        assert!(s.message().unwrap().contains("Client Name"));
        s.apply(Intent::set(FieldKey::ClientName, FieldValue::text("Acme")))
            .unwrap();
        assert!(s.message().is_none());
    }
}
