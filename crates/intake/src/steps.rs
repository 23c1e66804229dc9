//! Step sequencing.
//!
//! Four fixed steps, walked in order. `advance` is gated on the current step's
//! predicate; `retreat` never is. Steps hold no data of their own, so going
//! back and forth re-reads everything from the store.

use serde::Serialize;
use strum::{Display, EnumIter, FromRepr};
use tracing::{debug, info};

use crate::error::{IntakeError, Issue, ValidationError};
use crate::field::FieldKey;
use crate::groups::active_groups;
use crate::store::FieldStore;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Display,
    EnumIter,
    FromRepr,
    Serialize,
)]
#[repr(u8)]
pub enum Step {
    #[default]
    Background = 0,
    CategoryDetails = 1,
    StudySettings = 2,
    Review = 3,
}

impl Step {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Step> {
        Step::from_repr(self as u8 + 1)
    }

    pub fn prev(self) -> Option<Step> {
        (self as u8).checked_sub(1).and_then(Step::from_repr)
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Background => "General Project Background",
            Step::CategoryDetails => "Subcategory Information",
            Step::StudySettings => "Study Settings",
            Step::Review => "Review and Submit",
        }
    }

    /// Label of the forward action shown on this step.
    pub fn next_label(self) -> &'static str {
        match self {
            Step::Background => "Next: Category Details",
            Step::CategoryDetails => "Next: Study Settings",
            Step::StudySettings => "Next: Review & Submit",
            Step::Review => "Submit Form",
        }
    }

    pub fn back_label(self) -> Option<&'static str> {
        match self {
            Step::Background => None,
            Step::CategoryDetails => Some("Back: Project Background"),
            Step::StudySettings => Some("Back: Category Details"),
            Step::Review => Some("Back: Study Settings"),
        }
    }

    /// Gate for leaving this step forwards.
    pub fn validate(self, store: &FieldStore) -> Result<(), ValidationError> {
        let issues = match self {
            Step::Background => background_issues(store),
            Step::CategoryDetails => category_issues(store),
            Step::StudySettings | Step::Review => Vec::new(),
        };
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self, issues))
        }
    }
}

fn background_issues(store: &FieldStore) -> Vec<Issue> {
    let mut issues = Vec::new();
    if store.text(&FieldKey::ClientName).trim().is_empty() {
        issues.push(Issue::MissingField(FieldKey::ClientName));
    }
    let region = store.choice(&FieldKey::Region).unwrap_or("");
    if region.trim().is_empty() {
        issues.push(Issue::MissingField(FieldKey::Region));
    }
    issues
}

fn category_issues(store: &FieldStore) -> Vec<Issue> {
    active_groups(store)
        .into_iter()
        .filter(|g| g.name(store).trim().is_empty())
        .map(|g| Issue::UnnamedSubcategory(g.index()))
        .collect()
}

/// Current-step holder.
#[derive(Debug, Clone, Default)]
pub struct StepController {
    current: Step,
}

impl StepController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Step {
        self.current
    }

    /// Why `advance` would be refused right now, if it would be.
    pub fn blocking_reason(&self, store: &FieldStore) -> Option<ValidationError> {
        self.current.validate(store).err()
    }

    pub fn can_advance(&self, store: &FieldStore) -> bool {
        !self.current.is_terminal() && self.blocking_reason(store).is_none()
    }

    pub fn advance(&mut self, store: &FieldStore) -> Result<Step, IntakeError> {
        let next = self.current.next().ok_or(IntakeError::NoNextStep(self.current))?;
        if let Err(e) = self.current.validate(store) {
            debug!(step = %self.current, reason = %e, "advance withheld");
            return Err(e.into());
        }
        info!(from = %self.current, to = %next, "step advanced");
        self.current = next;
        Ok(next)
    }

    pub fn retreat(&mut self) -> Result<Step, IntakeError> {
        let prev = self
            .current
            .prev()
            .ok_or(IntakeError::NoPreviousStep(self.current))?;
        info!(from = %self.current, to = %prev, "step retreated");
        self.current = prev;
        Ok(prev)
    }
}
