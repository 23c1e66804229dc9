use std::fmt;

use thiserror::Error;

use crate::field::{FieldKey, FieldKind, GroupIndex, ItemId, ListKey};
use crate::steps::Step;

/// Every failure the intake core can report.
///
/// All of them are user-correctable input problems; none leaves the session
/// in a partially updated state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("the form has already been submitted")]
    AlreadySubmitted,

    #[error("the submission can only be assembled at Review (current step: {current})")]
    NotAtReview { current: Step },

    #[error("there is no step after {0}; submit the form instead")]
    NoNextStep(Step),

    #[error("there is no step before {0}")]
    NoPreviousStep(Step),

    #[error("unknown item {item} in {list}")]
    UnknownItem { list: ListKey, item: ItemId },

    #[error("{list} must keep at least one item")]
    LastItem { list: ListKey },

    #[error("{key} expects a {expected} value, got {found}")]
    WrongKind {
        key: String,
        expected: FieldKind,
        found: String,
    },

    #[error("{value:?} is not an option for {key}")]
    UnknownOption { key: FieldKey, value: String },

    #[error("{key} must be between {min} and {max}, got {value}")]
    OutOfRange {
        key: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("invalid field key: {0:?}")]
    InvalidKey(String),

    #[error("invalid script: {0}")]
    InvalidScript(String),
}

impl IntakeError {
    /// Validation failures are expected during normal form filling; the rest
    /// point at a misbehaving caller.
    pub fn is_validation(&self) -> bool {
        matches!(self, IntakeError::Validation(_))
    }
}

/// One unmet requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingField(FieldKey),
    UnnamedSubcategory(GroupIndex),
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::MissingField(key) => write!(f, "{} is required", key.label()),
            Issue::UnnamedSubcategory(index) => write!(
                f,
                "Please enter a name for Category {} before proceeding",
                index.ordinal()
            ),
        }
    }
}

/// A gated transition (or the assembler) found missing input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub step: Step,
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(step: Step, issues: Vec<Issue>) -> Self {
        Self { step, issues }
    }

    /// The reason surfaced first to the user.
    pub fn first(&self) -> Option<&Issue> {
        self.issues.first()
    }

    pub fn missing_fields(&self) -> impl Iterator<Item = &FieldKey> {
        self.issues.iter().filter_map(|i| match i {
            Issue::MissingField(k) => Some(k),
            _ => None,
        })
    }

    pub fn unnamed_subcategories(&self) -> impl Iterator<Item = GroupIndex> + '_ {
        self.issues.iter().filter_map(|i| match i {
            Issue::UnnamedSubcategory(g) => Some(*g),
            _ => None,
        })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        write!(f, "{}: {}", self.step.title(), parts.join("; "))
    }
}

/// Failures of a submission sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
