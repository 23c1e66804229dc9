//! Core of the multi-step client intake questionnaire.
//!
//! The crate holds the form state and the rules of the flow; rendering is left
//! to whatever front end drives a [`Session`](crate::core::Session) with [`Intent`](crate::core::Intent)s and
//! re-renders from its [`SessionView`](crate::core::SessionView).
//!
//! - `store`     : flat key → value table, one per session
//! - `list`      : add/remove/edit for variable-length text lists
//! - `groups`    : per-subcategory field groups, expanded from the count
//! - `steps`     : the four-step sequence and its gates
//! - `assembler` : builds the `SubmissionRecord` at Review
//! - `catalog`   : option lists for the choice fields
//! - `core`      : session runtime (intents, reducer, effects, view)

pub mod assembler;
pub mod catalog;
pub mod core;
pub mod error;
pub mod field;
pub mod groups;
pub mod list;
pub mod record;
pub mod steps;
pub mod store;

pub use catalog::OptionCatalog;
pub use error::{IntakeError, Issue, SinkError, ValidationError};
pub use field::{FieldKey, FieldKind, FieldValue, GroupField, GroupIndex, ItemId, ListKey, ListKind};
pub use record::SubmissionRecord;
pub use steps::Step;
pub use store::FieldStore;
