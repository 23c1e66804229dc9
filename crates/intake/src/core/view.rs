//! Outbound snapshot handed to the rendering layer after every intent.

use serde::Serialize;

use crate::assembler::assemble;
use crate::core::state::Session;
use crate::field::FieldValue;
use crate::groups::{GroupView, active_groups};
use crate::record::SubmissionRecord;
use crate::steps::Step;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub step: Step,
    pub step_index: usize,
    pub title: &'static str,
    pub next_label: &'static str,
    pub back_label: Option<&'static str>,
    pub can_advance: bool,
    /// Last rejection, or else why the forward button is blocked.
    pub message: Option<String>,
    pub fields: Vec<(String, FieldValue)>,
    pub groups: Vec<GroupView>,
    /// Read-only record preview, present on the review step.
    pub review: Option<SubmissionRecord>,
    pub submitted: bool,
}

impl SessionView {
    pub fn of(session: &Session) -> Self {
        let store = session.store();
        let step = session.step();
        let blocking = session.steps.blocking_reason(store);

        let message = session
            .message()
            .map(str::to_owned)
            .or_else(|| blocking.as_ref().and_then(|e| e.first()).map(|i| i.to_string()));

        let review = match (step, session.submitted()) {
            (_, Some(record)) => Some(record.clone()),
            (Step::Review, None) => assemble(store, step).ok(),
            _ => None,
        };

        Self {
            step,
            step_index: step.index(),
            title: step.title(),
            next_label: step.next_label(),
            back_label: step.back_label(),
            can_advance: !step.is_terminal() && blocking.is_none(),
            message,
            fields: store
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            groups: active_groups(store)
                .iter()
                .map(|g| g.view(store))
                .collect(),
            review,
            submitted: session.is_submitted(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Intent;
    use crate::field::{FieldKey, GroupField, GroupIndex};
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_view_explains_blocked_advance() {
        let view = Session::default().view();
        assert_eq!(view.step, Step::Background);
        assert_eq!(view.next_label, "Next: Category Details");
        assert_eq!(view.back_label, None);
        assert!(!view.can_advance);
        assert_eq!(view.message.as_deref(), Some("Client Name is required"));
        assert_eq!(view.groups.len(), 1);
        assert!(view.review.is_none());
    }

    #[test]
    fn review_step_carries_preview() {
        let mut s = Session::default();
        s.apply(Intent::set(FieldKey::ClientName, FieldValue::text("Acme")))
            .unwrap();
        s.apply(Intent::set(FieldKey::Region, FieldValue::choice("USA")))
            .unwrap();
        s.apply(Intent::Advance).unwrap();
        s.apply(Intent::set(
            FieldKey::group(GroupIndex::new(0).unwrap(), GroupField::Name),
            FieldValue::text("Butter"),
        ))
        .unwrap();
        s.apply(Intent::Advance).unwrap();
        s.apply(Intent::Advance).unwrap();

        let view = s.view();
        assert_eq!(view.step, Step::Review);
        assert_eq!(view.next_label, "Submit Form");
        let preview = view.review.expect("preview at review");
        assert_eq!(preview.subcategory_details[0].name, "Butter");
        assert!(!view.submitted);
    }
}
