//! Reducer: `(Session, Intent) -> Result<Vec<Effect>, IntakeError>`.
//!
//! Policy:
//!   - Side-effect free; delivery is only *described* via `Effect::Deliver`.
//!   - A rejected intent changes nothing.
//!   - Writes are checked against the key's kind and the option catalog here,
//!     so the store itself can stay total.
//!   - Writing `num_subcategories` runs the group expander (hidden groups stay
//!     dormant).
//!   - After a successful submit the data is sealed: mutating intents are
//!     rejected with `AlreadySubmitted`, navigation keeps working, and a second
//!     submit delivers nothing.

use tracing::{debug, info};

use crate::assembler::assemble;
use crate::core::effects::Effect;
use crate::core::intent::Intent;
use crate::core::state::Session;
use crate::error::IntakeError;
use crate::field::{FieldKey, FieldKind, FieldValue};
use crate::groups::{GroupContext, SubcategoryCount, expand};
use crate::list::DynamicList;

pub fn reduce(session: &mut Session, intent: Intent) -> Result<Vec<Effect>, IntakeError> {
    debug!(session = %session.id, intent = intent.label(), "reduce");

    if intent.mutates_data() && session.is_submitted() {
        return Err(IntakeError::AlreadySubmitted);
    }

    match intent {
        Intent::SetField { key, value } => {
            set_field(session, key, value)?;
            Ok(Vec::new())
        }
        Intent::ClearField { key } => {
            writable(&key)?;
            if key == FieldKey::NumSubcategories {
                expand(&mut session.store, SubcategoryCount::new(1)?);
            } else {
                session.store.clear(&key);
            }
            Ok(Vec::new())
        }
        Intent::AppendItem { list } => {
            let id = DynamicList::new(list).append(&mut session.store);
            Ok(vec![Effect::log(format!("{list}: item {id} added"))])
        }
        Intent::RemoveItem { list, item } => {
            DynamicList::new(list).remove(&mut session.store, item)?;
            Ok(Vec::new())
        }
        Intent::EditItem { list, item, text } => {
            DynamicList::new(list).edit(&mut session.store, item, text)?;
            Ok(Vec::new())
        }
        Intent::ReplaceList { list, items } => {
            DynamicList::new(list).replace(&mut session.store, items);
            Ok(Vec::new())
        }
        Intent::SetExpanded { group, expanded } => {
            GroupContext::new(group).set_expanded(&mut session.store, expanded);
            Ok(Vec::new())
        }
        Intent::Advance => {
            session.steps.advance(&session.store)?;
            Ok(Vec::new())
        }
        Intent::Retreat => {
            session.steps.retreat()?;
            Ok(Vec::new())
        }
        Intent::Submit => submit(session),
    }
}

fn set_field(session: &mut Session, key: FieldKey, value: FieldValue) -> Result<(), IntakeError> {
    writable(&key)?;
    if value.kind() != key.kind() {
        return Err(IntakeError::WrongKind {
            key: key.to_string(),
            expected: key.kind(),
            found: value.kind().to_string(),
        });
    }
    session.catalog.check(&key, &value)?;

    match (key, value) {
        (FieldKey::NumSubcategories, FieldValue::Integer(n)) => {
            expand(&mut session.store, SubcategoryCount::try_from(n)?);
        }
        (key, value) => session.store.set(key, value),
    }
    Ok(())
}

/// Keys that only the runtime itself may write.
fn writable(key: &FieldKey) -> Result<(), IntakeError> {
    let managed = matches!(key, FieldKey::Submitted | FieldKey::ListItem { .. })
        || key.kind() == FieldKind::List;
    if managed {
        return Err(IntakeError::InvalidKey(format!(
            "{key} is managed by the form and cannot be written directly"
        )));
    }
    Ok(())
}

fn submit(session: &mut Session) -> Result<Vec<Effect>, IntakeError> {
    if session.submitted.is_some() {
        info!(session = %session.id, "submit repeated; record already delivered");
        return Ok(vec![Effect::log("submission already delivered")]);
    }

    let record = assemble(&session.store, session.steps.current())?;
    session.store.set(FieldKey::Submitted, FieldValue::Flag(true));
    session.submitted = Some(record.clone());
    info!(session = %session.id, client = %record.client_name, "form submitted");

    Ok(vec![Effect::Deliver {
        session: session.id,
        record,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{GroupField, GroupIndex, ListKey, ListKind};
    use crate::groups::active_groups;
    use crate::steps::Step;
    use pretty_assertions::assert_eq;

    fn g(i: u8) -> GroupIndex {
        GroupIndex::new(i).unwrap()
    }

    fn at_review() -> Session {
        let mut s = Session::default();
        s.apply(Intent::set(FieldKey::ClientName, FieldValue::text("Acme")))
            .unwrap();
        s.apply(Intent::set(FieldKey::Region, FieldValue::choice("USA")))
            .unwrap();
        s.apply(Intent::Advance).unwrap();
        s.apply(Intent::set(
            FieldKey::group(g(0), GroupField::Name),
            FieldValue::text("Butter"),
        ))
        .unwrap();
        s.apply(Intent::Advance).unwrap();
        s.apply(Intent::Advance).unwrap();
        assert_eq!(s.step(), Step::Review);
        s
    }

    #[test]
    fn submit_delivers_once() {
        let mut s = at_review();
        let effects = s.apply(Intent::Submit).unwrap();
        assert!(matches!(effects.as_slice(), [Effect::Deliver { .. }]));
        assert!(s.store().flag(&FieldKey::Submitted));
        let first = s.submitted().cloned().unwrap();

        let again = s.apply(Intent::Submit).unwrap();
        assert!(again.iter().all(|e| !matches!(e, Effect::Deliver { .. })));
        assert_eq!(s.submitted(), Some(&first));
    }

    #[test]
    fn submit_outside_review_is_rejected() {
        let mut s = Session::default();
        assert_eq!(
            s.apply(Intent::Submit),
            Err(IntakeError::NotAtReview {
                current: Step::Background
            })
        );
        assert!(!s.is_submitted());
    }

    #[test]
    fn submitted_session_is_sealed_but_navigable() {
        let mut s = at_review();
        s.apply(Intent::Submit).unwrap();
        assert_eq!(
            s.apply(Intent::set(FieldKey::ClientName, FieldValue::text("Other"))),
            Err(IntakeError::AlreadySubmitted)
        );
        assert_eq!(s.store().text(&FieldKey::ClientName), "Acme");
        assert_eq!(s.apply(Intent::Retreat).unwrap(), Vec::new());
        assert_eq!(s.step(), Step::StudySettings);
    }

    #[test]
    fn groups_can_collapse_after_submit() {
        let mut s = at_review();
        s.apply(Intent::Submit).unwrap();
        let record = s.submitted().cloned().unwrap();

        s.apply(Intent::SetExpanded {
            group: g(0),
            expanded: false,
        })
        .unwrap();
        assert!(!GroupContext::new(g(0)).is_expanded(s.store()));
        assert_eq!(s.submitted(), Some(&record));
    }

    #[test]
    fn count_change_runs_expander() {
        let mut s = Session::default();
        s.apply(Intent::set(FieldKey::NumSubcategories, FieldValue::Integer(3)))
            .unwrap();
        assert_eq!(active_groups(s.store()).len(), 3);
        assert!(s
            .apply(Intent::set(FieldKey::NumSubcategories, FieldValue::Integer(5)))
            .is_err());
        assert_eq!(active_groups(s.store()).len(), 3);

        s.apply(Intent::ClearField {
            key: FieldKey::NumSubcategories,
        })
        .unwrap();
        assert_eq!(active_groups(s.store()).len(), 1);
    }

    #[test]
    fn catalog_and_kind_checks_leave_store_untouched() {
        let mut s = Session::default();
        assert!(matches!(
            s.apply(Intent::set(FieldKey::Region, FieldValue::choice("Atlantis"))),
            Err(IntakeError::UnknownOption { .. })
        ));
        assert!(matches!(
            s.apply(Intent::set(FieldKey::Region, FieldValue::text("USA"))),
            Err(IntakeError::WrongKind { .. })
        ));
        assert_eq!(s.store().choice(&FieldKey::Region), None);
    }

    #[test]
    fn managed_keys_cannot_be_written_directly() {
        let mut s = Session::default();
        let qualifiers = ListKey::new(g(0), ListKind::Qualifiers);
        assert!(matches!(
            s.apply(Intent::set(FieldKey::Submitted, FieldValue::Flag(true))),
            Err(IntakeError::InvalidKey(_))
        ));
        assert!(matches!(
            s.apply(Intent::set(qualifiers.field_key(), FieldValue::List(Vec::new()))),
            Err(IntakeError::InvalidKey(_))
        ));
        assert!(!s.is_submitted());
    }

    #[test]
    fn list_intents_round_trip_through_session() {
        let mut s = Session::default();
        let list = ListKey::new(g(0), ListKind::Qualifiers);
        let first = DynamicList::new(list).ids(s.store())[0];
        s.apply(Intent::edit(list, first, "A")).unwrap();
        s.apply(Intent::AppendItem { list }).unwrap();
        let second = *DynamicList::new(list).ids(s.store()).last().unwrap();
        s.apply(Intent::edit(list, second, "B")).unwrap();

        assert_eq!(
            s.apply(Intent::RemoveItem { list, item: first }),
            Ok(Vec::new())
        );
        assert_eq!(DynamicList::new(list).values(s.store()), vec!["B"]);
        assert_eq!(
            s.apply(Intent::RemoveItem { list, item: second }),
            Err(IntakeError::LastItem { list })
        );
    }

    #[test]
    fn expanded_flag_does_not_reach_the_record() {
        let mut s = at_review();
        s.apply(Intent::SetExpanded {
            group: g(0),
            expanded: false,
        })
        .unwrap();
        s.apply(Intent::Submit).unwrap();
        let json = serde_json::to_string(s.submitted().unwrap()).unwrap();
        assert!(!json.contains("expanded"));
    }
}
