//! Submission assembly.
//!
//! Reads the store once at Review and builds the complete record, or fails
//! with every missing requirement. Required input is re-checked here even
//! though the step gates already enforce it, since Review can be reached
//! through paths that bypass them (restored sessions, direct navigation).

use tracing::debug;

use crate::error::{IntakeError, ValidationError};
use crate::field::FieldKey;
use crate::groups::{GroupContext, SubcategoryCount, active_groups};
use crate::record::{StudySettings, SubcategoryDetail, SubmissionRecord, YesNo};
use crate::steps::Step;
use crate::store::FieldStore;

/// Build the record. Only callable while the session is at `Step::Review`.
pub fn assemble(store: &FieldStore, current: Step) -> Result<SubmissionRecord, IntakeError> {
    if current != Step::Review {
        return Err(IntakeError::NotAtReview { current });
    }
    check(store)?;
    let record = build(store);
    debug!(
        client = %record.client_name,
        subcategories = record.num_subcategories,
        "submission assembled"
    );
    Ok(record)
}

/// All requirements of the gated steps, reported together.
pub fn check(store: &FieldStore) -> Result<(), ValidationError> {
    let issues: Vec<_> = [Step::Background, Step::CategoryDetails]
        .into_iter()
        .filter_map(|step| step.validate(store).err())
        .flat_map(|e| e.issues)
        .collect();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(Step::Review, issues))
    }
}

fn build(store: &FieldStore) -> SubmissionRecord {
    let count = SubcategoryCount::current(store);
    let text = |key: FieldKey| store.text(&key).to_string();
    let choice = |key: FieldKey| store.choice(&key).unwrap_or_default().to_string();
    let choices = |key: FieldKey| store.choices(&key).to_vec();

    SubmissionRecord {
        email: text(FieldKey::Email),
        client_name: text(FieldKey::ClientName),
        region: choice(FieldKey::Region),
        macro_category: choice(FieldKey::MacroCategory),
        num_subcategories: count.get(),
        overall_category_name: (count.get() > 1).then(|| text(FieldKey::OverallCategoryName)),
        subcategory_details: active_groups(store)
            .iter()
            .map(|g| detail(store, g))
            .collect(),
        study_settings: StudySettings {
            hispanic_screener: store
                .choice(&FieldKey::HispanicScreener)
                .and_then(|s| s.parse::<YesNo>().ok()),
            included_channels: choices(FieldKey::IncludedChannels),
            special_sections: choices(FieldKey::SpecialSections),
            special_topics: choices(FieldKey::SpecialTopics),
            other_business_questions: text(FieldKey::OtherQuestions),
            ai_suggestion_level: store.integer(&FieldKey::AiSuggestions).clamp(1, 5) as u8,
        },
    }
}

fn detail(store: &FieldStore, group: &GroupContext) -> SubcategoryDetail {
    SubcategoryDetail {
        name: group.name(store).to_string(),
        sample_size: group.sample_size(store).to_string(),
        qualifiers: group.qualifiers().values(store),
        attributes: group.attributes().values(store),
    }
}
