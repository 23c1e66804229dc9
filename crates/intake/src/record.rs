//! Submission record: the compatibility boundary with downstream sinks.
//!
//! Field names and nesting are part of the external contract (email/storage
//! consumers parse this JSON); do not rename or reorder.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub email: String,
    pub client_name: String,
    pub region: String,
    pub macro_category: String,
    pub num_subcategories: u8,
    /// Only emitted when more than one subcategory is studied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_category_name: Option<String>,
    pub subcategory_details: Vec<SubcategoryDetail>,
    pub study_settings: StudySettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryDetail {
    pub name: String,
    pub sample_size: String,
    pub qualifiers: Vec<String>,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySettings {
    pub hispanic_screener: Option<YesNo>,
    pub included_channels: Vec<String>,
    pub special_sections: Vec<String>,
    pub special_topics: Vec<String>,
    pub other_business_questions: String,
    pub ai_suggestion_level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString)]
pub enum YesNo {
    Yes,
    No,
}

impl SubmissionRecord {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
