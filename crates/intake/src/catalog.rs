//! Option lists offered by the choice widgets.
//!
//! Pure configuration data. The built-in defaults are the lists the intake
//! team ships with; deployments can override any of them through the config
//! file (`catalog.regions = [...]` etc.). The screener answers are fixed to
//! `YesNo`, since the record carries them as that enum.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::IntakeError;
use crate::field::{FieldKey, FieldValue};
use crate::record::YesNo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionCatalog {
    pub regions: Vec<String>,
    pub macro_categories: Vec<String>,
    pub channels: Vec<String>,
    pub special_sections: Vec<String>,
    pub special_topics: Vec<String>,
    #[serde(skip_deserializing)]
    screener_answers: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for OptionCatalog {
    fn default() -> Self {
        Self {
            regions: owned(&["USA", "Canada", "Mexico", "UK"]),
            macro_categories: owned(&[
                "OTC & Wellness",
                "Personal Care & Beauty",
                "Food Storage",
                "Packaged Food & Drink",
                "Pet",
                "Cleaning",
            ]),
            channels: owned(&[
                "Asian/Hispanic Markets",
                "Club (Costco，Sam’s Club，BJ’s)",
                "C-Store",
                "Delivery (Instacart)",
                "Dollar (Dollar General，Dollar Tree，Family Dollar)",
                "Drug (CVS，Rite Aid，Walgreen’s)",
                "Grocery",
                "Mass (Walmart，Target)",
                "Online General (Amazon)",
                "Online Grocery (Boxed，Peapod，Thrive，Freshdirect)",
                "Beauty",
                "Coffee Shops",
                "Farm & Feed",
                "Hardware",
                "Liquor",
                "Office Supply",
                "Online Pet",
                "Pet",
            ]),
            special_sections: owned(&[
                "Barriers - Question shoppers who did not purchase brand of interest in study",
                "Shopper Profile - Collect more background usage and purchase habits within the category",
                "Behavior and Attitudes - Directly ask what shoppers values in the category",
            ]),
            special_topics: owned(&[
                "Product Label Preferences – Factors attended to on product labels.",
                "Online Term Search – Understand what terms people use to shop for category online.",
                "Product Duration – How long the product is anticipated to last",
                "Skin Type Usage – Understand what skin types certain products are purchased for.",
                "Other Product Types – Understand what other product types would be purchased with certain products.",
                "Consumption Occasions – Understand what moments and occasions shoppers plan to consume their selected products.",
                "Diet or Nutrition History – Current and past adherence to various diets and nutrition plans.",
                "Medical Conditions – Profile any relevant health conditions for dietary or medical insights.",
            ]),
            screener_answers: YesNo::iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl OptionCatalog {
    /// Options for a choice key, `None` for keys that take free input.
    pub fn options_for(&self, key: &FieldKey) -> Option<&[String]> {
        let list = match key {
            FieldKey::Region => &self.regions,
            FieldKey::MacroCategory => &self.macro_categories,
            FieldKey::HispanicScreener => &self.screener_answers,
            FieldKey::IncludedChannels => &self.channels,
            FieldKey::SpecialSections => &self.special_sections,
            FieldKey::SpecialTopics => &self.special_topics,
            _ => return None,
        };
        Some(list.as_slice())
    }

    /// Reject a value the widgets could never have produced.
    pub fn check(&self, key: &FieldKey, value: &FieldValue) -> Result<(), IntakeError> {
        if let (Some((min, max)), FieldValue::Integer(n)) = (key.integer_range(), value) {
            if !(min..=max).contains(n) {
                return Err(IntakeError::OutOfRange {
                    key: key.to_string(),
                    value: *n,
                    min,
                    max,
                });
            }
        }

        let Some(options) = self.options_for(key) else {
            return Ok(());
        };
        let picked: &[String] = match value {
            FieldValue::Choice(Some(v)) => std::slice::from_ref(v),
            FieldValue::Choices(vs) => vs.as_slice(),
            _ => &[],
        };
        match picked.iter().find(|v| !options.contains(v)) {
            Some(v) => Err(IntakeError::UnknownOption {
                key: *key,
                value: v.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_shipped_lists() {
        let c = OptionCatalog::default();
        assert_eq!(c.regions.len(), 4);
        assert_eq!(c.macro_categories.len(), 6);
        assert_eq!(c.channels.len(), 18);
        assert_eq!(c.special_sections.len(), 3);
        assert_eq!(c.special_topics.len(), 8);
        assert!(c.regions.iter().any(|r| r == "USA"));
    }

    #[test]
    fn accepts_known_and_rejects_unknown_choices() {
        let c = OptionCatalog::default();
        assert!(c.check(&FieldKey::Region, &FieldValue::choice("UK")).is_ok());
        assert!(c.check(&FieldKey::Region, &FieldValue::Choice(None)).is_ok());
        assert!(matches!(
            c.check(&FieldKey::Region, &FieldValue::choice("Mars")),
            Err(IntakeError::UnknownOption { .. })
        ));
        assert!(matches!(
            c.check(
                &FieldKey::IncludedChannels,
                &FieldValue::choices(["Grocery", "Bazaar"])
            ),
            Err(IntakeError::UnknownOption { value, .. }) if value == "Bazaar"
        ));
        assert!(c.check(&FieldKey::ClientName, &FieldValue::text("anything")).is_ok());
    }

    #[test]
    fn integer_ranges_are_enforced() {
        let c = OptionCatalog::default();
        assert!(c.check(&FieldKey::AiSuggestions, &FieldValue::Integer(5)).is_ok());
        assert!(c.check(&FieldKey::AiSuggestions, &FieldValue::Integer(6)).is_err());
        assert!(c.check(&FieldKey::NumSubcategories, &FieldValue::Integer(0)).is_err());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let c: OptionCatalog = serde_json::from_str(r#"{"regions": ["EU"]}"#).unwrap();
        assert_eq!(c.regions, vec!["EU"]);
        assert_eq!(c.screener_answers, vec!["Yes", "No"]);
    }

    #[test]
    fn screener_answers_cannot_be_overridden() {
        let c: OptionCatalog =
            serde_json::from_str(r#"{"screener_answers": ["yes", "no"]}"#).unwrap();
        assert_eq!(c.options_for(&FieldKey::HispanicScreener).unwrap(), ["Yes", "No"]);
        assert!(matches!(
            c.check(&FieldKey::HispanicScreener, &FieldValue::choice("yes")),
            Err(IntakeError::UnknownOption { value, .. }) if value == "yes"
        ));
        assert!(c
            .check(&FieldKey::HispanicScreener, &FieldValue::choice("No"))
            .is_ok());
    }

    #[test]
    fn option_texts_are_kept_verbatim() {
        let c = OptionCatalog::default();
        assert!(c.channels.iter().any(|ch| ch == "Club (Costco，Sam’s Club，BJ’s)"));
        assert!(c.special_topics[0].starts_with("Product Label Preferences – "));
        assert!(c.special_sections[0].starts_with("Barriers - "));
    }
}
