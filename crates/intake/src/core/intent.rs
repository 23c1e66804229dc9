//! Inbound events.
//!
//! `Intent` is what the rendering layer sends after a user action: a field
//! change, a list add/remove/edit, a navigation request or the submit button.
//!
//! `ScriptStep` is the serialized form used by replay scripts. Field values
//! arrive as loose JSON and are coerced by the target key's kind; items are
//! addressed by id like in the live form.
//!
//! ```json5
//! [
//!   { type: "set_field", key: "client_name", value: "Acme" },
//!   { type: "set_field", key: "num_subcategories", value: 2 },
//!   { type: "replace_list", list: "subcategory[0].qualifiers", items: ["Oil"] },
//!   { type: "advance" },
//! ]
//! ```

use serde::Deserialize;

use crate::error::IntakeError;
use crate::field::{FieldKey, FieldValue, GroupIndex, ItemId, ListKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetField { key: FieldKey, value: FieldValue },
    ClearField { key: FieldKey },
    AppendItem { list: ListKey },
    RemoveItem { list: ListKey, item: ItemId },
    EditItem { list: ListKey, item: ItemId, text: String },
    ReplaceList { list: ListKey, items: Vec<String> },
    SetExpanded { group: GroupIndex, expanded: bool },
    Advance,
    Retreat,
    Submit,
}

impl Intent {
    pub fn set(key: FieldKey, value: FieldValue) -> Self {
        Intent::SetField { key, value }
    }

    pub fn edit(list: ListKey, item: ItemId, text: impl Into<String>) -> Self {
        Intent::EditItem {
            list,
            item,
            text: text.into(),
        }
    }

    pub fn replace<I, S>(list: ListKey, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Intent::ReplaceList {
            list,
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// True for intents that change submitted data. Navigation and the
    /// display-only expanded flag are not.
    pub fn mutates_data(&self) -> bool {
        !matches!(
            self,
            Intent::Advance | Intent::Retreat | Intent::Submit | Intent::SetExpanded { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Intent::SetField { .. } => "SetField",
            Intent::ClearField { .. } => "ClearField",
            Intent::AppendItem { .. } => "AppendItem",
            Intent::RemoveItem { .. } => "RemoveItem",
            Intent::EditItem { .. } => "EditItem",
            Intent::ReplaceList { .. } => "ReplaceList",
            Intent::SetExpanded { .. } => "SetExpanded",
            Intent::Advance => "Advance",
            Intent::Retreat => "Retreat",
            Intent::Submit => "Submit",
        }
    }
}

/// Wire form of an `Intent`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptStep {
    SetField {
        key: FieldKey,
        value: serde_json::Value,
    },
    ClearField {
        key: FieldKey,
    },
    AppendItem {
        list: ListKey,
    },
    RemoveItem {
        list: ListKey,
        item: ItemId,
    },
    EditItem {
        list: ListKey,
        item: ItemId,
        text: String,
    },
    ReplaceList {
        list: ListKey,
        items: Vec<String>,
    },
    SetExpanded {
        group: GroupIndex,
        expanded: bool,
    },
    Advance,
    Retreat,
    Submit,
}

impl ScriptStep {
    pub fn into_intent(self) -> Result<Intent, IntakeError> {
        Ok(match self {
            ScriptStep::SetField { key, value } => Intent::SetField {
                value: FieldValue::from_json(&key, value)?,
                key,
            },
            ScriptStep::ClearField { key } => Intent::ClearField { key },
            ScriptStep::AppendItem { list } => Intent::AppendItem { list },
            ScriptStep::RemoveItem { list, item } => Intent::RemoveItem { list, item },
            ScriptStep::EditItem { list, item, text } => Intent::EditItem { list, item, text },
            ScriptStep::ReplaceList { list, items } => Intent::ReplaceList { list, items },
            ScriptStep::SetExpanded { group, expanded } => Intent::SetExpanded { group, expanded },
            ScriptStep::Advance => Intent::Advance,
            ScriptStep::Retreat => Intent::Retreat,
            ScriptStep::Submit => Intent::Submit,
        })
    }
}

/// Parse a JSON5 replay script.
pub fn parse_script(source: &str) -> Result<Vec<ScriptStep>, IntakeError> {
    json5::from_str(source).map_err(|e| IntakeError::InvalidScript(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ListKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_json5_script() {
        let script = r#"
            // background
            [
              { type: "set_field", key: "client_name", value: "Acme" },
              { type: "set_field", key: "region", value: "USA" },
              { type: "set_field", key: "num_subcategories", value: "2" },
              { type: "replace_list", list: "subcategory[1].attributes", items: ["Brand", "Size"] },
              { type: "set_expanded", group: 1, expanded: false },
              { type: "advance" },
              { type: "submit" },
            ]
        "#;
        let steps = parse_script(script).unwrap();
        assert_eq!(steps.len(), 7);

        let intents: Vec<Intent> = steps
            .into_iter()
            .map(|s| s.into_intent().unwrap())
            .collect();
        assert_eq!(
            intents[2],
            Intent::set(FieldKey::NumSubcategories, FieldValue::Integer(2))
        );
        assert_eq!(
            intents[3],
            Intent::replace(
                ListKey::new(GroupIndex::new(1).unwrap(), ListKind::Attributes),
                ["Brand", "Size"]
            )
        );
        assert_eq!(intents[6], Intent::Submit);
        assert!(!intents[4].mutates_data());
        assert!(!intents[5].mutates_data());
        assert!(intents[3].mutates_data());
    }

    #[test]
    fn unknown_key_fails_to_parse() {
        let script = r#"[{ type: "set_field", key: "cat_name_0", value: "Butter" }]"#;
        assert!(matches!(
            parse_script(script),
            Err(IntakeError::InvalidScript(_))
        ));
    }

    #[test]
    fn wrongly_typed_value_fails_to_convert() {
        let steps = parse_script(r#"[{ type: "set_field", key: "region", value: 3 }]"#).unwrap();
        let err = steps.into_iter().next().unwrap().into_intent().unwrap_err();
        assert!(matches!(err, IntakeError::WrongKind { .. }));
    }
}
