//! Field identifiers and values.
//!
//! This module defines the declarative pieces of the intake form:
//! - `FieldKey`:   typed identifier of every stored value (top-level fields,
//!                 per-subcategory fields, per-item list text)
//! - `FieldKind`:  the kind of value a key accepts
//! - `FieldValue`: a stored value
//!
//! Keys have a stable textual form (`client_name`, `subcategory[1].name`,
//! `subcategory[0].qualifiers#<uuid>`) used by logs, replay scripts and the
//! outbound view. `FromStr` accepts exactly what `Display` produces.
//!
//! See also:
//! - `store.rs`  : session-scoped key → value mapping
//! - `list.rs`   : dynamic list controller built on `List` + `ListItem` keys
//! - `groups.rs` : repeated subcategory groups

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::error::IntakeError;

/// Hard upper bound of subcategory groups per study.
pub const MAX_SUBCATEGORIES: u8 = 4;

/// Stable identity of one dynamic list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Fresh, never reused identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| IntakeError::InvalidKey(s.to_string()))
    }
}

/// Zero-based index of a subcategory group, always below `MAX_SUBCATEGORIES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GroupIndex(u8);

impl GroupIndex {
    pub fn new(index: u8) -> Option<Self> {
        (index < MAX_SUBCATEGORIES).then_some(Self(index))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// One-based number shown to users ("Category 1").
    pub fn ordinal(self) -> u8 {
        self.0 + 1
    }

    /// All indices in `[0, count)`.
    pub fn range(count: u8) -> impl Iterator<Item = GroupIndex> {
        (0..count.min(MAX_SUBCATEGORIES)).map(GroupIndex)
    }
}

impl TryFrom<u8> for GroupIndex {
    type Error = IntakeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        GroupIndex::new(value).ok_or(IntakeError::OutOfRange {
            key: "subcategory index".to_string(),
            value: value as i64,
            min: 0,
            max: (MAX_SUBCATEGORIES - 1) as i64,
        })
    }
}

impl From<GroupIndex> for u8 {
    fn from(value: GroupIndex) -> Self {
        value.0
    }
}

/// Per-group field names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum GroupField {
    Name,
    SampleSize,
    Qualifiers,
    Attributes,
    Expanded,
}

/// The two dynamic lists owned by every group.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Qualifiers,
    Attributes,
}

impl From<ListKind> for GroupField {
    fn from(kind: ListKind) -> Self {
        match kind {
            ListKind::Qualifiers => GroupField::Qualifiers,
            ListKind::Attributes => GroupField::Attributes,
        }
    }
}

/// Address of one dynamic list: a group and which of its lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListKey {
    pub group: GroupIndex,
    pub kind: ListKind,
}

impl ListKey {
    pub fn new(group: GroupIndex, kind: ListKind) -> Self {
        Self { group, kind }
    }

    /// Key holding the ordered item identities.
    pub fn field_key(&self) -> FieldKey {
        FieldKey::Group {
            index: self.group,
            field: self.kind.into(),
        }
    }

    /// Key holding the text of one item.
    pub fn item_key(&self, item: ItemId) -> FieldKey {
        FieldKey::ListItem { list: *self, item }
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subcategory[{}].{}", self.group.get(), self.kind)
    }
}

impl FromStr for ListKey {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<FieldKey>()? {
            FieldKey::Group { index, field } => {
                let kind = match field {
                    GroupField::Qualifiers => ListKind::Qualifiers,
                    GroupField::Attributes => ListKind::Attributes,
                    _ => return Err(IntakeError::InvalidKey(s.to_string())),
                };
                Ok(ListKey::new(index, kind))
            }
            _ => Err(IntakeError::InvalidKey(s.to_string())),
        }
    }
}

/// Typed identifier of every value held by the field store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Email,
    ClientName,
    Region,
    MacroCategory,
    NumSubcategories,
    OverallCategoryName,
    HispanicScreener,
    IncludedChannels,
    SpecialSections,
    SpecialTopics,
    OtherQuestions,
    AiSuggestions,
    /// Terminal flag set once the submission record has been handed off.
    Submitted,
    Group { index: GroupIndex, field: GroupField },
    ListItem { list: ListKey, item: ItemId },
}

/// Kind of value a key accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Text,
    Choice,
    Choices,
    Integer,
    List,
    Flag,
}

const TOP_LEVEL: &[(FieldKey, &str)] = &[
    (FieldKey::Email, "email"),
    (FieldKey::ClientName, "client_name"),
    (FieldKey::Region, "region"),
    (FieldKey::MacroCategory, "macro_category"),
    (FieldKey::NumSubcategories, "num_subcategories"),
    (FieldKey::OverallCategoryName, "overall_category_name"),
    (FieldKey::HispanicScreener, "hispanic_screener"),
    (FieldKey::IncludedChannels, "included_channels"),
    (FieldKey::SpecialSections, "special_sections"),
    (FieldKey::SpecialTopics, "special_topics"),
    (FieldKey::OtherQuestions, "other_questions"),
    (FieldKey::AiSuggestions, "ai_suggestions"),
    (FieldKey::Submitted, "submitted"),
];

impl FieldKey {
    pub fn group(index: GroupIndex, field: GroupField) -> Self {
        FieldKey::Group { index, field }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldKey::Email
            | FieldKey::ClientName
            | FieldKey::OverallCategoryName
            | FieldKey::OtherQuestions
            | FieldKey::ListItem { .. } => FieldKind::Text,
            FieldKey::Region | FieldKey::MacroCategory | FieldKey::HispanicScreener => {
                FieldKind::Choice
            }
            FieldKey::IncludedChannels | FieldKey::SpecialSections | FieldKey::SpecialTopics => {
                FieldKind::Choices
            }
            FieldKey::NumSubcategories | FieldKey::AiSuggestions => FieldKind::Integer,
            FieldKey::Submitted => FieldKind::Flag,
            FieldKey::Group { field, .. } => match field {
                GroupField::Name | GroupField::SampleSize => FieldKind::Text,
                GroupField::Qualifiers | GroupField::Attributes => FieldKind::List,
                GroupField::Expanded => FieldKind::Flag,
            },
        }
    }

    /// Value an unset key reads as.
    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldKey::NumSubcategories => FieldValue::Integer(1),
            FieldKey::AiSuggestions => FieldValue::Integer(3),
            FieldKey::Group {
                field: GroupField::Expanded,
                ..
            } => FieldValue::Flag(true),
            _ => match self.kind() {
                FieldKind::Text => FieldValue::Text(String::new()),
                FieldKind::Choice => FieldValue::Choice(None),
                FieldKind::Choices => FieldValue::Choices(Vec::new()),
                FieldKind::Integer => FieldValue::Integer(0),
                FieldKind::List => FieldValue::List(Vec::new()),
                FieldKind::Flag => FieldValue::Flag(false),
            },
        }
    }

    /// Inclusive bounds of integer keys.
    pub fn integer_range(&self) -> Option<(i64, i64)> {
        match self {
            FieldKey::NumSubcategories => Some((1, MAX_SUBCATEGORIES as i64)),
            FieldKey::AiSuggestions => Some((1, 5)),
            _ => None,
        }
    }

    /// Human label used in validation messages.
    pub fn label(&self) -> String {
        match self {
            FieldKey::Email => "Email".into(),
            FieldKey::ClientName => "Client Name".into(),
            FieldKey::Region => "Region".into(),
            FieldKey::MacroCategory => "Macro-category".into(),
            FieldKey::NumSubcategories => "Number of subcategories".into(),
            FieldKey::OverallCategoryName => "Overall Category Name".into(),
            FieldKey::HispanicScreener => "Hispanic/Spanish language screener".into(),
            FieldKey::IncludedChannels => "Channels to Include".into(),
            FieldKey::SpecialSections => "Special Sections to Include".into(),
            FieldKey::SpecialTopics => "Special Question Topics to Include".into(),
            FieldKey::OtherQuestions => "Other business questions".into(),
            FieldKey::AiSuggestions => "AI suggestions".into(),
            FieldKey::Submitted => "Submitted".into(),
            FieldKey::Group { index, field } => {
                let what = match field {
                    GroupField::Name => "Category Name",
                    GroupField::SampleSize => "Sample Size",
                    GroupField::Qualifiers => "Qualifying categories",
                    GroupField::Attributes => "Category Attribute List",
                    GroupField::Expanded => "Expanded",
                };
                format!("{what} (Category {})", index.ordinal())
            }
            FieldKey::ListItem { list, .. } => format!("{} item", list),
        }
    }

    /// True for keys whose values belong to a subcategory group.
    pub fn group_index(&self) -> Option<GroupIndex> {
        match self {
            FieldKey::Group { index, .. } => Some(*index),
            FieldKey::ListItem { list, .. } => Some(list.group),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Group { index, field } => write!(f, "subcategory[{}].{}", index.get(), field),
            FieldKey::ListItem { list, item } => write!(f, "{list}#{item}"),
            top => {
                let name = TOP_LEVEL
                    .iter()
                    .find(|(k, _)| k == top)
                    .map(|(_, n)| *n)
                    .unwrap_or("?");
                f.write_str(name)
            }
        }
    }
}

impl FromStr for FieldKey {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IntakeError::InvalidKey(s.to_string());

        if let Some((key, _)) = TOP_LEVEL.iter().find(|(_, name)| *name == s) {
            return Ok(*key);
        }

        let rest = s.strip_prefix("subcategory[").ok_or_else(invalid)?;
        let (index, rest) = rest.split_once("].").ok_or_else(invalid)?;
        let index = index
            .parse::<u8>()
            .ok()
            .and_then(GroupIndex::new)
            .ok_or_else(invalid)?;

        match rest.split_once('#') {
            Some((list, item)) => {
                let kind = list.parse::<ListKind>().map_err(|_| invalid())?;
                let item = item.parse::<ItemId>().map_err(|_| invalid())?;
                Ok(FieldKey::ListItem {
                    list: ListKey::new(index, kind),
                    item,
                })
            }
            None => {
                let field = rest.parse::<GroupField>().map_err(|_| invalid())?;
                Ok(FieldKey::Group { index, field })
            }
        }
    }
}

impl Serialize for FieldKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for ListKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ListKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A stored value.
///
/// `List` is the list-of-text kind: the ordered item identities of a dynamic
/// list. Item texts are stored separately under `FieldKey::ListItem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Choice(Option<String>),
    Choices(Vec<String>),
    Integer(i64),
    List(Vec<ItemId>),
    Flag(bool),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Choice(_) => FieldKind::Choice,
            FieldValue::Choices(_) => FieldKind::Choices,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::List(_) => FieldKind::List,
            FieldValue::Flag(_) => FieldKind::Flag,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn choice(value: impl Into<String>) -> Self {
        FieldValue::Choice(Some(value.into()))
    }

    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Choices(values.into_iter().map(Into::into).collect())
    }

    /// Coerce a loosely typed JSON value into the kind `key` accepts.
    ///
    /// `null` clears a choice; a string is accepted for text and choice keys,
    /// an array of strings for multi-choice keys, an integer for integer keys
    /// and a bool for flags. List keys are never written through here.
    pub fn from_json(key: &FieldKey, value: serde_json::Value) -> Result<Self, IntakeError> {
        use serde_json::Value as Json;

        let wrong_kind = |found: &Json| IntakeError::WrongKind {
            key: key.to_string(),
            expected: key.kind(),
            found: json_kind(found).to_string(),
        };

        match (key.kind(), value) {
            (FieldKind::Text, Json::String(s)) => Ok(FieldValue::Text(s)),
            (FieldKind::Choice, Json::String(s)) => Ok(FieldValue::Choice(Some(s))),
            (FieldKind::Choice, Json::Null) => Ok(FieldValue::Choice(None)),
            (FieldKind::Choices, Json::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Json::String(s) => out.push(s),
                        other => return Err(wrong_kind(&other)),
                    }
                }
                Ok(FieldValue::Choices(out))
            }
            (FieldKind::Integer, Json::Number(n)) => {
                n.as_i64().map(FieldValue::Integer).ok_or_else(|| IntakeError::WrongKind {
                    key: key.to_string(),
                    expected: FieldKind::Integer,
                    found: "number".to_string(),
                })
            }
            // radio widgets report the count as "1".."4"
            (FieldKind::Integer, Json::String(s)) => match s.trim().parse::<i64>() {
                Ok(n) => Ok(FieldValue::Integer(n)),
                Err(_) => Err(wrong_kind(&Json::String(s))),
            },
            (FieldKind::Flag, Json::Bool(b)) => Ok(FieldValue::Flag(b)),
            (_, other) => Err(wrong_kind(&other)),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn g(i: u8) -> GroupIndex {
        GroupIndex::new(i).unwrap()
    }

    #[test]
    fn group_index_is_bounded() {
        assert!(GroupIndex::new(3).is_some());
        assert!(GroupIndex::new(MAX_SUBCATEGORIES).is_none());
        assert_eq!(GroupIndex::range(9).count(), MAX_SUBCATEGORIES as usize);
    }

    #[test]
    fn keys_display_and_parse_back() {
        let item = ItemId::generate();
        let keys = [
            FieldKey::ClientName,
            FieldKey::AiSuggestions,
            FieldKey::group(g(2), GroupField::SampleSize),
            ListKey::new(g(1), ListKind::Attributes).field_key(),
            ListKey::new(g(0), ListKind::Qualifiers).item_key(item),
        ];
        for key in keys {
            let text = key.to_string();
            assert_eq!(text.parse::<FieldKey>().unwrap(), key, "{text}");
        }
        assert_eq!(
            FieldKey::group(g(1), GroupField::Name).to_string(),
            "subcategory[1].name"
        );
    }

    #[test]
    fn malformed_keys_are_rejected() {
        for bad in [
            "",
            "cat_name_0",
            "subcategory[4].name",
            "subcategory[0].colour",
            "subcategory[0].name#not-a-uuid",
        ] {
            assert!(bad.parse::<FieldKey>().is_err(), "{bad}");
        }
        assert!("subcategory[0].name".parse::<ListKey>().is_err());
        assert!("subcategory[0].qualifiers".parse::<ListKey>().is_ok());
    }

    #[test]
    fn defaults_follow_key_kind() {
        assert_eq!(FieldKey::Email.default_value(), FieldValue::Text(String::new()));
        assert_eq!(FieldKey::Region.default_value(), FieldValue::Choice(None));
        assert_eq!(FieldKey::NumSubcategories.default_value(), FieldValue::Integer(1));
        assert_eq!(FieldKey::AiSuggestions.default_value(), FieldValue::Integer(3));
        assert_eq!(
            FieldKey::group(g(0), GroupField::Expanded).default_value(),
            FieldValue::Flag(true)
        );
    }

    #[test]
    fn json_coercion_uses_key_kind() {
        assert_eq!(
            FieldValue::from_json(&FieldKey::Region, json!("USA")).unwrap(),
            FieldValue::choice("USA")
        );
        assert_eq!(
            FieldValue::from_json(&FieldKey::NumSubcategories, json!("2")).unwrap(),
            FieldValue::Integer(2)
        );
        assert_eq!(
            FieldValue::from_json(&FieldKey::IncludedChannels, json!(["Grocery"])).unwrap(),
            FieldValue::choices(["Grocery"])
        );
        assert!(matches!(
            FieldValue::from_json(&FieldKey::ClientName, json!(5)),
            Err(IntakeError::WrongKind { .. })
        ));
    }
}
