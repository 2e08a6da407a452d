//! WorldCat bibliographic record model
//!
//! Mirrors the subset of the `/bibs/{oclcNumber}` response that is folded
//! into manifest metadata. Every field is optional; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// One WorldCat Search API v2 bibliographic record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BibRecord {
    pub identifier: Option<Identifier>,
    pub title: Option<TitleInfo>,
    pub contributor: Option<ContributorInfo>,
    pub publishers: Option<Vec<Publisher>>,
    pub date: Option<DateInfo>,
    pub description: Option<DescriptionInfo>,
    pub note: Option<NoteInfo>,
    pub format: Option<FormatInfo>,
}

/// A `{ "text": ... }` wrapper used throughout the WorldCat schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Text {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identifier {
    pub oclc_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleInfo {
    pub main_titles: Option<Vec<Text>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContributorInfo {
    pub creators: Option<Vec<Creator>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Creator {
    pub non_person_name: Option<Text>,
    pub first_name: Option<Text>,
    pub second_name: Option<Text>,
    pub creator_notes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Publisher {
    pub publisher_name: Option<Text>,
    pub publication_place: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateInfo {
    pub publication_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescriptionInfo {
    pub bibliographies: Option<Vec<Text>>,
    pub physical_description: Option<String>,
    /// Only checked for presence
    pub contents: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteInfo {
    pub general_notes: Option<Vec<Text>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatInfo {
    pub general_format: Option<String>,
}

/// Returns the string only when it is present and not empty
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Text {
    pub(crate) fn present(&self) -> Option<&str> {
        present(&self.text)
    }
}

/// Same as [`Text::present`] for an optional wrapper
pub(crate) fn present_text(value: &Option<Text>) -> Option<&str> {
    value.as_ref().and_then(Text::present)
}

impl BibRecord {
    /// Decode a record from the raw JSON kept in the cache
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn oclc_number(&self) -> Option<&str> {
        self.identifier
            .as_ref()
            .and_then(|i| i.oclc_number.as_deref())
    }

    /// Main titles in record order, skipping entries without text
    pub fn main_titles(&self) -> impl Iterator<Item = &str> {
        self.title
            .iter()
            .flat_map(|t| t.main_titles.iter().flatten())
            .filter_map(Text::present)
    }
}
