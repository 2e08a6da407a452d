//! IIIF Presentation 3 descriptive metadata entries

use serde::{Deserialize, Serialize};

/// Bilingual label of a metadata entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub en: Vec<String>,
    pub nl: Vec<String>,
}

/// Language-neutral value; `None` serializes as `null`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub none: Vec<Option<String>>,
}

/// One `{label, value}` pair of a manifest's `metadata` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub label: Label,
    pub value: Value,
}

impl MetadataEntry {
    /// Build an entry, substituting a single empty string for an empty value list
    pub fn new(en: &str, nl: &str, values: Vec<Option<String>>) -> Self {
        let none = if values.is_empty() {
            vec![Some(String::new())]
        } else {
            values
        };
        Self {
            label: Label {
                en: vec![en.to_string()],
                nl: vec![nl.to_string()],
            },
            value: Value { none },
        }
    }

    /// Entry from plain strings
    pub fn from_texts(en: &str, nl: &str, values: Vec<String>) -> Self {
        Self::new(en, nl, values.into_iter().map(Some).collect())
    }

    /// Values as string slices, `None` for `null` entries
    pub fn values(&self) -> Vec<Option<&str>> {
        self.value.none.iter().map(|v| v.as_deref()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_value_becomes_empty_string() {
        let entry = MetadataEntry::from_texts("Notes", "Noot", vec![]);
        assert_eq!(entry.values(), vec![Some("")]);
    }

    #[test]
    fn test_serialized_shape() {
        let entry = MetadataEntry::new("Format", "Formaat", vec![Some("Book".into()), None]);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "label": { "en": ["Format"], "nl": ["Formaat"] },
                "value": { "none": ["Book", null] }
            })
        );
    }
}
