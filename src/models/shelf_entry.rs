//! Shelf entries of a mapping file

use serde::Deserialize;

/// A YAML string or integer.
///
/// Decimal-looking values such as `1023.10` are rejected instead of being read
/// as floats, which would drop the trailing zero. They have to be quoted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(s) => s,
            Scalar::Integer(i) => i.to_string(),
        }
    }
}

impl Scalar {
    fn oclc_number(&self) -> Option<u64> {
        match self {
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Integer(i) => u64::try_from(*i).ok(),
        }
    }
}

/// A single OCLC number or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Scalar),
    Many(Vec<Scalar>),
}

/// One row of the mapping file as written by the operator
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawShelfEntry {
    tresor: Option<Scalar>,
    dlcs: Option<Scalar>,
    oclc: Option<OneOrMany>,
}

/// A complete mapping row: shelf number, DLCS id and OCLC numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfEntry {
    pub shelf_number: String,
    pub dlcs_id: String,
    pub oclc_numbers: Vec<u64>,
}

impl RawShelfEntry {
    /// Returns `None` when any of the three fields is missing or empty, or an
    /// OCLC number is not a non-negative integer
    pub fn into_entry(self) -> Option<ShelfEntry> {
        let shelf_number = String::from(self.tresor?);
        let dlcs_id = String::from(self.dlcs?);
        if shelf_number.is_empty() || dlcs_id.is_empty() {
            return None;
        }
        let oclc_numbers = match self.oclc? {
            OneOrMany::One(number) => vec![number.oclc_number()?],
            OneOrMany::Many(numbers) => numbers
                .iter()
                .map(Scalar::oclc_number)
                .collect::<Option<Vec<_>>>()?,
        };
        Some(ShelfEntry {
            shelf_number,
            dlcs_id,
            oclc_numbers,
        })
    }
}

impl ShelfEntry {
    /// File stem of the written manifest.
    ///
    /// The reading room shelf "Tresorleeszaal" holds many items, so its
    /// manifests are told apart by the first OCLC number.
    pub fn output_stem(&self) -> String {
        let stem = self.shelf_number.to_lowercase().replace(' ', "-");
        match (self.shelf_number.as_str(), self.oclc_numbers.first()) {
            ("Tresorleeszaal", Some(first)) => format!("{}-{}", stem, first),
            _ => stem,
        }
    }

    pub fn oclc_list(&self) -> String {
        self.oclc_numbers
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
