//! WorldCat record to IIIF metadata normalizer
//!
//! Folds the bibliographic records of one shelf item into the nine
//! descriptive metadata entries of its manifest.

use indexmap::IndexSet;

use super::{anomaly::Anomaly, formats::format_label};
use crate::models::{
    bib_record::{present, present_text, Creator},
    BibRecord, MetadataEntry,
};

/// Placeholder for missing identifiers and publisher parts
const UNDEFINED: &str = "undefined";

/// Result of normalizing the records of one shelf item
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Always nine entries, in manifest order
    pub entries: Vec<MetadataEntry>,
    pub anomalies: Vec<Anomaly>,
}

/// Bibliographic metadata normalizer
#[derive(Debug, Clone)]
pub struct MetadataNormalizer {
    public_base_url: String,
}

impl MetadataNormalizer {
    /// `public_base_url` is the catalog page prefix, e.g. `https://tudelft.on.worldcat.org/oclc/`
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
        }
    }

    /// Public catalog page of a record
    pub fn record_url(&self, record: &BibRecord) -> String {
        format!(
            "{}{}",
            self.public_base_url,
            record.oclc_number().unwrap_or(UNDEFINED)
        )
    }

    /// Normalize all records resolved for `shelf_number`
    pub fn normalize(&self, records: &[BibRecord], shelf_number: &str) -> Normalized {
        let mut anomalies = Vec::new();

        let mut oclc_links = Vec::new();
        let mut titles = Vec::new();
        let mut contributors = IndexSet::new();
        let mut publishers = IndexSet::new();
        let mut years = IndexSet::new();
        let mut formats: IndexSet<Option<String>> = IndexSet::new();
        let mut descriptions = Vec::new();
        let mut notes = Vec::new();

        if records.len() > 1 {
            anomalies.push(Anomaly::MultipleOclcNumbers {
                shelf_number: shelf_number.to_string(),
                urls: records.iter().map(|r| self.record_url(r)).collect(),
            });
        }

        for record in records {
            let url = self.record_url(record);

            oclc_links.push(format!(
                "<a href=\"{}\">{}</a>",
                url,
                record.oclc_number().unwrap_or(UNDEFINED)
            ));

            titles.extend(record.main_titles().map(String::from));

            match record.contributor.as_ref().and_then(|c| c.creators.as_ref()) {
                Some(creators) => {
                    for creator in creators {
                        if let Some(name) =
                            creator_name(creator, shelf_number, &url, &mut anomalies)
                        {
                            contributors.insert(name);
                        }
                    }
                }
                None => anomalies.push(Anomaly::NoAuthor {
                    shelf_number: shelf_number.to_string(),
                    url: url.clone(),
                }),
            }

            for publisher in record.publishers.iter().flatten() {
                let name = publisher
                    .publisher_name
                    .as_ref()
                    .and_then(|n| n.text.as_deref())
                    .unwrap_or(UNDEFINED);
                let place = publisher.publication_place.as_deref().unwrap_or(UNDEFINED);
                publishers.insert(format!("{}, {}", name, place));
            }

            if let Some(year) = record.date.as_ref().and_then(|d| present(&d.publication_date)) {
                if year.chars().count() < 4 || year.contains('?') {
                    anomalies.push(Anomaly::SuspiciousYear {
                        shelf_number: shelf_number.to_string(),
                        year: year.to_string(),
                        url: url.clone(),
                    });
                }
                years.insert(year.to_string());
            }

            if let Some(description) = &record.description {
                // Physical descriptions are sometimes catalogued as bibliographies
                let bibliographies: Vec<&str> = description
                    .bibliographies
                    .iter()
                    .flatten()
                    .filter_map(|b| b.present())
                    .collect();
                if !bibliographies.is_empty() {
                    anomalies.push(Anomaly::Bibliographies {
                        shelf_number: shelf_number.to_string(),
                        text: bibliographies.join(", "),
                        url: url.clone(),
                    });
                    descriptions.extend(bibliographies.into_iter().map(String::from));
                } else if let Some(physical) = present(&description.physical_description) {
                    descriptions.push(physical.to_string());
                }

                if description.contents.is_some() {
                    anomalies.push(Anomaly::Contents {
                        shelf_number: shelf_number.to_string(),
                        url: url.clone(),
                    });
                }
            }

            if let Some(note) = &record.note {
                notes.extend(
                    note.general_notes
                        .iter()
                        .flatten()
                        .filter_map(|n| n.present())
                        .map(String::from),
                );
            }

            if let Some(code) = record.format.as_ref().and_then(|f| present(&f.general_format)) {
                formats.insert(format_label(code).map(String::from));
            }
        }

        let contributor_plural = contributors.len() > 1;
        let oclc_plural = oclc_links.len() > 1;

        let entries = vec![
            MetadataEntry::from_texts("Title", "Titel", titles),
            MetadataEntry::from_texts(
                if contributor_plural { "Contributors" } else { "Contributor" },
                if contributor_plural { "Makers" } else { "Maker" },
                contributors.into_iter().collect(),
            ),
            MetadataEntry::from_texts("Publisher", "Uitgever", publishers.into_iter().collect()),
            MetadataEntry::from_texts("Year", "Jaar", years.into_iter().collect()),
            MetadataEntry::new("Format", "Formaat", formats.into_iter().collect()),
            MetadataEntry::from_texts("Description", "Omschrijving", descriptions),
            MetadataEntry::from_texts("Notes", "Noot", notes),
            MetadataEntry::from_texts(
                if oclc_plural { "OCLC Numbers" } else { "OCLC Number" },
                if oclc_plural { "OCLC nummers" } else { "OCLC nummer" },
                oclc_links,
            ),
            MetadataEntry::from_texts(
                "Shelf Number",
                "Plaatsnummer",
                vec![shelf_number.replace('-', " ")],
            ),
        ];

        Normalized { entries, anomalies }
    }
}

/// Display name of a creator, with creator notes in parentheses.
///
/// Priority: corporate name, full name, first name only, last name only.
fn creator_name(
    creator: &Creator,
    shelf_number: &str,
    url: &str,
    anomalies: &mut Vec<Anomaly>,
) -> Option<String> {
    let first = present_text(&creator.first_name);
    let second = present_text(&creator.second_name);

    let name = if let Some(corporate) = present_text(&creator.non_person_name) {
        corporate.to_string()
    } else {
        match (first, second) {
            (Some(first), Some(second)) => format!("{} {}", first, second),
            (Some(first), None) => {
                anomalies.push(Anomaly::FirstNameOnly {
                    shelf_number: shelf_number.to_string(),
                    url: url.to_string(),
                });
                first.to_string()
            }
            (None, Some(second)) => {
                anomalies.push(Anomaly::LastNameOnly {
                    shelf_number: shelf_number.to_string(),
                    url: url.to_string(),
                });
                second.to_string()
            }
            (None, None) => return None,
        }
    };

    match creator.creator_notes.as_deref() {
        Some(notes) if !notes.is_empty() => Some(format!("{} ({})", name, notes.join(", "))),
        _ => Some(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bib_record::{ContributorInfo, Text};

    const BASE: &str = "https://tudelft.on.worldcat.org/oclc/";

    fn text(value: &str) -> Option<Text> {
        Some(Text {
            text: Some(value.to_string()),
        })
    }

    fn record_with_creators(oclc: &str, creators: Vec<Creator>) -> BibRecord {
        BibRecord {
            identifier: Some(crate::models::bib_record::Identifier {
                oclc_number: Some(oclc.to_string()),
            }),
            contributor: Some(ContributorInfo {
                creators: Some(creators),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_creator_name_priority() {
        let mut anomalies = Vec::new();

        let corporate = Creator {
            non_person_name: text("TU Delft"),
            first_name: text("Jan"),
            ..Default::default()
        };
        assert_eq!(
            creator_name(&corporate, "TR 1", "u", &mut anomalies),
            Some("TU Delft".to_string())
        );

        let full = Creator {
            first_name: text("Jan"),
            second_name: text("Jansen"),
            creator_notes: Some(vec!["ed.".to_string(), "1900-1980".to_string()]),
            ..Default::default()
        };
        assert_eq!(
            creator_name(&full, "TR 1", "u", &mut anomalies),
            Some("Jan Jansen (ed., 1900-1980)".to_string())
        );
        assert!(anomalies.is_empty());

        let last = Creator {
            second_name: text("Jansen"),
            ..Default::default()
        };
        assert_eq!(
            creator_name(&last, "TR 1", "u", &mut anomalies),
            Some("Jansen".to_string())
        );
        assert!(matches!(anomalies[0], Anomaly::LastNameOnly { .. }));
    }

    #[test]
    fn test_empty_name_parts_are_absent() {
        let mut anomalies = Vec::new();
        let creator = Creator {
            non_person_name: text(""),
            first_name: text(""),
            second_name: text("Jansen"),
            ..Default::default()
        };
        assert_eq!(
            creator_name(&creator, "TR 1", "u", &mut anomalies),
            Some("Jansen".to_string())
        );
        assert_eq!(anomalies.len(), 1);
    }

    #[test]
    fn test_nameless_creator_is_skipped_silently() {
        let normalizer = MetadataNormalizer::new(BASE);
        let record = record_with_creators(
            "1",
            vec![Creator {
                creator_notes: Some(vec!["note".to_string()]),
                ..Default::default()
            }],
        );
        let result = normalizer.normalize(&[record], "TR 1");

        assert_eq!(result.entries[1].values(), vec![Some("")]);
        assert_eq!(result.entries[1].label.en[0], "Contributor");
        assert!(result.anomalies.is_empty());
    }

    #[test]
    fn test_missing_creators_logs_no_author() {
        let normalizer = MetadataNormalizer::new(BASE);
        let record = BibRecord::default();
        let result = normalizer.normalize(&[record], "TR 1");

        assert_eq!(
            result.anomalies,
            vec![Anomaly::NoAuthor {
                shelf_number: "TR 1".to_string(),
                url: format!("{}undefined", BASE),
            }]
        );
        assert_eq!(
            result.entries[7].values(),
            vec![Some("<a href=\"https://tudelft.on.worldcat.org/oclc/undefined\">undefined</a>")]
        );
    }

    #[test]
    fn test_contributor_dedup_and_plural() {
        let normalizer = MetadataNormalizer::new(BASE);
        let a = Creator {
            non_person_name: text("A"),
            ..Default::default()
        };
        let b = Creator {
            non_person_name: text("B"),
            ..Default::default()
        };

        let result = normalizer.normalize(
            &[
                record_with_creators("1", vec![a.clone()]),
                record_with_creators("2", vec![a.clone()]),
            ],
            "TR 1",
        );
        assert_eq!(result.entries[1].values(), vec![Some("A")]);
        assert_eq!(result.entries[1].label.en, vec!["Contributor"]);
        assert_eq!(result.entries[1].label.nl, vec!["Maker"]);
        assert_eq!(result.entries[7].label.en, vec!["OCLC Numbers"]);

        let result = normalizer.normalize(&[record_with_creators("1", vec![b, a])], "TR 1");
        assert_eq!(result.entries[1].values(), vec![Some("B"), Some("A")]);
        assert_eq!(result.entries[1].label.en, vec!["Contributors"]);
        assert_eq!(result.entries[1].label.nl, vec!["Makers"]);
        assert_eq!(result.entries[7].label.nl, vec!["OCLC nummer"]);
    }
}
