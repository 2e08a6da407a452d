//! Data-quality findings recorded in the audit log

use std::fmt;

/// A data-quality finding for one shelf number.
///
/// `Display` renders the Dutch sentence written to the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    MultipleOclcNumbers { shelf_number: String, urls: Vec<String> },
    FirstNameOnly { shelf_number: String, url: String },
    LastNameOnly { shelf_number: String, url: String },
    NoAuthor { shelf_number: String, url: String },
    SuspiciousYear { shelf_number: String, year: String, url: String },
    Bibliographies { shelf_number: String, text: String, url: String },
    Contents { shelf_number: String, url: String },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::MultipleOclcNumbers { shelf_number, urls } => write!(
                f,
                "{} heeft meerdere OCLC nummers ({})",
                shelf_number,
                urls.join(", ")
            ),
            Anomaly::FirstNameOnly { shelf_number, url } => write!(
                f,
                "{} heeft een auteur met alleen een voornaam ({})",
                shelf_number, url
            ),
            Anomaly::LastNameOnly { shelf_number, url } => write!(
                f,
                "{} heeft een auteur met alleen een achternaam ({})",
                shelf_number, url
            ),
            Anomaly::NoAuthor { shelf_number, url } => {
                write!(f, "{} heeft geen auteur ({})", shelf_number, url)
            }
            Anomaly::SuspiciousYear { shelf_number, year, url } => write!(
                f,
                "{} heeft als jaartal \"{}\" ({})",
                shelf_number, year, url
            ),
            Anomaly::Bibliographies { shelf_number, text, url } => write!(
                f,
                "{} bevat de volgende informatie onder \"Bibliografieën\": \"{}\" ({})",
                shelf_number, text, url
            ),
            Anomaly::Contents { shelf_number, url } => write!(
                f,
                "{} bevat informatie onder \"Inhoud\" ({})",
                shelf_number, url
            ),
        }
    }
}
