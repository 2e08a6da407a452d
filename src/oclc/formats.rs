//! WorldCat general format codes

use once_cell::sync::Lazy;
use std::collections::HashMap;

static FORMATS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ArtChap", "Article, Chapter"),
        ("Archv", "Archival Material"),
        ("AudioBook", "Audiobook"),
        ("Book", "Book"),
        ("CompFile", "Computer File"),
        ("Encyc", "Encyclopedia Article"),
        ("Game", "Game"),
        ("Image", "Image"),
        ("IntMM", "Interactive Multimedia"),
        ("Jrnl", "Journal, Magazine"),
        ("Kit", "Kit"),
        ("Map", "Map"),
        ("MsScr", "Musical Score"),
        ("Music", "Music"),
        ("News", "Newspaper"),
        ("Object", "Object"),
        ("Snd", "Sound Recording"),
        ("Thsis", "Thesis, Dissertation"),
        ("Toy", "Toy"),
        ("Video", "Video"),
        ("Vis", "Visual Material"),
        ("Web", "Website"),
    ])
});

/// Readable label for a general format code, `None` for unknown codes
pub fn format_label(code: &str) -> Option<&'static str> {
    FORMATS.get(code).copied()
}
