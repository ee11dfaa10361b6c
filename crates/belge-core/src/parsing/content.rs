use once_cell::sync::Lazy;
use regex::Regex;

static PREPARED_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:Yayın|Hazırlama) Tarihi\s*[:\s]*([0-9]{2}[./][0-9]{2}[./][0-9]{4})")
        .expect("prepared date pattern is valid")
});

static REVISION_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Revizyon Tarihi\s*[:\s]*([0-9]{2}[./][0-9]{2}[./][0-9]{4})")
        .expect("revision date pattern is valid")
});

/// Dates found in a document's body text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDates {
    pub prepared_date: String,
    pub revision_date: String,
}

/// Search NFC-normalized text for the publication and revision dates.
/// The first match wins per field; a missing label leaves the field empty.
pub fn find_dates(text: &str) -> ContentDates {
    ContentDates {
        prepared_date: first_capture(&PREPARED_DATE, text),
        revision_date: first_capture(&REVISION_DATE, text),
    }
}

fn first_capture(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
