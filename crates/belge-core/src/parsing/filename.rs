use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::DEFAULT_REVISION;
use crate::parsing::normalize::{repair_mojibake, to_nfc};

static REVISION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_([0-9]+)").expect("revision token pattern is valid"));

/// Metadata carried by a document's filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameParts {
    pub code: String,
    pub display_name: String,
    pub revision_number: String,
}

impl FilenameParts {
    /// The whole stem as code, nothing else known.
    fn raw(stem: &str) -> FilenameParts {
        FilenameParts {
            code: stem.trim().to_string(),
            display_name: String::new(),
            revision_number: DEFAULT_REVISION.to_string(),
        }
    }
}

/// Split an upload path on either separator, dropping empty segments.
pub fn path_segments(relative_path: &str) -> Vec<&str> {
    relative_path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .collect()
}

/// Last path segment with the extension (after the last dot) removed.
/// A leading dot is part of the name, not an extension separator.
pub fn file_stem(relative_path: &str) -> &str {
    let name = path_segments(relative_path).pop().unwrap_or("");
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Immediate containing folder of the upload, or `root_unit` when the file
/// was uploaded without one.
pub fn responsible_unit(relative_path: &str, root_unit: &str) -> String {
    let segments = path_segments(relative_path);
    if segments.len() > 1 {
        to_nfc(&repair_mojibake(segments[segments.len() - 2]))
            .trim()
            .to_string()
    } else {
        root_unit.to_string()
    }
}

/// Decompose a filename stem into code, display name and revision number.
///
/// 1. Re-decode a Latin-1 garbled name as UTF-8 (kept as-is when that fails).
/// 2. Among all `_<digits>` tokens the numerically largest is the revision;
///    that one occurrence is cut out of the stem.
/// 3. The rest is split at its last hyphen into code and display name. With
///    no hyphen the whole rest is the code.
///
/// When nothing is left after step 2, the raw stem becomes the code.
pub fn parse_filename(stem: &str) -> FilenameParts {
    let repaired = to_nfc(&repair_mojibake(stem));
    parse_stem(&repaired).unwrap_or_else(|| FilenameParts::raw(stem))
}

fn parse_stem(stem: &str) -> Option<FilenameParts> {
    let (revision_number, remainder) = match max_revision_token(stem) {
        Some(m) => (
            m.as_str()[1..].to_string(),
            format!("{}{}", &stem[..m.start()], &stem[m.end()..]),
        ),
        None => (DEFAULT_REVISION.to_string(), stem.to_string()),
    };

    let remainder = remainder.trim();
    if remainder.is_empty() {
        return None;
    }

    let (code, display_name) = match remainder.rfind('-') {
        Some(idx) => (&remainder[..idx], &remainder[idx + 1..]),
        None => (remainder, ""),
    };

    Some(FilenameParts {
        code: code.trim().to_string(),
        display_name: display_name.trim().to_string(),
        revision_number,
    })
}

/// First `_<digits>` match holding the largest number.
fn max_revision_token(stem: &str) -> Option<regex::Match<'_>> {
    REVISION_TOKEN.find_iter(stem).fold(None, |best, m| match best {
        Some(b) if compare_digits(&m.as_str()[1..], &b.as_str()[1..]).is_le() => Some(b),
        _ => Some(m),
    })
}

/// Numeric comparison of two ASCII digit strings of any length.
fn compare_digits(a: &str, b: &str) -> std::cmp::Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
