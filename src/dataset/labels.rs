//! Fixed mapping from the label encodings seen in upstream datasets to [`Label`].
//!
//! Values are trimmed and lowercased first. Anything outside the table is
//! treated as missing: callers drop the row and count it.

use super::record::Label;

const LABEL_TABLE: &[(&str, Label)] = &[
    ("true", Label::Ai),
    ("ai", Label::Ai),
    ("1", Label::Ai),
    ("1.0", Label::Ai),
    ("false", Label::Human),
    ("human", Label::Human),
    ("0", Label::Human),
    ("0.0", Label::Human),
];

pub fn normalize_label(raw: &str) -> Option<Label> {
    let key = raw.trim().to_ascii_lowercase();
    LABEL_TABLE
        .iter()
        .find(|(encoded, _)| *encoded == key)
        .map(|(_, label)| *label)
}
