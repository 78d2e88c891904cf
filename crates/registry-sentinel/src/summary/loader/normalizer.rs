/// Pincodes are matched as exact text, so strip byte-order marks, zero-width
/// characters, and surrounding whitespace while preserving the digit sequence.
pub(crate) fn normalize_pincode(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}

pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
