//! Header labelling and cell normalization.

use std::collections::HashSet;

/// Literal tokens read as missing cells. Blank cells stay blank.
pub const NULL_TOKENS: [&str; 3] = ["NULL", "Null", "null"];

/// Map a raw cell to its frame value: `None` for a null token, otherwise the
/// text unchanged (including the empty string).
pub fn cell_value(raw: &str) -> Option<String> {
    if NULL_TOKENS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Make header labels unique and non-empty.
///
/// Empty labels become `Unnamed: <position>`; repeated labels get a `.1`,
/// `.2`, … suffix in order of appearance.
pub fn unique_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::new();

    for (idx, label) in raw.into_iter().enumerate() {
        let base = match label.as_ref() {
            "" => format!("Unnamed: {idx}"),
            other => other.to_string(),
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}
