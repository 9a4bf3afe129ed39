//! Colon-joined selector carried by `vol_id`.
//!
//! Segments are consumed positionally by the volume type, e.g.
//! `vol_id: "my-server:/exports/data"` for nfs.

use crate::ShortError;

pub const SELECTOR_DELIMITER: char = ':';

/// split `vol_id` into its segments, an empty string has none
pub fn parse(selector: &str) -> Vec<String> {
    if selector.is_empty() {
        return vec![];
    }
    selector
        .split(SELECTOR_DELIMITER)
        .map(|segment| segment.to_owned())
        .collect()
}

/// join segments back into a `vol_id` string.
/// A segment holding the delimiter would not parse back, so it is rejected.
pub fn format<S: AsRef<str>>(segments: &[S]) -> Result<String, ShortError> {
    let mut parts = Vec::with_capacity(segments.len());
    for segment in segments {
        let segment = segment.as_ref();
        if segment.contains(SELECTOR_DELIMITER) {
            return Err(ShortError::Shape {
                expected: format!("selector segment without '{SELECTOR_DELIMITER}'"),
                found: Some(segment.into()),
            });
        }
        parts.push(segment);
    }
    Ok(parts.join(":"))
}
