//! Codec between a question's declared option list and its stored string
//! form, and between a choice answer's raw text and the set of selected
//! option values.
//!
//! Options are stored as a JSON array of strings. Older data is not
//! guaranteed to be valid JSON, so decoding falls back to comma-splitting.
//! Choice answers are stored as the selected options joined by a comma;
//! both `","` and `", "` joined forms appear in the wild and both are
//! accepted by trimming each piece after the split.

use std::collections::BTreeSet;

/// Serialise an option list to its stored form. An empty list encodes
/// to `"[]"`.
pub fn encode_options(options: &[String]) -> String {
    serde_json::to_string(options).unwrap() // Infallible for a string slice.
}

/// Parse a stored option string back into an option list.
///
/// Missing or empty input decodes to an empty list. Malformed JSON falls
/// back to splitting on `,` and trimming each piece; the round-trip law
/// with [`encode_options`] therefore only holds on the JSON path.
pub fn decode_options(stored: Option<&str>) -> Vec<String> {
    let raw = match stored {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Vec::new(),
    };
    serde_json::from_str(raw).unwrap_or_else(|_| {
        raw.split(',')
            .map(|piece| piece.trim().to_string())
            .collect()
    })
}

/// Decode a raw choice answer into the set of selected option values,
/// whether one or many options were chosen.
pub fn decode_selection(answer_text: &str) -> BTreeSet<String> {
    answer_text
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn json_path_round_trips() {
        for list in [
            options(&[]),
            options(&["Yes"]),
            options(&["Red", "Green", "Blue"]),
            options(&["Red", "Red"]), // Duplicates are permitted.
        ] {
            let encoded = encode_options(&list);
            assert_eq!(list, decode_options(Some(&encoded)));
        }
    }

    #[test]
    fn empty_list_encodes_to_empty_array() {
        assert_eq!("[]", encode_options(&[]));
    }

    #[test]
    fn missing_or_empty_input_decodes_to_nothing() {
        assert!(decode_options(None).is_empty());
        assert!(decode_options(Some("")).is_empty());
    }

    #[test]
    fn malformed_json_falls_back_to_comma_split() {
        assert_eq!(
            options(&["Red", "Green", "Blue"]),
            decode_options(Some("Red, Green,Blue"))
        );
        assert_eq!(options(&["Solo"]), decode_options(Some("Solo")));
    }

    #[test]
    fn selection_accepts_both_separator_forms() {
        let expected: BTreeSet<String> =
            ["A", "B"].iter().map(|s| s.to_string()).collect();
        assert_eq!(expected, decode_selection("A,B"));
        assert_eq!(expected, decode_selection("A, B"));
    }

    #[test]
    fn selection_of_single_value() {
        let expected: BTreeSet<String> = [String::from("Only")].into_iter().collect();
        assert_eq!(expected, decode_selection("Only"));
    }

    #[test]
    fn empty_selection_pieces_are_discarded() {
        assert!(decode_selection("").is_empty());
        assert!(decode_selection(" , ").is_empty());
    }
}
