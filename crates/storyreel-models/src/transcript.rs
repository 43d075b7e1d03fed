//! Transcript normalization ahead of forced alignment.

/// Normalize a transcript to improve alignment accuracy.
///
/// Hyphen-joined compounds ("high-end") are split into separate words so
/// the aligner sees the same tokens the narrator speaks, and colons are
/// stripped since they are never voiced.
pub fn normalize_transcript(text: &str) -> String {
    text.replace('-', " ").replace(':', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphenated_compounds_are_split() {
        assert_eq!(normalize_transcript("a high-end phone"), "a high end phone");
    }

    #[test]
    fn test_colons_are_stripped() {
        assert_eq!(normalize_transcript("Note: this happened"), "Note this happened");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(normalize_transcript("nothing to do here"), "nothing to do here");
    }
}
