//! Forced-alignment words and subtitle cue segmentation.
//!
//! The alignment service maps every transcript word onto a timestamped
//! position in the narration audio. This module groups those words into
//! short subtitle cues and renders them as SubRip text.

use serde::{Deserialize, Serialize};

/// Maximum number of words per subtitle cue.
pub const MAX_WORDS_PER_CUE: usize = 3;

/// One transcript word with its aligned audio position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedWord {
    /// The word text as it appears in the transcript
    pub text: String,
    /// Start position in seconds
    pub start: f64,
    /// End position in seconds
    pub end: f64,
    /// Whether the aligner matched this word to the audio
    pub success: bool,
}

impl AlignedWord {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            success: true,
        }
    }

    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: 0.0,
            end: 0.0,
            success: false,
        }
    }
}

/// One timed subtitle entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    /// 1-based sequence index
    pub index: usize,
    /// Start timecode, `HH:MM:SS,mmm`
    pub start: String,
    /// End timecode, `HH:MM:SS,mmm`
    pub end: String,
    /// Cue text, 1-3 words joined by single spaces
    pub text: String,
}

/// Format seconds as a SubRip timecode (`HH:MM:SS,mmm`).
///
/// Sub-millisecond precision is truncated, not rounded.
pub fn format_timecode(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0) as u64;
    format!(
        "{:02}:{:02}:{:02},{:03}",
        total_ms / 3_600_000,
        (total_ms % 3_600_000) / 60_000,
        (total_ms % 60_000) / 1000,
        total_ms % 1000
    )
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

fn starts_lowercase(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_lowercase())
}

/// Group aligned words into subtitle cues.
///
/// Words the aligner failed on are skipped entirely. A pending group is
/// closed when it reaches [`MAX_WORDS_PER_CUE`] words, when the input is
/// exhausted, or at a likely sentence boundary (the next matched word
/// starts uppercase while the current one starts lowercase).
pub fn group_words(words: &[AlignedWord]) -> Vec<SubtitleCue> {
    let matched: Vec<&AlignedWord> = words.iter().filter(|w| w.success).collect();

    let mut cues = Vec::new();
    let mut group: Vec<&AlignedWord> = Vec::new();

    for (i, word) in matched.iter().copied().enumerate() {
        group.push(word);

        let close = match matched.get(i + 1) {
            None => true,
            Some(next) => {
                group.len() >= MAX_WORDS_PER_CUE
                    || (starts_lowercase(&word.text) && starts_uppercase(&next.text))
            }
        };

        if close {
            let start = group[0].start;
            let end = group[group.len() - 1].end;
            let text = group
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");

            cues.push(SubtitleCue {
                index: cues.len() + 1,
                start: format_timecode(start),
                end: format_timecode(end),
                text,
            });
            group.clear();
        }
    }

    cues
}

/// Render cues as SubRip text.
pub fn render_srt(cues: &[SubtitleCue]) -> String {
    let mut out = String::new();
    for cue in cues {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            cue.index, cue.start, cue.end, cue.text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: f64, end: f64) -> AlignedWord {
        AlignedWord::new(text, start, end)
    }

    #[test]
    fn test_timecode_truncates_milliseconds() {
        assert_eq!(format_timecode(3661.5), "01:01:01,500");
        assert_eq!(format_timecode(0.0), "00:00:00,000");
        // 1.2345s truncates to 234ms
        assert_eq!(format_timecode(1.2345), "00:00:01,234");
    }

    #[test]
    fn test_seven_words_group_as_three_three_one() {
        let words: Vec<AlignedWord> = (0..7)
            .map(|i| word("word", i as f64, i as f64 + 0.8))
            .collect();

        let cues = group_words(&words);
        assert_eq!(cues.len(), 3);
        assert_eq!(cues[0].text, "word word word");
        assert_eq!(cues[1].text, "word word word");
        assert_eq!(cues[2].text, "word");
        assert_eq!(cues[0].index, 1);
        assert_eq!(cues[2].index, 3);
    }

    #[test]
    fn test_sentence_boundary_closes_short_group() {
        let words = vec![
            word("went", 0.0, 0.4),
            word("home.", 0.5, 0.9),
            word("Then", 1.0, 1.4),
            word("what", 1.5, 1.9),
        ];

        let cues = group_words(&words);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "went home.");
        assert_eq!(cues[1].text, "Then what");
    }

    #[test]
    fn test_failed_words_are_skipped() {
        let words = vec![
            word("one", 0.0, 0.4),
            AlignedWord::failed("garbled"),
            word("two", 1.0, 1.4),
        ];

        let cues = group_words(&words);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "one two");
        assert_eq!(cues[0].start, "00:00:00,000");
        assert_eq!(cues[0].end, "00:00:01,400");
    }

    #[test]
    fn test_empty_and_all_failed_input() {
        assert!(group_words(&[]).is_empty());

        let all_failed = vec![AlignedWord::failed("a"), AlignedWord::failed("b")];
        assert!(group_words(&all_failed).is_empty());
    }

    #[test]
    fn test_cue_timings_span_the_group() {
        let words = vec![
            word("a", 1.25, 1.5),
            word("b", 1.6, 2.0),
            word("c", 2.1, 2.75),
        ];

        let cues = group_words(&words);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, "00:00:01,250");
        assert_eq!(cues[0].end, "00:00:02,750");
    }

    #[test]
    fn test_render_srt_format() {
        let cues = vec![
            SubtitleCue {
                index: 1,
                start: "00:00:00,000".into(),
                end: "00:00:01,000".into(),
                text: "hello there".into(),
            },
            SubtitleCue {
                index: 2,
                start: "00:00:01,100".into(),
                end: "00:00:02,000".into(),
                text: "friend".into(),
            },
        ];

        let srt = render_srt(&cues);
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:01,000\nhello there\n\n\
             2\n00:00:01,100 --> 00:00:02,000\nfriend\n\n"
        );
    }
}
