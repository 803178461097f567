//! Chat history formatter.
//!
//! Turns stored chat-log fragments into the bounded plain-text transcript
//! that is sent to the generation service alongside each user message.
//! Only speaker-tagged utterance lines survive; everything else a fragment
//! may carry (timestamps, system notes, blank lines) is dropped.

/// Number of most recent log fragments included in a transcript.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// Marker identifying a line spoken by the user.
pub const USER_MARKER: &str = "user:";

/// Marker identifying a line spoken by the character.
pub const BOT_MARKER: &str = "chatbot:";

/// Returns `true` when `line` is a speaker-tagged utterance.
pub fn is_speaker_line(line: &str) -> bool {
    line.contains(USER_MARKER) || line.contains(BOT_MARKER)
}

/// Concatenate log fragments into a single transcript.
///
/// `fragments` must already be in chronological order (oldest first).
/// Every retained line is terminated with `\n`. An empty slice yields an
/// empty string.
///
/// ```
/// use persona_core::history::format_history;
///
/// let logs = ["user: hi\nnoise\nchatbot: hello", "user: bye"];
/// assert_eq!(format_history(&logs), "user: hi\nchatbot: hello\nuser: bye\n");
/// ```
pub fn format_history<S: AsRef<str>>(fragments: &[S]) -> String {
    let mut history = String::new();
    for fragment in fragments {
        for line in fragment.as_ref().lines() {
            if is_speaker_line(line) {
                history.push_str(line);
                history.push('\n');
            }
        }
    }
    history
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_room_yields_empty_transcript() {
        let logs: [&str; 0] = [];
        assert_eq!(format_history(&logs), "");
    }

    #[test]
    fn keeps_only_speaker_lines() {
        let logs = ["[2024-01-01 10:00]\nuser: hello\n\nsystem: reset\nchatbot: hi there"];
        assert_eq!(format_history(&logs), "user: hello\nchatbot: hi there\n");
    }

    #[test]
    fn preserves_chronological_order_across_fragments() {
        let logs = [
            "user: first\nchatbot: one",
            "user: second\nchatbot: two",
            "user: third\nchatbot: three",
        ];
        let history = format_history(&logs);
        let lines: Vec<&str> = history.lines().collect();
        assert_eq!(
            lines,
            vec![
                "user: first",
                "chatbot: one",
                "user: second",
                "chatbot: two",
                "user: third",
                "chatbot: three",
            ]
        );
    }

    #[test]
    fn fragment_without_speaker_lines_contributes_nothing() {
        let logs = ["session opened", "user: ping"];
        assert_eq!(format_history(&logs), "user: ping\n");
    }

    #[test]
    fn marker_may_appear_mid_line() {
        assert!(is_speaker_line("12:01 user: hey"));
        assert!(is_speaker_line("12:02 chatbot: hey yourself"));
        assert!(!is_speaker_line("username changed"));
    }

    #[test]
    fn handles_crlf_line_endings() {
        let logs = ["user: a\r\nchatbot: b\r\n"];
        assert_eq!(format_history(&logs), "user: a\nchatbot: b\n");
    }
}
