//! Headline-shape heuristic.
//!
//! Headlines and fragments are inherently more ambiguous than full
//! articles, so the decision layer applies a stricter acceptance threshold
//! to them. This is a heuristic, not a classifier: it runs on every request
//! before the expensive inference call and must stay cheap.

/// Returns true when the cleaned text looks like a bare headline: fewer
/// than 15 words and no sentence-terminal punctuation anywhere.
pub fn is_headline_only(cleaned: &str) -> bool {
    let word_count = cleaned.split_whitespace().count();
    let has_terminal_punctuation = cleaned.chars().any(|c| matches!(c, '.' | '!' | '?'));

    word_count < 15 && !has_terminal_punctuation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_unpunctuated_text_is_headline() {
        assert!(is_headline_only("Scientists discover new material"));
    }

    #[test]
    fn test_punctuated_text_is_not_headline() {
        assert!(!is_headline_only(
            "Scientists discovered a new material. It is remarkable."
        ));
    }

    #[test]
    fn test_short_text_with_question_mark_is_not_headline() {
        assert!(!is_headline_only("Is this the cure for aging?"));
    }

    #[test]
    fn test_long_unpunctuated_text_is_not_headline() {
        // 15 words, no terminal punctuation: at the word-count boundary the
        // text no longer qualifies
        let fifteen = "one two three four five six seven eight nine ten \
                       eleven twelve thirteen fourteen fifteen";
        assert_eq!(fifteen.split_whitespace().count(), 15);
        assert!(!is_headline_only(fifteen));
    }

    #[test]
    fn test_fourteen_words_is_headline() {
        let fourteen = "one two three four five six seven eight nine ten \
                        eleven twelve thirteen fourteen";
        assert_eq!(fourteen.split_whitespace().count(), 14);
        assert!(is_headline_only(fourteen));
    }

    #[test]
    fn test_empty_text_is_headline_shaped() {
        // Zero words, no punctuation: treated as maximally ambiguous
        assert!(is_headline_only(""));
    }
}
