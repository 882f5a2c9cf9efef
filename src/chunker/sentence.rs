/// Characters that end a sentence
const TERMINATORS: [char; 3] = ['.', '!', '?'];

fn is_terminator(c: char) -> bool {
    TERMINATORS.contains(&c)
}

/// Split text into sentence-like units on `.`, `!` and `?`.
///
/// A run of terminators ends one sentence. Each sentence is trimmed; segments
/// that are empty after trimming are dropped. Text after the last terminator
/// becomes a final sentence.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }

        // Swallow the rest of the terminator run
        let mut end = text.len();
        while let Some(&(idx, next)) = chars.peek() {
            if is_terminator(next) {
                chars.next();
            } else {
                end = idx;
                break;
            }
        }

        push_trimmed(&mut sentences, &text[start..end]);
        start = end;
    }

    if start < text.len() {
        push_trimmed(&mut sentences, &text[start..]);
    }

    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod sentence_tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(split_into_sentences("").is_empty());
        assert!(split_into_sentences("   \n ").is_empty());
    }

    #[test]
    fn test_basic_split() {
        let sentences = split_into_sentences("First one. Second one! Third one?");
        assert_eq!(sentences, vec!["First one.", "Second one!", "Third one?"]);
    }

    #[test]
    fn test_terminator_run_ends_one_sentence() {
        let sentences = split_into_sentences("Wait... what?! Really.");
        assert_eq!(sentences, vec!["Wait...", "what?!", "Really."]);
    }

    #[test]
    fn test_trailing_text_without_terminator() {
        let sentences = split_into_sentences("Done. And then some");
        assert_eq!(sentences, vec!["Done.", "And then some"]);
    }

    #[test]
    fn test_no_terminators() {
        let sentences = split_into_sentences("  just one long clause  ");
        assert_eq!(sentences, vec!["just one long clause"]);
    }

    #[test]
    fn test_leading_terminators_are_kept() {
        let sentences = split_into_sentences("... Then it began.");
        assert_eq!(sentences, vec!["...", "Then it began."]);
    }

    #[test]
    fn test_multibyte_text() {
        let sentences = split_into_sentences("Café ouvert. Très bien!");
        assert_eq!(sentences, vec!["Café ouvert.", "Très bien!"]);
    }

    #[test]
    fn test_newlines_inside_sentence() {
        let sentences = split_into_sentences("Line one\ncontinues here. Next.");
        assert_eq!(sentences, vec!["Line one\ncontinues here.", "Next."]);
    }
}
