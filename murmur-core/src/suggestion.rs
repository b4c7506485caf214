//! Message suggestions

/// Delimiter between suggestions in a generated completion.
pub const SUGGESTION_DELIMITER: &str = "||";

/// The prompt sent to the text generation service when a visitor asks
/// for message suggestions.
pub const SUGGESTION_PROMPT: &str = "Create a list of three open-ended and engaging questions \
formatted as a single string. Each question should be separated by '||'. These questions are \
for an anonymous social messaging platform and should encourage friendly interaction. Avoid \
personal or sensitive topics. Ensure all three questions are unique, intriguing, and suitable \
for a diverse audience. Do not repeat any examples from previous prompts.";

/// Split a generated completion into individual suggestions.
///
/// Fragments are trimmed and empty ones are dropped. Order is preserved.
/// The prompt asks for three suggestions, but the count isn't enforced.
pub fn parse_suggestions(text: &str) -> Vec<String> {
    text.split(SUGGESTION_DELIMITER)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_delimiter() {
        assert_eq!(parse_suggestions("A||B||C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_discards_empty_fragments() {
        assert_eq!(parse_suggestions("A|| ||C"), vec!["A", "C"]);
        assert_eq!(parse_suggestions("||A||||"), vec!["A"]);
        assert!(parse_suggestions("").is_empty());
    }

    #[test]
    fn test_trims_fragments() {
        assert_eq!(
            parse_suggestions(
                "What's a hobby you've recently started? || If you could have dinner with any \
                 historical figure, who would it be?||What's a simple thing that makes you happy?\n"
            ),
            vec![
                "What's a hobby you've recently started?",
                "If you could have dinner with any historical figure, who would it be?",
                "What's a simple thing that makes you happy?",
            ]
        );
    }

    #[test]
    fn test_single_pipe_is_not_a_delimiter() {
        assert_eq!(parse_suggestions("A|B"), vec!["A|B"]);
    }
}
