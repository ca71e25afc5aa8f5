//! Text-to-sign lookup.
//!
//! Exact, case-insensitive matching against dictionary titles and ids:
//! first the whole phrase, then each word.  No fuzzy matching, no ranking.

use std::collections::HashSet;

use tracing::debug;
use unicode_general_category::{get_general_category, GeneralCategory};

use super::data::{SignDictionary, SignItem};

/// Phrases offered as one-tap examples.
pub const DEMO_PHRASES: [&str; 7] = [
    "hello",
    "thank you",
    "help",
    "dog",
    "tree",
    "happy",
    "hospital",
];

/// Signs matching `input`, phrase match first, duplicates removed by id.
pub fn text_to_sign<'a>(dictionary: &'a SignDictionary, input: &str) -> Vec<&'a SignItem> {
    let phrase = input.trim().to_lowercase();
    if phrase.is_empty() {
        return Vec::new();
    }

    let signs = dictionary.all_signs();
    let mut collected: Vec<&SignItem> = Vec::new();

    let phrase_id = phrase.replace(' ', "_");
    if let Some(sign) = signs
        .iter()
        .copied()
        .find(|s| s.title.to_lowercase() == phrase || s.id.to_lowercase() == phrase_id)
    {
        collected.push(sign);
    }

    for word in split_words(&phrase) {
        if let Some(sign) = signs
            .iter()
            .copied()
            .find(|s| s.title.to_lowercase() == word || s.id.to_lowercase() == word)
        {
            collected.push(sign);
        }
    }

    let mut seen = HashSet::new();
    collected.retain(|s| seen.insert(s.id.as_str()));
    debug!("lookup {:?}: {} match(es)", input, collected.len());
    collected
}

/// Split on whitespace and Unicode punctuation (category P*), dropping
/// empty pieces.  Symbols such as `+` or `$` stay inside words.
fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || is_punctuation(c))
        .filter(|w| !w.is_empty())
}

fn is_punctuation(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
    )
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(found: &[&SignItem]) -> Vec<String> {
        found.iter().map(|s| s.id.clone()).collect()
    }

    fn bundled() -> SignDictionary {
        SignDictionary::bundled().unwrap()
    }

    #[test]
    fn test_hello() {
        let dict = bundled();
        let found = text_to_sign(&dict, "hello");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title.to_lowercase(), "hello");
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let dict = bundled();
        assert_eq!(ids(&text_to_sign(&dict, "  HeLLo \n")), vec!["hello"]);
    }

    #[test]
    fn test_phrase_match_by_title_and_id() {
        let dict = bundled();
        assert_eq!(ids(&text_to_sign(&dict, "Thank You")), vec!["thank_you"]);
        assert_eq!(ids(&text_to_sign(&dict, "thank_you")), vec!["thank_you"]);
    }

    #[test]
    fn test_word_matches_in_order() {
        let dict = bundled();
        let found = text_to_sign(&dict, "Help! The dog is at the hospital, by a tree.");
        assert_eq!(ids(&found), vec!["help", "dog", "hospital", "tree"]);
    }

    #[test]
    fn test_unicode_punctuation_splits_words() {
        let dict = bundled();
        assert_eq!(ids(&text_to_sign(&dict, "hello，dog")), vec!["hello", "dog"]);
        assert_eq!(
            ids(&text_to_sign(&dict, "«tree» – happy¿help?")),
            vec!["tree", "happy", "help"]
        );
    }

    #[test]
    fn test_symbols_do_not_split_words() {
        let dict = bundled();
        assert!(text_to_sign(&dict, "dog+tree").is_empty());
        assert!(text_to_sign(&dict, "$hello").is_empty());
        assert_eq!(ids(&text_to_sign(&dict, "dog + tree")), vec!["dog", "tree"]);
    }

    #[test]
    fn test_duplicates_removed() {
        let dict = bundled();
        let found = text_to_sign(&dict, "dog dog, DOG");
        assert_eq!(ids(&found), vec!["dog"]);

        // Phrase match comes first and is not repeated by the word pass
        let found = text_to_sign(&dict, "hello");
        assert_eq!(ids(&found), vec!["hello"]);
    }

    #[test]
    fn test_unmatched_is_empty() {
        let dict = bundled();
        assert!(text_to_sign(&dict, "xylophone quantum").is_empty());
        assert!(text_to_sign(&dict, "").is_empty());
        assert!(text_to_sign(&dict, "   ").is_empty());
    }

    #[test]
    fn test_no_duplicate_ids_in_any_result() {
        let dict = bundled();
        for phrase in DEMO_PHRASES {
            assert!(
                !text_to_sign(&dict, phrase).is_empty(),
                "demo phrase {phrase} has no sign"
            );
        }
        let found = text_to_sign(&dict, "tree, hello tree. happy hello help happy");
        let unique: HashSet<String> = ids(&found).into_iter().collect();
        assert_eq!(unique.len(), found.len());
        assert_eq!(ids(&found), vec!["tree", "hello", "happy", "help"]);
    }

    #[test]
    fn test_fallback_dictionary() {
        let dict = SignDictionary::fallback();
        assert_eq!(ids(&text_to_sign(&dict, "hello there")), vec!["hello"]);
        assert!(text_to_sign(&dict, "dog").is_empty());
    }
}
