//! Accepted words joined into the running translation.

use super::gesture::GestureLabel;

/// Ordered list of accepted labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceAccumulator {
    words: Vec<GestureLabel>,
}

impl SentenceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: GestureLabel) {
        self.words.push(label);
    }

    pub fn words(&self) -> &[GestureLabel] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Display string: words separated by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let sentence = SentenceAccumulator::new();
        assert!(sentence.is_empty());
        assert_eq!(sentence.text(), "");
    }

    #[test]
    fn test_join_in_order() {
        let mut sentence = SentenceAccumulator::new();
        sentence.push(GestureLabel::Hello);
        sentence.push(GestureLabel::ThankYou);
        sentence.push(GestureLabel::Hello);
        assert_eq!(sentence.text(), "Hello Thank You Hello");
        assert_eq!(sentence.words().len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut sentence = SentenceAccumulator::new();
        sentence.push(GestureLabel::Dog);
        sentence.clear();
        assert!(sentence.is_empty());
    }
}
