//! Live translation state: what is being detected right now and the
//! sentence built so far.
//!
//! Owns the stability filter and the sentence accumulator.  Only the
//! display context touches this state; classifications arrive already
//! computed.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use super::gesture::{Classification, GestureLabel};
use super::sentence::SentenceAccumulator;
use super::stability::{StabilityConfig, StabilityFilter};

// ── Events ─────────────────────────────────────────────────

/// Changes visible to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum TranslatorEvent {
    /// The per-frame guess changed.
    GestureChanged {
        label: Option<GestureLabel>,
        confidence: f32,
    },
    /// A stable word was appended.
    WordAccepted {
        label: GestureLabel,
        sentence: String,
    },
    /// The sentence was cleared.
    SentenceCleared,
}

// ── State ──────────────────────────────────────────────────

/// Translation screen state.
#[derive(Debug, Clone)]
pub struct Translator {
    filter: StabilityFilter,
    sentence: SentenceAccumulator,
    /// Latest per-frame guess.
    current: Classification,
    /// Whether frames are being translated.
    active: bool,
}

impl Translator {
    pub fn new(config: StabilityConfig) -> Self {
        Self {
            filter: StabilityFilter::new(config),
            sentence: SentenceAccumulator::new(),
            current: Classification::none(),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&mut self) {
        if !self.active {
            info!("translation started");
        }
        self.active = true;
    }

    /// Stop translating.  Clears the sentence and debounce state.
    pub fn stop(&mut self) -> Vec<TranslatorEvent> {
        self.active = false;
        self.filter.reset();
        self.current = Classification::none();
        info!("translation stopped");
        self.clear_sentence()
    }

    /// Clear the accumulated sentence.
    pub fn clear_sentence(&mut self) -> Vec<TranslatorEvent> {
        if self.sentence.is_empty() {
            return Vec::new();
        }
        self.sentence.clear();
        vec![TranslatorEvent::SentenceCleared]
    }

    /// Apply one classification observed at session time `now`.
    pub fn apply(&mut self, classification: Classification, now: Duration) -> Vec<TranslatorEvent> {
        if !self.active {
            return Vec::new();
        }

        let mut events = Vec::new();

        if classification.label != self.current.label {
            events.push(TranslatorEvent::GestureChanged {
                label: classification.label,
                confidence: classification.confidence,
            });
        }
        self.current = classification;

        if let Some(label) = self.filter.observe(classification.label, now) {
            self.sentence.push(label);
            let sentence = self.sentence.text();
            debug!("sentence now: {}", sentence);
            events.push(TranslatorEvent::WordAccepted { label, sentence });
        }

        events
    }

    /// Latest per-frame guess as display text.
    pub fn current_gesture(&self) -> &'static str {
        self.current.label_text()
    }

    pub fn sentence(&self) -> &SentenceAccumulator {
        &self.sentence
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(StabilityConfig::default())
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(label: GestureLabel) -> Classification {
        Classification {
            label: Some(label),
            confidence: 0.9,
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_inactive_ignores_input() {
        let mut t = Translator::default();
        assert!(t.apply(hit(GestureLabel::Hello), ms(0)).is_empty());
        assert_eq!(t.current_gesture(), "");
    }

    #[test]
    fn test_gesture_changed_only_on_change() {
        let mut t = Translator::default();
        t.start();
        let events = t.apply(hit(GestureLabel::Dog), ms(0));
        assert!(matches!(
            events.as_slice(),
            [TranslatorEvent::GestureChanged {
                label: Some(GestureLabel::Dog),
                ..
            }]
        ));
        assert!(t.apply(hit(GestureLabel::Dog), ms(33)).is_empty());
        assert_eq!(t.current_gesture(), "Dog");
    }

    #[test]
    fn test_word_accepted_builds_sentence() {
        let mut t = Translator::default();
        t.start();
        let mut accepted = Vec::new();
        for i in 0..4 {
            accepted.extend(t.apply(hit(GestureLabel::Hello), ms(i * 100)));
        }
        for i in 0..4 {
            accepted.extend(t.apply(hit(GestureLabel::ThankYou), ms(1500 + i * 100)));
        }
        let words: Vec<_> = accepted
            .iter()
            .filter_map(|e| match e {
                TranslatorEvent::WordAccepted { sentence, .. } => Some(sentence.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(words, vec!["Hello".to_string(), "Hello Thank You".to_string()]);
        assert_eq!(t.sentence().text(), "Hello Thank You");
    }

    #[test]
    fn test_no_match_clears_current_but_keeps_sentence() {
        let mut t = Translator::default();
        t.start();
        for i in 0..4 {
            t.apply(hit(GestureLabel::Help), ms(i * 100));
        }
        let events = t.apply(Classification::none(), ms(500));
        assert_eq!(
            events,
            vec![TranslatorEvent::GestureChanged {
                label: None,
                confidence: 0.0
            }]
        );
        assert_eq!(t.current_gesture(), "");
        assert_eq!(t.sentence().text(), "Help");
    }

    #[test]
    fn test_clear_sentence() {
        let mut t = Translator::default();
        t.start();
        assert!(t.clear_sentence().is_empty());
        for i in 0..4 {
            t.apply(hit(GestureLabel::Tree), ms(i * 100));
        }
        assert_eq!(t.clear_sentence(), vec![TranslatorEvent::SentenceCleared]);
        assert!(t.sentence().is_empty());
        assert!(t.is_active());
    }

    #[test]
    fn test_stop_resets() {
        let mut t = Translator::default();
        t.start();
        for i in 0..4 {
            t.apply(hit(GestureLabel::Hospital), ms(i * 100));
        }
        let events = t.stop();
        assert_eq!(events, vec![TranslatorEvent::SentenceCleared]);
        assert!(!t.is_active());
        assert_eq!(t.current_gesture(), "");

        // Restarting does not inherit the acceptance timer
        t.start();
        let mut accepted = false;
        for i in 0..4 {
            accepted |= t
                .apply(hit(GestureLabel::Hospital), ms(400 + i * 10))
                .iter()
                .any(|e| matches!(e, TranslatorEvent::WordAccepted { .. }));
        }
        assert!(accepted);
    }
}
