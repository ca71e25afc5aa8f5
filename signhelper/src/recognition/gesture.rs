//! Gesture classification from hand landmark frames.
//!
//! Maps one or two `HandLandmarkFrame`s to a word from a small closed set
//! using an ordered list of geometric threshold rules.  First matching
//! rule wins.  The thresholds are demo constants, not a trained model.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::landmarks::{HandJoint, HandLandmarkFrame, LandmarkPoint};

// ── Labels ─────────────────────────────────────────────────

/// Words the classifier can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    Hello,
    ThankYou,
    Help,
    Dog,
    Tree,
    Happy,
    Hospital,
}

impl GestureLabel {
    /// Every label, in the order shown to users.
    pub const ALL: [GestureLabel; 7] = [
        Self::Hello,
        Self::ThankYou,
        Self::Help,
        Self::Dog,
        Self::Tree,
        Self::Happy,
        Self::Hospital,
    ];

    /// Display text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hello => "Hello",
            Self::ThankYou => "Thank You",
            Self::Help => "Help",
            Self::Dog => "Dog",
            Self::Tree => "Tree",
            Self::Happy => "Happy",
            Self::Hospital => "Hospital",
        }
    }

    /// Dictionary id of the matching sign entry.
    pub fn sign_id(&self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::ThankYou => "thank_you",
            Self::Help => "help",
            Self::Dog => "dog",
            Self::Tree => "tree",
            Self::Happy => "happy",
            Self::Hospital => "hospital",
        }
    }

    /// Comma-separated list of supported words.
    pub fn supported_hint() -> String {
        Self::ALL
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result of classifying one camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    /// Recognized word, `None` when nothing matched.
    pub label: Option<GestureLabel>,
    /// Confidence of the match; always 0 when `label` is `None`.
    pub confidence: f32,
}

impl Classification {
    /// The empty result.
    pub fn none() -> Self {
        Self {
            label: None,
            confidence: 0.0,
        }
    }

    fn matched(label: GestureLabel, confidence: f32) -> Self {
        Self {
            label: Some(label),
            confidence,
        }
    }

    /// Label text, empty when nothing matched.
    pub fn label_text(&self) -> &'static str {
        self.label.map(|l| l.as_str()).unwrap_or("")
    }
}

// ── Config ─────────────────────────────────────────────────

/// Thresholds for the rule list.  All distances are in normalized units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Key points at or below this confidence reject the whole hand.
    pub min_point_confidence: f32,
    /// Fingertip must be this far above the wrist to count as extended.
    pub vertical_margin: f32,
    /// ...or this far to either side of the wrist.
    pub horizontal_margin: f32,
    /// Hand centers at or above this height are in the upper region.
    pub upper_region_y: f32,
    /// Hand centers below this height are in the lower region.
    pub lower_region_y: f32,
    /// Thumb-to-middle tip distance for the snap shape.
    pub pinch_distance: f32,
    /// How far the thumb tip must sit above the index tip for thumbs-up.
    pub thumb_lead: f32,
    /// Index-to-middle tip distance for "fingers together".
    pub finger_together_distance: f32,
    /// Index tip height above the wrist for an upright forearm.
    pub upright_reach: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_point_confidence: 0.3,
            vertical_margin: 0.1,
            horizontal_margin: 0.08,
            upper_region_y: 0.6,
            lower_region_y: 0.4,
            pinch_distance: 0.05,
            thumb_lead: 0.03,
            finger_together_distance: 0.06,
            upright_reach: 0.25,
        }
    }
}

// ── Per-hand measurements ──────────────────────────────────

/// Geometry derived from one admitted hand.
#[derive(Debug, Clone)]
struct HandMeasure<'a> {
    frame: &'a HandLandmarkFrame,
    wrist: LandmarkPoint,
    thumb: LandmarkPoint,
    index: LandmarkPoint,
    /// Extended flag per fingertip, thumb first.
    extended: [bool; 5],
    center: LandmarkPoint,
}

impl HandMeasure<'_> {
    fn extended_count(&self) -> usize {
        self.extended.iter().filter(|e| **e).count()
    }

    fn confidence(&self) -> f32 {
        self.frame.overall_confidence()
    }
}

// ── Classifier ─────────────────────────────────────────────

/// Ordered-rule gesture classifier.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    pub config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify one camera frame's worth of hands.
    ///
    /// Only the first two hands are considered.  Single-hand rules run
    /// against each admitted hand in order; the two-hand rule runs only
    /// when two hands were admitted and no single-hand rule matched.
    pub fn classify(&self, hands: &[HandLandmarkFrame]) -> Classification {
        let admitted: Vec<HandMeasure<'_>> = hands
            .iter()
            .take(2)
            .filter_map(|h| self.measure(h))
            .collect();

        if admitted.is_empty() {
            trace!("no hand passed the confidence floor");
            return Classification::none();
        }

        for hand in &admitted {
            if let Some(label) = self.classify_single(hand) {
                debug!(
                    "classified {} ({} extended, center {:.2},{:.2})",
                    label.as_str(),
                    hand.extended_count(),
                    hand.center.x,
                    hand.center.y,
                );
                return Classification::matched(label, hand.confidence());
            }
        }

        if let [a, b] = admitted.as_slice() {
            if self.is_happy(a, b) {
                debug!("classified Happy (two hands open and low)");
                return Classification::matched(
                    GestureLabel::Happy,
                    (a.confidence() + b.confidence()) / 2.0,
                );
            }
        }

        Classification::none()
    }

    /// Admit a hand and derive its measurements, or reject it.
    fn measure<'a>(&self, frame: &'a HandLandmarkFrame) -> Option<HandMeasure<'a>> {
        let floor = self.config.min_point_confidence;
        let wrist = *frame.confident_point(HandJoint::Wrist, floor)?;
        let thumb = *frame.confident_point(HandJoint::ThumbTip, floor)?;
        let index = *frame.confident_point(HandJoint::IndexTip, floor)?;

        let mut extended = [false; 5];
        for (slot, joint) in extended.iter_mut().zip(HandJoint::fingertip_joints()) {
            *slot = frame
                .confident_point(joint, floor)
                .map(|tip| self.is_extended(tip, &wrist))
                .unwrap_or(false);
        }

        Some(HandMeasure {
            frame,
            wrist,
            thumb,
            index,
            extended,
            center: wrist.midpoint(&index),
        })
    }

    fn is_extended(&self, tip: &LandmarkPoint, wrist: &LandmarkPoint) -> bool {
        tip.y - wrist.y > self.config.vertical_margin
            || (tip.x - wrist.x).abs() > self.config.horizontal_margin
    }

    /// Single-hand rules, in priority order.
    fn classify_single(&self, hand: &HandMeasure<'_>) -> Option<GestureLabel> {
        let cfg = &self.config;
        let count = hand.extended_count();
        let cy = hand.center.y;

        // Hello: open hand raised high
        if count == 5 && cy >= cfg.upper_region_y {
            return Some(GestureLabel::Hello);
        }

        // Thank you: flat hand at chin level
        if count >= 4 && cy >= cfg.lower_region_y && cy < cfg.upper_region_y {
            return Some(GestureLabel::ThankYou);
        }

        // Dog: thumb snapping against middle finger
        let floor = cfg.min_point_confidence;
        if let Some(middle) = hand.frame.confident_point(HandJoint::MiddleTip, floor) {
            if hand.thumb.distance(middle) < cfg.pinch_distance {
                return Some(GestureLabel::Dog);
            }
        }

        // Help: thumbs up over a closed hand
        if hand.thumb.y - hand.wrist.y > cfg.vertical_margin
            && hand.thumb.y - hand.index.y > cfg.thumb_lead
            && count <= 2
        {
            return Some(GestureLabel::Help);
        }

        // Hospital: index and middle together, ring and little curled
        let [_, index_ext, middle_ext, ring_ext, little_ext] = hand.extended;
        if index_ext && middle_ext && !ring_ext && !little_ext {
            let together = hand
                .frame
                .confident_point(HandJoint::MiddleTip, floor)
                .map(|m| hand.index.distance(m) < cfg.finger_together_distance)
                .unwrap_or(false);
            if together {
                return Some(GestureLabel::Hospital);
            }
        }

        // Tree: upright forearm with open hand, low in frame
        if count >= 4 && cy < cfg.lower_region_y && hand.index.y - hand.wrist.y > cfg.upright_reach
        {
            return Some(GestureLabel::Tree);
        }

        None
    }

    /// Happy: both hands open and low.
    fn is_happy(&self, a: &HandMeasure<'_>, b: &HandMeasure<'_>) -> bool {
        let low = self.config.lower_region_y;
        a.extended_count() >= 4
            && b.extended_count() >= 4
            && a.center.y < low
            && b.center.y < low
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Build a hand frame from (joint, x, y) triples at a uniform confidence.
#[cfg(test)]
pub(crate) fn make_hand(points: &[(HandJoint, f32, f32)], confidence: f32) -> HandLandmarkFrame {
    points
        .iter()
        .fold(HandLandmarkFrame::new(None), |frame, (joint, x, y)| {
            frame.with_point(*joint, *x, *y, confidence)
        })
}

/// Open five-finger hand with the wrist at (x, y).
#[cfg(test)]
pub(crate) fn open_hand_at(x: f32, y: f32) -> HandLandmarkFrame {
    make_hand(
        &[
            (HandJoint::Wrist, x, y),
            (HandJoint::ThumbTip, x - 0.12, y + 0.08),
            (HandJoint::IndexTip, x - 0.05, y + 0.2),
            (HandJoint::MiddleTip, x, y + 0.22),
            (HandJoint::RingTip, x + 0.05, y + 0.2),
            (HandJoint::LittleTip, x + 0.1, y + 0.15),
        ],
        0.9,
    )
}

// ── Tests ──────────────────────────────────────────────────
