//! Hand landmark frames as produced by a hand-pose estimator.
//!
//! Models the 21 keypoints of a vision-framework hand pose observation.
//! Coordinates are normalized to [0,1] with the origin at the bottom-left
//! (y grows upward); every point carries its own confidence.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

// ── Joint definitions ──────────────────────────────────────

/// The 21 hand keypoints reported by the pose estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandJoint {
    Wrist,
    ThumbCmc,
    ThumbMp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    LittleMcp,
    LittlePip,
    LittleDip,
    LittleTip,
}

/// Total number of keypoints per hand.
pub const JOINT_COUNT: usize = 21;

/// All joints in index order.
const ALL_JOINTS: [HandJoint; JOINT_COUNT] = [
    HandJoint::Wrist,
    HandJoint::ThumbCmc,
    HandJoint::ThumbMp,
    HandJoint::ThumbIp,
    HandJoint::ThumbTip,
    HandJoint::IndexMcp,
    HandJoint::IndexPip,
    HandJoint::IndexDip,
    HandJoint::IndexTip,
    HandJoint::MiddleMcp,
    HandJoint::MiddlePip,
    HandJoint::MiddleDip,
    HandJoint::MiddleTip,
    HandJoint::RingMcp,
    HandJoint::RingPip,
    HandJoint::RingDip,
    HandJoint::RingTip,
    HandJoint::LittleMcp,
    HandJoint::LittlePip,
    HandJoint::LittleDip,
    HandJoint::LittleTip,
];

impl HandJoint {
    /// Convert joint enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Name used in frame files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb_cmc",
            Self::ThumbMp => "thumb_mp",
            Self::ThumbIp => "thumb_ip",
            Self::ThumbTip => "thumb_tip",
            Self::IndexMcp => "index_mcp",
            Self::IndexPip => "index_pip",
            Self::IndexDip => "index_dip",
            Self::IndexTip => "index_tip",
            Self::MiddleMcp => "middle_mcp",
            Self::MiddlePip => "middle_pip",
            Self::MiddleDip => "middle_dip",
            Self::MiddleTip => "middle_tip",
            Self::RingMcp => "ring_mcp",
            Self::RingPip => "ring_pip",
            Self::RingDip => "ring_dip",
            Self::RingTip => "ring_tip",
            Self::LittleMcp => "little_mcp",
            Self::LittlePip => "little_pip",
            Self::LittleDip => "little_dip",
            Self::LittleTip => "little_tip",
        }
    }

    /// Parse a joint name as written in frame files.
    pub fn parse(s: &str) -> Option<Self> {
        ALL_JOINTS.iter().copied().find(|j| j.as_str() == s)
    }

    /// Fingertip joints, thumb first.
    pub fn fingertip_joints() -> [HandJoint; 5] {
        [
            Self::ThumbTip,
            Self::IndexTip,
            Self::MiddleTip,
            Self::RingTip,
            Self::LittleTip,
        ]
    }

    /// Points a frame must carry confidently to be classified at all.
    pub fn key_joints() -> [HandJoint; 3] {
        [Self::ThumbTip, Self::IndexTip, Self::Wrist]
    }
}

// ── Chirality ──────────────────────────────────────────────

/// Which hand, when the estimator reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chirality {
    Left,
    Right,
}

impl Chirality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

// ── Points ─────────────────────────────────────────────────

/// A single normalized keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    /// Detection confidence (0.0-1.0).
    pub confidence: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self {
            x,
            y,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &LandmarkPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between two points. Confidence is the lower of the two.
    pub fn midpoint(&self, other: &LandmarkPoint) -> LandmarkPoint {
        LandmarkPoint {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            confidence: self.confidence.min(other.confidence),
        }
    }
}

/// Rejections raised while building a frame from untrusted input.
#[derive(Debug, thiserror::Error)]
pub enum LandmarkError {
    #[error("unknown joint name: {0}")]
    UnknownJoint(String),

    #[error("non-finite coordinate for joint {0}")]
    NonFinite(&'static str),

    #[error("more than two hands in one frame ({0})")]
    TooManyHands(usize),
}

// ── Hand frame ─────────────────────────────────────────────

/// Snapshot of one hand's keypoints for a single camera frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawHandFrame")]
pub struct HandLandmarkFrame {
    /// Reported chirality, if any.
    pub chirality: Option<Chirality>,
    /// Observation-level confidence, if the estimator reports one.
    pub confidence: Option<f32>,
    points: [Option<LandmarkPoint>; JOINT_COUNT],
}

impl HandLandmarkFrame {
    /// Create an empty frame with no detected points.
    pub fn new(chirality: Option<Chirality>) -> Self {
        Self {
            chirality,
            confidence: None,
            points: [None; JOINT_COUNT],
        }
    }

    /// Builder-style setter for a single point.
    pub fn with_point(mut self, joint: HandJoint, x: f32, y: f32, confidence: f32) -> Self {
        self.points[joint.index()] = Some(LandmarkPoint::new(x, y, confidence));
        self
    }

    /// Builder-style setter for the observation confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    /// Point for a joint, if it was detected.
    pub fn point(&self, joint: HandJoint) -> Option<&LandmarkPoint> {
        self.points[joint.index()].as_ref()
    }

    /// Point for a joint, only if its confidence is strictly above `floor`.
    pub fn confident_point(&self, joint: HandJoint, floor: f32) -> Option<&LandmarkPoint> {
        self.point(joint).filter(|p| p.confidence > floor)
    }

    /// Number of detected points.
    pub fn detected_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    /// Observation confidence, or the mean confidence of the key points.
    pub fn overall_confidence(&self) -> f32 {
        if let Some(c) = self.confidence {
            return c;
        }
        let key: Vec<f32> = HandJoint::key_joints()
            .iter()
            .filter_map(|j| self.point(*j).map(|p| p.confidence))
            .collect();
        if key.is_empty() {
            0.0
        } else {
            key.iter().sum::<f32>() / key.len() as f32
        }
    }
}

/// Wire shape of a hand frame: points keyed by joint name.
#[derive(Debug, Deserialize)]
struct RawHandFrame {
    #[serde(default)]
    chirality: Option<Chirality>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    points: BTreeMap<String, LandmarkPoint>,
}

impl TryFrom<RawHandFrame> for HandLandmarkFrame {
    type Error = LandmarkError;

    fn try_from(raw: RawHandFrame) -> Result<Self, Self::Error> {
        let mut frame = HandLandmarkFrame::new(raw.chirality);
        frame.confidence = raw.confidence.map(|c| c.clamp(0.0, 1.0));
        for (name, point) in raw.points {
            let joint =
                HandJoint::parse(&name).ok_or_else(|| LandmarkError::UnknownJoint(name.clone()))?;
            if !point.x.is_finite() || !point.y.is_finite() || !point.confidence.is_finite() {
                return Err(LandmarkError::NonFinite(joint.as_str()));
            }
            frame.points[joint.index()] =
                Some(LandmarkPoint::new(point.x, point.y, point.confidence));
        }
        debug!(
            "hand frame: {} points, chirality {:?}",
            frame.detected_count(),
            frame.chirality.map(|c| c.as_str()),
        );
        Ok(frame)
    }
}

// ── Captured frame ─────────────────────────────────────────

/// Everything the estimator saw in one camera frame.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawCapturedFrame")]
pub struct CapturedFrame {
    /// Capture time in milliseconds since the stream started.
    pub timestamp_ms: Option<u64>,
    /// Zero, one or two hands.
    pub hands: Vec<HandLandmarkFrame>,
}

#[derive(Debug, Deserialize)]
struct RawCapturedFrame {
    #[serde(default)]
    timestamp_ms: Option<u64>,
    #[serde(default)]
    hands: Vec<HandLandmarkFrame>,
}

impl TryFrom<RawCapturedFrame> for CapturedFrame {
    type Error = LandmarkError;

    fn try_from(raw: RawCapturedFrame) -> Result<Self, Self::Error> {
        if raw.hands.len() > 2 {
            return Err(LandmarkError::TooManyHands(raw.hands.len()));
        }
        Ok(CapturedFrame {
            timestamp_ms: raw.timestamp_ms,
            hands: raw.hands,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────
