//! Recognition subsystem: landmarks in, words out.
//!
//! Provides:
//! - `landmarks`: hand keypoint frames as delivered by the pose estimator
//! - `gesture`: ordered-rule classifier from frames to `GestureLabel`
//! - `stability`: consecutive-match and interval debounce
//! - `sentence`: accepted words joined for display
//! - `translator`: display-side state tying the above together

pub mod gesture;
pub mod landmarks;
pub mod sentence;
pub mod stability;
pub mod translator;

pub use gesture::{Classification, ClassifierConfig, GestureClassifier, GestureLabel};
pub use landmarks::CapturedFrame;
pub use stability::StabilityConfig;
pub use translator::{Translator, TranslatorEvent};
