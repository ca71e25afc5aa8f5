//! Sign dictionary entries and the `signs.json` loader.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Dictionary compiled into the binary.
const BUNDLED_SIGNS: &str = include_str!("../../data/signs.json");

// ── Entries ────────────────────────────────────────────────

/// A single sign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignItem {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Symbol name used as the fallback icon.
    pub image_name: String,
    /// Demonstration image, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_image_name: Option<String>,
}

impl SignItem {
    pub fn new(id: &str, title: &str, description: &str, image_name: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            image_name: image_name.to_string(),
            demo_image_name: None,
        }
    }
}

/// A group of signs taught together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignCategory {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub difficulty: String,
    pub signs: Vec<SignItem>,
}

/// Top-level shape of `signs.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignDataRoot {
    pub categories: Vec<SignCategory>,
}

/// Failures while reading a dictionary file.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

// ── Dictionary ─────────────────────────────────────────────

/// Loaded categories.  Read-only after construction.
#[derive(Debug, Clone)]
pub struct SignDictionary {
    categories: Vec<SignCategory>,
}

impl SignDictionary {
    pub fn new(categories: Vec<SignCategory>) -> Self {
        Self { categories }
    }

    /// Parse dictionary JSON text.
    pub fn from_json(origin: &str, text: &str) -> Result<Self, DictionaryError> {
        let root: SignDataRoot =
            serde_json::from_str(text).map_err(|source| DictionaryError::Decode {
                origin: origin.to_string(),
                source,
            })?;
        Ok(Self::new(root.categories))
    }

    /// Read and parse a dictionary file.
    pub fn from_path(path: &Path) -> Result<Self, DictionaryError> {
        let text = std::fs::read_to_string(path).map_err(|source| DictionaryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&path.display().to_string(), &text)
    }

    /// The dictionary compiled into the binary.
    pub fn bundled() -> Result<Self, DictionaryError> {
        Self::from_json("bundled signs.json", BUNDLED_SIGNS)
    }

    /// Load `path` (or the bundled data when `None`), falling back to a
    /// single hardcoded entry if that fails.
    pub fn load_or_fallback(path: Option<&Path>) -> Self {
        let loaded = match path {
            Some(p) => Self::from_path(p),
            None => Self::bundled(),
        };
        match loaded {
            Ok(dict) => {
                info!(
                    "sign dictionary: {} categories, {} signs",
                    dict.categories.len(),
                    dict.sign_count(),
                );
                dict
            }
            Err(e) => {
                warn!("sign dictionary unavailable, using fallback entry: {}", e);
                Self::fallback()
            }
        }
    }

    /// Minimal in-memory dataset.
    pub fn fallback() -> Self {
        Self::new(vec![SignCategory {
            id: "fallback_greetings".to_string(),
            title: "Greetings".to_string(),
            icon: "hand.wave.fill".to_string(),
            difficulty: "Easy".to_string(),
            signs: vec![SignItem::new(
                "hello",
                "Hello",
                "Raise hand and wave side to side.",
                "hand.wave.fill",
            )],
        }])
    }

    pub fn categories(&self) -> &[SignCategory] {
        &self.categories
    }

    /// Category by id.
    pub fn category(&self, id: &str) -> Option<&SignCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Every sign, in category order.
    pub fn all_signs(&self) -> Vec<&SignItem> {
        self.categories.iter().flat_map(|c| c.signs.iter()).collect()
    }

    /// Sign by id.
    pub fn sign(&self, id: &str) -> Option<&SignItem> {
        let found = self
            .categories
            .iter()
            .flat_map(|c| c.signs.iter())
            .find(|s| s.id == id);
        if found.is_none() {
            debug!("no sign with id {}", id);
        }
        found
    }

    pub fn sign_count(&self) -> usize {
        self.categories.iter().map(|c| c.signs.len()).sum()
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::GestureLabel;
    use std::io::Write;

    #[test]
    fn test_bundled_parses() {
        let dict = SignDictionary::bundled().unwrap();
        assert!(!dict.categories().is_empty());
        assert_eq!(dict.sign("hello").unwrap().title, "Hello");
    }

    #[test]
    fn test_bundled_covers_every_label() {
        let dict = SignDictionary::bundled().unwrap();
        for label in GestureLabel::ALL {
            let sign = dict.sign(label.sign_id()).unwrap();
            assert_eq!(sign.title, label.as_str());
            assert!(sign.demo_image_name.is_some());
        }
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dict = SignDictionary::load_or_fallback(Some(Path::new(
            "/nonexistent/signhelper/signs.json",
        )));
        assert_eq!(dict.categories().len(), 1);
        assert_eq!(dict.sign_count(), 1);
        assert_eq!(dict.categories()[0].id, "fallback_greetings");
        assert_eq!(dict.all_signs()[0].id, "hello");
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"categories\": [").unwrap();
        let err = SignDictionary::from_path(file.path()).unwrap_err();
        assert!(matches!(err, DictionaryError::Decode { .. }));
        let dict = SignDictionary::load_or_fallback(Some(file.path()));
        assert_eq!(dict.sign_count(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = r#"{"categories": [{
            "id": "food", "title": "Food", "icon": "fork.knife", "difficulty": "Mixed",
            "signs": [
                {"id": "apple", "title": "Apple", "description": "Twist knuckle on cheek.", "imageName": "book.fill"},
                {"id": "milk", "title": "Milk", "description": "Squeeze fist.", "imageName": "book.fill", "demoImageName": "SignMilk"}
            ]
        }]}"#;
        file.write_all(json.as_bytes()).unwrap();
        let dict = SignDictionary::load_or_fallback(Some(file.path()));
        assert_eq!(dict.sign_count(), 2);
        assert_eq!(dict.category("food").unwrap().signs.len(), 2);
        assert_eq!(dict.sign("apple").unwrap().demo_image_name, None);
        assert_eq!(
            dict.sign("milk").unwrap().demo_image_name.as_deref(),
            Some("SignMilk")
        );
    }

    #[test]
    fn test_serialize_camel_case() {
        let item = SignItem::new("dog", "Dog", "Snap.", "pawprint.fill");
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"imageName\":\"pawprint.fill\""));
        assert!(!json.contains("demoImageName"));
    }
}
