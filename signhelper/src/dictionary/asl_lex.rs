//! ASL-LEX 2.0 import: converts the `signdata.csv` release into the
//! `signs.json` dictionary format.
//!
//! Columns used:
//! - `EntryID` (or `LemmaID`): gloss identifier
//! - `SignBankEnglishTranslations`: English equivalents for the description
//! - `LexicalClass`: Noun, Verb, Adjective, ...
//! - `CDISemanticCategory`: semantic grouping (Animals, Food and Drink, ...)

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::data::{SignCategory, SignDataRoot, SignItem};

/// Semantic category → (category id, title, icon).
const CATEGORY_MAP: &[(&str, (&str, &str, &str))] = &[
    ("Animals", ("animals", "Animals", "hare.fill")),
    ("Food and Drink", ("food_drink", "Food and Drink", "fork.knife")),
    (
        "Outside Things and Places to Go",
        ("outside", "Places & Outdoors", "leaf.fill"),
    ),
    ("Clothing", ("clothing", "Clothing", "tshirt.fill")),
    (
        "Furniture and Rooms",
        ("furniture", "Furniture & Rooms", "bed.double.fill"),
    ),
    (
        "Small Household Items",
        ("household", "Household Items", "lamp.desk.fill"),
    ),
    ("People", ("people", "People", "person.2.fill")),
    ("Action Signs", ("actions", "Actions", "figure.walk")),
    ("Signs About Time", ("time", "Time", "clock.fill")),
    ("Attribute", ("attributes", "Attributes", "star.fill")),
    ("Event", ("events", "Events", "calendar")),
    ("Place", ("places", "Places", "map.fill")),
    (
        "Games and Routines",
        ("routines", "Greetings & Routines", "hand.wave.fill"),
    ),
    (
        "Mental State Terms",
        ("emotions", "Emotions & Feelings", "face.smiling"),
    ),
    ("None", ("general", "General", "hand.raised.fill")),
    ("-", ("general", "General", "hand.raised.fill")),
];

const GENERAL: (&str, &str, &str) = ("general", "General", "hand.raised.fill");

/// Sign ids that ship with a demonstration image.
const DEMO_IMAGES: &[(&str, &str)] = &[
    ("hello", "SignHello"),
    ("thank_you", "SignThankYou"),
    ("help", "SignHelp"),
    ("dog", "SignDog"),
    ("tree", "SignTree"),
    ("happy", "SignHappy"),
    ("hospital", "SignHospital"),
];

/// Failures while importing.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("input CSV not found: {0}")]
    NotFound(PathBuf),

    #[error("CSV must have EntryID or LemmaID. Columns: {0:?}")]
    MissingGloss(Vec<String>),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode signs.json: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Counts reported after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub signs: usize,
    pub categories: usize,
}

/// Turn a gloss into a stable, matchable id: `Candy_1` -> `candy`.
pub fn normalize_id(raw: &str) -> String {
    strip_variant(&raw.trim().to_lowercase()).replace(' ', "_")
}

/// Format a gloss for display: `thank_you` -> `Thank You`.
pub fn format_title(raw: &str) -> String {
    let s = strip_variant(raw.trim()).replace('_', " ");
    let parts: Vec<String> = s.split_whitespace().map(capitalize).collect();
    if parts.is_empty() {
        s
    } else {
        parts.join(" ")
    }
}

/// Icon by lexical class.
pub fn pick_icon(lexical_class: &str) -> &'static str {
    match lexical_class {
        "Noun" => "book.fill",
        "Verb" => "figure.walk",
        "Adjective" => "star.fill",
        _ => "hand.raised.fill",
    }
}

/// Remove a trailing `_<digits>` variant suffix.
fn strip_variant(s: &str) -> &str {
    match s.rfind('_') {
        Some(pos)
            if pos + 1 < s.len() && s[pos + 1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            &s[..pos]
        }
        _ => s,
    }
}

/// First character uppercased, the rest lowercased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn category_for(semantic: &str) -> (&'static str, &'static str, &'static str) {
    let key = if semantic.is_empty() { "None" } else { semantic };
    CATEGORY_MAP
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, info)| *info)
        .unwrap_or(GENERAL)
}

fn category_meta(id: &str) -> (&'static str, &'static str) {
    CATEGORY_MAP
        .iter()
        .find(|(_, (cid, _, _))| *cid == id)
        .map(|(_, (_, title, icon))| (*title, *icon))
        .unwrap_or((GENERAL.1, GENERAL.2))
}

fn demo_image(id: &str) -> Option<String> {
    DEMO_IMAGES
        .iter()
        .find(|(sid, _)| *sid == id)
        .map(|(_, img)| img.to_string())
}

/// Convert ASL-LEX CSV data into dictionary form.
pub fn convert<R: Read>(input: R) -> Result<SignDataRoot, ImportError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| {
            String::from_utf8_lossy(h)
                .trim_start_matches('\u{feff}')
                .to_string()
        })
        .collect();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let gloss_col = column("EntryID")
        .or_else(|| column("LemmaID"))
        .ok_or_else(|| ImportError::MissingGloss(headers.clone()))?;
    let trans_col = column("SignBankEnglishTranslations");
    let class_col = column("LexicalClass");
    let cat_col = column("CDISemanticCategory");

    let mut by_category: BTreeMap<&'static str, Vec<SignItem>> = BTreeMap::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for record in reader.byte_records() {
        let record = record?;
        let field = |col: Option<usize>| -> String {
            col.and_then(|c| record.get(c))
                .map(|b| String::from_utf8_lossy(b).trim().to_string())
                .unwrap_or_default()
        };

        let gloss = field(Some(gloss_col));
        if gloss.is_empty() {
            continue;
        }

        let id = normalize_id(&gloss);
        if !seen_ids.insert(id.clone()) {
            debug!("skipping duplicate gloss {}", gloss);
            continue;
        }

        let title = format_title(&gloss);
        let translations = field(trans_col);
        let description = if translations.is_empty() {
            format!("ASL sign for '{}'. (Source: ASL-LEX 2.0)", title)
        } else {
            format!("ASL sign: {}. (Source: ASL-LEX 2.0)", translations)
        };

        let (category_id, _, _) = category_for(&field(cat_col));
        let sign = SignItem {
            demo_image_name: demo_image(&id),
            image_name: pick_icon(&field(class_col)).to_string(),
            id,
            title,
            description,
        };
        by_category.entry(category_id).or_default().push(sign);
    }

    let categories = by_category
        .into_iter()
        .map(|(id, signs)| {
            let (title, icon) = category_meta(id);
            SignCategory {
                id: id.to_string(),
                title: title.to_string(),
                icon: icon.to_string(),
                difficulty: "Mixed".to_string(),
                signs,
            }
        })
        .collect();

    Ok(SignDataRoot { categories })
}

/// Convert `input` and write pretty-printed JSON to `output`.
pub fn import_file(input: &Path, output: &Path) -> Result<ImportSummary, ImportError> {
    if !input.exists() {
        return Err(ImportError::NotFound(input.to_path_buf()));
    }
    let file = File::open(input).map_err(|source| ImportError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let root = convert(BufReader::new(file))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ImportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let out = File::create(output).map_err(|source| ImportError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(out);
    serde_json::to_writer_pretty(&mut writer, &root)?;
    writer.flush().map_err(|source| ImportError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    let summary = ImportSummary {
        signs: root.categories.iter().map(|c| c.signs.len()).sum(),
        categories: root.categories.len(),
    };
    info!(
        "wrote {} signs in {} categories to {}",
        summary.signs,
        summary.categories,
        output.display()
    );
    Ok(summary)
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::SignDictionary;

    const SAMPLE: &str = "\u{feff}EntryID,SignBankEnglishTranslations,LexicalClass,CDISemanticCategory
hello,\"hello, hi\",Minor,Games and Routines
dog_1,dog,Noun,Animals
dog_2,puppy,Noun,Animals
thank_you,thanks,Minor,Games and Routines
,orphan,Noun,Animals
run,,Verb,
candy_12,sweet,Noun,Food and Drink
mystery,,Adjective,Not A Category
";

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("Candy_1"), "candy");
        assert_eq!(normalize_id(" thank you "), "thank_you");
        assert_eq!(normalize_id("version_2b"), "version_2b");
        assert_eq!(normalize_id("trailing_"), "trailing_");
    }

    #[test]
    fn test_format_title() {
        assert_eq!(format_title("thank_you"), "Thank You");
        assert_eq!(format_title("candy_1"), "Candy");
        assert_eq!(format_title("HELLO"), "Hello");
        assert_eq!(format_title(""), "");
    }

    #[test]
    fn test_pick_icon() {
        assert_eq!(pick_icon("Noun"), "book.fill");
        assert_eq!(pick_icon("Verb"), "figure.walk");
        assert_eq!(pick_icon("Adjective"), "star.fill");
        assert_eq!(pick_icon("Minor"), "hand.raised.fill");
    }

    #[test]
    fn test_convert_sample() {
        let root = convert(SAMPLE.as_bytes()).unwrap();
        let ids: Vec<&str> = root.categories.iter().map(|c| c.id.as_str()).collect();
        // Sorted by category id
        assert_eq!(ids, vec!["animals", "food_drink", "general", "routines"]);

        let animals = &root.categories[0];
        assert_eq!(animals.title, "Animals");
        assert_eq!(animals.difficulty, "Mixed");
        assert_eq!(animals.signs.len(), 1, "dog_2 is a duplicate of dog_1");
        let dog = &animals.signs[0];
        assert_eq!(dog.id, "dog");
        assert_eq!(dog.title, "Dog");
        assert_eq!(dog.description, "ASL sign: dog. (Source: ASL-LEX 2.0)");
        assert_eq!(dog.image_name, "book.fill");
        assert_eq!(dog.demo_image_name.as_deref(), Some("SignDog"));

        let general = &root.categories[2];
        let general_ids: Vec<&str> = general.signs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(general_ids, vec!["run", "mystery"]);
        assert_eq!(
            general.signs[0].description,
            "ASL sign for 'Run'. (Source: ASL-LEX 2.0)"
        );
        assert_eq!(general.signs[0].image_name, "figure.walk");

        let routines = &root.categories[3];
        assert_eq!(routines.title, "Greetings & Routines");
        assert_eq!(routines.signs[0].description, "ASL sign: hello, hi. (Source: ASL-LEX 2.0)");
        assert_eq!(routines.signs[1].id, "thank_you");
        assert_eq!(routines.signs[1].title, "Thank You");
    }

    #[test]
    fn test_lemma_id_column() {
        let csv = "LemmaID,LexicalClass\nTree,Noun\n";
        let root = convert(csv.as_bytes()).unwrap();
        assert_eq!(root.categories.len(), 1);
        assert_eq!(root.categories[0].id, "general");
        assert_eq!(root.categories[0].signs[0].id, "tree");
    }

    #[test]
    fn test_missing_gloss_column() {
        let csv = "Word,LexicalClass\ntree,Noun\n";
        let err = convert(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::MissingGloss(cols) if cols.len() == 2));
    }

    #[test]
    fn test_import_file_roundtrips_through_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("signdata.csv");
        std::fs::write(&input, SAMPLE).unwrap();
        let output = dir.path().join("out").join("signs.json");

        let summary = import_file(&input, &output).unwrap();
        assert_eq!(summary, ImportSummary { signs: 6, categories: 4 });

        let dict = SignDictionary::from_path(&output).unwrap();
        assert_eq!(dict.sign_count(), 6);
        assert_eq!(dict.sign("candy").unwrap().title, "Candy");
    }

    #[test]
    fn test_import_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = import_file(&dir.path().join("nope.csv"), &dir.path().join("signs.json"))
            .unwrap_err();
        assert!(matches!(err, ImportError::NotFound(_)));
    }
}
