//! Sign dictionary: bundled entries, text-to-sign lookup, the lesson
//! browser and the ASL-LEX importer.

pub mod asl_lex;
pub mod data;
pub mod lessons;
pub mod lookup;

pub use data::{SignDictionary, SignItem};
pub use lookup::{text_to_sign, DEMO_PHRASES};
