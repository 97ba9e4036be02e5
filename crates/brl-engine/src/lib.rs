/// Translation side of brailleur: the liblouis subprocess and the pipeline
/// that turns text into braille cells and back.

pub mod error;
pub mod louis;
pub mod translator;

pub use error::TranslateError;
pub use louis::LouTranslate;
pub use translator::{ContractionReport, Translator, WordDetail};
