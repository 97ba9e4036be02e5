use brl_core::error::{EngineError, FormatError};
use thiserror::Error;

/// Failure of a text ↔ braille conversion.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// The external engine failed (after the grade fallback, if any).
    #[error("Échec de traduction : {0}")]
    Engine(#[from] EngineError),

    /// The braille input was malformed; the engine was not called.
    #[error("Braille mal formé : {0}")]
    Format(#[from] FormatError),
}
