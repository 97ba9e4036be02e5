use crate::error::EngineError;

/// Direction of an engine call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Text → braille.
    Forward,
    /// Braille → text.
    Backward,
}

/// Braille translation engine seen as an opaque capability.
///
/// Implémenté par : `LouTranslate` (subprocess liblouis). Tests plug
/// in-process fakes. Nothing above this trait knows which engine runs.
///
/// # Example
/// ```
/// use brl_core::traits::{BrailleEngine, Direction};
/// use brl_core::EngineError;
///
/// struct Echo;
/// impl BrailleEngine for Echo {
///     fn translate(&self, input: &str, _table: &str, _dir: Direction)
///         -> Result<String, EngineError> { Ok(input.to_string()) }
///     fn name(&self) -> &'static str { "echo" }
/// }
/// assert_eq!(Echo.translate("⠁", "any", Direction::Backward).unwrap(), "⠁");
/// ```
pub trait BrailleEngine {
    /// Translate `input` with the comma-separated table list `table`.
    ///
    /// `input` may hold several lines; the output keeps the line structure.
    /// Forward output is expected as Unicode braille.
    ///
    /// # Errors
    /// Any [`EngineError`]; there are no partial results.
    fn translate(
        &self,
        input: &str,
        table: &str,
        direction: Direction,
    ) -> Result<String, EngineError>;

    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;
}

impl<E: BrailleEngine + ?Sized> BrailleEngine for &E {
    fn translate(
        &self,
        input: &str,
        table: &str,
        direction: Direction,
    ) -> Result<String, EngineError> {
        (**self).translate(input, table, direction)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<E: BrailleEngine + ?Sized> BrailleEngine for Box<E> {
    fn translate(
        &self,
        input: &str,
        table: &str,
        direction: Direction,
    ) -> Result<String, EngineError> {
        (**self).translate(input, table, direction)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
