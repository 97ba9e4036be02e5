/// Types, formats and configuration shared across the brailleur workspace.
///
/// This crate holds the six-dot cell model, the three braille encodings
/// (unicode, dot numbers, binary vectors), the engine capability trait and
/// the TOML configuration. It never talks to liblouis itself.

pub mod cell;
pub mod config;
pub mod error;
pub mod format;
pub mod script;
pub mod traits;

pub use cell::Cell;
pub use config::BrailleConfig;
pub use error::{CoreError, EngineError, FormatError};
pub use format::{BrailleText, Format};
pub use script::Language;
pub use traits::{BrailleEngine, Direction};
