use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Unknown format or language name.
    #[error("Valeur non supportée : {value} (attendu : {expected})")]
    Unsupported {
        /// The rejected value.
        value: String,
        /// Human-readable list of accepted values.
        expected: &'static str,
    },
}

/// Malformed braille input, in any of the three encodings.
///
/// Always distinct from [`EngineError`]: a `FormatError` means the input
/// never reached the translation engine.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Character outside the six-dot braille block.
    #[error("Caractère non braille {ch:?} à la position {index}")]
    NotBraille {
        /// Offending character.
        ch: char,
        /// Character index within its line.
        index: usize,
    },

    /// Dot number outside 1..=6.
    #[error("Numéro de point hors limites : {dot} (attendu 1 à 6)")]
    DotOutOfRange {
        /// The rejected dot number.
        dot: u32,
    },

    /// Token that is neither `0` nor a list of dot digits.
    #[error("Cellule en points invalide : {token:?}")]
    InvalidDotToken {
        /// The rejected token.
        token: String,
    },

    /// Binary cell whose vector does not hold exactly six elements.
    #[error("Cellule binaire n°{index} : {len} éléments au lieu de 6")]
    VectorLength {
        /// Cell index in the input sequence.
        index: usize,
        /// Actual vector length.
        len: usize,
    },

    /// Binary element other than 0 or 1.
    #[error("Cellule binaire n°{index} : valeur {value} (attendu 0 ou 1)")]
    InvalidBit {
        /// Cell index in the input sequence.
        index: usize,
        /// The rejected value.
        value: i64,
    },

    /// Binary input that is not a JSON array of arrays of integers.
    #[error("JSON binaire invalide : {0}")]
    Json(#[from] serde_json::Error),

    /// `auto` input that matches none of the three encodings.
    #[error("Format d'entrée non reconnu (ni unicode, ni points, ni binaire)")]
    Undetected,
}

/// Failure of the external translation engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine binary could not be started (missing, not executable).
    #[error("Impossible de lancer {program} : {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while talking to a running engine process.
    #[error("Erreur d'échange avec le moteur : {0}")]
    Io(#[from] std::io::Error),

    /// The engine exited with a non-zero status (bad table, compile error...).
    #[error("Le moteur a échoué avec la table {table} (code {code:?}) : {stderr}")]
    Failed {
        /// Table list passed to the engine.
        table: String,
        /// Exit code, `None` if killed by a signal.
        code: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The engine succeeded but produced nothing for a non-empty input.
    #[error("Le moteur n'a produit aucune sortie avec la table {table}")]
    EmptyOutput {
        /// Table list passed to the engine.
        table: String,
    },

    /// Forward output that is not Unicode braille (display table missing?).
    #[error("Sortie non unicode de la table {table} : caractère {ch:?}")]
    NotUnicode {
        /// Table list passed to the engine.
        table: String,
        /// First non-braille character seen.
        ch: char,
    },

    /// `--version` failed: the binary runs but is not a usable liblouis.
    #[error("{program} --version a échoué (code {code:?}) : {stderr}")]
    Unavailable {
        /// Program that was asked for its version.
        program: String,
        /// Exit code, `None` if killed by a signal.
        code: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// Engine output that is not valid UTF-8.
    #[error("Sortie du moteur non UTF-8 : {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl EngineError {
    /// True when the failure is tied to the requested table rather than to
    /// the engine being unreachable. Only these failures trigger the
    /// grade-2 → grade-1 fallback.
    ///
    /// # Example
    /// ```
    /// use brl_core::EngineError;
    /// let e = EngineError::EmptyOutput { table: "en-us-g2.ctb".into() };
    /// assert!(e.is_table_failure());
    /// ```
    #[must_use]
    pub fn is_table_failure(&self) -> bool {
        matches!(
            self,
            Self::Failed { .. } | Self::EmptyOutput { .. } | Self::NotUnicode { .. }
        )
    }
}
