use brl_core::cell::Cell;
use brl_core::config::{BrailleConfig, Grade, TablePair};
use brl_core::error::{EngineError, FormatError};
use brl_core::format::{BrailleText, Format};
use brl_core::script::{Language, Segment, classify, split_segments};
use brl_core::traits::{BrailleEngine, Direction};

use crate::error::TranslateError;

/// Text ↔ braille pipeline over any [`BrailleEngine`].
///
/// Owns the table selection (language, grade, display table) and the
/// grade-2 → grade-1 fallback. Format conversion is delegated to
/// [`BrailleText`].
pub struct Translator<E> {
    engine: E,
    config: BrailleConfig,
}

/// Grade-2 analysis of one word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordDetail {
    /// Source word.
    pub word: String,
    /// Language whose tables were used.
    pub language: Language,
    /// Unicode braille actually produced (grade 2, or grade 1 on fallback).
    pub braille: String,
    /// True when grade 2 differs from grade 1 for this word.
    pub contracted: bool,
}

/// Per-word contraction analysis of a text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractionReport {
    /// Words in source order.
    pub words: Vec<WordDetail>,
}

impl ContractionReport {
    /// Number of contracted words.
    #[must_use]
    pub fn contracted(&self) -> usize {
        self.words.iter().filter(|w| w.contracted).count()
    }

    /// Contracted words in percent, 0 for an empty text.
    #[must_use]
    pub fn rate_percent(&self) -> f64 {
        if self.words.is_empty() {
            0.0
        } else {
            self.contracted() as f64 * 100.0 / self.words.len() as f64
        }
    }
}

impl<E: BrailleEngine> Translator<E> {
    /// Build a pipeline over `engine`.
    #[must_use]
    pub fn new(engine: E, config: BrailleConfig) -> Self {
        Self { engine, config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &BrailleConfig {
        &self.config
    }

    /// Underlying engine.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Translate `text` to braille, line by line.
    ///
    /// Each line is split into script segments translated with their own
    /// language tables, unless `language` forces one language for all.
    ///
    /// # Errors
    /// [`TranslateError::Engine`] when a segment fails even after fallback.
    pub fn text_to_braille(
        &self,
        text: &str,
        language: Option<Language>,
    ) -> Result<BrailleText, TranslateError> {
        let mut lines = Vec::new();
        for line in text.lines() {
            let segments = match language {
                Some(_) if line.is_empty() => Vec::new(),
                Some(lang) => vec![Segment {
                    language: Some(lang),
                    text: line,
                }],
                None => split_segments(line),
            };

            let mut cells = Vec::new();
            for segment in segments {
                let lang = segment.language.unwrap_or(self.config.default_language);
                cells.extend(self.forward(segment.text, lang)?);
            }
            lines.push(cells);
        }
        if lines.is_empty() {
            lines.push(Vec::new());
        }
        Ok(BrailleText { lines })
    }

    /// Translate `text` and encode the braille in `format`.
    ///
    /// # Errors
    /// See [`Translator::text_to_braille`].
    pub fn encode(
        &self,
        text: &str,
        format: Format,
        language: Option<Language>,
    ) -> Result<String, TranslateError> {
        Ok(self.text_to_braille(text, language)?.encode(format)?)
    }

    /// Reverse-translate braille cells to text with the tables of
    /// `language` (default language if `None`).
    ///
    /// # Errors
    /// [`TranslateError::Engine`] if backward translation fails.
    pub fn braille_to_text(
        &self,
        braille: &BrailleText,
        language: Option<Language>,
    ) -> Result<String, TranslateError> {
        if braille.is_empty() {
            return Ok(String::new());
        }
        let lang = language.unwrap_or(self.config.default_language);
        let pair = self.config.tables.pair(lang);
        let input = braille.to_unicode();
        let g1 = self.config.table_list(&pair.g1);

        if !self.uses_grade2(pair) {
            return Ok(self.engine.translate(&input, &g1, Direction::Backward)?);
        }
        let g2 = self.config.table_list(&pair.g2);
        match self.engine.translate(&input, &g2, Direction::Backward) {
            Err(e) if e.is_table_failure() => {
                log::warn!("{lang} : retour grade 2 impossible ({e}), repli sur {}", pair.g1);
                Ok(self.engine.translate(&input, &g1, Direction::Backward)?)
            }
            other => Ok(other?),
        }
    }

    /// Parse `input` in `format` and reverse-translate it.
    ///
    /// # Errors
    /// [`TranslateError::Format`] for malformed input (engine not called),
    /// [`TranslateError::Engine`] otherwise.
    pub fn decode(
        &self,
        input: &str,
        format: Format,
        language: Option<Language>,
    ) -> Result<String, TranslateError> {
        let braille = BrailleText::parse(input, format)?;
        self.braille_to_text(&braille, language)
    }

    /// Compare grade 2 and grade 1 output word by word.
    ///
    /// A word whose grade-2 table fails is reported uncontracted with its
    /// grade-1 braille.
    ///
    /// # Errors
    /// [`TranslateError::Engine`] if grade 1 fails or grade 2 fails for a
    /// reason other than the table.
    pub fn analyze(
        &self,
        text: &str,
        language: Option<Language>,
    ) -> Result<ContractionReport, TranslateError> {
        let mut words = Vec::new();
        for word in text.split_whitespace() {
            let lang = language
                .or_else(|| word.chars().find_map(classify))
                .unwrap_or(self.config.default_language);
            let pair = self.config.tables.pair(lang);

            let g1 = self.forward_with(word, &self.config.table_list(&pair.g1))?;
            let g2 = match self.forward_with(word, &self.config.table_list(&pair.g2)) {
                Ok(cells) => Some(cells),
                Err(TranslateError::Engine(e)) if e.is_table_failure() => {
                    log::debug!("analyse « {word} » : grade 2 indisponible ({e})");
                    None
                }
                Err(e) => return Err(e),
            };

            let contracted = g2.as_ref().is_some_and(|cells| *cells != g1);
            let cells = g2.unwrap_or(g1);
            words.push(WordDetail {
                word: word.to_string(),
                language: lang,
                braille: cells.iter().map(|c| c.to_char()).collect(),
                contracted,
            });
        }
        Ok(ContractionReport { words })
    }

    fn uses_grade2(&self, pair: &TablePair) -> bool {
        self.config.grade == Grade::Two && pair.g1 != pair.g2
    }

    /// Forward one segment: grade 2 first, grade 1 on table failure.
    fn forward(&self, text: &str, lang: Language) -> Result<Vec<Cell>, TranslateError> {
        let pair = self.config.tables.pair(lang);
        let g1 = self.config.table_list(&pair.g1);
        if !self.uses_grade2(pair) {
            return self.forward_with(text, &g1);
        }

        let g2 = self.config.table_list(&pair.g2);
        match self.forward_with(text, &g2) {
            Err(TranslateError::Engine(e)) if e.is_table_failure() => {
                log::warn!("{lang} : grade 2 indisponible ({e}), repli sur {}", pair.g1);
                self.forward_with(text, &g1)
            }
            other => other,
        }
    }

    fn forward_with(&self, text: &str, table: &str) -> Result<Vec<Cell>, TranslateError> {
        let out = self.engine.translate(text, table, Direction::Forward)?;
        if out.trim().is_empty() && !text.trim().is_empty() {
            return Err(EngineError::EmptyOutput {
                table: table.to_string(),
            }
            .into());
        }
        let braille = BrailleText::from_unicode(&out).map_err(|e| match e {
            FormatError::NotBraille { ch, .. } => TranslateError::Engine(EngineError::NotUnicode {
                table: table.to_string(),
                ch,
            }),
            other => TranslateError::Format(other),
        })?;
        Ok(braille.flatten())
    }
}
