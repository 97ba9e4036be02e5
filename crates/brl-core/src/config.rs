use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::script::Language;

/// Complete configuration of a run.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use brl_core::config::BrailleConfig;
/// let config = BrailleConfig::default();
/// assert_eq!(config.cell_size, 40);
/// assert_eq!(config.display_table, "unicode.dis");
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct BrailleConfig {
    // === Moteur ===
    /// Program implementing the liblouis `lou_translate` command line.
    pub engine_program: PathBuf,
    /// Directory exported as `LOUIS_TABLEPATH`. None = engine default.
    pub table_dir: Option<PathBuf>,
    /// Display table put first in every table list (Unicode output).
    /// Empty = none.
    pub display_table: String,

    // === Traduction ===
    /// Language for letterless lines and for reverse translation.
    pub default_language: Language,
    /// Preferred grade; grade 2 falls back to grade 1.
    pub grade: Grade,
    /// Table pairs per language.
    pub tables: LanguageTables,

    // === Image ===
    /// Side of a square cell in pixels.
    pub cell_size: u32,
    /// Gap around and between cells in pixels.
    pub margin: u32,
    /// Dot radius in pixels, at most `cell_size / 6`.
    pub dot_radius: u32,
    /// Cells per image row before wrapping.
    pub columns: u32,
    /// Luma below which a sampled dot counts as raised.
    pub threshold: u8,
}

/// Braille grade (contraction level).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Grade {
    /// Letter by letter.
    #[serde(rename = "1")]
    One,
    /// Contracted.
    #[default]
    #[serde(rename = "2")]
    Two,
}

/// Grade-1 and grade-2 tables of one language.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TablePair {
    /// Letter-by-letter table (fallback).
    pub g1: String,
    /// Contracted table.
    pub g2: String,
}

/// Table pairs for every supported language.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LanguageTables {
    /// English.
    pub en: TablePair,
    /// Korean.
    pub ko: TablePair,
}

impl LanguageTables {
    /// Tables of `language`.
    #[must_use]
    pub fn pair(&self, language: Language) -> &TablePair {
        match language {
            Language::English => &self.en,
            Language::Korean => &self.ko,
        }
    }
}

impl Default for LanguageTables {
    fn default() -> Self {
        Self {
            en: TablePair {
                g1: "en-us-g1.ctb".into(),
                g2: "en-us-g2.ctb".into(),
            },
            ko: TablePair {
                g1: "ko-g1.ctb".into(),
                g2: "ko-g2.ctb".into(),
            },
        }
    }
}

impl Default for BrailleConfig {
    fn default() -> Self {
        Self {
            engine_program: PathBuf::from("lou_translate"),
            table_dir: None,
            display_table: "unicode.dis".into(),
            default_language: Language::English,
            grade: Grade::Two,
            tables: LanguageTables::default(),
            cell_size: 40,
            margin: 20,
            dot_radius: 6,
            columns: 25,
            threshold: 128,
        }
    }
}

impl BrailleConfig {
    /// Clamp the dependent fields to their valid ranges.
    /// Called after TOML deserialization and after CLI overrides.
    ///
    /// Cell size and margin are left alone: changing them silently would
    /// misalign parsing; the raster layer rejects bad values instead.
    pub fn clamp_all(&mut self) {
        let max_radius = (self.cell_size / 6).max(1);
        self.dot_radius = self.dot_radius.clamp(1, max_radius);
        self.columns = self.columns.clamp(1, 1000);
    }

    /// Full table list for `table`: display table first, then `table`.
    ///
    /// # Example
    /// ```
    /// use brl_core::config::BrailleConfig;
    /// let c = BrailleConfig::default();
    /// assert_eq!(c.table_list("en-us-g1.ctb"), "unicode.dis,en-us-g1.ctb");
    /// ```
    #[must_use]
    pub fn table_list(&self, table: &str) -> String {
        if self.display_table.is_empty() {
            table.to_string()
        } else {
            format!("{},{table}", self.display_table)
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    engine: Option<EngineSection>,
    translation: Option<TranslationSection>,
    tables: Option<TablesSection>,
    image: Option<ImageSection>,
}

/// Engine section, all fields optional for partial override.
#[derive(Deserialize)]
struct EngineSection {
    program: Option<PathBuf>,
    table_dir: Option<PathBuf>,
    display_table: Option<String>,
}

#[derive(Deserialize)]
struct TranslationSection {
    default_language: Option<Language>,
    grade: Option<Grade>,
}

#[derive(Deserialize)]
struct TablesSection {
    en: Option<PairSection>,
    ko: Option<PairSection>,
}

#[derive(Deserialize)]
struct PairSection {
    g1: Option<String>,
    g2: Option<String>,
}

/// Image section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct ImageSection {
    cell_size: Option<u32>,
    margin: Option<u32>,
    dot_radius: Option<u32>,
    columns: Option<u32>,
    threshold: Option<u8>,
}

fn merge_pair(target: &mut TablePair, section: Option<PairSection>) {
    if let Some(p) = section {
        if let Some(v) = p.g1 {
            target.g1 = v;
        }
        if let Some(v) = p.g2 {
            target.g2 = v;
        }
    }
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use brl_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<BrailleConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}

/// Same as [`load_config`] on an in-memory TOML document.
///
/// # Errors
/// Returns an error if the document is not valid TOML for this schema.
pub fn parse_config(content: &str) -> Result<BrailleConfig> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = BrailleConfig::default();

    if let Some(e) = file.engine {
        if let Some(v) = e.program {
            config.engine_program = v;
        }
        if let Some(v) = e.table_dir {
            config.table_dir = Some(v);
        }
        if let Some(v) = e.display_table {
            config.display_table = v;
        }
    }

    if let Some(t) = file.translation {
        if let Some(v) = t.default_language {
            config.default_language = v;
        }
        if let Some(v) = t.grade {
            config.grade = v;
        }
    }

    if let Some(t) = file.tables {
        merge_pair(&mut config.tables.en, t.en);
        merge_pair(&mut config.tables.ko, t.ko);
    }

    if let Some(i) = file.image {
        if let Some(v) = i.cell_size {
            config.cell_size = v;
        }
        if let Some(v) = i.margin {
            config.margin = v;
        }
        if let Some(v) = i.dot_radius {
            config.dot_radius = v;
        }
        if let Some(v) = i.columns {
            config.columns = v;
        }
        if let Some(v) = i.threshold {
            config.threshold = v;
        }
    }

    config.clamp_all();
    Ok(config)
}
