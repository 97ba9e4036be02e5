use std::path::PathBuf;

use brl_core::config::{BrailleConfig, Grade};
use brl_core::{Format, Language};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// brailleur — texte ↔ braille (unicode, points, binaire) et images braille, via liblouis.
#[derive(Parser, Debug)]
#[command(name = "brailleur", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Forcer une langue pour tout le texte (sinon détection par écriture).
    #[arg(long, global = true, value_enum)]
    pub lang: Option<LangArg>,

    /// Grade de braille : 1 (intégral) ou 2 (abrégé, repli sur 1).
    #[arg(long, global = true, value_enum)]
    pub grade: Option<GradeArg>,

    /// Binaire lou_translate à utiliser.
    #[arg(long, global = true)]
    pub engine: Option<PathBuf>,

    /// Dossier des tables liblouis (LOUIS_TABLEPATH).
    #[arg(long, global = true)]
    pub table_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Texte → braille.
    Text2braille {
        /// Encodage de sortie.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Unicode)]
        format: OutputFormat,

        #[command(flatten)]
        source: TextSource,
    },

    /// Braille → texte. Le braille ne révèle pas son écriture : la langue
    /// vient de `--lang`, sinon de la langue par défaut.
    Braille2text {
        /// Encodage de l'entrée (auto : détection).
        #[arg(short, long, value_enum, default_value_t = InputFormat::Auto)]
        format: InputFormat,

        #[command(flatten)]
        source: TextSource,
    },

    /// Texte → image PNG de cellules braille.
    Text2image {
        /// Texte à traduire.
        #[arg(short, long)]
        input: String,

        /// Image produite. Défaut : data/<horodatage>/braille.png.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        geometry: GeometryArgs,

        /// Ne pas écrire metadata.json à côté de l'image.
        #[arg(long, default_value_t = false)]
        no_metadata: bool,
    },

    /// Image → vecteurs binaires (JSON).
    Image2binary {
        /// Image PNG, JPEG ou BMP.
        image: PathBuf,

        #[command(flatten)]
        geometry: GeometryArgs,
    },

    /// Image → texte, avec la langue de `--lang` ou la langue par défaut.
    Image2text {
        /// Image PNG, JPEG ou BMP.
        image: PathBuf,

        #[command(flatten)]
        geometry: GeometryArgs,
    },

    /// Mots abrégés en grade 2, mot par mot.
    Analyze {
        #[command(flatten)]
        source: TextSource,
    },

    /// Vérifier que le moteur répond et afficher sa version.
    Check,
}

/// Where text input comes from: `--input`, `--file`, else stdin.
#[derive(Args, Debug, Clone, Default)]
pub struct TextSource {
    /// Entrée en ligne de commande.
    #[arg(short, long, conflicts_with = "file")]
    pub input: Option<String>,

    /// Lire l'entrée depuis un fichier.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Image geometry overrides. Unset flags keep the `[image]` values.
#[derive(Args, Debug, Clone, Default)]
pub struct GeometryArgs {
    /// Côté d'une cellule en pixels.
    #[arg(long)]
    pub cell_size: Option<u32>,

    /// Marge autour et entre les cellules.
    #[arg(long)]
    pub margin: Option<u32>,

    /// Rayon d'un point.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Cellules par rangée.
    #[arg(long)]
    pub columns: Option<u32>,

    /// Seuil de luminance d'un point levé (0-255).
    #[arg(long)]
    pub threshold: Option<u8>,
}

impl GeometryArgs {
    /// Write the set flags into `config`.
    pub fn apply(&self, config: &mut BrailleConfig) {
        if let Some(v) = self.cell_size {
            config.cell_size = v;
        }
        if let Some(v) = self.margin {
            config.margin = v;
        }
        if let Some(v) = self.radius {
            config.dot_radius = v;
        }
        if let Some(v) = self.columns {
            config.columns = v;
        }
        if let Some(v) = self.threshold {
            config.threshold = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Unicode,
    Dots,
    Binary,
}

impl From<OutputFormat> for Format {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Unicode => Format::Unicode,
            OutputFormat::Dots => Format::Dots,
            OutputFormat::Binary => Format::Binary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InputFormat {
    Unicode,
    Dots,
    Binary,
    #[default]
    Auto,
}

impl From<InputFormat> for Format {
    fn from(f: InputFormat) -> Self {
        match f {
            InputFormat::Unicode => Format::Unicode,
            InputFormat::Dots => Format::Dots,
            InputFormat::Binary => Format::Binary,
            InputFormat::Auto => Format::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LangArg {
    En,
    Ko,
}

impl From<LangArg> for Language {
    fn from(l: LangArg) -> Self {
        match l {
            LangArg::En => Language::English,
            LangArg::Ko => Language::Korean,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GradeArg {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
}

impl From<GradeArg> for Grade {
    fn from(g: GradeArg) -> Self {
        match g {
            GradeArg::One => Grade::One,
            GradeArg::Two => Grade::Two,
        }
    }
}

impl Cli {
    /// Apply the global flags on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut BrailleConfig) {
        if let Some(grade) = self.grade {
            config.grade = grade.into();
        }
        if let Some(ref program) = self.engine {
            config.engine_program.clone_from(program);
        }
        if let Some(ref dir) = self.table_dir {
            config.table_dir = Some(dir.clone());
        }
        if let Some(lang) = self.lang {
            config.default_language = lang.into();
        }
    }

    /// Language forced with `--lang`, if any.
    #[must_use]
    pub fn language(&self) -> Option<Language> {
        self.lang.map(Into::into)
    }
}
