use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brl_core::config::BrailleConfig;
use brl_core::{BrailleText, Cell, Format, Language};
use brl_engine::{LouTranslate, Translator};
use brl_raster::io::{load_image, save_image};
use brl_raster::{Geometry, parse_braille, parse_image, render_braille};
use serde::Serialize;

use crate::cli::{Cli, Command, GeometryArgs, TextSource};

/// Written next to each image by `text2image`.
#[derive(Debug, Serialize)]
struct ImageMetadata<'a> {
    input: &'a str,
    unicode: String,
    dots: String,
    binary: Vec<[u8; 6]>,
    cell_size: u32,
    margin: u32,
    dot_radius: u32,
    columns: u32,
    width: u32,
    height: u32,
    created: String,
}

/// Run the selected subcommand with the resolved configuration.
///
/// # Errors
/// Any translation, format, geometry or I/O failure.
pub fn run(cli: &Cli, config: BrailleConfig) -> Result<()> {
    let lang = cli.language();
    match &cli.command {
        Command::Text2braille { format, source } => {
            let text = read_text(source)?;
            let out = translator(config).encode(&text, (*format).into(), lang)?;
            println!("{out}");
        }
        Command::Braille2text { format, source } => {
            let input = read_text(source)?;
            let format: Format = (*format).into();
            let text = translator(config).decode(&input, format, lang)?;
            println!("{text}");
        }
        Command::Text2image {
            input,
            output,
            geometry,
            no_metadata,
        } => {
            let path = text_to_image(input, output.as_deref(), geometry, !no_metadata, config, lang)?;
            println!("{}", path.display());
        }
        Command::Image2binary { image, geometry } => {
            let cells = image_cells(image, geometry, config)?;
            let vectors: Vec<[u8; 6]> = cells.into_iter().map(Cell::bits).collect();
            println!("{}", serde_json::to_string(&vectors)?);
        }
        Command::Image2text { image, geometry } => {
            let braille = image_braille(image, geometry, config.clone())?;
            let text = translator(config).braille_to_text(&braille, lang)?;
            println!("{text}");
        }
        Command::Analyze { source } => {
            let text = read_text(source)?;
            analyze(&text, config, lang)?;
        }
        Command::Check => {
            let engine = LouTranslate::from_config(&config);
            let version = engine.version()?;
            println!("{} : {version}", engine.program().display());
        }
    }
    Ok(())
}

fn translator(config: BrailleConfig) -> Translator<LouTranslate> {
    Translator::new(LouTranslate::from_config(&config), config)
}

/// Text from `--input`, `--file` or stdin. One trailing newline is dropped.
fn read_text(source: &TextSource) -> Result<String> {
    let mut text = if let Some(ref input) = source.input {
        input.clone()
    } else if let Some(ref path) = source.file {
        std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire {}", path.display()))?
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Lecture de stdin impossible")?;
        buf
    };
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

fn geometry(args: &GeometryArgs, config: &mut BrailleConfig) -> Result<Geometry> {
    args.apply(config);
    config.clamp_all();
    Ok(Geometry::from_config(config)?)
}

fn image_cells(path: &Path, args: &GeometryArgs, mut config: BrailleConfig) -> Result<Vec<Cell>> {
    let geometry = geometry(args, &mut config)?;
    let img = load_image(path)?;
    parse_image(&img, &geometry).with_context(|| mismatch(path, &geometry))
}

/// Lines of braille read back from an image made by `text2image`.
fn image_braille(path: &Path, args: &GeometryArgs, mut config: BrailleConfig) -> Result<BrailleText> {
    let geometry = geometry(args, &mut config)?;
    let img = load_image(path)?;
    parse_braille(&img, &geometry).with_context(|| mismatch(path, &geometry))
}

fn mismatch(path: &Path, geometry: &Geometry) -> String {
    format!(
        "{} ne correspond pas à la géométrie cellule {} / marge {}",
        path.display(),
        geometry.cell_size,
        geometry.margin
    )
}

fn default_output(now: &chrono::DateTime<chrono::Local>) -> PathBuf {
    PathBuf::from("data")
        .join(now.format("%Y%m%d_%H%M%S").to_string())
        .join("braille.png")
}

fn text_to_image(
    input: &str,
    output: Option<&Path>,
    args: &GeometryArgs,
    with_metadata: bool,
    mut config: BrailleConfig,
    lang: Option<Language>,
) -> Result<PathBuf> {
    let geometry = geometry(args, &mut config)?;
    let braille = translator(config).text_to_braille(input, lang)?;
    let img = render_braille(&braille, &geometry);

    let now = chrono::Local::now();
    let path = output.map_or_else(|| default_output(&now), Path::to_path_buf);
    save_image(&img, &path)?;

    if with_metadata {
        let metadata = ImageMetadata {
            input,
            unicode: braille.to_unicode(),
            dots: braille.to_dots(),
            binary: braille.to_binary(),
            cell_size: geometry.cell_size,
            margin: geometry.margin,
            dot_radius: geometry.dot_radius,
            columns: geometry.columns,
            width: img.width(),
            height: img.height(),
            created: now.to_rfc3339(),
        };
        let meta_path = path.with_file_name("metadata.json");
        std::fs::write(&meta_path, serde_json::to_string_pretty(&metadata)?)
            .with_context(|| format!("Impossible d'écrire {}", meta_path.display()))?;
        log::info!("Métadonnées : {}", meta_path.display());
    }
    Ok(path)
}

fn analyze(text: &str, config: BrailleConfig, lang: Option<Language>) -> Result<()> {
    let report = translator(config).analyze(text, lang)?;
    for word in &report.words {
        let mark = if word.contracted { "abrégé" } else { "-" };
        println!("{}\t{}\t{}\t{mark}", word.word, word.language, word.braille);
    }
    println!(
        "{}/{} mots abrégés ({:.1} %)",
        report.contracted(),
        report.words.len(),
        report.rate_percent()
    );
    Ok(())
}
