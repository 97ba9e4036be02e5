use anyhow::Result;
use brl_core::config::{BrailleConfig, load_config};
use clap::Parser;

pub mod cli;
pub mod commands;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config
    let mut config = resolve_config(&cli)?;

    // 4. Appliquer les overrides CLI
    cli.apply_overrides(&mut config);
    config.clamp_all();
    log::debug!(
        "moteur {} (grade {:?}, langue {})",
        config.engine_program.display(),
        config.grade,
        config.default_language
    );

    // 5. Exécuter la sous-commande
    commands::run(&cli, config)
}

/// Config file if present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<BrailleConfig> {
    if cli.config.exists() {
        load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(BrailleConfig::default())
    }
}
