use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use arouter_compiler::contracts::{KEY_GENERATE_DOC_NAME, KEY_MODULE_NAME, VALUE_ENABLE};

use crate::config::ArouterConfig;
use crate::ui;

fn starter_config(module: Option<&str>, docs: bool) -> ArouterConfig {
    let mut config = ArouterConfig::default();
    if let Some(module) = module {
        config
            .args
            .insert(KEY_MODULE_NAME.to_string(), module.to_string());
    }
    if docs {
        config
            .args
            .insert(KEY_GENERATE_DOC_NAME.to_string(), VALUE_ENABLE.to_string());
    }
    config
}

pub fn init(config_path: &str, module: Option<&str>, docs: bool) -> Result<()> {
    let path = Path::new(config_path);

    if path.exists() {
        anyhow::bail!(
            "Configuration file already exists: {}\nUse a different path or remove the existing file.",
            path.display()
        );
    }

    let config = starter_config(module, docs);
    config.validate()?;

    let config_toml = toml::to_string_pretty(&config)?;
    fs::write(path, &config_toml)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    ui::print_success(&format!("Created {}", path.display()));
    println!();
    if module.is_none() {
        ui::print_warning(&format!(
            "No module name set. Add {} under [args] before generating root tables.",
            KEY_MODULE_NAME.cyan()
        ));
    }
    println!("{}", "Next steps:".bold());
    println!(
        "  {} to verify your configuration",
        "arouter-gen config validate".cyan()
    );
    println!(
        "  {} to generate sources",
        "arouter-gen generate --symbols <snapshot.json>".cyan()
    );

    Ok(())
}

pub fn validate(config_path: &str) -> Result<()> {
    ui::print_step("Validating configuration...");

    let config = ArouterConfig::load(config_path).context(
        "Failed to load configuration. Run `arouter-gen config init` to create a configuration file.",
    )?;

    ui::print_success("Configuration is valid!");
    println!();

    let options = config.compiler_options();
    match &options.module_name {
        Some(name) => println!("  Module: {}", name.bold()),
        None => println!(
            "  {} No module name, only group tables will be generated",
            ui::symbols::WARNING.yellow()
        ),
    }
    println!("  Backend: {}", config.output.backend);
    println!("  Output: {}", config.output_dir().display());
    if options.generate_docs {
        println!("  Docs: {}", config.docs_dir().display());
    }

    let extra: Vec<(&String, &String)> = config
        .args
        .iter()
        .filter(|(key, _)| key.as_str() != KEY_MODULE_NAME && key.as_str() != KEY_GENERATE_DOC_NAME)
        .collect();
    if !extra.is_empty() {
        println!();
        println!("  {} Unused args ({}):", ui::symbols::BULLET.dimmed(), extra.len());
        for (key, value) in extra {
            println!("    {} {} = {}", ui::symbols::BULLET.dimmed(), key, value);
        }
    }

    Ok(())
}
