use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use arouter_compiler::contracts::KEY_MODULE_NAME;
use arouter_compiler::{backend_by_name, CompilerOptions};

/// Configuration loaded from arouter.toml.
/// Optional: every value can also be given on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArouterConfig {
    /// Processor arguments, e.g. `AROUTER_MODULE_NAME = "app"`
    #[serde(default)]
    pub args: BTreeMap<String, String>,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,

    #[serde(default = "default_backend")]
    pub backend: String,

    /// Where route docs go; defaults to the output dir
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_dir: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            backend: default_backend(),
            docs_dir: None,
        }
    }
}

fn default_output_dir() -> String {
    "./build/generated/arouter".to_string()
}

fn default_backend() -> String {
    "kotlin".to_string()
}

impl ArouterConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ArouterConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Try to load config, returning None if file doesn't exist
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    pub fn validate(&self) -> Result<()> {
        if self.output.dir.is_empty() {
            anyhow::bail!("[output] dir cannot be empty");
        }
        if backend_by_name(&self.output.backend).is_none() {
            anyhow::bail!(
                "Unknown backend '{}' (expected 'kotlin' or 'java')",
                self.output.backend
            );
        }
        if let Some(name) = self.args.get(KEY_MODULE_NAME) {
            if CompilerOptions::from_args(&self.args).module_name.is_none() {
                anyhow::bail!(
                    "{} '{}' has no usable characters (allowed: [0-9A-Za-z_])",
                    KEY_MODULE_NAME,
                    name
                );
            }
        }
        Ok(())
    }

    pub fn compiler_options(&self) -> CompilerOptions {
        CompilerOptions::from_args(&self.args)
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output.dir)
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.output
            .docs_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.output_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: ArouterConfig = toml::from_str(
            r#"
[args]
AROUTER_MODULE_NAME = "app"
AROUTER_GENERATE_DOC = "enable"

[output]
dir = "out"
backend = "java"
docs_dir = "docs"
"#,
        )
        .expect("config should parse");
        config.validate().expect("config should be valid");

        let options = config.compiler_options();
        assert_eq!(options.module_name.as_deref(), Some("app"));
        assert!(options.generate_docs);
        assert_eq!(config.output.backend, "java");
        assert_eq!(config.docs_dir(), PathBuf::from("docs"));
    }

    #[test]
    fn test_defaults() {
        let config: ArouterConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.output.backend, "kotlin");
        assert_eq!(config.docs_dir(), config.output_dir());
        assert!(config.compiler_options().module_name.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ArouterConfig::default();
        config.output.backend = "swift".to_string();
        assert!(config.validate().is_err());

        let mut config = ArouterConfig::default();
        config
            .args
            .insert(KEY_MODULE_NAME.to_string(), "---".to_string());
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("AROUTER_MODULE_NAME"), "{}", err);
    }

    #[test]
    fn test_load_optional_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = ArouterConfig::load_optional(dir.path().join("arouter.toml")).expect("load");
        assert!(loaded.is_none());
    }
}
