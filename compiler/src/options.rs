//! Build options handed over by the host (`ksp { arg(...) }` style).

use crate::contracts::{KEY_GENERATE_DOC_NAME, KEY_MODULE_NAME, VALUE_ENABLE};
use crate::error::{CompileError, Result};
use arouter_symbols::utils::sanitize_identifier;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Sanitized to `[0-9A-Za-z_]`; `None` when unset or empty after sanitizing.
    pub module_name: Option<String>,
    pub generate_docs: bool,
}

impl CompilerOptions {
    pub fn from_args(args: &BTreeMap<String, String>) -> Self {
        let module_name = args
            .get(KEY_MODULE_NAME)
            .map(|raw| sanitize_identifier(raw))
            .filter(|name| !name.is_empty());
        if let Some(name) = &module_name {
            tracing::info!(
                target: "arouter::compiler",
                "The user has configuration the module name, it was [{}]",
                name
            );
        }

        Self {
            module_name,
            generate_docs: args.get(KEY_GENERATE_DOC_NAME).map(String::as_str) == Some(VALUE_ENABLE),
        }
    }

    pub fn with_module_name(mut self, name: &str) -> Self {
        let name = sanitize_identifier(name);
        self.module_name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn with_docs(mut self, enabled: bool) -> Self {
        self.generate_docs = enabled;
        self
    }

    pub fn require_module_name(&self) -> Result<&str> {
        self.module_name
            .as_deref()
            .ok_or(CompileError::MissingModuleName)
    }
}
