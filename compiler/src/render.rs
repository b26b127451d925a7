//! Backend seam between generated units and target-language source.

use crate::error::{CompileError, Result};
use crate::units::{GeneratedUnit, UnitKey};
use std::collections::{BTreeMap, BTreeSet};

/// Turns a [`GeneratedUnit`] into the text of one source file.
pub trait Backend {
    fn name(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, unit: &GeneratedUnit) -> Result<String>;
}

/// Rendered source ready for a [`crate::sink::CodeSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    pub key: UnitKey,
    /// `com/example/Foo.kt`, relative to the output root.
    pub relative_path: String,
    pub source: String,
    pub originating: Vec<String>,
}

pub fn render_unit(backend: &dyn Backend, unit: &GeneratedUnit) -> Result<RenderedUnit> {
    let source = backend.render(unit)?;
    Ok(RenderedUnit {
        key: unit.key.clone(),
        relative_path: source_path(&unit.key, backend.extension()),
        source,
        originating: unit.originating.clone(),
    })
}

pub fn source_path(key: &UnitKey, extension: &str) -> String {
    if key.package.is_empty() {
        format!("{}.{}", key.name, extension)
    } else {
        format!("{}/{}.{}", key.package.replace('.', "/"), key.name, extension)
    }
}

/// Import list of one file.
///
/// A simple name refers to the first qualified name that claimed it; later
/// claimants with the same simple name are written fully qualified.
#[derive(Debug, Default)]
pub struct Imports {
    package: String,
    implicit: Vec<&'static str>,
    by_simple: BTreeMap<String, String>,
}

impl Imports {
    /// `implicit` lists packages whose members need no import statement.
    pub fn new(package: &str, implicit: &[&'static str]) -> Self {
        Self {
            package: package.to_string(),
            implicit: implicit.to_vec(),
            by_simple: BTreeMap::new(),
        }
    }

    /// Register `qualified` and return the name to write in the body.
    pub fn name(&mut self, qualified: &str) -> String {
        let simple = arouter_symbols::utils::simple_name(qualified);
        match self.by_simple.get(simple) {
            Some(existing) if existing == qualified => simple.to_string(),
            Some(_) => qualified.to_string(),
            None => {
                self.by_simple
                    .insert(simple.to_string(), qualified.to_string());
                simple.to_string()
            }
        }
    }

    /// Sorted import lines for everything outside the file's own and the
    /// implicit packages.
    pub fn lines(&self, terminator: &str) -> String {
        let imports: BTreeSet<&str> = self
            .by_simple
            .values()
            .map(String::as_str)
            .filter(|qualified| {
                let package = arouter_symbols::utils::package_name(qualified);
                !package.is_empty()
                    && package != self.package
                    && !self.implicit.contains(&package)
            })
            .collect();

        let mut out = String::new();
        for qualified in imports {
            out.push_str(&format!("import {}{}\n", qualified, terminator));
        }
        out
    }
}

/// Quote `raw` as a string literal valid in both Kotlin and Java. `$` is
/// escaped only when `escape_dollar` is set.
pub fn string_literal(raw: &str, escape_dollar: bool) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' if escape_dollar => out.push_str("\\$"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Group names become part of a class name.
pub fn check_identifier(key: &UnitKey, value: &str) -> Result<()> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        Ok(())
    } else {
        Err(CompileError::Render {
            key: key.to_string(),
            message: format!("[{}] is not usable in a class name", value),
        })
    }
}

/// Header comment shared by every backend.
pub fn header() -> String {
    format!("/**\n * {}\n */\n", crate::contracts::WARNING_TIPS)
}
