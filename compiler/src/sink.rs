//! Output sinks for rendered units.

use crate::error::{CompileError, Result};
use crate::render::RenderedUnit;
use crate::units::UnitKey;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    /// Same content was already emitted under this key.
    Unchanged,
}

pub trait CodeSink {
    fn write(&mut self, unit: &RenderedUnit) -> Result<WriteStatus>;
}

/// Keeps every unit in memory, keyed by relative path.
#[derive(Debug, Default)]
pub struct MemorySink {
    units: BTreeMap<String, RenderedUnit>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, relative_path: &str) -> Option<&RenderedUnit> {
        self.units.get(relative_path)
    }

    /// Look a unit up by its simple name.
    pub fn find(&self, name: &str) -> Option<&RenderedUnit> {
        self.units.values().find(|unit| unit.key.name == name)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    pub fn units(&self) -> impl Iterator<Item = &RenderedUnit> {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl CodeSink for MemorySink {
    fn write(&mut self, unit: &RenderedUnit) -> Result<WriteStatus> {
        self.units.insert(unit.relative_path.clone(), unit.clone());
        Ok(WriteStatus::Written)
    }
}

/// Writes units below `root`, creating package directories on demand.
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
}

impl FileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CodeSink for FileSink {
    fn write(&mut self, unit: &RenderedUnit) -> Result<WriteStatus> {
        let path = self.root.join(&unit.relative_path);
        let sink_error = |e: std::io::Error| CompileError::Sink {
            key: unit.key.to_string(),
            message: format!("{}: {}", path.display(), e),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(sink_error)?;
        }
        std::fs::write(&path, &unit.source).map_err(sink_error)?;
        Ok(WriteStatus::Written)
    }
}

/// Each key may be emitted once per build. Re-emitting identical content is a
/// no-op; different content under an emitted key is rejected.
#[derive(Debug)]
pub struct WriteOnceSink<S> {
    inner: S,
    emitted: HashMap<UnitKey, String>,
}

impl<S: CodeSink> WriteOnceSink<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            emitted: HashMap::new(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn emitted(&self) -> usize {
        self.emitted.len()
    }
}

impl<S: CodeSink> CodeSink for WriteOnceSink<S> {
    fn write(&mut self, unit: &RenderedUnit) -> Result<WriteStatus> {
        let digest = content_hash(&unit.source);
        if let Some(previous) = self.emitted.get(&unit.key) {
            if *previous == digest {
                return Ok(WriteStatus::Unchanged);
            }
            return Err(CompileError::UnitAlreadyEmitted {
                key: unit.key.to_string(),
            });
        }
        let status = self.inner.write(unit)?;
        self.emitted.insert(unit.key.clone(), digest);
        Ok(status)
    }
}

pub fn content_hash(source: &str) -> String {
    hex::encode(Sha256::digest(source.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(name: &str, source: &str) -> RenderedUnit {
        RenderedUnit {
            key: UnitKey::new("com.example", name),
            relative_path: format!("com/example/{}.kt", name),
            source: source.to_string(),
            originating: Vec::new(),
        }
    }

    #[test]
    fn test_write_once() {
        let mut sink = WriteOnceSink::new(MemorySink::new());
        assert_eq!(sink.write(&unit("A", "one")).expect("first"), WriteStatus::Written);
        assert_eq!(sink.write(&unit("A", "one")).expect("again"), WriteStatus::Unchanged);
        assert_eq!(
            sink.write(&unit("A", "two")).unwrap_err(),
            CompileError::UnitAlreadyEmitted {
                key: "com.example.A".to_string()
            }
        );
        assert_eq!(sink.inner().get("com/example/A.kt").map(|u| u.source.as_str()), Some("one"));
        assert_eq!(sink.emitted(), 1);
    }

    #[test]
    fn test_content_hash_is_hex_sha256() {
        let digest = content_hash("");
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
