//! Validation and grouping accumulators.
//!
//! Both accumulators are plain values. A build starts from `Default` and
//! each round takes the previous round's value and returns the next one;
//! nothing is retained implicitly between builds.

use crate::diagnostics::Diagnostics;
use crate::error::{CompileError, Result};
use crate::model::{HookRecord, RouteKind, RouteRecord};
use std::collections::BTreeMap;

/// Group derived from `/group/rest`: the text strictly between the first and
/// second slash.
pub fn derive_group(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('/')?;
    let end = rest.find('/')?;
    let group = &rest[..end];
    (!group.is_empty()).then_some(group)
}

/// Check the path and fill in the default group.
pub fn validate_route(mut record: RouteRecord) -> Result<RouteRecord> {
    if record.path.is_empty() || !record.path.starts_with('/') {
        return Err(CompileError::InvalidPath {
            path: record.path.clone(),
            target: record.target.name.clone(),
        });
    }

    if record.group.as_deref().map_or(true, str::is_empty) {
        let group = derive_group(&record.path).ok_or_else(|| CompileError::GroupDerivationFailure {
            path: record.path.clone(),
            target: record.target.name.clone(),
        })?;
        record.group = Some(group.to_string());
    }

    let group = record.group();
    if !group.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(CompileError::InvalidGroup {
            group: group.to_string(),
            path: record.path.clone(),
            target: record.target.name.clone(),
        });
    }
    Ok(record)
}

/// Group name -> path -> records, all ordered.
///
/// Records sharing a path within a group are all kept, in arrival order,
/// and reported as `DuplicatePath`. A target holds at most one record:
/// re-inserting it replaces the earlier record, wherever that one lives.
#[derive(Debug, Clone, Default)]
pub struct RouteAccumulator {
    groups: BTreeMap<String, BTreeMap<String, Vec<RouteRecord>>>,
}

impl RouteAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert; returns whether the record was kept.
    pub fn insert(&mut self, record: RouteRecord, diagnostics: &mut Diagnostics) -> bool {
        let record = match validate_route(record) {
            Ok(record) => record,
            Err(err) => {
                diagnostics.warn(format!(">>> Route meta verify error, {} <<<", err));
                return false;
            }
        };

        diagnostics.info(format!(
            ">>> Start categories, group = {}, path = {} <<<",
            record.group(),
            record.path
        ));

        let group = record.group().to_string();
        self.remove_target(&record);
        let slot = self
            .groups
            .entry(group.clone())
            .or_default()
            .entry(record.path.clone())
            .or_default();

        if let Some(existing) = slot.iter_mut().find(|r| r.target == record.target) {
            *existing = record;
            return true;
        }
        if let Some(existing) = slot.first() {
            let err = CompileError::DuplicatePath {
                group,
                path: record.path.clone(),
                existing: existing.target.name.clone(),
                rejected: record.target.name.clone(),
            };
            diagnostics.warn_at(&record.target.name, err.to_string());
        }
        slot.push(record);
        true
    }

    /// Drop the record `record.target` holds under any other group or path.
    fn remove_target(&mut self, record: &RouteRecord) {
        for (group, paths) in self.groups.iter_mut() {
            for (path, records) in paths.iter_mut() {
                if group.as_str() == record.group() && *path == record.path {
                    continue;
                }
                records.retain(|r| r.target != record.target);
            }
            paths.retain(|_, records| !records.is_empty());
        }
        self.groups.retain(|_, paths| !paths.is_empty());
    }

    /// Fold a later round's records into this accumulator with the same rules
    /// as [`RouteAccumulator::insert`].
    pub fn merge(&mut self, other: RouteAccumulator, diagnostics: &mut Diagnostics) {
        for (_, paths) in other.groups {
            for (_, records) in paths {
                for record in records {
                    self.insert(record, diagnostics);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Records of one group, ascending by path.
    pub fn group(&self, name: &str) -> Vec<&RouteRecord> {
        self.groups
            .get(name)
            .map(|paths| paths.values().flatten().collect())
            .unwrap_or_default()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, Vec<&RouteRecord>)> {
        self.groups
            .iter()
            .map(|(name, paths)| (name.as_str(), paths.values().flatten().collect()))
    }

    /// Provider records across all groups, ascending by path.
    pub fn providers(&self) -> Vec<&RouteRecord> {
        let mut providers: Vec<&RouteRecord> = self
            .groups
            .values()
            .flat_map(|paths| paths.values().flatten())
            .filter(|record| record.kind == RouteKind::CapabilityProvider)
            .collect();
        providers.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.target.name.cmp(&b.target.name)));
        providers
    }

    pub fn len(&self) -> usize {
        self.groups
            .values()
            .flat_map(|paths| paths.values())
            .map(Vec::len)
            .sum()
    }
}

/// Priority -> hook, unique priorities only.
#[derive(Debug, Clone, Default)]
pub struct HookAccumulator {
    hooks: BTreeMap<i32, HookRecord>,
}

impl HookAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A priority already held by another declaration fails with
    /// `DuplicatePriority`; the same declaration arriving again is a no-op,
    /// and arriving with a new priority moves it.
    pub fn insert(&mut self, record: HookRecord) -> Result<()> {
        if let Some(existing) = self.hooks.get(&record.priority) {
            if existing.target == record.target {
                return Ok(());
            }
            return Err(CompileError::DuplicatePriority {
                priority: record.priority,
                existing: existing.target.name.clone(),
                rejected: record.target.name.clone(),
            });
        }
        self.hooks.retain(|_, existing| existing.target != record.target);
        self.hooks.insert(record.priority, record);
        Ok(())
    }

    /// Ascending by priority.
    pub fn hooks(&self) -> impl Iterator<Item = &HookRecord> {
        self.hooks.values()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
