//! Emission orchestrator: accumulators in, rendered units out.
//!
//! Every unit is rendered and written on its own; a failure is reported and
//! the remaining units of the round are still emitted.

use crate::diagnostics::Diagnostics;
use crate::error::CompileError;
use crate::ir::InjectorPlan;
use crate::registry::{HookAccumulator, RouteAccumulator};
use crate::render::{render_unit, Backend};
use crate::sink::{CodeSink, WriteStatus};
use crate::units::{GeneratedUnit, UnitBody, UnitKey};

/// Group units in ascending group order, each routes ascending by path.
pub fn group_units(routes: &RouteAccumulator) -> Vec<GeneratedUnit> {
    routes
        .groups()
        .map(|(group, records)| {
            let originating = records.iter().map(|r| r.target.name.clone()).collect();
            GeneratedUnit::new(
                UnitKey::group(group),
                UnitBody::RouteGroup {
                    group: group.to_string(),
                    routes: records.into_iter().cloned().collect(),
                },
            )
            .with_originating(originating)
        })
        .collect()
}

pub fn root_unit(module: &str, routes: &RouteAccumulator) -> GeneratedUnit {
    let groups = routes
        .group_names()
        .map(|group| (group.to_string(), UnitKey::group(group)))
        .collect();
    let originating = routes
        .groups()
        .flat_map(|(_, records)| records.into_iter().map(|r| r.target.name.clone()))
        .collect();
    GeneratedUnit::new(UnitKey::root(module), UnitBody::RouteRoot { groups })
        .with_originating(originating)
}

/// Each provider under its path, followed by its contract names.
pub fn provider_unit(module: &str, routes: &RouteAccumulator) -> GeneratedUnit {
    let providers = routes.providers();
    let mut entries = Vec::new();
    for record in &providers {
        entries.push((record.path.clone(), (*record).clone()));
        for key in &record.provider_keys {
            entries.push((key.clone(), (*record).clone()));
        }
    }
    let originating = providers.iter().map(|r| r.target.name.clone()).collect();
    GeneratedUnit::new(UnitKey::providers(module), UnitBody::ProviderGroup { entries })
        .with_originating(originating)
}

pub fn hook_unit(module: &str, hooks: &HookAccumulator) -> GeneratedUnit {
    let hooks: Vec<_> = hooks.hooks().cloned().collect();
    let originating = hooks.iter().map(|h| h.target.name.clone()).collect();
    GeneratedUnit::new(
        UnitKey::interceptors(module),
        UnitBody::InterceptorGroup { hooks },
    )
    .with_originating(originating)
}

pub fn injector_unit(plan: InjectorPlan) -> GeneratedUnit {
    let key = UnitKey::injector(&plan.target);
    let originating = vec![plan.target.name.clone()];
    GeneratedUnit::new(key, UnitBody::Injector(plan)).with_originating(originating)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub written: Vec<UnitKey>,
    pub unchanged: Vec<UnitKey>,
    pub failed: Vec<(UnitKey, CompileError)>,
}

impl EmitReport {
    pub fn merge(&mut self, other: EmitReport) {
        self.written.extend(other.written);
        self.unchanged.extend(other.unchanged);
        self.failed.extend(other.failed);
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Emitter<'a> {
    backend: &'a dyn Backend,
}

impl<'a> Emitter<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    pub fn emit(
        &self,
        units: Vec<GeneratedUnit>,
        sink: &mut dyn CodeSink,
        diagnostics: &mut Diagnostics,
    ) -> EmitReport {
        let mut report = EmitReport::default();
        for unit in units {
            let key = unit.key.clone();
            let result = render_unit(self.backend, &unit).and_then(|rendered| sink.write(&rendered));
            match result {
                Ok(WriteStatus::Written) => {
                    diagnostics.info(format!(
                        ">>> {} {} has been generated. <<<",
                        unit.body.label(),
                        key
                    ));
                    report.written.push(key);
                }
                Ok(WriteStatus::Unchanged) => {
                    tracing::debug!(target: "arouter::compiler", unit = %key, "unit unchanged, skipped");
                    report.unchanged.push(key);
                }
                Err(err) => {
                    diagnostics.report(&err, Some(&key.qualified_name()));
                    report.failed.push((key, err));
                }
            }
        }
        report
    }
}
