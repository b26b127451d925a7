//! The three annotation processors and the round pipeline composing them.
//!
//! A build starts from [`BuildState::default`]. Each call to
//! [`Pipeline::run_round`] consumes the previous state and returns the next
//! one inside a [`RoundOutcome`]; the host keeps nothing else between rounds.
//! Declarations whose types are not yet resolved are skipped and listed in
//! [`RoundOutcome::deferred`] so the host can supply them again later.
//!
//! Route and interceptor tables are written only once a processor has no
//! deferred declarations left, and a round whose tables fail to emit keeps
//! the previous accumulator. [`Pipeline::finish`] flushes whatever is still
//! held back after the last round.

use crate::contracts::{IINTERCEPTOR, NO_MODULE_NAME_TIPS};
use crate::diagnostics::Diagnostics;
use crate::docs::render_docs;
use crate::emit::{
    group_units, hook_unit, injector_unit, provider_unit, root_unit, EmitReport, Emitter,
};
use crate::error::{CompileError, Result};
use crate::extract::extract_routes;
use crate::inject::{check_access, compile_injector};
use crate::kotlin::KotlinBackend;
use crate::model::HookRecord;
use crate::options::CompilerOptions;
use crate::registry::{HookAccumulator, RouteAccumulator};
use crate::render::{Backend, RenderedUnit};
use crate::sink::CodeSink;
use crate::units::GeneratedUnit;
use arouter_symbols::{ClassDecl, Classifier, PropertyDecl, SymbolSource};
use std::collections::{BTreeMap, BTreeSet};

/// Accumulators carried from one round of a build to the next.
#[derive(Debug, Clone, Default)]
pub struct BuildState {
    pub routes: RouteAccumulator,
    pub hooks: HookAccumulator,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessorReport {
    pub processor: &'static str,
    /// Annotated elements seen this round, deferred ones excluded.
    pub found: usize,
    /// Elements dropped with a non-fatal error.
    pub dropped: usize,
    pub emitted: EmitReport,
    pub fatal: Option<CompileError>,
    pub deferred: Vec<String>,
}

impl ProcessorReport {
    fn new(processor: &'static str) -> Self {
        Self {
            processor,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct RoundOutcome {
    pub state: BuildState,
    pub diagnostics: Diagnostics,
    pub reports: Vec<ProcessorReport>,
    /// Route docs, when enabled and anything was routed this round.
    pub docs: Option<RenderedUnit>,
}

impl RoundOutcome {
    pub fn report(&self, processor: &str) -> Option<&ProcessorReport> {
        self.reports.iter().find(|r| r.processor == processor)
    }

    /// Qualified names of declarations to retry, sorted and deduplicated.
    pub fn deferred(&self) -> Vec<String> {
        self.reports
            .iter()
            .flat_map(|r| r.deferred.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn fatal_errors(&self) -> impl Iterator<Item = (&'static str, &CompileError)> {
        self.reports
            .iter()
            .filter_map(|r| r.fatal.as_ref().map(|err| (r.processor, err)))
    }

    pub fn written(&self) -> usize {
        self.reports.iter().map(|r| r.emitted.written.len()).sum()
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().map(|r| r.emitted.failed.len()).sum()
    }
}

/// Per-round inputs shared by the processors.
pub struct RoundContext<'a> {
    pub options: &'a CompilerOptions,
    pub classifier: &'a Classifier<'a>,
    pub emitter: &'a Emitter<'a>,
}

fn split_resolved<'d>(decls: Vec<&'d ClassDecl>, report: &mut ProcessorReport) -> Vec<&'d ClassDecl> {
    let (resolved, pending): (Vec<_>, Vec<_>) = decls.into_iter().partition(|d| d.resolved);
    report.deferred = pending.iter().map(|d| d.qualified_name.clone()).collect();
    resolved
}

fn fail(report: &mut ProcessorReport, diagnostics: &mut Diagnostics, err: CompileError) {
    diagnostics.report(&err, None);
    if err == CompileError::MissingModuleName {
        diagnostics.error(NO_MODULE_NAME_TIPS);
    }
    report.fatal = Some(err);
}

pub struct RouteProcessor;

impl RouteProcessor {
    pub const NAME: &'static str = "route";

    pub fn process(
        &self,
        ctx: &RoundContext<'_>,
        routes: RouteAccumulator,
        sink: &mut dyn CodeSink,
        diagnostics: &mut Diagnostics,
    ) -> (RouteAccumulator, ProcessorReport, Option<RenderedUnit>) {
        let mut report = ProcessorReport::new(Self::NAME);
        diagnostics.info(">>> RouteProcessor init. <<<");

        let decls = split_resolved(ctx.classifier.source().routes(), &mut report);
        report.found = decls.len();
        if decls.is_empty() {
            return (routes, report, None);
        }
        diagnostics.info(format!(">>> Found routes, size is {} <<<", decls.len()));

        let (records, failed) = extract_routes(ctx.classifier, &decls, diagnostics);
        report.dropped = failed;
        let mut staged = routes.clone();
        for record in records {
            if !staged.insert(record, diagnostics) {
                report.dropped += 1;
            }
        }

        if !report.deferred.is_empty() {
            diagnostics.info(format!(
                ">>> Route tables held back, {} routes still unresolved <<<",
                report.deferred.len()
            ));
            return (staged, report, None);
        }

        let Some((units, docs)) = Self::tables(ctx.options, &staged, &mut report, diagnostics)
        else {
            return (routes, report, None);
        };
        report.emitted = ctx.emitter.emit(units, sink, diagnostics);
        if !report.emitted.is_clean() {
            diagnostics.warn(">>> Route tables not emitted, keeping the previous routes <<<");
            return (routes, report, None);
        }
        (staged, report, docs)
    }

    /// Group, provider and root units plus the optional docs; `None` after
    /// reporting a missing module name.
    fn tables(
        options: &CompilerOptions,
        routes: &RouteAccumulator,
        report: &mut ProcessorReport,
        diagnostics: &mut Diagnostics,
    ) -> Option<(Vec<GeneratedUnit>, Option<RenderedUnit>)> {
        let module = match options.require_module_name() {
            Ok(module) => module,
            Err(err) => {
                fail(report, diagnostics, err);
                return None;
            }
        };

        let mut units = group_units(routes);
        units.push(provider_unit(module, routes));
        units.push(root_unit(module, routes));
        let mut docs = None;
        if options.generate_docs {
            match render_docs(module, routes) {
                Ok(unit) => docs = Some(unit),
                Err(err) => diagnostics.report(&err, None),
            }
        }
        Some((units, docs))
    }
}

pub struct InterceptorProcessor;

impl InterceptorProcessor {
    pub const NAME: &'static str = "interceptor";

    pub fn process(
        &self,
        ctx: &RoundContext<'_>,
        hooks: HookAccumulator,
        sink: &mut dyn CodeSink,
        diagnostics: &mut Diagnostics,
    ) -> (HookAccumulator, ProcessorReport) {
        let mut report = ProcessorReport::new(Self::NAME);
        diagnostics.info(">>> InterceptorProcessor init. <<<");

        let decls = split_resolved(ctx.classifier.source().interceptors(), &mut report);
        report.found = decls.len();
        if decls.is_empty() {
            return (hooks, report);
        }
        diagnostics.info(format!(">>> Found interceptors, size is {} <<<", decls.len()));

        let module = match ctx.options.require_module_name() {
            Ok(module) => module,
            Err(err) => {
                fail(&mut report, diagnostics, err);
                return (hooks, report);
            }
        };

        // Staged on a copy so a failed round leaves the previous table intact.
        let mut staged = hooks.clone();
        for decl in decls {
            let Some(record) = self.verify(ctx.classifier, decl, diagnostics) else {
                report.dropped += 1;
                continue;
            };
            let priority = record.priority;
            if let Err(err) = staged.insert(record) {
                fail(&mut report, diagnostics, err);
                return (hooks, report);
            }
            diagnostics.info(format!(
                ">>> Found interceptor with priority {} : {} <<<",
                priority, decl.qualified_name
            ));
        }

        if !report.deferred.is_empty() {
            diagnostics.info(format!(
                ">>> Interceptor table held back, {} interceptors still unresolved <<<",
                report.deferred.len()
            ));
            return (staged, report);
        }

        report.emitted = ctx
            .emitter
            .emit(vec![hook_unit(module, &staged)], sink, diagnostics);
        if !report.emitted.is_clean() {
            diagnostics.warn(">>> Interceptor table not emitted, keeping the previous interceptors <<<");
            return (hooks, report);
        }
        (staged, report)
    }

    fn verify(
        &self,
        classifier: &Classifier<'_>,
        decl: &ClassDecl,
        diagnostics: &mut Diagnostics,
    ) -> Option<HookRecord> {
        let annotation = decl.annotations.interceptor.as_ref()?;
        if !classifier.implements(decl, IINTERCEPTOR) {
            let err = CompileError::NotAnInterceptor {
                target: decl.qualified_name.clone(),
            };
            diagnostics.report(&err, Some(&decl.qualified_name));
            return None;
        }
        Some(HookRecord {
            priority: annotation.priority,
            target: decl.as_type(),
            name: (!annotation.name.is_empty()).then(|| annotation.name.clone()),
        })
    }
}

pub struct AutowiredProcessor;

impl AutowiredProcessor {
    pub const NAME: &'static str = "autowired";

    pub fn process(
        &self,
        ctx: &RoundContext<'_>,
        sink: &mut dyn CodeSink,
        diagnostics: &mut Diagnostics,
    ) -> ProcessorReport {
        let mut report = ProcessorReport::new(Self::NAME);
        diagnostics.info(">>> AutowiredProcessor init. <<<");

        let owners = Self::categories(ctx.classifier.source().autowired());
        let mut pending = Vec::new();
        let owners: Vec<_> = owners
            .into_values()
            .filter(|(owner, _)| {
                if !owner.resolved {
                    pending.push(owner.qualified_name.clone());
                }
                owner.resolved
            })
            .collect();
        report.deferred = pending;
        report.found = owners.iter().map(|(_, props)| props.len()).sum();
        if owners.is_empty() {
            return report;
        }
        diagnostics.info(">>> Found autowired field, start... <<<");

        if let Err(err) = Self::check_owners(&owners) {
            fail(&mut report, diagnostics, err);
            return report;
        }

        let mut units = Vec::with_capacity(owners.len());
        for (owner, props) in &owners {
            diagnostics.info(format!(
                ">>> Start process {} field in {} ... <<<",
                props.len(),
                owner.simple_name()
            ));
            match compile_injector(ctx.classifier, owner, props) {
                Ok(plan) => units.push(injector_unit(plan)),
                Err(err) => {
                    diagnostics.report(&err, Some(&owner.qualified_name));
                    report.dropped += 1;
                }
            }
        }

        report.emitted = ctx.emitter.emit(units, sink, diagnostics);
        diagnostics.info(">>> Autowired processor stop. <<<");
        report
    }

    /// Fields grouped by declaring class, ascending by its qualified name.
    fn categories<'d>(
        fields: Vec<(&'d ClassDecl, &'d PropertyDecl)>,
    ) -> BTreeMap<&'d str, (&'d ClassDecl, Vec<&'d PropertyDecl>)> {
        let mut owners: BTreeMap<&str, (&ClassDecl, Vec<&PropertyDecl>)> = BTreeMap::new();
        for (owner, prop) in fields {
            owners
                .entry(owner.qualified_name.as_str())
                .or_insert_with(|| (owner, Vec::new()))
                .1
                .push(prop);
        }
        owners
    }

    /// Any inaccessible field aborts the whole round for this processor.
    fn check_owners(owners: &[(&ClassDecl, Vec<&PropertyDecl>)]) -> Result<()> {
        for (owner, props) in owners {
            for prop in props {
                check_access(owner, prop)?;
            }
        }
        Ok(())
    }
}

/// The three processors over one symbol source per round.
pub struct Pipeline {
    options: CompilerOptions,
    backend: Box<dyn Backend>,
}

impl Pipeline {
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            backend: Box::new(KotlinBackend),
        }
    }

    pub fn with_backend(mut self, backend: Box<dyn Backend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn run_round(
        &self,
        state: BuildState,
        source: &dyn SymbolSource,
        sink: &mut dyn CodeSink,
    ) -> RoundOutcome {
        let classifier = Classifier::new(source);
        let emitter = Emitter::new(self.backend.as_ref());
        let ctx = RoundContext {
            options: &self.options,
            classifier: &classifier,
            emitter: &emitter,
        };
        let mut diagnostics = Diagnostics::new();

        let (routes, route_report, docs) =
            RouteProcessor.process(&ctx, state.routes, sink, &mut diagnostics);
        let (hooks, hook_report) =
            InterceptorProcessor.process(&ctx, state.hooks, sink, &mut diagnostics);
        let autowired_report = AutowiredProcessor.process(&ctx, sink, &mut diagnostics);

        let outcome = RoundOutcome {
            state: BuildState { routes, hooks },
            diagnostics,
            reports: vec![route_report, hook_report, autowired_report],
            docs,
        };
        tracing::debug!(
            target: "arouter::compiler",
            written = outcome.written(),
            failed = outcome.failed(),
            deferred = outcome.deferred().len(),
            "round finished"
        );
        outcome
    }

    /// Emit every route and interceptor table from `state`, including tables
    /// held back for declarations that never resolved. Tables already written
    /// with the same content come back as unchanged.
    pub fn finish(&self, state: BuildState, sink: &mut dyn CodeSink) -> RoundOutcome {
        let emitter = Emitter::new(self.backend.as_ref());
        let mut diagnostics = Diagnostics::new();

        let mut route_report = ProcessorReport::new(RouteProcessor::NAME);
        let mut docs = None;
        if !state.routes.is_empty() {
            if let Some((units, rendered)) =
                RouteProcessor::tables(&self.options, &state.routes, &mut route_report, &mut diagnostics)
            {
                route_report.emitted = emitter.emit(units, sink, &mut diagnostics);
                docs = rendered;
            }
        }

        let mut hook_report = ProcessorReport::new(InterceptorProcessor::NAME);
        if !state.hooks.is_empty() {
            match self.options.require_module_name() {
                Ok(module) => {
                    hook_report.emitted =
                        emitter.emit(vec![hook_unit(module, &state.hooks)], sink, &mut diagnostics)
                }
                Err(err) => fail(&mut hook_report, &mut diagnostics, err),
            }
        }

        RoundOutcome {
            state,
            diagnostics,
            reports: vec![route_report, hook_report],
            docs,
        }
    }
}
