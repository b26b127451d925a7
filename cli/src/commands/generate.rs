use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use arouter_compiler::{
    backend_by_name, BuildState, CodeSink, FileSink, Pipeline, RoundOutcome, WriteOnceSink,
    WriteStatus,
};
use arouter_symbols::parse::parse_snapshot_file;
use arouter_symbols::{ClassDecl, SymbolSource, SymbolTable};

use crate::config::ArouterConfig;
use crate::ui;

/// Command-line overrides for `generate`.
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    /// One snapshot per round, in order
    pub symbols: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub module: Option<String>,
    pub backend: Option<String>,
    pub docs: bool,
    pub docs_dir: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct GenerateSummary {
    pub rounds: usize,
    pub written: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub fatal: usize,
    pub deferred: Vec<String>,
}

impl GenerateSummary {
    fn record(&mut self, outcome: &RoundOutcome) {
        self.rounds += 1;
        self.absorb(outcome);
        self.deferred = outcome.deferred();
    }

    /// Counts only; the final flush neither adds a round nor clears deferrals.
    fn absorb(&mut self, outcome: &RoundOutcome) {
        self.written += outcome.written();
        self.unchanged += outcome
            .reports
            .iter()
            .map(|r| r.emitted.unchanged.len())
            .sum::<usize>();
        self.failed += outcome.failed();
        self.fatal += outcome.fatal_errors().count();
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.fatal == 0
    }
}

/// Declarations any processor would pick up.
fn is_annotated(decl: &ClassDecl) -> bool {
    decl.annotations.route.is_some()
        || decl.annotations.interceptor.is_some()
        || decl.properties.iter().any(|p| p.directive().is_some())
}

/// Carries declarations between rounds: library types stay visible for
/// classification, and deferred declarations are offered again.
#[derive(Debug, Default)]
struct RoundInputs {
    library: Vec<ClassDecl>,
    deferred: Vec<ClassDecl>,
}

impl RoundInputs {
    fn table_for(&self, declarations: Vec<ClassDecl>) -> SymbolTable {
        let mut table = SymbolTable::new();
        table.extend(self.library.iter().cloned());
        table.extend(self.deferred.iter().cloned());
        table.extend(declarations);
        table
    }

    fn advance(&mut self, table: &SymbolTable, deferred: &[String]) {
        let pending: BTreeSet<&str> = deferred.iter().map(String::as_str).collect();
        let library_names: BTreeSet<String> =
            self.library.iter().map(|d| d.qualified_name.clone()).collect();
        for decl in table.declarations() {
            if !is_annotated(decl) && !library_names.contains(&decl.qualified_name) {
                self.library.push(decl.clone());
            }
        }
        self.deferred = table
            .declarations()
            .iter()
            .filter(|decl| pending.contains(decl.qualified_name.as_str()))
            .cloned()
            .collect();
        tracing::debug!(
            target: "arouter::cli",
            library = self.library.len(),
            deferred = self.deferred.len(),
            "carrying declarations into the next round"
        );
    }
}

/// Docs go through their own write-once sink below the docs directory.
fn write_docs(
    outcome: &RoundOutcome,
    sink: &mut WriteOnceSink<FileSink>,
    summary: &mut GenerateSummary,
) {
    let Some(docs) = &outcome.docs else {
        return;
    };
    match sink.write(docs) {
        Ok(WriteStatus::Written) => {
            ui::print_info(&format!("{} {}", ui::symbols::PLUS, docs.relative_path))
        }
        Ok(WriteStatus::Unchanged) => {}
        Err(err) => {
            ui::print_error(&err.to_string());
            summary.failed += 1;
        }
    }
}

pub fn run(config_path: &str, args: GenerateArgs) -> Result<GenerateSummary> {
    if args.symbols.is_empty() {
        anyhow::bail!("No symbol snapshots given. Pass at least one --symbols <file>.");
    }

    let mut config = ArouterConfig::load_optional(config_path)?.unwrap_or_default();
    if let Some(module) = &args.module {
        config.args.insert(
            arouter_compiler::contracts::KEY_MODULE_NAME.to_string(),
            module.clone(),
        );
    }
    if let Some(backend) = &args.backend {
        config.output.backend = backend.clone();
    }
    if let Some(output) = &args.output {
        config.output.dir = output.to_string_lossy().to_string();
    }
    if let Some(docs_dir) = &args.docs_dir {
        config.output.docs_dir = Some(docs_dir.to_string_lossy().to_string());
    }
    config.validate()?;

    let options = config.compiler_options();
    let docs = args.docs || options.generate_docs;
    let options = options.with_docs(docs);
    let backend = backend_by_name(&config.output.backend)
        .with_context(|| format!("Unknown backend '{}'", config.output.backend))?;
    let pipeline = Pipeline::new(options).with_backend(backend);

    ui::print_step(&format!(
        "Generating {} sources into {}",
        pipeline.backend().name(),
        config.output_dir().display()
    ));
    if let Some(module) = &pipeline.options().module_name {
        ui::print_info(&format!("module: {}", module));
    }

    let mut sink = WriteOnceSink::new(FileSink::new(config.output_dir()));
    let mut docs_sink = WriteOnceSink::new(FileSink::new(config.docs_dir()));
    let mut state = BuildState::default();
    let mut inputs = RoundInputs::default();
    let mut summary = GenerateSummary::default();

    for (round, path) in args.symbols.iter().enumerate() {
        let snapshot = parse_snapshot_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load symbols '{}': {}", path.display(), e))?;
        let table = inputs.table_for(snapshot.declarations);

        ui::print_step(&format!(
            "Round {} ({}, {})",
            round + 1,
            path.display(),
            ui::plural(table.len(), "declaration")
        ));
        let outcome = pipeline.run_round(state, &table, &mut sink);
        print_round(&outcome);
        write_docs(&outcome, &mut docs_sink, &mut summary);

        summary.record(&outcome);
        inputs.advance(&table, &summary.deferred);
        state = outcome.state;
    }

    ui::print_step("Writing routing tables");
    let finished = pipeline.finish(state, &mut sink);
    print_round(&finished);
    write_docs(&finished, &mut docs_sink, &mut summary);
    summary.absorb(&finished);

    print_summary(&summary);
    Ok(summary)
}

fn print_round(outcome: &RoundOutcome) {
    for report in &outcome.reports {
        for key in &report.emitted.written {
            ui::print_info(&format!("{} {}", ui::symbols::PLUS, key));
        }
        for key in &report.emitted.unchanged {
            ui::print_info(&format!("{} {}", ui::symbols::EQUALS, key));
        }
        for (key, err) in &report.emitted.failed {
            ui::print_error(&format!("{}: {}", key, err));
        }
        if let Some(err) = &report.fatal {
            ui::print_error(&format!("{} processor: {}", report.processor, err));
        }
    }
}

fn print_summary(summary: &GenerateSummary) {
    println!();
    let line = format!(
        "{} written, {} unchanged across {}",
        ui::plural(summary.written, "unit"),
        summary.unchanged,
        ui::plural(summary.rounds, "round")
    );
    if summary.is_clean() {
        ui::print_success(&line);
    } else {
        ui::print_error(&format!(
            "{} ({} failed, {} fatal)",
            line,
            summary.failed,
            summary.fatal
        ));
    }
    if !summary.deferred.is_empty() {
        ui::print_warning(&format!(
            "{} still unresolved after the last round:",
            ui::plural(summary.deferred.len(), "declaration")
        ));
        for name in &summary.deferred {
            ui::print_bullet(&name.yellow().to_string());
        }
    }
}

/// Any fatal processor error or failed unit fails the command.
pub fn check(summary: &GenerateSummary) -> Result<()> {
    if !summary.is_clean() {
        anyhow::bail!(
            "generation finished with {} failed unit(s) and {} fatal error(s)",
            summary.failed,
            summary.fatal
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../compiler/tests/fixtures/app_module.json")
    }

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("write snapshot");
        path
    }

    fn args(symbols: Vec<PathBuf>, out: &Path) -> GenerateArgs {
        GenerateArgs {
            symbols,
            output: Some(out.to_path_buf()),
            module: Some("app".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_writes_units() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("out");
        let mut generate = args(vec![fixture()], &out);
        generate.docs = true;
        generate.docs_dir = Some(dir.path().join("docs"));

        let summary = run(
            dir.path().join("missing.toml").to_str().expect("utf-8 path"),
            generate,
        )
        .expect("generate should succeed");

        assert!(summary.is_clean());
        assert_eq!(summary.written, 9);
        assert_eq!(
            summary.deferred,
            vec!["com.example.interceptor.PendingInterceptor".to_string()]
        );
        assert!(out
            .join("com/alibaba/android/arouter/routes/ARouter$$Root$$app.kt")
            .exists());
        assert!(out
            .join("com/example/test/Test1Activity$$ARouter$$Autowired.kt")
            .exists());
        assert!(dir.path().join("docs/arouter-map-of-app.json").exists());
    }

    #[test]
    fn test_config_file_selects_java() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("java-out");
        let config = write(
            dir.path(),
            "arouter.toml",
            &format!(
                "[args]\nAROUTER_MODULE_NAME = \"app\"\n\n[output]\ndir = {:?}\nbackend = \"java\"\n",
                out.display().to_string()
            ),
        );
        let generate = GenerateArgs {
            symbols: vec![fixture()],
            ..Default::default()
        };

        let summary = run(config.to_str().expect("utf-8 path"), generate).expect("generate");
        assert!(summary.is_clean());
        assert!(out
            .join("com/alibaba/android/arouter/routes/ARouter$$Group$$test.java")
            .exists());
    }

    #[test]
    fn test_deferred_owner_resolves_in_later_round() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = write(
            dir.path(),
            "round1.json",
            r#"{"declarations": [
                {"qualified_name": "android.app.Activity"},
                {"qualified_name": "com.example.service.HelloService",
                 "supertypes": [{"name": "com.alibaba.android.arouter.facade.template.IProvider"}]},
                {"qualified_name": "com.example.MainActivity",
                 "supertypes": [{"name": "android.app.Activity"}],
                 "annotations": {"route": {"path": "/main/home"}}},
                {"qualified_name": "com.example.Holder",
                 "supertypes": [{"name": "com.example.generated.Base"}],
                 "properties": [{"name": "hello", "type": {"name": "com.example.service.HelloService"}, "autowired": {}}],
                 "resolved": false}
            ]}"#,
        );
        let second = write(
            dir.path(),
            "round2.json",
            r#"{"declarations": [
                {"qualified_name": "com.example.generated.Base"},
                {"qualified_name": "com.example.Holder",
                 "supertypes": [{"name": "com.example.generated.Base"}],
                 "properties": [{"name": "hello", "type": {"name": "com.example.service.HelloService"}, "autowired": {}}]}
            ]}"#,
        );
        let out = dir.path().join("out");

        let summary = run(
            dir.path().join("none.toml").to_str().expect("utf-8 path"),
            args(vec![first, second], &out),
        )
        .expect("generate");

        assert_eq!(summary.rounds, 2);
        assert!(summary.is_clean(), "{:?}", summary);
        assert!(summary.deferred.is_empty());
        let injector = fs::read_to_string(out.join("com/example/Holder$$ARouter$$Autowired.kt"))
            .expect("holder injector");
        assert!(injector.contains("substitute.hello = ARouter.getInstance().navigation(HelloService::class.java)"));
    }

    #[test]
    fn test_conflicting_rounds_fail_the_command() {
        let dir = tempfile::tempdir().expect("tempdir");
        let route = |path: &str, name: &str| {
            format!(
                r#"{{"declarations": [
                    {{"qualified_name": "android.app.Activity"}},
                    {{"qualified_name": "com.example.{}",
                     "supertypes": [{{"name": "android.app.Activity"}}],
                     "annotations": {{"route": {{"path": "{}"}}}}}}
                ]}}"#,
                name, path
            )
        };
        let first = write(dir.path(), "round1.json", &route("/main/one", "One"));
        let second = write(dir.path(), "round2.json", &route("/main/two", "Two"));

        let summary = run(
            dir.path().join("none.toml").to_str().expect("utf-8 path"),
            args(vec![first, second], &dir.path().join("out")),
        )
        .expect("rounds run to completion");

        assert!(summary.failed > 0);
        assert!(check(&summary).is_err());
    }

    #[test]
    fn test_missing_symbols_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = run("arouter.toml", args(Vec::new(), dir.path())).unwrap_err();
        assert!(err.to_string().contains("--symbols"));
    }
}
