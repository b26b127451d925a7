use arouter_symbols::parse::parse_snapshot_file;
use arouter_symbols::{Classifier, SymbolSource, SymbolTable};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn app_module() -> SymbolTable {
    let snapshot =
        parse_snapshot_file(fixture_path("app_module.json")).expect("should parse app_module.json");
    SymbolTable::from_snapshot(snapshot)
}

#[test]
fn test_parse_app_module() {
    let table = app_module();
    assert_eq!(table.routes().len(), 9, "app_module should have 9 routes");
    assert_eq!(
        table.interceptors().len(),
        3,
        "app_module should have 3 interceptors"
    );
    assert_eq!(
        table.autowired().len(),
        15,
        "app_module should have 15 autowired fields"
    );
}

#[test]
fn test_activity_chain_through_library_declarations() {
    let table = app_module();
    let classifier = Classifier::new(&table);
    let screen = table
        .resolve("com.example.test.Test1Activity")
        .expect("Test1Activity present");

    assert!(classifier.implements(screen, "android.app.Activity"));
    assert_eq!(
        classifier.first_match(
            screen,
            &["android.app.Activity", "androidx.appcompat.app.AppCompatActivity"]
        ),
        Some(1),
        "AppCompatActivity is closer than Activity in the chain"
    );
}

#[test]
fn test_unresolved_declarations_are_flagged() {
    let table = app_module();
    let pending: Vec<&str> = table
        .declarations()
        .iter()
        .filter(|decl| !decl.resolved)
        .map(|decl| decl.qualified_name.as_str())
        .collect();
    assert_eq!(pending, vec!["com.example.interceptor.PendingInterceptor"]);
}
