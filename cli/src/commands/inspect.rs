use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use arouter_compiler::capability::{route_kind, value_kind};
use arouter_compiler::RouteKind;
use arouter_symbols::parse::parse_snapshot_file;
use arouter_symbols::{
    find_declaration, search_declarations, AnnotationKind, ClassDecl, Classifier, SymbolSource,
    SymbolTable,
};

fn load(path: &Path) -> Result<SymbolTable> {
    let snapshot = parse_snapshot_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to load symbols '{}': {}", path.display(), e))?;
    Ok(SymbolTable::from_snapshot(snapshot))
}

#[derive(Debug, Serialize)]
struct SnapshotOverview {
    declarations: usize,
    unresolved: Vec<String>,
    routes: Vec<RouteLine>,
    interceptors: Vec<InterceptorLine>,
    injected_owners: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RouteLine {
    path: String,
    kind: RouteKind,
    target: String,
}

#[derive(Debug, Serialize)]
struct InterceptorLine {
    priority: i32,
    target: String,
}

fn overview(table: &SymbolTable) -> SnapshotOverview {
    let classifier = Classifier::new(table);
    let mut routes = Vec::new();
    let mut interceptors = Vec::new();
    let mut injected_owners = Vec::new();
    let mut unresolved = Vec::new();

    for decl in table.declarations() {
        if !decl.resolved {
            unresolved.push(decl.qualified_name.clone());
        }
        if let Some(route) = &decl.annotations.route {
            routes.push(RouteLine {
                path: route.path.clone(),
                kind: route_kind(&classifier, decl),
                target: decl.qualified_name.clone(),
            });
        }
        if let Some(hook) = &decl.annotations.interceptor {
            interceptors.push(InterceptorLine {
                priority: hook.priority,
                target: decl.qualified_name.clone(),
            });
        }
        if decl.properties.iter().any(|p| p.directive().is_some()) {
            injected_owners.push(decl.qualified_name.clone());
        }
    }
    routes.sort_by(|a, b| a.path.cmp(&b.path));
    interceptors.sort_by_key(|line| line.priority);

    SnapshotOverview {
        declarations: table.len(),
        unresolved,
        routes,
        interceptors,
        injected_owners,
    }
}

#[derive(Debug, Serialize)]
struct DeclarationDetail {
    qualified_name: String,
    resolved: bool,
    ancestors: Vec<String>,
    route_kind: Option<RouteKind>,
    fields: Vec<FieldLine>,
}

#[derive(Debug, Serialize)]
struct FieldLine {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    value_kind: arouter_compiler::ValueKind,
    key: Option<String>,
    required: bool,
}

fn detail(table: &SymbolTable, decl: &ClassDecl) -> DeclarationDetail {
    let classifier = Classifier::new(table);
    let fields = decl
        .properties
        .iter()
        .map(|property| {
            let directive = property.directive();
            FieldLine {
                name: property.name.clone(),
                type_name: property.type_.name.clone(),
                value_kind: value_kind(&classifier, &property.type_),
                key: directive.as_ref().map(|d| {
                    if d.name.is_empty() {
                        property.name.clone()
                    } else {
                        d.name.clone()
                    }
                }),
                required: directive.map(|d| d.required).unwrap_or(false),
            }
        })
        .collect();

    DeclarationDetail {
        qualified_name: decl.qualified_name.clone(),
        resolved: decl.resolved,
        ancestors: classifier.ancestors(decl).to_vec(),
        route_kind: decl
            .annotations
            .route
            .as_ref()
            .map(|_| route_kind(&classifier, decl)),
        fields,
    }
}

/// Summarize a snapshot, or show one declaration when `name` is given.
pub fn inspect(symbols: &Path, name: Option<&str>, json: bool) -> Result<()> {
    let table = load(symbols)?;

    if let Some(name) = name {
        let decl = find_declaration(&table, name).map_err(|e| anyhow::anyhow!("{}", e))?;
        let detail = detail(&table, decl);
        if json {
            println!("{}", serde_json::to_string_pretty(&detail)?);
        } else {
            print_detail(&detail);
        }
        return Ok(());
    }

    let overview = overview(&table);
    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
    } else {
        print_overview(&overview);
    }
    Ok(())
}

fn print_overview(overview: &SnapshotOverview) {
    println!(
        "{} declarations, {} routes, {} interceptors, {} injected owners",
        overview.declarations.to_string().bold(),
        overview.routes.len().to_string().bold(),
        overview.interceptors.len().to_string().bold(),
        overview.injected_owners.len().to_string().bold()
    );

    if !overview.routes.is_empty() {
        println!("\n{}", "Routes".bold());
        println!("{}", "-".repeat(60).dimmed());
        for route in &overview.routes {
            println!(
                "  {:<32} {:<20} {}",
                route.path.green(),
                format!("{:?}", route.kind).cyan(),
                route.target.dimmed()
            );
        }
    }

    if !overview.interceptors.is_empty() {
        println!("\n{}", "Interceptors".bold());
        println!("{}", "-".repeat(60).dimmed());
        for hook in &overview.interceptors {
            println!("  {:>4}  {}", hook.priority.to_string().yellow(), hook.target);
        }
    }

    if !overview.injected_owners.is_empty() {
        println!("\n{}", "Autowired".bold());
        println!("{}", "-".repeat(60).dimmed());
        for owner in &overview.injected_owners {
            println!("  {}", owner);
        }
    }

    if !overview.unresolved.is_empty() {
        println!();
        println!(
            "{} {} unresolved:",
            "!".yellow().bold(),
            overview.unresolved.len()
        );
        for name in &overview.unresolved {
            println!("  {}", name.yellow());
        }
    }
}

fn print_detail(detail: &DeclarationDetail) {
    println!("{}", detail.qualified_name.bold());
    if !detail.resolved {
        println!("  {}", "unresolved".yellow());
    }
    if let Some(kind) = detail.route_kind {
        println!("  route kind: {}", format!("{:?}", kind).cyan());
    }
    if !detail.ancestors.is_empty() {
        println!("\n  {}", "Ancestors".bold());
        for ancestor in &detail.ancestors {
            println!("    {}", ancestor.dimmed());
        }
    }
    if !detail.fields.is_empty() {
        println!("\n  {}", "Fields".bold());
        for field in &detail.fields {
            let key = match &field.key {
                Some(key) if field.required => format!(" <- \"{}\" (required)", key),
                Some(key) => format!(" <- \"{}\"", key),
                None => String::new(),
            };
            println!(
                "    {}: {} [{:?}]{}",
                field.name.green(),
                field.type_name,
                field.value_kind,
                key.dimmed()
            );
        }
    }
}

fn annotation_label(kind: AnnotationKind) -> &'static str {
    match kind {
        AnnotationKind::Route => "route",
        AnnotationKind::Interceptor => "interceptor",
        AnnotationKind::Autowired => "autowired",
        AnnotationKind::Param => "param",
    }
}

pub fn search(symbols: &Path, query: &str) -> Result<()> {
    let table = load(symbols)?;
    let results = search_declarations(&table, query);
    if results.is_empty() {
        println!("No annotated declarations match '{}'", query);
        return Ok(());
    }
    for result in results {
        let labels: Vec<&str> = result
            .annotations
            .iter()
            .map(|kind| annotation_label(*kind))
            .collect();
        println!(
            "  {}  {}",
            result.qualified_name.green(),
            format!("[{}]", labels.join(", ")).dimmed()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_table() -> SymbolTable {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../compiler/tests/fixtures/app_module.json");
        load(&path).expect("fixture loads")
    }

    #[test]
    fn test_overview_orders_routes_and_hooks() {
        let table = fixture_table();
        let overview = overview(&table);

        assert_eq!(overview.declarations, table.len());
        let paths: Vec<&str> = overview.routes.iter().map(|r| r.path.as_str()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);

        let priorities: Vec<i32> = overview.interceptors.iter().map(|h| h.priority).collect();
        assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
        assert!(overview
            .unresolved
            .contains(&"com.example.interceptor.PendingInterceptor".to_string()));
    }

    #[test]
    fn test_detail_reports_kind_and_keys() {
        let table = fixture_table();
        let decl = find_declaration(&table, "Test1Activity").expect("simple name resolves");
        let detail = detail(&table, decl);

        assert_eq!(detail.route_kind, Some(RouteKind::ScreenComponent));
        assert!(detail.ancestors.contains(&"android.app.Activity".to_string()));
        let height = detail
            .fields
            .iter()
            .find(|f| f.name == "height")
            .expect("height field");
        assert_eq!(height.key.as_deref(), Some("h"));
        let age = detail.fields.iter().find(|f| f.name == "age").expect("age");
        assert!(age.required);
    }

    #[test]
    fn test_unknown_name_suggests() {
        let table = fixture_table();
        let err = find_declaration(&table, "Test1Activty").unwrap_err();
        assert!(err.to_string().contains("Did you mean"));
    }
}
