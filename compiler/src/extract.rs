//! Route metadata extraction: one route-annotated declaration in, one
//! [`RouteRecord`] out.

use crate::capability::{provider_keys, route_kind};
use crate::diagnostics::Diagnostics;
use crate::error::{CompileError, Result};
use crate::inject::field_directive;
use crate::model::{RouteKind, RouteRecord};
use arouter_symbols::{ClassDecl, Classifier};

pub fn extract_route(classifier: &Classifier<'_>, decl: &ClassDecl) -> Result<RouteRecord> {
    let Some(route) = decl.annotations.route.as_ref() else {
        return Err(CompileError::UnsupportedRouteTarget {
            target: decl.qualified_name.clone(),
        });
    };

    let kind = route_kind(classifier, decl);
    if kind == RouteKind::Unknown {
        return Err(CompileError::UnsupportedRouteTarget {
            target: decl.qualified_name.clone(),
        });
    }

    let mut record = RouteRecord::new(route.path.clone(), kind, decl.as_type());
    record.group = (!route.group.is_empty()).then(|| route.group.clone());
    record.extra = route.extras;
    record.priority = route.priority;
    record.description = (!route.name.is_empty()).then(|| route.name.clone());

    match kind {
        RouteKind::ScreenComponent | RouteKind::SubScreenComponent => {
            for prop in &decl.properties {
                if let Some(directive) = field_directive(classifier, prop) {
                    record.field_directives.insert(prop.name.clone(), directive);
                }
            }
        }
        RouteKind::CapabilityProvider => {
            record.provider_keys = provider_keys(classifier, decl);
        }
        RouteKind::BackgroundService | RouteKind::Unknown => {}
    }

    Ok(record)
}

/// Extract every declaration, isolating failures per element.
pub fn extract_routes(
    classifier: &Classifier<'_>,
    decls: &[&ClassDecl],
    diagnostics: &mut Diagnostics,
) -> (Vec<RouteRecord>, usize) {
    let mut records = Vec::with_capacity(decls.len());
    let mut failed = 0;

    for decl in decls {
        match extract_route(classifier, decl) {
            Ok(record) => {
                let label = match record.kind {
                    RouteKind::ScreenComponent => "activity",
                    RouteKind::SubScreenComponent => "fragment",
                    RouteKind::BackgroundService => "service",
                    RouteKind::CapabilityProvider => "provider",
                    RouteKind::Unknown => "unknown",
                };
                diagnostics.info(format!(
                    ">>> Found {} route: {} <<<",
                    label, decl.qualified_name
                ));
                records.push(record);
            }
            Err(err) => {
                diagnostics.report(&err, Some(&decl.qualified_name));
                failed += 1;
            }
        }
    }

    (records, failed)
}
