//! Machine-readable route listing, written when docs are enabled.

use crate::error::{CompileError, Result};
use crate::model::RouteRecord;
use crate::registry::RouteAccumulator;
use crate::render::RenderedUnit;
use crate::units::UnitKey;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDoc {
    pub group: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub class_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub mark: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDoc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDoc {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
}

impl From<&RouteRecord> for RouteDoc {
    fn from(record: &RouteRecord) -> Self {
        let params = if record.kind.takes_parameters() {
            record
                .field_directives
                .values()
                .map(|directive| ParamDoc {
                    key: directive.key().to_string(),
                    kind: format!("{:?}", directive.value_kind).to_lowercase(),
                    description: directive.description.clone(),
                    required: directive.required,
                })
                .collect()
        } else {
            Vec::new()
        };
        Self {
            group: record.group().to_string(),
            path: record.path.clone(),
            description: record.description.clone(),
            class_name: record.target.name.clone(),
            kind: record.kind.runtime_name().to_lowercase(),
            mark: record.extra,
            params,
        }
    }
}

pub fn route_docs(routes: &RouteAccumulator) -> BTreeMap<String, Vec<RouteDoc>> {
    routes
        .groups()
        .map(|(group, records)| {
            (
                group.to_string(),
                records.into_iter().map(RouteDoc::from).collect(),
            )
        })
        .collect()
}

/// `arouter-map-of-<module>.json`
pub fn render_docs(module: &str, routes: &RouteAccumulator) -> Result<RenderedUnit> {
    let key = UnitKey::new("", format!("arouter-map-of-{}", module));
    let source = serde_json::to_string_pretty(&route_docs(routes)).map_err(|e| CompileError::Render {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    Ok(RenderedUnit {
        relative_path: format!("{}.json", key.name),
        key,
        source,
        originating: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::model::{FieldDirective, RouteKind, ValueKind};
    use arouter_symbols::TypeRef;

    #[test]
    fn test_docs_by_group() {
        let mut routes = RouteAccumulator::new();
        let mut diagnostics = Diagnostics::new();

        let mut screen = RouteRecord::new(
            "/test/activity1",
            RouteKind::ScreenComponent,
            TypeRef::named("com.example.Test1Activity"),
        );
        screen.description = Some("Test activity".to_string());
        screen.extra = 2;
        screen.field_directives.insert(
            "height".to_string(),
            FieldDirective {
                field: "height".to_string(),
                value_kind: ValueKind::Int,
                required: false,
                explicit_name: Some("h".to_string()),
                description: None,
            },
        );
        routes.insert(screen, &mut diagnostics);
        routes.insert(
            RouteRecord::new(
                "/service/test",
                RouteKind::CapabilityProvider,
                TypeRef::named("com.example.TestService"),
            ),
            &mut diagnostics,
        );

        let unit = render_docs("app", &routes).expect("docs");
        assert_eq!(unit.relative_path, "arouter-map-of-app.json");

        let json: serde_json::Value = serde_json::from_str(&unit.source).expect("json");
        let doc = &json["test"][0];
        assert_eq!(doc["path"], "/test/activity1");
        assert_eq!(doc["type"], "activity");
        assert_eq!(doc["mark"], 2);
        assert_eq!(doc["className"], "com.example.Test1Activity");
        assert_eq!(doc["params"][0]["key"], "h");
        assert_eq!(doc["params"][0]["type"], "int");
        assert_eq!(json["service"][0]["type"], "provider");
        assert!(json["service"][0].get("params").is_none());
    }
}
