//! Java source backend, for hosts whose components are written in Java.

use crate::contracts::{
    ANDROID_LOG, AROUTER, IINTERCEPTOR, IINTERCEPTOR_GROUP, IPROVIDER_GROUP, IROUTE_GROUP,
    IROUTE_ROOT, ISYRINGE, JSON_SERVICE, METHOD_INJECT, METHOD_LOAD_INTO, ROUTE_META, ROUTE_TYPE,
    RUNTIME_TAG, TYPE_WRAPPER,
};
use crate::error::Result;
use crate::inject::null_message;
use crate::ir::{InjectorPlan, LookupBy, NullAction, ParamSource, Statement};
use crate::model::{HookRecord, RouteRecord, ValueKind};
use crate::render::{check_identifier, header, string_literal, Backend, Imports};
use crate::units::{GeneratedUnit, UnitBody, UnitKey};
use arouter_symbols::TypeRef;

const IMPLICIT_PACKAGES: &[&str] = &["java.lang"];
const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaBackend;

impl Backend for JavaBackend {
    fn name(&self) -> &'static str {
        "java"
    }

    fn extension(&self) -> &'static str {
        "java"
    }

    fn render(&self, unit: &GeneratedUnit) -> Result<String> {
        let mut imports = Imports::new(&unit.key.package, IMPLICIT_PACKAGES);
        let body = match &unit.body {
            UnitBody::RouteRoot { groups } => root(&mut imports, &unit.key, groups)?,
            UnitBody::RouteGroup { group, routes } => {
                check_identifier(&unit.key, group)?;
                table(
                    &mut imports,
                    &unit.key,
                    IROUTE_GROUP,
                    "atlas",
                    routes.iter().map(|r| (r.path.as_str(), r)),
                )
            }
            UnitBody::ProviderGroup { entries } => table(
                &mut imports,
                &unit.key,
                IPROVIDER_GROUP,
                "providers",
                entries.iter().map(|(lookup, r)| (lookup.as_str(), r)),
            ),
            UnitBody::InterceptorGroup { hooks } => interceptors(&mut imports, &unit.key, hooks),
            UnitBody::Injector(plan) => injector(&mut imports, &unit.key, plan),
        };

        let mut out = String::new();
        if !unit.key.package.is_empty() {
            out.push_str(&format!("package {};\n\n", unit.key.package));
        }
        let import_lines = imports.lines(";");
        if !import_lines.is_empty() {
            out.push_str(&import_lines);
            out.push('\n');
        }
        out.push_str(&header());
        out.push_str(&body);
        Ok(out)
    }
}

/// Java spelling of a Kotlin builtin, or the name itself.
pub fn java_name(name: &str) -> &str {
    match name {
        "kotlin.Any" => "java.lang.Object",
        "kotlin.String" => "java.lang.String",
        "kotlin.CharSequence" => "java.lang.CharSequence",
        "kotlin.Int" => "java.lang.Integer",
        "kotlin.Long" => "java.lang.Long",
        "kotlin.Short" => "java.lang.Short",
        "kotlin.Byte" => "java.lang.Byte",
        "kotlin.Char" => "java.lang.Character",
        "kotlin.Float" => "java.lang.Float",
        "kotlin.Double" => "java.lang.Double",
        "kotlin.Boolean" => "java.lang.Boolean",
        "kotlin.collections.List" | "kotlin.collections.MutableList" => "java.util.List",
        "kotlin.collections.Set" | "kotlin.collections.MutableSet" => "java.util.Set",
        "kotlin.collections.Map" | "kotlin.collections.MutableMap" => "java.util.Map",
        "kotlin.collections.ArrayList" => "java.util.ArrayList",
        "kotlin.collections.HashMap" => "java.util.HashMap",
        other => other,
    }
}

pub fn type_name(imports: &mut Imports, ty: &TypeRef) -> String {
    let mut out = imports.name(java_name(&ty.name));
    if !ty.arguments.is_empty() {
        let arguments: Vec<String> = ty.arguments.iter().map(|a| type_name(imports, a)).collect();
        out.push('<');
        out.push_str(&arguments.join(", "));
        out.push('>');
    }
    out
}

fn class_literal(imports: &mut Imports, ty: &TypeRef) -> String {
    format!("{}.class", imports.name(java_name(&ty.name)))
}

fn literal(raw: &str) -> String {
    string_literal(raw, false)
}

fn class_open(name: &str, contract: &str) -> String {
    format!("public class {} implements {} {{\n", name, contract)
}

fn method_open(name: &str, parameter: &str) -> String {
    format!(
        "{0}@Override\n{0}public void {1}({2}) {{\n",
        INDENT, name, parameter
    )
}

fn close() -> String {
    format!("{}}}\n}}\n", INDENT)
}

fn root(imports: &mut Imports, key: &UnitKey, groups: &[(String, UnitKey)]) -> Result<String> {
    let contract = imports.name(IROUTE_ROOT);
    let group_contract = imports.name(IROUTE_GROUP);
    let map = imports.name("java.util.Map");

    let mut out = class_open(&key.name, &contract);
    out.push_str(&method_open(
        METHOD_LOAD_INTO,
        &format!("{}<String, Class<? extends {}>> routes", map, group_contract),
    ));
    for (group, unit) in groups {
        check_identifier(key, group)?;
        out.push_str(&format!(
            "{0}{0}routes.put({1}, {2}.class);\n",
            INDENT,
            literal(group),
            unit.name
        ));
    }
    out.push_str(&close());
    Ok(out)
}

fn params_map(record: &RouteRecord) -> String {
    let params = record.params_type();
    if params.is_empty() {
        return "null".to_string();
    }
    let mut out = String::from("new java.util.HashMap<String, Integer>(){{");
    for (key, code) in &params {
        out.push_str(&format!("put({}, {}); ", literal(key), code));
    }
    out.push_str("}}");
    out
}

fn table<'r>(
    imports: &mut Imports,
    key: &UnitKey,
    contract: &str,
    parameter: &str,
    entries: impl Iterator<Item = (&'r str, &'r RouteRecord)>,
) -> String {
    let contract = imports.name(contract);
    let map = imports.name("java.util.Map");
    let route_meta = imports.name(ROUTE_META);
    let route_type = imports.name(ROUTE_TYPE);

    let mut out = class_open(&key.name, &contract);
    out.push_str(&method_open(
        METHOD_LOAD_INTO,
        &format!("{}<String, {}> {}", map, route_meta, parameter),
    ));
    for (lookup, record) in entries {
        let target = class_literal(imports, &record.target);
        out.push_str(&format!(
            "{0}{0}{1}.put({2}, {3}.build({4}.{5}, {6}, {7}, {8}, {9}, {10}, {11}));\n",
            INDENT,
            parameter,
            literal(lookup),
            route_meta,
            route_type,
            record.kind.runtime_name(),
            target,
            literal(&record.path),
            literal(record.group()),
            params_map(record),
            record.priority,
            record.extra
        ));
    }
    out.push_str(&close());
    out
}

fn interceptors(imports: &mut Imports, key: &UnitKey, hooks: &[HookRecord]) -> String {
    let contract = imports.name(IINTERCEPTOR_GROUP);
    let hook_contract = imports.name(IINTERCEPTOR);
    let map = imports.name("java.util.Map");

    let mut out = class_open(&key.name, &contract);
    out.push_str(&method_open(
        METHOD_LOAD_INTO,
        &format!("{}<Integer, Class<? extends {}>> interceptors", map, hook_contract),
    ));
    for hook in hooks {
        let target = class_literal(imports, &hook.target);
        out.push_str(&format!(
            "{0}{0}interceptors.put({1}, {2});\n",
            INDENT, hook.priority, target
        ));
    }
    out.push_str(&close());
    out
}

fn read(source: ParamSource, kind: ValueKind, key: &str, field: &str) -> String {
    let key = literal(key);
    match (source, kind) {
        (ParamSource::IntentExtras, ValueKind::String) => format!(
            "substitute.getIntent().getExtras() == null ? substitute.{0} : substitute.getIntent().getExtras().getString({1}, substitute.{0})",
            field, key
        ),
        (ParamSource::IntentExtras, ValueKind::Parcelable) => {
            format!("substitute.getIntent().getParcelableExtra({})", key)
        }
        (ParamSource::IntentExtras, ValueKind::Serializable) => {
            format!("substitute.getIntent().getSerializableExtra({})", key)
        }
        (ParamSource::IntentExtras, ValueKind::Object) => {
            format!("substitute.getIntent().getStringExtra({})", key)
        }
        (ParamSource::IntentExtras, scalar) => format!(
            "substitute.getIntent().get{}Extra({}, substitute.{})",
            scalar.typed_getter().unwrap_or("String"),
            key,
            field
        ),
        (ParamSource::Arguments, ValueKind::Parcelable) => {
            format!("substitute.getArguments().getParcelable({})", key)
        }
        (ParamSource::Arguments, ValueKind::Serializable) => {
            format!("substitute.getArguments().getSerializable({})", key)
        }
        (ParamSource::Arguments, ValueKind::Object) => {
            format!("substitute.getArguments().getString({})", key)
        }
        (ParamSource::Arguments, scalar) => format!(
            "substitute.getArguments().get{}({}, substitute.{})",
            scalar.typed_getter().unwrap_or("String"),
            key,
            field
        ),
    }
}

fn injector(imports: &mut Imports, key: &UnitKey, plan: &InjectorPlan) -> String {
    let contract = imports.name(ISYRINGE);
    let owner = imports.name(&plan.target.name);

    let mut out = class_open(&key.name, &contract);
    let uses_json = plan.uses_json();
    if uses_json {
        let json = imports.name(JSON_SERVICE);
        out.push_str(&format!("{}private {} serializationService;\n\n", INDENT, json));
    }
    out.push_str(&method_open(METHOD_INJECT, "Object target"));

    let body_indent = INDENT.repeat(2);
    if uses_json {
        let arouter = imports.name(AROUTER);
        let json = imports.name(JSON_SERVICE);
        out.push_str(&format!(
            "{}serializationService = {}.getInstance().navigation({}.class);\n",
            body_indent, arouter, json
        ));
    }
    out.push_str(&format!(
        "{0}{1} substitute = ({1})target;\n",
        body_indent, owner
    ));
    for statement in &plan.statements {
        statement_lines(imports, statement, &body_indent, &mut out);
    }
    out.push_str(&close());
    out
}

fn statement_lines(imports: &mut Imports, statement: &Statement, indent: &str, out: &mut String) {
    match statement {
        Statement::ScalarGet {
            field,
            key,
            kind,
            source,
        } => {
            out.push_str(&format!(
                "{}substitute.{} = {};\n",
                indent,
                field,
                read(*source, *kind, key, field)
            ));
        }
        Statement::GenericGet {
            field,
            key,
            kind,
            ty,
            source,
        } => {
            let value = read(*source, *kind, key, field);
            let value = if *kind == ValueKind::Serializable {
                format!("({}) {}", type_name(imports, ty), value)
            } else {
                value
            };
            out.push_str(&format!("{}substitute.{} = {};\n", indent, field, value));
        }
        Statement::JsonParse {
            field,
            key,
            ty,
            source,
            unavailable,
        } => {
            let wrapper = imports.name(TYPE_WRAPPER);
            let ty = type_name(imports, ty);
            out.push_str(&format!("{}if (null != serializationService) {{\n", indent));
            out.push_str(&format!(
                "{0}{1}substitute.{2} = serializationService.parseObject({3}, new {4}<{5}>(){{}}.getType());\n",
                indent,
                INDENT,
                field,
                read(*source, ValueKind::Object, key, field),
                wrapper,
                ty
            ));
            out.push_str(&format!("{}}} else {{\n", indent));
            statement_lines(imports, unavailable, &format!("{}{}", indent, INDENT), out);
            out.push_str(&format!("{}}}\n", indent));
        }
        Statement::ServiceLookup { field, ty, by } => {
            let arouter = imports.name(AROUTER);
            let lookup = match by {
                LookupBy::DeclaredType => format!(
                    "{}.getInstance().navigation({})",
                    arouter,
                    class_literal(imports, ty)
                ),
                LookupBy::Path(path) => format!(
                    "({}){}.getInstance().build({}).navigation()",
                    type_name(imports, ty),
                    arouter,
                    literal(path)
                ),
            };
            out.push_str(&format!("{}substitute.{} = {};\n", indent, field, lookup));
        }
        Statement::NullCheck {
            field,
            owner,
            action,
        } => {
            let message = literal(&null_message(field, owner));
            out.push_str(&format!("{}if (null == substitute.{}) {{\n", indent, field));
            match action {
                NullAction::Throw => out.push_str(&format!(
                    "{}{}throw new RuntimeException({});\n",
                    indent, INDENT, message
                )),
                NullAction::Log => {
                    let log = imports.name(ANDROID_LOG);
                    out.push_str(&format!(
                        "{}{}{}.e({}, {});\n",
                        indent,
                        INDENT,
                        log,
                        literal(RUNTIME_TAG),
                        message
                    ));
                }
            }
            out.push_str(&format!("{}}}\n", indent));
        }
        Statement::LogWarn { message } => {
            let log = imports.name(ANDROID_LOG);
            out.push_str(&format!(
                "{}{}.e({}, {});\n",
                indent,
                log,
                literal(RUNTIME_TAG),
                literal(message)
            ));
        }
    }
}
