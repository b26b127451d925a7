//! Kotlin source backend.

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

const IMPLICIT_PACKAGES: &[&str] = &["kotlin", "kotlin.collections"];
const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct KotlinBackend;

impl Backend for KotlinBackend {
    fn name(&self) -> &'static str {
        "kotlin"
    }

    fn extension(&self) -> &'static str {
        "kt"
    }

    fn render(&self, unit: &GeneratedUnit) -> Result<String> {
        let mut imports = Imports::new(&unit.key.package, IMPLICIT_PACKAGES);
        let body = match &unit.body {
            UnitBody::RouteRoot { groups } => root(&mut imports, &unit.key, groups)?,
            UnitBody::RouteGroup { group, routes } => {
                check_identifier(&unit.key, group)?;
                route_group(&mut imports, &unit.key, routes)
            }
            UnitBody::ProviderGroup { entries } => providers(&mut imports, &unit.key, entries),
            UnitBody::InterceptorGroup { hooks } => interceptors(&mut imports, &unit.key, hooks),
            UnitBody::Injector(plan) => injector(&mut imports, &unit.key, plan),
        };

        let mut out = String::new();
        if !unit.key.package.is_empty() {
            out.push_str(&format!("package {}\n\n", unit.key.package));
        }
        let import_lines = imports.lines("");
        if !import_lines.is_empty() {
            out.push_str(&import_lines);
            out.push('\n');
        }
        out.push_str(&header());
        out.push_str(&body);
        Ok(out)
    }
}

/// Generated names contain `$`, which Kotlin only accepts quoted.
fn class_name(name: &str) -> String {
    if name.contains('$') {
        format!("`{}`", name)
    } else {
        name.to_string()
    }
}

fn literal(raw: &str) -> String {
    string_literal(raw, true)
}

pub fn type_name(imports: &mut Imports, ty: &TypeRef) -> String {
    let mut out = imports.name(&ty.name);
    if !ty.arguments.is_empty() {
        let arguments: Vec<String> = ty.arguments.iter().map(|a| type_name(imports, a)).collect();
        out.push('<');
        out.push_str(&arguments.join(", "));
        out.push('>');
    }
    if ty.nullable {
        out.push('?');
    }
    out
}

/// Class literal of the erased type.
fn class_literal(imports: &mut Imports, ty: &TypeRef) -> String {
    format!("{}::class.java", imports.name(&ty.name))
}

fn class_open(name: &str, contract: &str) -> String {
    format!("public class {} : {} {{\n", class_name(name), contract)
}

fn root(imports: &mut Imports, key: &UnitKey, groups: &[(String, UnitKey)]) -> Result<String> {
    let contract = imports.name(IROUTE_ROOT);
    let group_contract = imports.name(IROUTE_GROUP);

    let mut out = class_open(&key.name, &contract);
    out.push_str(&format!(
        "{}override fun {}(routes: MutableMap<String, Class<out {}>>) {{\n",
        INDENT, METHOD_LOAD_INTO, group_contract
    ));
    for (group, unit) in groups {
        check_identifier(key, group)?;
        out.push_str(&format!(
            "{0}{0}routes.put({1}, {2}::class.java)\n",
            INDENT,
            literal(group),
            class_name(&unit.name)
        ));
    }
    out.push_str(&format!("{}}}\n}}\n", INDENT));
    Ok(out)
}

fn params_map(record: &RouteRecord) -> String {
    let params = record.params_type();
    if params.is_empty() {
        return "null".to_string();
    }
    let pairs: Vec<String> = params
        .iter()
        .map(|(key, code)| format!("{} to {}", literal(key), code))
        .collect();
    format!("hashMapOf<String, Int>({})", pairs.join(", "))
}

fn route_meta(imports: &mut Imports, record: &RouteRecord) -> String {
    let meta_type = imports.name(ROUTE_META);
    let route_type = imports.name(ROUTE_TYPE);
    format!(
        "{}.build({}.{}, {}, {}, {}, {}, {}, {})",
        meta_type,
        route_type,
        record.kind.runtime_name(),
        class_literal(imports, &record.target),
        literal(&record.path),
        literal(record.group()),
        params_map(record),
        record.priority,
        record.extra
    )
}

fn route_group(imports: &mut Imports, key: &UnitKey, routes: &[RouteRecord]) -> String {
    let contract = imports.name(IROUTE_GROUP);
    let meta_type = imports.name(ROUTE_META);

    let mut out = class_open(&key.name, &contract);
    out.push_str(&format!(
        "{}override fun {}(atlas: MutableMap<String, {}>) {{\n",
        INDENT, METHOD_LOAD_INTO, meta_type
    ));
    for record in routes {
        let meta = route_meta(imports, record);
        out.push_str(&format!(
            "{0}{0}atlas.put({1}, {2})\n",
            INDENT,
            literal(&record.path),
            meta
        ));
    }
    out.push_str(&format!("{}}}\n}}\n", INDENT));
    out
}

fn providers(imports: &mut Imports, key: &UnitKey, entries: &[(String, RouteRecord)]) -> String {
    let contract = imports.name(IPROVIDER_GROUP);
    let meta_type = imports.name(ROUTE_META);

    let mut out = class_open(&key.name, &contract);
    out.push_str(&format!(
        "{}override fun {}(providers: MutableMap<String, {}>) {{\n",
        INDENT, METHOD_LOAD_INTO, meta_type
    ));
    for (lookup, record) in entries {
        let meta = route_meta(imports, record);
        out.push_str(&format!(
            "{0}{0}providers.put({1}, {2})\n",
            INDENT,
            literal(lookup),
            meta
        ));
    }
    out.push_str(&format!("{}}}\n}}\n", INDENT));
    out
}

fn interceptors(imports: &mut Imports, key: &UnitKey, hooks: &[HookRecord]) -> String {
    let contract = imports.name(IINTERCEPTOR_GROUP);
    let hook_contract = imports.name(IINTERCEPTOR);

    let mut out = class_open(&key.name, &contract);
    out.push_str(&format!(
        "{}override fun {}(interceptors: MutableMap<Int, Class<out {}>>) {{\n",
        INDENT, METHOD_LOAD_INTO, hook_contract
    ));
    for hook in hooks {
        let target = class_literal(imports, &hook.target);
        out.push_str(&format!(
            "{0}{0}interceptors.put({1}, {2})\n",
            INDENT, hook.priority, target
        ));
    }
    out.push_str(&format!("{}}}\n}}\n", INDENT));
    out
}

fn bundle(source: ParamSource) -> &'static str {
    match source {
        ParamSource::IntentExtras => "substitute.intent?.extras",
        ParamSource::Arguments => "substitute.arguments",
    }
}

fn injector(imports: &mut Imports, key: &UnitKey, plan: &InjectorPlan) -> String {
    let contract = imports.name(ISYRINGE);
    let arouter = imports.name(AROUTER);
    let owner = imports.name(&plan.target.name);

    let mut out = class_open(&key.name, &contract);
    let uses_json = plan.uses_json();
    if uses_json {
        let json = imports.name(JSON_SERVICE);
        out.push_str(&format!(
            "{}private var serializationService: {}? = null\n\n",
            INDENT, json
        ));
    }

    out.push_str(&format!(
        "{}override fun {}(target: Any?) {{\n",
        INDENT, METHOD_INJECT
    ));
    let body_indent = INDENT.repeat(2);
    if uses_json {
        let json = imports.name(JSON_SERVICE);
        out.push_str(&format!(
            "{}serializationService = {}.getInstance().navigation({}::class.java)\n",
            body_indent, arouter, json
        ));
    }
    out.push_str(&format!("{}val substitute = target as {}\n", body_indent, owner));

    for statement in &plan.statements {
        statement_lines(imports, statement, &body_indent, &mut out);
    }
    out.push_str(&format!("{}}}\n}}\n", INDENT));
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
            let getter = kind.typed_getter().unwrap_or("String");
            out.push_str(&format!(
                "{0}substitute.{1} = {2}?.get{3}({4}, substitute.{1}) ?: substitute.{1}\n",
                indent,
                field,
                bundle(*source),
                getter,
                literal(key)
            ));
        }
        Statement::GenericGet {
            field,
            key,
            kind,
            ty,
            source,
        } => {
            let ty = type_name(imports, &non_null(ty));
            let read = if *kind == ValueKind::Parcelable {
                format!("{}?.getParcelable<{}>({})", bundle(*source), ty, literal(key))
            } else {
                format!("({}?.getSerializable({}) as? {})", bundle(*source), literal(key), ty)
            };
            out.push_str(&format!(
                "{0}substitute.{1} = {2} ?: substitute.{1}\n",
                indent, field, read
            ));
        }
        Statement::JsonParse {
            field,
            key,
            ty,
            source,
            unavailable,
        } => {
            let wrapper = imports.name(TYPE_WRAPPER);
            let ty = type_name(imports, &non_null(ty));
            out.push_str(&format!("{}if (serializationService != null) {{\n", indent));
            out.push_str(&format!(
                "{0}{1}substitute.{2} = serializationService?.parseObject<{3}>({4}?.getString({5}), (object : {6}<{3}>() {{}}).type) ?: substitute.{2}\n",
                indent,
                INDENT,
                field,
                ty,
                bundle(*source),
                literal(key),
                wrapper
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
                    "{}.getInstance().build({}).navigation() as? {}",
                    arouter,
                    literal(path),
                    type_name(imports, &non_null(ty))
                ),
            };
            out.push_str(&format!("{}substitute.{} = {}\n", indent, field, lookup));
        }
        Statement::NullCheck {
            field,
            owner,
            action,
        } => {
            let message = literal(&null_message(field, owner));
            out.push_str(&format!("{}if (substitute.{} == null) {{\n", indent, field));
            match action {
                NullAction::Throw => out.push_str(&format!(
                    "{}{}throw RuntimeException({})\n",
                    indent, INDENT, message
                )),
                NullAction::Log => {
                    let log = imports.name(ANDROID_LOG);
                    out.push_str(&format!(
                        "{}{}{}.e({}, {})\n",
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
                "{}{}.e({}, {})\n",
                indent,
                log,
                literal(RUNTIME_TAG),
                literal(message)
            ));
        }
    }
}

fn non_null(ty: &TypeRef) -> TypeRef {
    TypeRef {
        nullable: false,
        ..ty.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDirective, RouteKind};

    fn render(unit: GeneratedUnit) -> String {
        KotlinBackend.render(&unit).expect("render")
    }

    #[test]
    fn test_root_lists_groups() {
        let unit = GeneratedUnit::new(
            UnitKey::root("app"),
            UnitBody::RouteRoot {
                groups: vec![
                    ("m2".to_string(), UnitKey::group("m2")),
                    ("test".to_string(), UnitKey::group("test")),
                ],
            },
        );
        let source = render(unit);
        assert!(source.starts_with("package com.alibaba.android.arouter.routes\n"));
        assert!(source.contains("import com.alibaba.android.arouter.facade.template.IRouteRoot\n"));
        assert!(source.contains("public class `ARouter$$Root$$app` : IRouteRoot {"));
        assert!(source.contains("routes.put(\"m2\", `ARouter$$Group$$m2`::class.java)"));
        assert!(source.find("\"m2\"") < source.find("\"test\""));
        assert!(source.contains("DO NOT EDIT THIS FILE"));
    }

    #[test]
    fn test_group_entry_carries_params() {
        let mut record = RouteRecord::new(
            "/test/activity1",
            RouteKind::ScreenComponent,
            TypeRef::named("com.example.Test1Activity"),
        );
        record.group = Some("test".to_string());
        record.extra = 2;
        record.field_directives.insert(
            "age".to_string(),
            FieldDirective {
                field: "age".to_string(),
                value_kind: ValueKind::Int,
                required: true,
                explicit_name: None,
                description: None,
            },
        );
        let unit = GeneratedUnit::new(
            UnitKey::group("test"),
            UnitBody::RouteGroup {
                group: "test".to_string(),
                routes: vec![record],
            },
        );
        let source = render(unit);
        assert!(source.contains("import com.example.Test1Activity\n"));
        assert!(source.contains(
            "atlas.put(\"/test/activity1\", RouteMeta.build(RouteType.ACTIVITY, Test1Activity::class.java, \"/test/activity1\", \"test\", hashMapOf<String, Int>(\"age\" to 3), -1, 2))"
        ));
    }

    #[test]
    fn test_bad_group_name_fails() {
        let unit = GeneratedUnit::new(
            UnitKey::group("bad-name"),
            UnitBody::RouteGroup {
                group: "bad-name".to_string(),
                routes: Vec::new(),
            },
        );
        assert!(KotlinBackend.render(&unit).is_err());
    }

    #[test]
    fn test_interceptors_in_given_order() {
        let hook = |priority, name: &str| HookRecord {
            priority,
            target: TypeRef::named(format!("com.example.{}", name)),
            name: None,
        };
        let unit = GeneratedUnit::new(
            UnitKey::interceptors("app"),
            UnitBody::InterceptorGroup {
                hooks: vec![hook(3, "Audit"), hook(7, "Login")],
            },
        );
        let source = render(unit);
        assert!(source.contains("loadInto(interceptors: MutableMap<Int, Class<out IInterceptor>>)"));
        let audit = source.find("interceptors.put(3, Audit::class.java)").expect("audit");
        let login = source.find("interceptors.put(7, Login::class.java)").expect("login");
        assert!(audit < login);
    }

    #[test]
    fn test_injector_statements() {
        let owner = TypeRef::named("com.example.Test1Activity");
        let plan = InjectorPlan {
            target: owner.clone(),
            statements: vec![
                Statement::ScalarGet {
                    field: "age".to_string(),
                    key: "age".to_string(),
                    kind: ValueKind::Int,
                    source: ParamSource::IntentExtras,
                },
                Statement::GenericGet {
                    field: "ser".to_string(),
                    key: "ser".to_string(),
                    kind: ValueKind::Serializable,
                    ty: TypeRef::named("com.example.TestSerializable").nullable(),
                    source: ParamSource::IntentExtras,
                },
                Statement::JsonParse {
                    field: "objList".to_string(),
                    key: "objList".to_string(),
                    ty: TypeRef::named("kotlin.collections.List")
                        .with_arguments(vec![TypeRef::named("com.example.TestObj")]),
                    source: ParamSource::IntentExtras,
                    unavailable: Box::new(Statement::LogWarn {
                        message: "no json".to_string(),
                    }),
                },
                Statement::ServiceLookup {
                    field: "helloService".to_string(),
                    ty: TypeRef::named("com.example.HelloService"),
                    by: LookupBy::DeclaredType,
                },
                Statement::NullCheck {
                    field: "helloService".to_string(),
                    owner: "Test1Activity".to_string(),
                    action: NullAction::Throw,
                },
            ],
        };
        let unit = GeneratedUnit::new(UnitKey::injector(&owner), UnitBody::Injector(plan));
        let source = render(unit);

        assert!(source.starts_with("package com.example\n"));
        assert!(source.contains("public class `Test1Activity$$ARouter$$Autowired` : ISyringe {"));
        assert!(source.contains("private var serializationService: SerializationService? = null"));
        assert!(source.contains("val substitute = target as Test1Activity\n"));
        assert!(source.contains(
            "substitute.age = substitute.intent?.extras?.getInt(\"age\", substitute.age) ?: substitute.age"
        ));
        assert!(source.contains(
            "substitute.ser = (substitute.intent?.extras?.getSerializable(\"ser\") as? TestSerializable) ?: substitute.ser"
        ));
        assert!(source.contains("parseObject<List<TestObj>>(substitute.intent?.extras?.getString(\"objList\"), (object : TypeWrapper<List<TestObj>>() {}).type)"));
        assert!(source.contains("Log.e(\"ARouter::\", \"no json\")"));
        assert!(source.contains(
            "substitute.helloService = ARouter.getInstance().navigation(HelloService::class.java)"
        ));
        assert!(source.contains(
            "throw RuntimeException(\"The field 'helloService' is null, in class 'Test1Activity' !\")"
        ));
        assert!(!source.contains("import kotlin.collections.List"));
    }

    #[test]
    fn test_injector_without_json_has_no_holder() {
        let owner = TypeRef::named("com.example.BlankFragment");
        let plan = InjectorPlan {
            target: owner.clone(),
            statements: vec![Statement::ScalarGet {
                field: "userId".to_string(),
                key: "userId".to_string(),
                kind: ValueKind::Long,
                source: ParamSource::Arguments,
            }],
        };
        let source = render(GeneratedUnit::new(
            UnitKey::injector(&owner),
            UnitBody::Injector(plan),
        ));
        assert!(!source.contains("serializationService"));
        assert!(source.contains("substitute.arguments?.getLong(\"userId\", substitute.userId)"));
    }
}
