//! Field injection compiler: turns autowire directives into statements.
//!
//! Dispatch per field:
//!
//! | field type                     | statement                          | required check |
//! |--------------------------------|------------------------------------|----------------|
//! | capability provider            | `ServiceLookup` by type or by path | throws         |
//! | byte .. boolean (8 scalars)    | `ScalarGet`                        | never          |
//! | string                         | `ScalarGet`                        | logs           |
//! | parcelable / serializable      | `GenericGet`                       | logs           |
//! | anything else                  | `JsonParse`                        | logs           |

use crate::capability::{is_provider_type, route_kind, value_kind};
use crate::error::{CompileError, Result};
use crate::ir::{InjectorPlan, LookupBy, NullAction, ParamSource, Statement};
use crate::model::{FieldDirective, RouteKind, ValueKind};
use arouter_symbols::{ClassDecl, Classifier, PropertyDecl, Visibility};

/// Generated injectors assign fields directly, so private fields are out.
pub fn check_access(owner: &ClassDecl, prop: &PropertyDecl) -> Result<()> {
    if prop.visibility == Visibility::Private {
        return Err(CompileError::InaccessibleField {
            field: prop.name.clone(),
            owner: owner.qualified_name.clone(),
        });
    }
    Ok(())
}

/// The value-extraction directive of a property, or `None` when it carries
/// no directive or is a provider (those are injected by lookup).
pub fn field_directive(classifier: &Classifier<'_>, prop: &PropertyDecl) -> Option<FieldDirective> {
    let annotation = prop.directive()?;
    if is_provider_type(classifier, &prop.type_) {
        return None;
    }
    Some(FieldDirective {
        field: prop.name.clone(),
        value_kind: value_kind(classifier, &prop.type_),
        required: annotation.required,
        explicit_name: non_empty(&annotation.name),
        description: non_empty(&annotation.desc),
    })
}

/// Compile every directive-bearing property of `owner`, in declaration order.
pub fn compile_injector(
    classifier: &Classifier<'_>,
    owner: &ClassDecl,
    props: &[&PropertyDecl],
) -> Result<InjectorPlan> {
    let owner_kind = route_kind(classifier, owner);
    let mut statements = Vec::new();
    for prop in props {
        statements.extend(compile_field(classifier, owner, owner_kind, prop)?);
    }
    Ok(InjectorPlan {
        target: owner.as_type(),
        statements,
    })
}

pub fn compile_field(
    classifier: &Classifier<'_>,
    owner: &ClassDecl,
    owner_kind: RouteKind,
    prop: &PropertyDecl,
) -> Result<Vec<Statement>> {
    check_access(owner, prop)?;
    let Some(annotation) = prop.directive() else {
        return Ok(Vec::new());
    };
    let owner_name = owner.simple_name().to_string();

    if is_provider_type(classifier, &prop.type_) {
        let by = match non_empty(&annotation.name) {
            Some(path) => LookupBy::Path(path),
            None => LookupBy::DeclaredType,
        };
        let mut statements = vec![Statement::ServiceLookup {
            field: prop.name.clone(),
            ty: prop.type_.clone(),
            by,
        }];
        if annotation.required {
            statements.push(Statement::NullCheck {
                field: prop.name.clone(),
                owner: owner_name,
                action: NullAction::Throw,
            });
        }
        return Ok(statements);
    }

    let source = ParamSource::for_kind(owner_kind).ok_or_else(|| CompileError::IllegalTarget {
        field: prop.name.clone(),
        owner: owner.qualified_name.clone(),
    })?;
    let kind = value_kind(classifier, &prop.type_);
    let key = non_empty(&annotation.name).unwrap_or_else(|| prop.name.clone());
    let field = prop.name.clone();

    let extraction = match kind {
        ValueKind::Parcelable | ValueKind::Serializable => Statement::GenericGet {
            field: field.clone(),
            key,
            kind,
            ty: prop.type_.clone(),
            source,
        },
        ValueKind::Object => Statement::JsonParse {
            field: field.clone(),
            key,
            ty: prop.type_.clone(),
            source,
            unavailable: Box::new(Statement::LogWarn {
                message: format!(
                    "You want automatic inject the field '{}' in class '{}' , then you should implement 'SerializationService' to support object auto inject!",
                    field, owner_name
                ),
            }),
        },
        _ => Statement::ScalarGet {
            field: field.clone(),
            key,
            kind,
            source,
        },
    };

    let mut statements = vec![extraction];
    if annotation.required && !kind.is_scalar() {
        statements.push(Statement::NullCheck {
            field,
            owner: owner_name,
            action: NullAction::Log,
        });
    }
    Ok(statements)
}

/// Message of a logged or thrown null check.
pub fn null_message(field: &str, owner: &str) -> String {
    format!("The field '{}' is null, in class '{}' !", field, owner)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{ACTIVITY, FRAGMENT_ANDROIDX, IPROVIDER, PARCELABLE, SERIALIZABLE, SERVICE};
    use arouter_symbols::{AutowiredAnnotation, SymbolSource, SymbolTable, TypeRef};

    fn decl(name: &str, supers: &[&str]) -> ClassDecl {
        let mut decl = ClassDecl::new(name);
        decl.supertypes = supers.iter().map(|s| TypeRef::named(*s)).collect();
        decl
    }

    fn wired(name: &str, ty: &str, directive_name: &str, required: bool) -> PropertyDecl {
        let mut prop = PropertyDecl::new(name, TypeRef::named(ty));
        prop.autowired = Some(AutowiredAnnotation {
            name: directive_name.to_string(),
            required,
            desc: String::new(),
        });
        prop
    }

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new();
        table.extend(vec![
            decl("app.Screen", &[ACTIVITY]),
            decl("app.Panel", &[FRAGMENT_ANDROIDX]),
            decl("app.Worker", &[SERVICE]),
            decl("app.User", &[SERIALIZABLE]),
            decl("app.Pac", &[PARCELABLE]),
            decl("app.Obj", &[]),
            decl("app.HelloService", &[IPROVIDER]),
        ]);
        table
    }

    fn compile(owner: &str, prop: PropertyDecl) -> Result<Vec<Statement>> {
        let table = table();
        let classifier = Classifier::new(&table);
        let owner = table.resolve(owner).expect("owner");
        let kind = route_kind(&classifier, owner);
        compile_field(&classifier, owner, kind, &prop)
    }

    #[test]
    fn test_scalar_kinds_use_typed_getter_per_source() {
        let cases = [
            ("kotlin.Byte", ValueKind::Byte),
            ("kotlin.Short", ValueKind::Short),
            ("kotlin.Int", ValueKind::Int),
            ("kotlin.Long", ValueKind::Long),
            ("kotlin.Char", ValueKind::Char),
            ("kotlin.Float", ValueKind::Float),
            ("kotlin.Double", ValueKind::Double),
            ("kotlin.Boolean", ValueKind::Boolean),
            ("kotlin.String", ValueKind::String),
        ];
        for (owner, expected_source) in [
            ("app.Screen", ParamSource::IntentExtras),
            ("app.Panel", ParamSource::Arguments),
        ] {
            for (ty, expected_kind) in cases {
                let statements = compile(owner, wired("value", ty, "", false)).expect(ty);
                assert_eq!(
                    statements,
                    vec![Statement::ScalarGet {
                        field: "value".to_string(),
                        key: "value".to_string(),
                        kind: expected_kind,
                        source: expected_source,
                    }],
                    "{} on {}",
                    ty,
                    owner
                );
            }
        }
    }

    #[test]
    fn test_required_int_has_no_null_check() {
        let statements = compile("app.Screen", wired("userId", "kotlin.Int", "", true)).expect("int");
        assert_eq!(statements.len(), 1);
        assert!(matches!(
            &statements[0],
            Statement::ScalarGet { kind: ValueKind::Int, key, .. } if key == "userId"
        ));
    }

    #[test]
    fn test_required_serializable_logs_when_null() {
        let statements = compile("app.Screen", wired("user", "app.User", "", true)).expect("ser");
        assert_eq!(
            statements,
            vec![
                Statement::GenericGet {
                    field: "user".to_string(),
                    key: "user".to_string(),
                    kind: ValueKind::Serializable,
                    ty: TypeRef::named("app.User"),
                    source: ParamSource::IntentExtras,
                },
                Statement::NullCheck {
                    field: "user".to_string(),
                    owner: "Screen".to_string(),
                    action: NullAction::Log,
                },
            ]
        );
    }

    #[test]
    fn test_required_string_logs_when_null() {
        let statements = compile("app.Screen", wired("title", "kotlin.String", "t", true)).expect("str");
        assert_eq!(statements.len(), 2);
        assert!(matches!(&statements[0], Statement::ScalarGet { key, .. } if key == "t"));
        assert!(matches!(
            &statements[1],
            Statement::NullCheck { action: NullAction::Log, .. }
        ));
    }

    #[test]
    fn test_parcelable_and_object() {
        let pac = compile("app.Panel", wired("pac", "app.Pac", "", false)).expect("pac");
        assert!(matches!(
            &pac[0],
            Statement::GenericGet { kind: ValueKind::Parcelable, source: ParamSource::Arguments, .. }
        ));

        let obj = compile("app.Screen", wired("obj", "app.Obj", "", false)).expect("obj");
        match &obj[0] {
            Statement::JsonParse { ty, unavailable, .. } => {
                assert_eq!(ty.name, "app.Obj");
                match unavailable.as_ref() {
                    Statement::LogWarn { message } => {
                        assert!(message.contains("'obj' in class 'Screen'"))
                    }
                    other => panic!("expected log fallback, got {:?}", other),
                }
            }
            other => panic!("expected json parse, got {:?}", other),
        }
    }

    #[test]
    fn test_provider_lookups() {
        let by_type = compile("app.Worker", wired("hello", "app.HelloService", "", true)).expect("type");
        assert_eq!(
            by_type,
            vec![
                Statement::ServiceLookup {
                    field: "hello".to_string(),
                    ty: TypeRef::named("app.HelloService"),
                    by: LookupBy::DeclaredType,
                },
                Statement::NullCheck {
                    field: "hello".to_string(),
                    owner: "Worker".to_string(),
                    action: NullAction::Throw,
                },
            ]
        );

        let by_path =
            compile("app.Screen", wired("hello", "app.HelloService", "/svc/hello", false)).expect("path");
        assert_eq!(
            by_path,
            vec![Statement::ServiceLookup {
                field: "hello".to_string(),
                ty: TypeRef::named("app.HelloService"),
                by: LookupBy::Path("/svc/hello".to_string()),
            }]
        );
    }

    #[test]
    fn test_value_field_on_service_is_illegal() {
        let err = compile("app.Worker", wired("count", "kotlin.Int", "", false)).unwrap_err();
        assert_eq!(
            err,
            CompileError::IllegalTarget {
                field: "count".to_string(),
                owner: "app.Worker".to_string(),
            }
        );
    }

    #[test]
    fn test_private_field_is_rejected() {
        let mut prop = wired("secret", "kotlin.Int", "", false);
        prop.visibility = Visibility::Private;
        let err = compile("app.Screen", prop).unwrap_err();
        assert!(err.is_fatal());
        let message = err.to_string();
        assert!(message.contains("[secret]"), "{}", message);
        assert!(message.contains("[app.Screen]"), "{}", message);
    }

    #[test]
    fn test_field_directive_skips_providers() {
        let table = table();
        let classifier = Classifier::new(&table);
        assert!(field_directive(&classifier, &wired("hello", "app.HelloService", "", false)).is_none());
        let directive =
            field_directive(&classifier, &wired("height", "kotlin.Int", "h", true)).expect("directive");
        assert_eq!(directive.key(), "h");
        assert_eq!(directive.value_kind, ValueKind::Int);
        assert!(directive.required);
    }
}
