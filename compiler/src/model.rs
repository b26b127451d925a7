//! In-memory routing and injection metadata built from annotated declarations.

use arouter_symbols::TypeRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a route-annotated declaration turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    ScreenComponent,
    SubScreenComponent,
    BackgroundService,
    CapabilityProvider,
    Unknown,
}

impl RouteKind {
    /// Constant name of the matching `RouteType` entry in the runtime.
    pub fn runtime_name(&self) -> &'static str {
        match self {
            RouteKind::ScreenComponent => "ACTIVITY",
            RouteKind::SubScreenComponent => "FRAGMENT",
            RouteKind::BackgroundService => "SERVICE",
            RouteKind::CapabilityProvider => "PROVIDER",
            RouteKind::Unknown => "UNKNOWN",
        }
    }

    /// Screen-level and sub-screen kinds receive parameters from a bundle.
    pub fn takes_parameters(&self) -> bool {
        matches!(
            self,
            RouteKind::ScreenComponent | RouteKind::SubScreenComponent
        )
    }
}

/// Closed classification of how a field value is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Boolean,
    String,
    Parcelable,
    Serializable,
    Object,
}

impl ValueKind {
    /// Look a resolved type name up in the primitive/boxed/string table.
    pub fn from_type_name(name: &str) -> Option<ValueKind> {
        let kind = match name {
            "kotlin.Byte" | "java.lang.Byte" | "byte" => ValueKind::Byte,
            "kotlin.Short" | "java.lang.Short" | "short" => ValueKind::Short,
            "kotlin.Int" | "java.lang.Integer" | "int" => ValueKind::Int,
            "kotlin.Long" | "java.lang.Long" | "long" => ValueKind::Long,
            "kotlin.Char" | "java.lang.Character" | "char" => ValueKind::Char,
            "kotlin.Float" | "java.lang.Float" | "float" => ValueKind::Float,
            "kotlin.Double" | "java.lang.Double" | "double" => ValueKind::Double,
            "kotlin.Boolean" | "java.lang.Boolean" | "boolean" => ValueKind::Boolean,
            "kotlin.String" | "java.lang.String" => ValueKind::String,
            _ => return None,
        };
        Some(kind)
    }

    /// Ordinal of the matching `TypeKind` entry in the runtime.
    pub fn runtime_code(&self) -> i32 {
        match self {
            ValueKind::Boolean => 0,
            ValueKind::Byte => 1,
            ValueKind::Short => 2,
            ValueKind::Int => 3,
            ValueKind::Long => 4,
            ValueKind::Char => 5,
            ValueKind::Float => 6,
            ValueKind::Double => 7,
            ValueKind::String => 8,
            ValueKind::Serializable => 9,
            ValueKind::Parcelable => 10,
            ValueKind::Object => 11,
        }
    }

    /// The eight primitive scalars; values of these kinds are never null.
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            ValueKind::String | ValueKind::Parcelable | ValueKind::Serializable | ValueKind::Object
        )
    }

    /// Kinds read through a correspondingly named typed getter.
    pub fn has_typed_getter(&self) -> bool {
        self.typed_getter().is_some()
    }

    /// `Int` for `getInt`, `String` for `getString`, and so on.
    pub fn typed_getter(&self) -> Option<&'static str> {
        let name = match self {
            ValueKind::Byte => "Byte",
            ValueKind::Short => "Short",
            ValueKind::Int => "Int",
            ValueKind::Long => "Long",
            ValueKind::Char => "Char",
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::Boolean => "Boolean",
            ValueKind::String => "String",
            ValueKind::Parcelable | ValueKind::Serializable | ValueKind::Object => return None,
        };
        Some(name)
    }
}

/// A field-level autowire directive, resolved for one route record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDirective {
    pub field: String,
    pub value_kind: ValueKind,
    pub required: bool,
    pub explicit_name: Option<String>,
    pub description: Option<String>,
}

impl FieldDirective {
    /// Bundle key the value is read from.
    pub fn key(&self) -> &str {
        self.explicit_name.as_deref().unwrap_or(&self.field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub path: String,
    /// Explicit group from the annotation; derived from the path during
    /// validation when unset.
    pub group: Option<String>,
    pub kind: RouteKind,
    pub target: TypeRef,
    pub extra: i32,
    pub priority: i32,
    pub description: Option<String>,
    pub field_directives: BTreeMap<String, FieldDirective>,
    /// Contract names a provider record is also registered under, so that
    /// lookups by declared type find it.
    pub provider_keys: Vec<String>,
}

impl RouteRecord {
    pub fn new(path: impl Into<String>, kind: RouteKind, target: TypeRef) -> Self {
        Self {
            path: path.into(),
            group: None,
            kind,
            target,
            extra: i32::MIN,
            priority: -1,
            description: None,
            field_directives: BTreeMap::new(),
            provider_keys: Vec::new(),
        }
    }

    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or("")
    }

    /// Bundle key -> runtime value-kind code, as passed to `RouteMeta.build`.
    pub fn params_type(&self) -> BTreeMap<String, i32> {
        self.field_directives
            .values()
            .map(|directive| (directive.key().to_string(), directive.value_kind.runtime_code()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookRecord {
    pub priority: i32,
    pub target: TypeRef,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_table_covers_kotlin_and_java() {
        assert_eq!(ValueKind::from_type_name("kotlin.Int"), Some(ValueKind::Int));
        assert_eq!(
            ValueKind::from_type_name("java.lang.Integer"),
            Some(ValueKind::Int)
        );
        assert_eq!(ValueKind::from_type_name("boolean"), Some(ValueKind::Boolean));
        assert_eq!(
            ValueKind::from_type_name("java.lang.String"),
            Some(ValueKind::String)
        );
        assert_eq!(ValueKind::from_type_name("com.example.User"), None);
    }

    #[test]
    fn test_runtime_codes_follow_type_kind_order() {
        assert_eq!(ValueKind::Boolean.runtime_code(), 0);
        assert_eq!(ValueKind::Int.runtime_code(), 3);
        assert_eq!(ValueKind::String.runtime_code(), 8);
        assert_eq!(ValueKind::Object.runtime_code(), 11);
    }

    #[test]
    fn test_scalars_exclude_reference_kinds() {
        assert!(ValueKind::Double.is_scalar());
        assert!(!ValueKind::String.is_scalar());
        assert!(ValueKind::String.has_typed_getter());
        assert!(!ValueKind::Parcelable.has_typed_getter());
    }

    #[test]
    fn test_params_type_uses_bundle_keys() {
        let mut record = RouteRecord::new(
            "/test/a",
            RouteKind::ScreenComponent,
            TypeRef::named("app.A"),
        );
        record.field_directives.insert(
            "height".to_string(),
            FieldDirective {
                field: "height".to_string(),
                value_kind: ValueKind::Int,
                required: false,
                explicit_name: Some("h".to_string()),
                description: None,
            },
        );
        assert_eq!(record.params_type().get("h"), Some(&3));
    }
}
