//! Core type definitions for declaration snapshots

use serde::{Deserialize, Serialize};

/// One round's worth of declarations as delivered by the symbol resolver.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SymbolSnapshot {
    #[serde(default)]
    pub declarations: Vec<ClassDecl>,
}

/// A resolved type reference, e.g. `kotlin.collections.List<com.example.User>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<TypeRef>,
    #[serde(default)]
    pub nullable: bool,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            nullable: false,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<TypeRef>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        crate::utils::simple_name(&self.name)
    }

    /// Package portion of the qualified name (empty for the default package).
    pub fn package(&self) -> &str {
        crate::utils::package_name(&self.name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    Protected,
    Private,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassDecl {
    pub qualified_name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub supertypes: Vec<TypeRef>,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub annotations: ClassAnnotations,
    /// `false` when the resolver could not settle every type this declaration
    /// mentions; such declarations are handed back for a later round.
    #[serde(default = "default_resolved")]
    pub resolved: bool,
}

fn default_resolved() -> bool {
    true
}

impl ClassDecl {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            visibility: Visibility::Public,
            supertypes: Vec::new(),
            properties: Vec::new(),
            annotations: ClassAnnotations::default(),
            resolved: true,
        }
    }

    pub fn simple_name(&self) -> &str {
        crate::utils::simple_name(&self.qualified_name)
    }

    pub fn package(&self) -> &str {
        crate::utils::package_name(&self.qualified_name)
    }

    pub fn as_type(&self) -> TypeRef {
        TypeRef::named(self.qualified_name.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClassAnnotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteAnnotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interceptor: Option<InterceptorAnnotation>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(rename = "type")]
    pub type_: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autowired: Option<AutowiredAnnotation>,
    /// Legacy field annotation, superseded by `autowired`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<ParamAnnotation>,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, type_: TypeRef) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            type_,
            autowired: None,
            param: None,
        }
    }

    /// The autowire directive of this property, folding the legacy `param`
    /// annotation into an optional directive.
    pub fn directive(&self) -> Option<AutowiredAnnotation> {
        if let Some(autowired) = &self.autowired {
            return Some(autowired.clone());
        }
        self.param.as_ref().map(|param| AutowiredAnnotation {
            name: param.name.clone(),
            required: false,
            desc: param.desc.clone(),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteAnnotation {
    pub path: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_extras")]
    pub extras: i32,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_extras() -> i32 {
    i32::MIN
}

fn default_priority() -> i32 {
    -1
}

impl RouteAnnotation {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            group: String::new(),
            name: String::new(),
            extras: default_extras(),
            priority: default_priority(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AutowiredAnnotation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ParamAnnotation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InterceptorAnnotation {
    pub priority: i32,
    #[serde(default)]
    pub name: String,
}
