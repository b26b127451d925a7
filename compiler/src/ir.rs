//! Structured injection statements.
//!
//! The field injection compiler produces these; a rendering backend turns
//! them into target-language source. Nothing here knows any target syntax.

use crate::model::{RouteKind, ValueKind};
use arouter_symbols::TypeRef;

/// Parameter bundle a value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    /// The launching intent's extras of a screen component.
    IntentExtras,
    /// The arguments bundle of a sub-screen component.
    Arguments,
}

impl ParamSource {
    pub fn for_kind(kind: RouteKind) -> Option<ParamSource> {
        match kind {
            RouteKind::ScreenComponent => Some(ParamSource::IntentExtras),
            RouteKind::SubScreenComponent => Some(ParamSource::Arguments),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupBy {
    DeclaredType,
    Path(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullAction {
    /// Abort the injection with a runtime exception.
    Throw,
    /// Log an error and carry on.
    Log,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `field = source.get<Kind>(key, field)` for the nine scalar/string kinds.
    ScalarGet {
        field: String,
        key: String,
        kind: ValueKind,
        source: ParamSource,
    },
    /// Generic parcelable/serializable read, parameterized by the field type.
    GenericGet {
        field: String,
        key: String,
        kind: ValueKind,
        ty: TypeRef,
        source: ParamSource,
    },
    /// Read `key` as a string and parse it with the JSON capability; when the
    /// capability is missing at runtime, run `unavailable` instead.
    JsonParse {
        field: String,
        key: String,
        ty: TypeRef,
        source: ParamSource,
        unavailable: Box<Statement>,
    },
    /// Service-locator injection of a capability provider.
    ServiceLookup {
        field: String,
        ty: TypeRef,
        by: LookupBy,
    },
    NullCheck {
        field: String,
        owner: String,
        action: NullAction,
    },
    /// Runtime log line under the runtime tag.
    LogWarn {
        message: String,
    },
}

impl Statement {
    pub fn field(&self) -> Option<&str> {
        match self {
            Statement::ScalarGet { field, .. }
            | Statement::GenericGet { field, .. }
            | Statement::JsonParse { field, .. }
            | Statement::ServiceLookup { field, .. }
            | Statement::NullCheck { field, .. } => Some(field),
            Statement::LogWarn { .. } => None,
        }
    }
}

/// Body of one generated injector: `inject(target)` runs `statements` in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectorPlan {
    pub target: TypeRef,
    pub statements: Vec<Statement>,
}

impl InjectorPlan {
    /// Whether the injector needs the JSON capability resolved up front.
    pub fn uses_json(&self) -> bool {
        self.statements
            .iter()
            .any(|statement| matches!(statement, Statement::JsonParse { .. }))
    }
}
