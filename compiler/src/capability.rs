//! Route-kind and value-kind classification on top of the supertype walk.

use crate::contracts::{
    ACTIVITY, ACTIVITY_ANDROIDX, FRAGMENT, FRAGMENT_ANDROIDX, FRAGMENT_V4, IPROVIDER, PARCELABLE,
    SERIALIZABLE, SERVICE,
};
use crate::model::{RouteKind, ValueKind};
use arouter_symbols::{ClassDecl, Classifier, TypeRef};

const ROUTE_TARGETS: [(&str, RouteKind); 7] = [
    (ACTIVITY, RouteKind::ScreenComponent),
    (ACTIVITY_ANDROIDX, RouteKind::ScreenComponent),
    (FRAGMENT, RouteKind::SubScreenComponent),
    (FRAGMENT_ANDROIDX, RouteKind::SubScreenComponent),
    (FRAGMENT_V4, RouteKind::SubScreenComponent),
    (SERVICE, RouteKind::BackgroundService),
    (IPROVIDER, RouteKind::CapabilityProvider),
];

pub fn route_kind(classifier: &Classifier<'_>, decl: &ClassDecl) -> RouteKind {
    let candidates: Vec<&str> = ROUTE_TARGETS.iter().map(|(name, _)| *name).collect();
    classifier
        .first_match(decl, &candidates)
        .map(|index| ROUTE_TARGETS[index].1)
        .unwrap_or(RouteKind::Unknown)
}

/// Primitive/boxed/string table first, then Parcelable before Serializable,
/// falling back to a JSON-parsed object.
pub fn value_kind(classifier: &Classifier<'_>, ty: &TypeRef) -> ValueKind {
    if let Some(kind) = ValueKind::from_type_name(&ty.name) {
        return kind;
    }
    if classifier.type_implements(ty, PARCELABLE) {
        ValueKind::Parcelable
    } else if classifier.type_implements(ty, SERIALIZABLE) {
        ValueKind::Serializable
    } else {
        ValueKind::Object
    }
}

pub fn is_provider_type(classifier: &Classifier<'_>, ty: &TypeRef) -> bool {
    classifier.type_implements(ty, IPROVIDER)
}

/// Contract names a provider implementation is registered under: itself when
/// it implements `IProvider` directly, otherwise every direct supertype that
/// is a provider contract.
pub fn provider_keys(classifier: &Classifier<'_>, decl: &ClassDecl) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for supertype in &decl.supertypes {
        let key = if supertype.name == IPROVIDER {
            decl.qualified_name.clone()
        } else if is_provider_type(classifier, supertype) {
            supertype.name.clone()
        } else {
            continue;
        };
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}
