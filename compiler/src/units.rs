//! Generated-unit model: what gets emitted, independent of target syntax.

use crate::contracts::{
    NAME_OF_AUTOWIRED, NAME_OF_GROUP, NAME_OF_INTERCEPTOR, NAME_OF_PROVIDER, NAME_OF_ROOT,
    PACKAGE_OF_GENERATE_FILE, SEPARATOR,
};
use crate::ir::InjectorPlan;
use crate::model::{HookRecord, RouteRecord};
use arouter_symbols::utils::sanitize_identifier;
use arouter_symbols::TypeRef;
use std::fmt;

/// Package and simple name of a unit. Unique within one build.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitKey {
    pub package: String,
    pub name: String,
}

impl UnitKey {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    pub fn root(module: &str) -> Self {
        Self::new(
            PACKAGE_OF_GENERATE_FILE,
            format!("{}{}{}", NAME_OF_ROOT, SEPARATOR, sanitize_identifier(module)),
        )
    }

    pub fn group(group: &str) -> Self {
        Self::new(PACKAGE_OF_GENERATE_FILE, format!("{}{}", NAME_OF_GROUP, group))
    }

    pub fn providers(module: &str) -> Self {
        Self::new(
            PACKAGE_OF_GENERATE_FILE,
            format!("{}{}{}", NAME_OF_PROVIDER, SEPARATOR, sanitize_identifier(module)),
        )
    }

    pub fn interceptors(module: &str) -> Self {
        Self::new(
            PACKAGE_OF_GENERATE_FILE,
            format!("{}{}{}", NAME_OF_INTERCEPTOR, SEPARATOR, sanitize_identifier(module)),
        )
    }

    /// `Outer$$ARouter$$Autowired`, next to the owner.
    pub fn injector(owner: &TypeRef) -> Self {
        Self::new(
            owner.package(),
            format!("{}{}", owner.simple_name(), NAME_OF_AUTOWIRED),
        )
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitBody {
    /// Group name -> group unit, ascending by group name.
    RouteRoot { groups: Vec<(String, UnitKey)> },
    /// One group's records, ascending by path.
    RouteGroup { group: String, routes: Vec<RouteRecord> },
    /// Lookup key -> provider record. Keys are paths and provider contract
    /// names.
    ProviderGroup { entries: Vec<(String, RouteRecord)> },
    /// Ascending by priority.
    InterceptorGroup { hooks: Vec<HookRecord> },
    Injector(InjectorPlan),
}

impl UnitBody {
    pub fn label(&self) -> &'static str {
        match self {
            UnitBody::RouteRoot { .. } => "root",
            UnitBody::RouteGroup { .. } => "group",
            UnitBody::ProviderGroup { .. } => "providers",
            UnitBody::InterceptorGroup { .. } => "interceptors",
            UnitBody::Injector(_) => "autowired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub key: UnitKey,
    pub body: UnitBody,
    /// Declarations the unit was derived from, for incremental hosts.
    pub originating: Vec<String>,
}

impl GeneratedUnit {
    pub fn new(key: UnitKey, body: UnitBody) -> Self {
        Self {
            key,
            body,
            originating: Vec::new(),
        }
    }

    pub fn with_originating(mut self, originating: Vec<String>) -> Self {
        self.originating = originating;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_units_are_suffixed() {
        assert_eq!(
            UnitKey::root("app").to_string(),
            "com.alibaba.android.arouter.routes.ARouter$$Root$$app"
        );
        assert_eq!(UnitKey::providers("my-lib").name, "ARouter$$Providers$$mylib");
        assert_eq!(UnitKey::interceptors("app").name, "ARouter$$Interceptors$$app");
        assert_eq!(UnitKey::group("test").name, "ARouter$$Group$$test");
    }

    #[test]
    fn test_injector_lives_next_to_owner() {
        let key = UnitKey::injector(&TypeRef::named("com.example.Test1Activity"));
        assert_eq!(key.package, "com.example");
        assert_eq!(key.name, "Test1Activity$$ARouter$$Autowired");

        let bare = UnitKey::injector(&TypeRef::named("Loose"));
        assert_eq!(bare.qualified_name(), "Loose$$ARouter$$Autowired");
    }
}
