use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// A resource entry of a component descriptor.
///
/// Only `name`, `version` and `type` carry meaning here; every other field is
/// kept verbatim (and in its original order) through load, merge and save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Mapping);

impl Resource {
    pub fn new(fields: Mapping) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Mapping {
        &self.0
    }

    /// The merge key of this resource. Missing identity fields count as `null`.
    pub fn identity(&self) -> ResourceIdentity {
        let field = |key: &str| self.get(key).cloned().unwrap_or(Value::Null);
        ResourceIdentity {
            name: field("name"),
            version: field("version"),
            kind: field("type"),
        }
    }
}

/// `(name, version, type)` of a resource.
///
/// Fields compare as YAML values, so `version: 1` and `version: "1"` are
/// different identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentity {
    pub name: Value,
    pub version: Value,
    pub kind: Value,
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} ({})",
            display_scalar(&self.name),
            display_scalar(&self.version),
            display_scalar(&self.kind)
        )
    }
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::Null => "<none>".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| "<invalid>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(yaml: &str) -> Resource {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn identity_ignores_extra_fields() {
        let a = resource("{name: a, version: '1', type: t1}");
        let b = resource("{name: a, version: '1', type: t1, extra: x, access: {type: none}}");
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn identity_distinguishes_each_component() {
        let base = resource("{name: a, version: '1', type: t1}").identity();
        for other in [
            "{name: b, version: '1', type: t1}",
            "{name: a, version: '2', type: t1}",
            "{name: a, version: '1', type: t2}",
        ] {
            assert_ne!(base, resource(other).identity(), "{other}");
        }
    }

    #[test]
    fn identity_compares_typed_values() {
        let numeric = resource("{name: a, version: 1, type: t1}");
        let string = resource("{name: a, version: '1', type: t1}");
        assert_ne!(numeric.identity(), string.identity());
    }

    #[test]
    fn missing_fields_are_null() {
        let identity = resource("{name: a}").identity();
        assert_eq!(identity.version, Value::Null);
        assert_eq!(identity.kind, Value::Null);
        assert_eq!(identity.to_string(), "a:<none> (<none>)");
    }

    #[test]
    fn field_order_survives_serialization() {
        let original = "type: t1\nname: a\nversion: '1'\nextra: x\n";
        let parsed = resource(original);
        assert_eq!(serde_yaml::to_string(&parsed).unwrap(), original);
    }
}
