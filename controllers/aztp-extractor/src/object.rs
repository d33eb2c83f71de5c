//! Generic Kubernetes objects pulled out of policies.
//!
//! An [`ExtractedObject`] keeps the whole object body as JSON so that any kind
//! can pass through untouched; the kind itself is lifted into [`ObjectKind`]
//! so classification is a match on a tag rather than a string compare.

use crate::error::ControllerError;
use serde_json::{Map, Value};
use std::fmt;

/// Kind of an extracted object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// `Namespace`
    Namespace,
    /// `OperatorGroup`
    OperatorGroup,
    /// `Subscription`
    Subscription,
    /// `CatalogSource`
    CatalogSource,
    /// `PerformanceProfile`
    PerformanceProfile,
    /// `Tuned`
    Tuned,
    /// Any kind outside the direct allow-list
    Other(String),
}

impl ObjectKind {
    /// Kinds that must reach the managed cluster as first-class resources.
    pub const DIRECT: [Self; 6] = [
        Self::Namespace,
        Self::OperatorGroup,
        Self::Subscription,
        Self::CatalogSource,
        Self::PerformanceProfile,
        Self::Tuned,
    ];

    /// Kind name as it appears on the wire
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Namespace => "Namespace",
            Self::OperatorGroup => "OperatorGroup",
            Self::Subscription => "Subscription",
            Self::CatalogSource => "CatalogSource",
            Self::PerformanceProfile => "PerformanceProfile",
            Self::Tuned => "Tuned",
            Self::Other(kind) => kind,
        }
    }

    /// Whether objects of this kind are applied directly instead of wrapped.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for ObjectKind {
    fn from(kind: &str) -> Self {
        Self::DIRECT
            .iter()
            .find(|direct| direct.as_str() == kind)
            .cloned()
            .unwrap_or_else(|| Self::Other(kind.to_string()))
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed Kubernetes object of any kind
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedObject {
    kind: ObjectKind,
    body: Map<String, Value>,
}

impl ExtractedObject {
    /// Build from a raw JSON object. Fails when the value is not a mapping or
    /// carries no `kind`.
    pub fn from_value(value: Value) -> Result<Self, ControllerError> {
        let body = match value {
            Value::Object(body) => body,
            other => {
                return Err(ControllerError::Parse(format!(
                    "object definition is not a mapping: {other}"
                )));
            }
        };
        let kind = body
            .get("kind")
            .and_then(Value::as_str)
            .filter(|kind| !kind.is_empty())
            .map(ObjectKind::from);
        let Some(kind) = kind else {
            return Err(ControllerError::Parse(format!(
                "object definition has no kind: {}",
                Value::Object(body)
            )));
        };
        Ok(Self { kind, body })
    }

    /// Object kind
    #[must_use]
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// `apiVersion`, if set
    #[cfg(test)]
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.body.get("apiVersion").and_then(Value::as_str)
    }

    /// `metadata.name`, if set
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.metadata_field("name")
    }

    /// `metadata.namespace`, if set
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.metadata_field("namespace")
    }

    fn metadata_field(&self, field: &str) -> Option<&str> {
        self.body
            .get("metadata")
            .and_then(|m| m.get(field))
            .and_then(Value::as_str)
    }

    /// Full object body
    #[must_use]
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Replace `status` with an empty mapping; status cannot be applied.
    pub fn clear_status(&mut self) {
        self.body.insert("status".to_string(), Value::Object(Map::new()));
    }

    /// Consume into the raw JSON object
    #[cfg(test)]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }
}

/// Objects split by delivery mode, each half in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    /// Applied to the managed cluster as-is
    pub direct: Vec<ExtractedObject>,
    /// Packed into the inner ConfigMap
    pub wrapped: Vec<ExtractedObject>,
}

/// Split objects by kind only.
#[must_use]
pub fn classify(objects: Vec<ExtractedObject>) -> Classified {
    let mut classified = Classified::default();
    for object in objects {
        if object.kind().is_direct() {
            tracing::debug!("added {} {} to directly applied objects", object.kind(), qualified_name(&object));
            classified.direct.push(object);
        } else {
            tracing::debug!("added {} {} to wrapped objects", object.kind(), qualified_name(&object));
            classified.wrapped.push(object);
        }
    }
    classified
}

/// `namespace/name`, or just `name` for cluster-scoped objects
#[must_use]
pub fn qualified_name(object: &ExtractedObject) -> String {
    let name = object.name().unwrap_or_default();
    match object.namespace() {
        Some(namespace) => format!("{namespace}/{name}"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(kind: &str, name: &str) -> ExtractedObject {
        ExtractedObject::from_value(json!({
            "apiVersion": "v1",
            "kind": kind,
            "metadata": { "name": name, "namespace": "openshift-ptp" },
        }))
        .unwrap()
    }

    #[test]
    fn test_direct_kinds_round_trip_through_tag() {
        for kind in ObjectKind::DIRECT {
            assert!(kind.is_direct(), "{kind}");
            assert_eq!(ObjectKind::from(kind.as_str()), kind);
        }
        let direct = ObjectKind::DIRECT;
        let names: Vec<_> = direct.iter().map(ObjectKind::as_str).collect();
        assert_eq!(
            names,
            ["Namespace", "OperatorGroup", "Subscription", "CatalogSource", "PerformanceProfile", "Tuned"]
        );
        let other = ObjectKind::from("SriovNetwork");
        assert_eq!(other, ObjectKind::Other("SriovNetwork".to_string()));
        assert!(!other.is_direct());
        // Classification is case sensitive
        assert!(!ObjectKind::from("namespace").is_direct());
    }

    #[test]
    fn test_accessors() {
        let obj = object("PtpConfig", "du-ptp-slave");
        assert_eq!(obj.api_version(), Some("v1"));
        assert_eq!(obj.name(), Some("du-ptp-slave"));
        assert_eq!(obj.namespace(), Some("openshift-ptp"));
        assert_eq!(obj.kind().as_str(), "PtpConfig");
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(matches!(
            ExtractedObject::from_value(json!(["a", "b"])),
            Err(ControllerError::Parse(_))
        ));
        assert!(matches!(
            ExtractedObject::from_value(json!({ "metadata": { "name": "x" } })),
            Err(ControllerError::Parse(_))
        ));
        assert!(matches!(
            ExtractedObject::from_value(json!({ "kind": "" })),
            Err(ControllerError::Parse(_))
        ));
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(qualified_name(&object("PtpConfig", "du-ptp-slave")), "openshift-ptp/du-ptp-slave");
        let cluster_scoped = ExtractedObject::from_value(json!({
            "kind": "Namespace",
            "metadata": { "name": "openshift-ptp" },
        }))
        .unwrap();
        assert_eq!(qualified_name(&cluster_scoped), "openshift-ptp");
    }

    #[test]
    fn test_clear_status() {
        let mut obj = ExtractedObject::from_value(json!({
            "kind": "Subscription",
            "metadata": { "name": "ptp-operator-subscription" },
            "status": { "state": "AtLatestKnown" },
        }))
        .unwrap();
        obj.clear_status();
        assert_eq!(obj.body()["status"], json!({}));

        let mut bare = object("Namespace", "openshift-ptp");
        bare.clear_status();
        assert_eq!(bare.body()["status"], json!({}));
    }

    #[test]
    fn test_classify_preserves_order() {
        let classified = classify(vec![
            object("SriovNetwork", "f1u-network"),
            object("Namespace", "openshift-ptp"),
            object("PtpConfig", "du-ptp-slave"),
            object("Subscription", "ptp-operator-subscription"),
            object("Tuned", "performance-patch"),
        ]);
        let names = |objs: &[ExtractedObject]| -> Vec<String> {
            objs.iter().map(|o| o.name().unwrap().to_string()).collect()
        };
        assert_eq!(
            names(&classified.direct),
            ["openshift-ptp", "ptp-operator-subscription", "performance-patch"]
        );
        assert_eq!(names(&classified.wrapped), ["f1u-network", "du-ptp-slave"]);
    }
}
