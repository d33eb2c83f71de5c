//! ConfigMap wrapping of extracted objects.
//!
//! Each object becomes one `data` entry keyed `<metadata.name>.yaml`. Object
//! bodies are key-sorted JSON maps, so the YAML text is identical for
//! identical input.

use crate::error::ControllerError;
use crate::object::ExtractedObject;
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;
use tracing::warn;

/// Pack `objects` into a ConfigMap named `name` in `namespace`.
///
/// `data` is always present, empty when there is nothing to wrap. Two objects
/// with the same name collapse into one entry; the later one wins.
pub fn wrap(objects: &[ExtractedObject], name: &str, namespace: &str) -> Result<ConfigMap, ControllerError> {
    let mut data = BTreeMap::new();
    for object in objects {
        let key = data_key(object);
        let yaml = canonical_yaml(object)?;
        if data.insert(key.clone(), yaml).is_some() {
            warn!("duplicate entry {} in ConfigMap {}/{}, keeping the last one", key, namespace, name);
        }
    }

    Ok(ConfigMap {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(data),
        ..Default::default()
    })
}

/// `data` key for an object
#[must_use]
pub fn data_key(object: &ExtractedObject) -> String {
    format!("{}.yaml", object.name().unwrap_or_default())
}

/// Deterministic YAML rendering of an object body.
pub fn canonical_yaml(object: &ExtractedObject) -> Result<String, ControllerError> {
    serde_yaml::to_string(object.body()).map_err(|e| {
        ControllerError::Serialize(format!(
            "failed to marshal {} {}: {}",
            object.kind(),
            object.name().unwrap_or_default(),
            e
        ))
    })
}

/// Generic form of a wrapped ConfigMap, so it can be nested into another one.
pub fn config_map_to_object(config_map: &ConfigMap) -> Result<ExtractedObject, ControllerError> {
    let value = serde_json::to_value(config_map)
        .map_err(|e| ControllerError::Serialize(format!("failed to convert ConfigMap: {e}")))?;
    ExtractedObject::from_value(value)
        .map_err(|e| ControllerError::Serialize(format!("failed to convert ConfigMap: {e}")))
}
