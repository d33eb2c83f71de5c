//! Bootstrap manifests for the `full` variant
//!
//! Five manifests set up the namespace, RBAC, and the install-accelerator job
//! that applies the inner ConfigMap on the managed cluster. They are embedded
//! at compile time and rendered with minijinja.

use crate::config::Config;
use crate::error::ControllerError;
use crate::object::ExtractedObject;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use serde_json::Value;

/// Manifests in apply order. Names carry no extension so that minijinja does
/// not pick a YAML/JSON auto-escape mode.
const TEMPLATES: [(&str, &str); 5] = [
    ("namespace", include_str!("../templates/namespace.yaml")),
    ("service-account", include_str!("../templates/service-account.yaml")),
    ("cluster-role", include_str!("../templates/cluster-role.yaml")),
    ("cluster-role-binding", include_str!("../templates/cluster-role-binding.yaml")),
    ("job", include_str!("../templates/job.yaml")),
];

/// Values substituted into the bootstrap manifests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    /// Image run by the install-accelerator job
    pub ztp_image: String,
    /// Inner ConfigMap the job applies
    pub inner_config_map_name: String,
    /// Namespace of the inner ConfigMap
    pub inner_config_map_namespace: String,
}

impl TemplateParams {
    /// Take the image and inner ConfigMap location from the controller config.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            ztp_image: config.ztp_image.clone(),
            inner_config_map_name: config.inner_config_map_name.clone(),
            inner_config_map_namespace: config.inner_config_map_namespace.clone(),
        }
    }
}

/// Render the bootstrap set, in apply order.
pub fn render(params: &TemplateParams) -> Result<Vec<ExtractedObject>, ControllerError> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    for (name, source) in TEMPLATES {
        env.add_template(name, source)
            .map_err(|e| ControllerError::Render(format!("failed to parse template {name}: {e}")))?;
    }

    TEMPLATES
        .iter()
        .map(|(name, _)| render_one(&env, name, params))
        .collect()
}

fn render_one(
    env: &Environment<'_>,
    name: &str,
    params: &TemplateParams,
) -> Result<ExtractedObject, ControllerError> {
    let rendered = env
        .get_template(name)
        .and_then(|template| template.render(params))
        .map_err(|e| ControllerError::Render(format!("failed to render template {name}: {e}")))?;
    let value: Value = serde_yaml::from_str(&rendered)
        .map_err(|e| ControllerError::Render(format!("failed to decode template {name}: {e}")))?;
    ExtractedObject::from_value(value)
        .map_err(|e| ControllerError::Render(format!("template {name}: {e}")))
}
