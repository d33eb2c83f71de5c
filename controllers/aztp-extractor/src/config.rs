//! Environment configuration.
//!
//! All options are optional. Empty values count as unset, and an unusable
//! `RETRY_TIME` falls back to the default rather than failing start-up.

use crate::error::ControllerError;
use std::env;
use std::time::Duration;
use tracing::{info, warn};

/// Image of the accelerator job. The organisation name is kept exactly as
/// published by the original deployment manifests.
pub const DEFAULT_ZTP_IMAGE: &str = "quay.io/opwnahift-kni/ztp-site-generator:latest";
/// Pause between watch reconnections
pub const DEFAULT_RETRY_TIME: Duration = Duration::from_secs(30);
/// Name of the ConfigMap carrying the wrapped objects
pub const DEFAULT_INNER_CONFIG_MAP_NAME: &str = "ztp-post-provision";
/// Namespace of the ConfigMap carrying the wrapped objects
pub const DEFAULT_INNER_CONFIG_MAP_NAMESPACE: &str = "ztp-profile";

const ZTP_IMAGE_ENV: &str = "ZTP_IMAGE";
const RETRY_TIME_ENV: &str = "RETRY_TIME";
const INNER_CONFIG_MAP_NAME_ENV: &str = "INNER_CONFIGMAP_NAME";
const INNER_CONFIG_MAP_NAMESPACE_ENV: &str = "INNER_CONFIGMAP_NAMESPACE";

/// Immutable extractor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Container image embedded into the bootstrap job
    pub ztp_image: String,
    /// Wait between watch reconnections
    pub retry_time: Duration,
    /// Inner ConfigMap name
    pub inner_config_map_name: String,
    /// Inner ConfigMap namespace
    pub inner_config_map_namespace: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ztp_image: DEFAULT_ZTP_IMAGE.to_string(),
            retry_time: DEFAULT_RETRY_TIME,
            inner_config_map_name: DEFAULT_INNER_CONFIG_MAP_NAME.to_string(),
            inner_config_map_namespace: DEFAULT_INNER_CONFIG_MAP_NAMESPACE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let retry_time = match non_empty(RETRY_TIME_ENV) {
            None => defaults.retry_time,
            Some(raw) => match parse_duration(&raw) {
                Ok(d) if !d.is_zero() => d,
                Ok(_) => {
                    warn!("{} must be positive, using {:?}", RETRY_TIME_ENV, defaults.retry_time);
                    defaults.retry_time
                }
                Err(e) => {
                    warn!("{}, using {:?}", e, defaults.retry_time);
                    defaults.retry_time
                }
            },
        };

        Self {
            ztp_image: non_empty(ZTP_IMAGE_ENV).unwrap_or(defaults.ztp_image),
            retry_time,
            inner_config_map_name: non_empty(INNER_CONFIG_MAP_NAME_ENV)
                .unwrap_or(defaults.inner_config_map_name),
            inner_config_map_namespace: non_empty(INNER_CONFIG_MAP_NAMESPACE_ENV)
                .unwrap_or(defaults.inner_config_map_namespace),
        }
    }

    /// Log the effective configuration.
    pub fn log_summary(&self) {
        info!("Configuration:");
        info!("  ZTP image: {}", self.ztp_image);
        info!("  Retry time: {:?}", self.retry_time);
        info!(
            "  Inner ConfigMap: {}/{}",
            self.inner_config_map_namespace, self.inner_config_map_name
        );
    }
}

/// Parse a Go-style duration string such as `30s`, `1m30s`, `1.5h` or `250ms`.
///
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0`
/// is accepted; negative durations are not.
pub fn parse_duration(input: &str) -> Result<Duration, ControllerError> {
    let invalid = |reason: &str| {
        ControllerError::InvalidConfig(format!("invalid duration {input:?}: {reason}"))
    };

    let s = input.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    if s.starts_with('-') {
        return Err(invalid("negative durations are not allowed"));
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(invalid("empty"));
    }

    let mut rest = s;
    let mut total_nanos = 0f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(invalid("expected a number"));
        }
        let value: f64 = rest[..number_len]
            .parse()
            .map_err(|_| invalid("malformed number"))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_len] {
            "ns" => 1f64,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid("unknown unit")),
        };
        rest = &rest[unit_len..];
        total_nanos += value * nanos_per_unit;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(invalid("overflow"));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "bounds checked above")]
    let nanos = total_nanos.round() as u64;
    Ok(Duration::from_nanos(nanos))
}
