//! Per-type selector options
//!
//! Every options struct rejects unknown keys, so a typo in a service
//! definition surfaces as an error instead of being silently ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// Smallest accepted `step` for number selectors
pub const MIN_NUMBER_STEP: f64 = 1e-3;

/// Accept a float, an integer or a numeric string
fn coerce_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("expected float, got '{}'", s))),
    }
}

fn default_step() -> f64 {
    1.0
}

/// Options shared by entity selectors and entity filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntitySelectorConfig {
    /// Integration that provided the entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration: Option<String>,
    /// Domain the entity belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Device class of the entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_class: Option<String>,
}

/// Device constraints used inside area and target selectors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceFilter {
    /// Integration linked to it with a config entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceSelectorConfig {
    /// Integration linked to it with a config entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Device has to contain entities matching this selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntitySelectorConfig>,
}

/// Options of the area and target selectors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSelectorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntitySelectorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceFilter>,
}

/// Input widget used for a number selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberMode {
    Box,
    #[default]
    Slider,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberSelectorConfig {
    #[serde(deserialize_with = "coerce_f64")]
    pub min: f64,
    #[serde(deserialize_with = "coerce_f64")]
    pub max: f64,
    #[serde(default = "default_step", deserialize_with = "coerce_f64")]
    pub step: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
    #[serde(default)]
    pub mode: NumberMode,
}

impl NumberSelectorConfig {
    /// Check the constraints serde cannot express
    pub fn check(&self) -> Result<(), String> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err("min and max must be finite numbers".to_string());
        }
        if self.min > self.max {
            return Err(format!(
                "min ({}) must be less than or equal to max ({})",
                self.min, self.max
            ));
        }
        if self.step.is_nan() || self.step < MIN_NUMBER_STEP {
            return Err(format!(
                "step ({}) must be at least {}",
                self.step, MIN_NUMBER_STEP
            ));
        }
        Ok(())
    }

    /// Whether a value lies inside the configured range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextSelectorConfig {
    #[serde(default)]
    pub multiline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectSelectorConfig {
    pub options: Vec<String>,
}

impl SelectSelectorConfig {
    pub fn check(&self) -> Result<(), String> {
        if self.options.is_empty() {
            return Err("options must contain at least one entry".to_string());
        }
        Ok(())
    }
}

/// Options of selectors that take none (addon, boolean, time, action, object)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyConfig {}
