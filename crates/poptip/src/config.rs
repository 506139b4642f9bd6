//! Settings loading and runtime environment.
//!
//! Settings documents use the same camelCase keys as the JSON form:
//!
//! ```yaml
//! position: bottom-start
//! trigger: click
//! duration: [200, 100]
//! hideOnClick: persistent
//! ```

use crate::error::ConfigError;
use crate::settings::{Settings, SettingsInput};
use serde::{Deserialize, Serialize};

/// Host capabilities the engine needs to know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Environment {
    /// The host can deliver touch events
    pub supports_touch: bool,
    /// The host is iOS (hover is emulated with a synthetic click)
    pub ios: bool,
    /// Switch between touch and mouse mode as input arrives
    pub dynamic_input_detection: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            supports_touch: false,
            ios: false,
            dynamic_input_detection: true,
        }
    }
}

impl Environment {
    /// A touch-capable host.
    #[must_use]
    pub fn touch() -> Self {
        Self {
            supports_touch: true,
            ..Self::default()
        }
    }

    /// An iOS host.
    #[must_use]
    pub fn ios() -> Self {
        Self {
            supports_touch: true,
            ios: true,
            ..Self::default()
        }
    }
}

impl Settings {
    /// Parse full settings from YAML; missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(SettingsInput::from_yaml(yaml)?.merge(&Self::default()))
    }

    /// Parse full settings from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(SettingsInput::from_json(json)?.merge(&Self::default()))
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

impl SettingsInput {
    /// Parse partial settings from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let input: Self = serde_yaml_ng::from_str(yaml)?;
        tracing::debug!(keys = input.patches().len(), "loaded settings from YAML");
        Ok(input)
    }

    /// Parse partial settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{HideOnClick, Position, Timing, TriggerEvent};

    #[test]
    fn test_settings_from_yaml() {
        let yaml = r"
position: bottom-start
trigger: click
duration: [200, 100]
hideOnClick: persistent
arrow: true
";
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.position, Position::BottomStart);
        assert!(settings.trigger.contains(TriggerEvent::Click));
        assert_eq!(settings.duration, Timing::Pair(200, 100));
        assert_eq!(settings.hide_on_click, HideOnClick::Persistent);
        assert!(settings.arrow);
        assert_eq!(settings.theme, "dark");
    }

    #[test]
    fn test_empty_yaml_is_defaults() {
        assert_eq!(Settings::from_yaml("").unwrap(), Settings::default());
        assert_eq!(SettingsInput::from_yaml("  \n").unwrap(), SettingsInput::default());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut settings = Settings::default();
        settings.theme = "light bordered".to_string();
        settings.offset = (5.0, -3.0);
        let yaml = settings.to_yaml().unwrap();
        assert_eq!(Settings::from_yaml(&yaml).unwrap(), settings);
    }

    #[test]
    fn test_bad_trigger_reports_yaml_error() {
        let err = Settings::from_yaml("trigger: hover").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
        assert!(err.to_string().contains("unknown trigger"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(SettingsInput::from_yaml("colour: red").is_err());
        assert!(SettingsInput::from_json(r#"{"colour": "red"}"#).is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json(r#"{"interactive": true, "delay": 100}"#).unwrap();
        assert!(settings.interactive);
        assert_eq!(settings.delay, Timing::Single(100));
    }

    #[test]
    fn test_environment_defaults() {
        let env = Environment::default();
        assert!(!env.supports_touch);
        assert!(env.dynamic_input_detection);
        assert!(Environment::ios().supports_touch);
        let env: Environment = serde_json::from_str(r#"{"supportsTouch": true}"#).unwrap();
        assert_eq!(env, Environment::touch());
    }
}
