//! Error types for tooltip construction and configuration loading.

use crate::engine::InstanceId;
use poptip_core::{ElementId, SelectorError};
use thiserror::Error;

/// Errors surfaced by [`Tooltips::create`](crate::Tooltips::create).
///
/// Lifecycle operations never return errors; a stale popper or a destroyed
/// instance turns into a log line and a no-op.
#[derive(Debug, Error)]
pub enum Error {
    /// The target selector could not be parsed.
    #[error("invalid target selector: {0}")]
    Selector(#[from] SelectorError),

    /// The `html` template selector matched nothing in the document.
    #[error("html template not found: {0}")]
    TemplateNotFound(String),

    /// Settings could not be loaded.
    #[error("invalid settings: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or parsing settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A trigger word other than `mouseenter`, `focus`, `focusin`, `click` or `manual`.
    #[error("unknown trigger: {0}")]
    UnknownTrigger(String),

    /// A position other than the twelve supported placements.
    #[error("unknown position: {0}")]
    UnknownPosition(String),

    /// A value outside the accepted set for a key.
    #[error("invalid value for `{key}`: {value}")]
    InvalidValue {
        /// Setting key
        key: String,
        /// Offending value
        value: String,
    },
}

/// A lookup that found no tracked record or instance.
///
/// Returned by internal lookups; public operations log it and carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No record owns this popper element.
    #[error("no tooltip record for popper {0:?}")]
    UnknownPopper(ElementId),

    /// No record is attached to this reference element.
    #[error("no tooltip record for reference {0:?}")]
    UnknownReference(ElementId),

    /// The instance id was never issued.
    #[error("unknown instance {0:?}")]
    UnknownInstance(InstanceId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TemplateNotFound("#missing".to_string());
        assert_eq!(err.to_string(), "html template not found: #missing");

        let err = ConfigError::UnknownTrigger("hover".to_string());
        assert_eq!(err.to_string(), "unknown trigger: hover");

        let err = ConfigError::InvalidValue {
            key: "hideOnClick".to_string(),
            value: "sometimes".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value for `hideOnClick`: sometimes");
    }

    #[test]
    fn test_selector_error_converts() {
        let err: Error = SelectorError::Empty.into();
        assert!(matches!(err, Error::Selector(SelectorError::Empty)));
        assert_eq!(err.to_string(), "invalid target selector: empty selector");
    }

    #[test]
    fn test_config_error_converts() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = ConfigError::from(json_err).into();
        assert!(matches!(err, Error::Config(ConfigError::Json(_))));
    }

    #[test]
    fn test_lookup_error_display() {
        let err = LookupError::UnknownPopper(ElementId(7));
        assert_eq!(err.to_string(), "no tooltip record for popper ElementId(7)");
    }
}
