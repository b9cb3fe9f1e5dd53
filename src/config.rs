//! Notifier configuration.

use serde::{Deserialize, Serialize};

use crate::error::NotifierError;

/// Settings for a [`Notifier`](crate::Notifier) and its default spawner.
///
/// Every field has a default, so partial JSON is accepted:
///
/// ```
/// use typed_notifier::NotifierConfig;
///
/// let config = NotifierConfig::from_json(r#"{ "stack_size": 65536 }"#).unwrap();
/// assert_eq!(config.thread_name, "notifier-handler");
/// assert_eq!(config.stack_size, Some(65536));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Name given to every handler thread.
    pub thread_name: String,
    /// Stack size in bytes for handler threads. `None` uses the std default.
    pub stack_size: Option<usize>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            thread_name: "notifier-handler".to_string(),
            stack_size: None,
        }
    }
}

impl NotifierConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, NotifierError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the handler thread name. Names containing NUL are rejected.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Result<Self, NotifierError> {
        self.thread_name = name.into();
        self.validate()?;
        Ok(self)
    }

    /// Check the fields the thread builder cannot accept.
    pub fn validate(&self) -> Result<(), NotifierError> {
        if self.thread_name.contains('\0') {
            return Err(NotifierError::Config(
                "thread_name must not contain NUL bytes".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}
