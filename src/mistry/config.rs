//! Configuration for the Mistry AI backend.
//!
//! [`MistryConfig`] is a plain struct: build it by hand in code and tests, or read it
//! from the process environment with [`MistryConfig::from_env`].
//!
//! | Variable                 | Field             | Default            |
//! |--------------------------|-------------------|--------------------|
//! | `PORT`                   | `port`            | `5000`             |
//! | `OPENAI_API_KEY`         | `openai_api_key`  | unset              |
//! | `GEMINI_API_KEY`         | `gemini_api_key`  | unset              |
//! | `OPENAI_MODEL`           | `openai_model`    | `gpt-3.5-turbo`    |
//! | `GEMINI_MODEL`           | `gemini_model`    | `gemini-2.0-flash` |
//! | `MISTRY_SOLUTION_STYLE`  | `solution_style`  | `plain`            |
//! | `MISTRY_MAX_TOKENS`      | `max_tokens`      | `500`              |
//! | `MISTRY_TEMPERATURE`     | `temperature`     | `0.7`              |
//!
//! Empty API keys count as unset.
//!
//! # Example
//!
//! ```rust
//! use mistry::MistryConfig;
//!
//! let config = MistryConfig {
//!     openai_api_key: Some("sk-test".to_string()),
//!     ..MistryConfig::default()
//! };
//! assert_eq!(config.port, 5000);
//! ```

use crate::clients::common::GenerationParams;
use crate::math::SolutionStyle;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

/// Raised when an environment variable is present but unusable.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    variable: String,
    message: String,
}

impl ConfigError {
    pub fn new(variable: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError {
            variable: variable.into(),
            message: message.into(),
        }
    }

    /// Name of the offending environment variable.
    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.variable, self.message)
    }
}

impl Error for ConfigError {}

/// Runtime settings for the chat backend.
#[derive(Debug, Clone, PartialEq)]
pub struct MistryConfig {
    /// TCP port the HTTP server listens on.
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_model: String,
    /// Wording used for answers produced by the local math fast path.
    pub solution_style: SolutionStyle,
    /// Completion token cap sent to the providers.
    pub max_tokens: u32,
    /// Sampling temperature sent to the providers, `0.0..=2.0`.
    pub temperature: f32,
}

impl Default for MistryConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            openai_api_key: None,
            gemini_api_key: None,
            openai_model: "gpt-3.5-turbo".to_string(),
            gemini_model: "gemini-2.0-flash".to_string(),
            solution_style: SolutionStyle::Plain,
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

impl MistryConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Build a configuration from an explicit variable map; unknown keys are ignored.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use mistry::MistryConfig;
    ///
    /// let mut vars = HashMap::new();
    /// vars.insert("PORT".to_string(), "8080".to_string());
    /// vars.insert("GEMINI_API_KEY".to_string(), "".to_string());
    ///
    /// let config = MistryConfig::from_vars(vars).unwrap();
    /// assert_eq!(config.port, 8080);
    /// assert_eq!(config.gemini_api_key, None);
    /// ```
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = MistryConfig::default();

        if let Some(port) = non_empty(&vars, "PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::new("PORT", format!("'{}' is not a port number", port)))?;
        }

        config.openai_api_key = non_empty(&vars, "OPENAI_API_KEY");
        config.gemini_api_key = non_empty(&vars, "GEMINI_API_KEY");

        if let Some(model) = non_empty(&vars, "OPENAI_MODEL") {
            config.openai_model = model;
        }
        if let Some(model) = non_empty(&vars, "GEMINI_MODEL") {
            config.gemini_model = model;
        }
        if let Some(style) = non_empty(&vars, "MISTRY_SOLUTION_STYLE") {
            config.solution_style = style
                .parse()
                .map_err(|e: String| ConfigError::new("MISTRY_SOLUTION_STYLE", e))?;
        }

        if let Some(max_tokens) = non_empty(&vars, "MISTRY_MAX_TOKENS") {
            config.max_tokens = max_tokens.parse().map_err(|_| {
                ConfigError::new(
                    "MISTRY_MAX_TOKENS",
                    format!("'{}' is not a token count", max_tokens),
                )
            })?;
        }
        if let Some(temperature) = non_empty(&vars, "MISTRY_TEMPERATURE") {
            config.temperature = match temperature.parse::<f32>() {
                Ok(t) if (0.0..=2.0).contains(&t) => t,
                _ => {
                    return Err(ConfigError::new(
                        "MISTRY_TEMPERATURE",
                        format!("'{}' is not a temperature between 0 and 2", temperature),
                    ))
                }
            };
        }

        Ok(config)
    }

    /// Sampling limits handed to every provider client.
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        }
    }
}

fn non_empty(vars: &HashMap<String, String>, key: &str) -> Option<String> {
    vars.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
