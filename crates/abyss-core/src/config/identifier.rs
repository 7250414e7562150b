//! Identifier generation configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Identifier factory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifierConfig {
    /// Default token length in bytes.
    #[serde(default = "default_token_length")]
    pub default_token_length: usize,
}

impl IdentifierConfig {
    /// Rejects a zero token length.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.default_token_length == 0 {
            return Err(AppError::configuration(
                "identifier.default_token_length must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            default_token_length: default_token_length(),
        }
    }
}

fn default_token_length() -> usize {
    16
}
