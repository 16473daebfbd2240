//! Error taxonomy shared by every bounded context.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Broad class of a domain failure.
///
/// Every context error exposes `category()` so callers can decide how to react
/// without matching on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Unauthorized caller, invalid parameter, or missing product setup.
    Configuration,
    /// Overflow, division by zero, or an out-of-range conversion.
    Arithmetic,
    /// Operation attempted outside its permitted time window.
    Temporal,
    /// Operation not valid for the current state of an aggregate.
    State,
}

impl ErrorCategory {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Arithmetic => "arithmetic",
            Self::Temporal => "temporal",
            Self::State => "state",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
