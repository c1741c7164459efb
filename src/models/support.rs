//! Upstream field capability.
//!
//! GRID does not populate every field on every feed. Whether the enhanced
//! series-state fields (round segments, first kills, agents) are available
//! is learned from the first request that uses them and then never
//! re-probed.

use serde::{Deserialize, Serialize};

/// Tri-state capability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldSupport {
    /// Not probed yet
    #[default]
    Unknown,
    Supported,
    Unsupported,
}

impl FieldSupport {
    /// Transition after a request using the enhanced fields succeeded.
    pub fn on_success(self) -> Self {
        match self {
            FieldSupport::Unknown => FieldSupport::Supported,
            settled => settled,
        }
    }

    /// Transition after a request using the enhanced fields failed.
    ///
    /// Only an unprobed flag flips; once `Supported`, failures are ordinary
    /// errors and do not downgrade the flag.
    pub fn on_failure(self) -> Self {
        match self {
            FieldSupport::Unknown => FieldSupport::Unsupported,
            settled => settled,
        }
    }

    /// Whether requests should use the enhanced query shape.
    pub fn use_enhanced(&self) -> bool {
        !matches!(self, FieldSupport::Unsupported)
    }

    /// Whether a failed enhanced request should be retried with the basic shape.
    pub fn should_fall_back(&self) -> bool {
        matches!(self, FieldSupport::Unknown)
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, FieldSupport::Unsupported)
    }
}

impl std::fmt::Display for FieldSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldSupport::Unknown => write!(f, "unknown"),
            FieldSupport::Supported => write!(f, "supported"),
            FieldSupport::Unsupported => write!(f, "unsupported"),
        }
    }
}
