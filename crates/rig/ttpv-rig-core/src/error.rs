//! Error types for the rig core.

use serde::{Deserialize, Serialize};

/// Every failure the core can report.
///
/// Only `UnknownPart` and `Config` indicate misuse; the rest are domain
/// rejections the tick loop logs and skips.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RigError {
    /// A part name outside the fixed rig set
    #[error("Unknown part: {name}")]
    UnknownPart { name: String },

    /// The scene already holds its maximum number of rigs
    #[error("Scene is full ({capacity} rigs)")]
    CapacityExceeded { capacity: usize },

    /// Missing or undecodable image
    #[error("Asset unavailable: {category}/{id}: {reason}")]
    AssetUnavailable {
        category: String,
        id: String,
        reason: String,
    },

    /// An edit or drag that references no live rig or resource
    #[error("Invalid selection: {reason}")]
    InvalidSelection { reason: String },

    /// A playback transition the state machine does not allow
    #[error("Invalid playback transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Malformed or out-of-range configuration
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

impl RigError {
    /// Shorthand for an `InvalidSelection` with a formatted reason.
    pub fn selection(reason: impl Into<String>) -> Self {
        Self::InvalidSelection {
            reason: reason.into(),
        }
    }

    /// Whether the tick loop may swallow this error and keep going.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::UnknownPart { .. } | Self::Config { .. })
    }

    /// Short category label for logging and outputs.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownPart { .. } => "part",
            Self::CapacityExceeded { .. } => "capacity",
            Self::AssetUnavailable { .. } => "asset",
            Self::InvalidSelection { .. } => "selection",
            Self::InvalidTransition { .. } => "playback",
            Self::Config { .. } => "config",
        }
    }
}

impl From<serde_json::Error> for RigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}
