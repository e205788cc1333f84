//! Session-wide tool settings.
//!
//! These are the values a tool panel keeps between invocations: the chosen
//! vertex group, the cleanup mode and amounts, and so on. Operators are built
//! from them with their `from_settings` constructors.

use crate::algo::cleanup::{CleanupMode, DEFAULT_DISTANCE_THRESHOLD, DEFAULT_PERCENTAGE};

/// Default minimum displacement for the selection operators.
pub const DEFAULT_SELECT_THRESHOLD: f64 = 0.0001;

/// Persistent settings shared by the shape-key operators.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    /// Vertex group used by the blend operator.
    pub vertex_group: String,

    /// Invert the vertex group influence when blending.
    pub invert: bool,

    /// Cleanup strategy.
    pub cleanup_mode: CleanupMode,

    /// Percentage of least-moved vertices reset in percentage mode.
    pub cleanup_percentage: f64,

    /// Maximum distance reset in threshold mode.
    pub cleanup_threshold: f64,

    /// Minimum distance a vertex must move to be selected.
    pub select_threshold: f64,

    /// Whether to use parallel execution where available (default: true).
    pub parallel: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            vertex_group: String::new(),
            invert: false,
            cleanup_mode: CleanupMode::Percentage,
            cleanup_percentage: DEFAULT_PERCENTAGE,
            cleanup_threshold: DEFAULT_DISTANCE_THRESHOLD,
            select_threshold: DEFAULT_SELECT_THRESHOLD,
            parallel: true,
        }
    }
}

impl ToolSettings {
    /// Set the vertex group used for blending.
    pub fn with_vertex_group(mut self, name: impl Into<String>) -> Self {
        self.vertex_group = name.into();
        self
    }

    /// Set whether the vertex group influence is inverted.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Use percentage cleanup with the given percentage.
    pub fn with_cleanup_percentage(mut self, percentage: f64) -> Self {
        self.cleanup_mode = CleanupMode::Percentage;
        self.cleanup_percentage = percentage;
        self
    }

    /// Use threshold cleanup with the given distance.
    pub fn with_cleanup_threshold(mut self, distance: f64) -> Self {
        self.cleanup_mode = CleanupMode::Threshold;
        self.cleanup_threshold = distance;
        self
    }

    /// Set the selection threshold.
    pub fn with_select_threshold(mut self, threshold: f64) -> Self {
        self.select_threshold = threshold;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
