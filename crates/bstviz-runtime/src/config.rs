#![forbid(unsafe_code)]

//! Trainer configuration loaded from TOML.
//!
//! Every field has a default matching the engine's built-in values, so an
//! empty file (or no file) behaves exactly like [`TrainerConfig::default`].
//!
//! ```toml
//! [timings]        # milliseconds
//! step = 500
//! rotation = 1500
//!
//! [layout]
//! viewport_width = 960.0
//!
//! [start]
//! discipline = "avl"
//! mode = "manual"
//! ```

use std::path::Path;

use bstviz_core::layout::{DEFAULT_ANCHOR_Y, DEFAULT_ROW_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use bstviz_core::{Discipline, DropConfig, EngineConfig, LayoutConfig, Point, StepMode, StepTimings};
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::{Result, RuntimeError};

// ---------------------------------------------------------------------------
// Top-level TrainerConfig
// ---------------------------------------------------------------------------

/// Everything a session needs to build its engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    /// Pause durations in milliseconds.
    pub timings: TimingsConfig,
    /// Canvas geometry.
    pub layout: LayoutSection,
    /// Insertion drop animation.
    pub drop: DropSection,
    /// Initial discipline and step mode.
    pub start: StartConfig,
}

impl TrainerConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if given, otherwise use defaults, and reject values that
    /// fail [`validate`](Self::validate).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let problems = config.validate();
        if !problems.is_empty() {
            return Err(RuntimeError::invalid_config(problems));
        }
        tracing::debug!(?path, "trainer config loaded");
        Ok(config)
    }

    /// Defaults with every pause zero-length.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            timings: TimingsConfig::instant(),
            ..Self::default()
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let layout = &self.layout;
        if !(layout.viewport_width.is_finite() && layout.viewport_width > 0.0) {
            errors.push(format!(
                "layout.viewport_width must be > 0, got {}",
                layout.viewport_width
            ));
        }
        if !layout.anchor_y.is_finite() {
            errors.push(format!("layout.anchor_y must be finite, got {}", layout.anchor_y));
        }
        if !(layout.row_height.is_finite() && layout.row_height > 0.0) {
            errors.push(format!(
                "layout.row_height must be > 0, got {}",
                layout.row_height
            ));
        }
        if let Some(gap) = layout.initial_gap
            && !(gap.is_finite() && gap > 0.0)
        {
            errors.push(format!("layout.initial_gap must be > 0, got {gap}"));
        }

        let drop = &self.drop;
        if !drop.start_y.is_finite() {
            errors.push(format!("drop.start_y must be finite, got {}", drop.start_y));
        }
        if !(0.0..=1.0).contains(&drop.smoothing) {
            errors.push(format!(
                "drop.smoothing must be in [0, 1], got {}",
                drop.smoothing
            ));
        }
        if !(drop.epsilon.is_finite() && drop.epsilon > 0.0) {
            errors.push(format!("drop.epsilon must be > 0, got {}", drop.epsilon));
        }

        errors
    }

    /// The engine configuration this file describes.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            discipline: self.start.discipline.into(),
            timings: self.timings.step_timings(),
            layout: self.layout.layout_config(),
            drop: DropConfig {
                start_y: self.drop.start_y,
                smoothing: self.drop.smoothing,
                epsilon: self.drop.epsilon,
            },
        }
    }

    /// Step mode the session starts in.
    #[must_use]
    pub fn step_mode(&self) -> StepMode {
        self.start.mode.into()
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Pause durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingsConfig {
    /// Default step length; `search` falls back to it.
    pub step: u64,
    /// One frame of the insertion drop.
    pub frame: u64,
    /// One search comparison. Defaults to `step`.
    pub search: Option<u64>,
    /// One traversal visit.
    pub visit: u64,
    /// Hold after a traversal.
    pub hold: u64,
    /// Rotation announcement.
    pub rotation: u64,
    /// Gap between random-fill inserts.
    pub fill_gap: u64,
}

impl Default for TimingsConfig {
    fn default() -> Self {
        Self {
            step: 500,
            frame: 16,
            search: None,
            visit: 800,
            hold: 1000,
            rotation: 1500,
            fill_gap: 200,
        }
    }
}

impl TimingsConfig {
    /// Every duration zero.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            step: 0,
            frame: 0,
            search: None,
            visit: 0,
            hold: 0,
            rotation: 0,
            fill_gap: 0,
        }
    }

    #[must_use]
    pub fn step_timings(&self) -> StepTimings {
        StepTimings {
            frame: Duration::from_millis(self.frame),
            search: Duration::from_millis(self.search.unwrap_or(self.step)),
            visit: Duration::from_millis(self.visit),
            hold: Duration::from_millis(self.hold),
            rotation: Duration::from_millis(self.rotation),
            fill_gap: Duration::from_millis(self.fill_gap),
        }
    }
}

/// Canvas geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSection {
    pub viewport_width: f64,
    pub anchor_y: f64,
    pub row_height: f64,
    /// Defaults to a quarter of `viewport_width`.
    pub initial_gap: Option<f64>,
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            anchor_y: DEFAULT_ANCHOR_Y,
            row_height: DEFAULT_ROW_HEIGHT,
            initial_gap: None,
        }
    }
}

impl LayoutSection {
    #[must_use]
    pub fn layout_config(&self) -> LayoutConfig {
        let base = LayoutConfig::for_viewport(self.viewport_width);
        LayoutConfig {
            anchor: Point::new(base.anchor.x, self.anchor_y),
            initial_gap: self.initial_gap.unwrap_or(base.initial_gap),
            row_height: self.row_height,
        }
    }
}

/// Insertion drop animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DropSection {
    pub start_y: f64,
    pub smoothing: f64,
    pub epsilon: f64,
}

impl Default for DropSection {
    fn default() -> Self {
        let drop = DropConfig::default();
        Self {
            start_y: drop.start_y,
            smoothing: drop.smoothing,
            epsilon: drop.epsilon,
        }
    }
}

/// Initial discipline and step mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StartConfig {
    pub discipline: DisciplineName,
    pub mode: ModeName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisciplineName {
    #[default]
    Bst,
    Avl,
}

impl From<DisciplineName> for Discipline {
    fn from(name: DisciplineName) -> Self {
        match name {
            DisciplineName::Bst => Self::Bst,
            DisciplineName::Avl => Self::Avl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeName {
    #[default]
    Auto,
    Manual,
}

impl From<ModeName> for StepMode {
    fn from(name: ModeName) -> Self {
        match name {
            ModeName::Auto => Self::Auto,
            ModeName::Manual => Self::Manual,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
