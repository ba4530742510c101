//! Node configuration: JSON file, defaults and environment overrides.
//!
//! Resolution order, later wins:
//!
//! ```text
//! Default → JSON file (--config or HSAVIZ_CONFIG) → HSAVIZ_RENDERING_FREQUENCY
//! ```

use std::path::{Path, PathBuf};

use hsaviz_core::{
    GeometryParams, RendererOptions, StaticWorkspaceBoundaries, WorkspaceBoundaries,
};
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "HSAVIZ_CONFIG";
/// Environment variable overriding the rendering frequency in Hz.
pub const RENDERING_FREQUENCY_ENV: &str = "HSAVIZ_RENDERING_FREQUENCY";

/// Default rendering rate in Hz.
const DEFAULT_RENDERING_FREQUENCY: f64 = 20.0;
/// Fastest accepted rendering rate in Hz.
pub const MAX_RENDERING_FREQUENCY: f64 = 1000.0;
/// Default lateral rod offset of the reference kinematics, in meters.
const DEFAULT_ROD_OFFSET: f64 = 24e-3;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{var}={value:?} is not a valid value")]
    Env { var: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error(transparent)]
    Render(#[from] hsaviz_core::RenderError),
}

/// Everything the node needs to build and drive a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Frames per second.
    pub rendering_frequency: f64,
    pub renderer: RendererOptions,
    pub geometry: GeometryParams,
    /// Lateral rod offset used by the reference kinematics.
    pub rod_offset: f64,
    /// Boundary file for the configured material and end-effector attachment.
    pub workspace_boundary_path: Option<PathBuf>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rendering_frequency: DEFAULT_RENDERING_FREQUENCY,
            renderer: RendererOptions::default(),
            geometry: GeometryParams::default(),
            rod_offset: DEFAULT_ROD_OFFSET,
            workspace_boundary_path: None,
        }
    }
}

impl NodeConfig {
    pub fn from_json(json: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, path)
    }

    /// Load from `path`, or from the file named by `HSAVIZ_CONFIG`, or fall
    /// back to defaults; then apply environment overrides and validate.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve_with(path, |var| std::env::var(var).ok())
    }

    /// [`Self::resolve`] with an explicit environment lookup.
    pub fn resolve_with(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let from_env = env(CONFIG_PATH_ENV).map(PathBuf::from);
        let config = match path.or(from_env.as_deref()) {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading node configuration");
                Self::load(path)?
            }
            None => Self::default(),
        };
        let config = config.with_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    fn with_overrides(mut self, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(value) = env(RENDERING_FREQUENCY_ENV) {
            self.rendering_frequency = value.trim().parse().map_err(|_| ConfigError::Env {
                var: RENDERING_FREQUENCY_ENV,
                value,
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let frequency = self.rendering_frequency;
        if !(frequency > 0.0 && frequency <= MAX_RENDERING_FREQUENCY) {
            return Err(ConfigError::Invalid(format!(
                "rendering_frequency must be in (0, {MAX_RENDERING_FREQUENCY}] Hz, got {frequency}"
            )));
        }
        if !self.rod_offset.is_finite() || self.rod_offset < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "rod_offset must be non-negative, got {}",
                self.rod_offset
            )));
        }
        if self.renderer.draw_operational_workspace && self.workspace_boundary_path.is_none() {
            return Err(ConfigError::Invalid(
                "draw_operational_workspace needs workspace_boundary_path".into(),
            ));
        }
        Ok(())
    }

    /// Boundary table holding the configured file, if any.
    pub fn workspace_boundaries(&self) -> Result<Option<StaticWorkspaceBoundaries>, ConfigError> {
        let Some(path) = &self.workspace_boundary_path else {
            return Ok(None);
        };
        let boundaries = WorkspaceBoundaries::load(path)?;
        Ok(Some(StaticWorkspaceBoundaries::new().with(
            self.renderer.hsa_material,
            self.geometry.end_effector_attached(),
            boundaries,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsaviz_core::HsaMaterial;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let config = NodeConfig::resolve_with(None, no_env).unwrap();
        assert_eq!(config, NodeConfig::default());
        assert_eq!(config.rendering_frequency, 20.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = NodeConfig::from_json(
            r#"{"rendering_frequency": 10.0, "renderer": {"invert_colors": true, "hsa_material": "epu"}}"#,
            Path::new("inline.json"),
        )
        .unwrap();
        assert_eq!(config.rendering_frequency, 10.0);
        assert!(config.renderer.invert_colors);
        assert_eq!(config.renderer.hsa_material, HsaMaterial::Epu);
        assert_eq!(config.renderer.width, 640);
        assert_eq!(config.geometry, GeometryParams::default());
    }

    #[test]
    fn test_frequency_override() {
        let env = |var: &str| (var == RENDERING_FREQUENCY_ENV).then(|| " 5.5 ".to_string());
        let config = NodeConfig::resolve_with(None, env).unwrap();
        assert_eq!(config.rendering_frequency, 5.5);
    }

    #[test]
    fn test_bad_override_is_reported() {
        let env = |var: &str| (var == RENDERING_FREQUENCY_ENV).then(|| "fast".to_string());
        let err = NodeConfig::resolve_with(None, env).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: RENDERING_FREQUENCY_ENV, .. }));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = NodeConfig::resolve_with(Some(Path::new("/nonexistent/hsaviz.json")), no_env)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_non_positive_frequency_is_rejected() {
        let config = NodeConfig {
            rendering_frequency: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_excessive_frequency_override_is_rejected() {
        let env = |var: &str| (var == RENDERING_FREQUENCY_ENV).then(|| "1e12".to_string());
        let err = NodeConfig::resolve_with(None, env).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");

        let at_cap = |var: &str| (var == RENDERING_FREQUENCY_ENV).then(|| "1000".to_string());
        let config = NodeConfig::resolve_with(None, at_cap).unwrap();
        assert_eq!(config.rendering_frequency, MAX_RENDERING_FREQUENCY);
    }

    #[test]
    fn test_workspace_overlay_requires_file() {
        let mut config = NodeConfig::default();
        config.renderer.draw_operational_workspace = true;
        assert!(config.validate().is_err());
        assert!(NodeConfig::default().workspace_boundaries().unwrap().is_none());
    }
}
