//! # Node Configuration
//!
//! Everything about *where* the node reads and writes, and how it waits.
//! What gets rendered (palette, camera, frame, quality) is fixed in
//! [`crate::scene::palette`] and deliberately not configurable.
//!
//! ## Example (TOML)
//!
//! ```toml
//! message_path = "/tmp/test_ipc"
//! output_path = "/tmp/test.png"
//! min_payload_bytes = 20
//! quaternion_policy = "normalize"
//! quaternion_tolerance = 0.001
//!
//! [assets]
//! asset_dir = "resources/models"
//! sun_mesh = "sun.obj"
//! object_mesh = "scene.obj"
//!
//! [watcher]
//! backend = "native"
//! poll_interval_ms = 100
//! settle_ms = 20
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use crate::config::{Config, ConfigError};
use crate::pose::QuaternionPolicy;

/// Smallest message size worth decoding; anything shorter is a partial write
pub const DEFAULT_MIN_PAYLOAD_BYTES: u64 = 20;

/// Static geometry locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory the mesh file names are resolved against
    pub asset_dir: PathBuf,
    /// Sun mesh file name
    pub sun_mesh: String,
    /// Dynamic object mesh file name
    pub object_mesh: String,
}

impl AssetConfig {
    /// Full path of the sun mesh
    pub fn sun_mesh_path(&self) -> PathBuf {
        self.asset_dir.join(&self.sun_mesh)
    }

    /// Full path of the dynamic object mesh
    pub fn object_mesh_path(&self) -> PathBuf {
        self.asset_dir.join(&self.object_mesh)
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("resources/models"),
            sun_mesh: "sun.obj".to_string(),
            object_mesh: "scene.obj".to_string(),
        }
    }
}

/// Change notification backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatcherBackend {
    /// OS file notifications
    #[default]
    Native,
    /// `notify` polling backend, rescans on a timer
    Poll,
}

/// Change watcher tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Backend selection
    pub backend: WatcherBackend,
    /// Poll period, also the stop-signal check period for the native backend
    pub poll_interval_ms: u64,
    /// Quiet time after an event before it is reported
    pub settle_ms: u64,
}

impl WatcherConfig {
    /// Poll period as a duration
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Settle time as a duration
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            backend: WatcherBackend::Native,
            poll_interval_ms: 100,
            settle_ms: 20,
        }
    }
}

/// Render node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Pose message file written by the producer
    pub message_path: PathBuf,
    /// Image file read by the distribution process
    pub output_path: PathBuf,
    /// Static geometry
    pub assets: AssetConfig,
    /// Partial-write threshold in bytes
    pub min_payload_bytes: u64,
    /// Handling of non-unit quaternions
    pub quaternion_policy: QuaternionPolicy,
    /// Allowed deviation of the quaternion norm from 1
    pub quaternion_tolerance: f64,
    /// Watcher tuning
    pub watcher: WatcherConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            message_path: PathBuf::from("/tmp/test_ipc"),
            output_path: PathBuf::from("/tmp/test.png"),
            assets: AssetConfig::default(),
            min_payload_bytes: DEFAULT_MIN_PAYLOAD_BYTES,
            quaternion_policy: QuaternionPolicy::default(),
            quaternion_tolerance: 1e-3,
            watcher: WatcherConfig::default(),
        }
    }
}

impl Config for NodeConfig {}

impl NodeConfig {
    /// Set the message path
    pub fn with_message_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.message_path = path.into();
        self
    }

    /// Set the output path
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the asset directory
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets.asset_dir = dir.into();
        self
    }

    /// Set the quaternion policy
    pub const fn with_quaternion_policy(mut self, policy: QuaternionPolicy) -> Self {
        self.quaternion_policy = policy;
        self
    }

    /// Set the watcher backend
    pub const fn with_watcher_backend(mut self, backend: WatcherBackend) -> Self {
        self.watcher.backend = backend;
        self
    }

    /// Check values that would make the node misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        if file_name(&self.message_path).is_none() {
            return Err(ConfigError::Invalid(format!(
                "message_path has no file name: {}",
                self.message_path.display()
            )));
        }
        if file_name(&self.output_path).is_none() {
            return Err(ConfigError::Invalid(format!(
                "output_path has no file name: {}",
                self.output_path.display()
            )));
        }
        if self.message_path == self.output_path {
            return Err(ConfigError::Invalid("message_path and output_path must differ".to_string()));
        }
        if !(self.quaternion_tolerance.is_finite() && self.quaternion_tolerance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "quaternion_tolerance must be a non-negative number, got {}",
                self.quaternion_tolerance
            )));
        }
        if self.watcher.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("watcher.poll_interval_ms must be positive".to_string()));
        }
        Ok(())
    }
}

fn file_name(path: &Path) -> Option<&std::ffi::OsStr> {
    path.file_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_and_threshold() {
        let config = NodeConfig::default();
        assert_eq!(config.message_path, PathBuf::from("/tmp/test_ipc"));
        assert_eq!(config.output_path, PathBuf::from("/tmp/test.png"));
        assert_eq!(config.min_payload_bytes, 20);
        assert_eq!(config.assets.sun_mesh_path(), PathBuf::from("resources/models/sun.obj"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("node.toml");
        let config = NodeConfig::default()
            .with_message_path("/var/run/pose.json")
            .with_quaternion_policy(QuaternionPolicy::Reject)
            .with_watcher_backend(WatcherBackend::Poll);

        config.save_to_file(&path).unwrap();
        let loaded = NodeConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: NodeConfig = toml::from_str(
            "quaternion_policy = \"as_is\"\n[watcher]\nbackend = \"poll\"\n",
        )
        .unwrap();
        assert_eq!(config.quaternion_policy, QuaternionPolicy::AsIs);
        assert_eq!(config.watcher.backend, WatcherBackend::Poll);
        assert_eq!(config.watcher.poll_interval_ms, 100);
        assert_eq!(config.output_path, PathBuf::from("/tmp/test.png"));
    }

    #[test]
    fn test_ron_is_supported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("node.ron");
        NodeConfig::default().save_to_file(&path).unwrap();
        assert_eq!(NodeConfig::load_from_file(&path).unwrap(), NodeConfig::default());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = NodeConfig::default().save_to_file("node.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_validate_rejects_same_paths() {
        let config = NodeConfig::default().with_output_path("/tmp/test_ipc");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
