use crate::core::{DebpoolError, DebpoolResult, RepoLayout};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the config file looked up in the repository root
pub const CONFIG_FILE_NAME: &str = "debpool.yaml";

/// Repository configuration.
///
/// Built once and shared read-only (behind an `Arc`) with every engine
/// component. Nothing in the engine reads configuration from ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Repository root. Not serialized; set by the loader or by tests.
    #[serde(skip)]
    pub root: PathBuf,

    /// `Origin:` field of every Release manifest
    #[serde(default = "default_origin")]
    pub origin: String,

    /// `Label:` field of every Release manifest
    #[serde(default = "default_origin")]
    pub label: String,

    /// `Description:` field of every Release manifest
    #[serde(default = "default_description")]
    pub description: String,

    /// Fixed set of distributions (suites)
    #[serde(default = "default_distributions")]
    pub distributions: Vec<String>,

    /// Fixed set of components
    #[serde(default = "default_components")]
    pub components: Vec<String>,

    /// Architectures an index is generated for
    #[serde(default = "default_architectures")]
    pub architectures: Vec<String>,

    /// Extension (without dot) of package files in the pool
    #[serde(default = "default_package_extension")]
    pub package_extension: String,

    /// Only list a package under `binary-<arch>` when its own architecture
    /// is `<arch>` or `all`.
    ///
    /// Off by default: every package in a component is listed in every
    /// architecture's index, with `Architecture:` set to the index
    /// architecture.
    #[serde(default)]
    pub filter_by_architecture: bool,

    /// Where the public key is exported, relative to the root
    #[serde(default = "default_public_key_path")]
    pub public_key_path: PathBuf,

    #[serde(default)]
    pub signing: SigningConfig,

    #[serde(default)]
    pub inspection: InspectionConfig,
}

/// Settings for the gpg signing collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Key id or fingerprint passed to `--default-key`
    #[serde(default = "default_key_id")]
    pub key_id: String,

    #[serde(default = "default_gpg_program")]
    pub gpg_program: String,

    /// Alternate GnuPG home directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homedir: Option<PathBuf>,

    #[serde(default = "default_signing_timeout")]
    pub timeout_secs: u64,
}

/// Settings for the dpkg-deb inspection collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionConfig {
    #[serde(default = "default_dpkg_deb_program")]
    pub dpkg_deb_program: String,

    #[serde(default = "default_inspection_timeout")]
    pub timeout_secs: u64,
}

fn default_origin() -> String {
    "debian-hpc".to_string()
}

fn default_description() -> String {
    "Debian HPC Repository".to_string()
}

fn default_distributions() -> Vec<String> {
    vec!["stable".to_string(), "testing".to_string()]
}

fn default_components() -> Vec<String> {
    vec![
        "main".to_string(),
        "contrib".to_string(),
        "non-free".to_string(),
    ]
}

fn default_architectures() -> Vec<String> {
    vec!["amd64".to_string(), "i386".to_string()]
}

fn default_package_extension() -> String {
    "deb".to_string()
}

fn default_public_key_path() -> PathBuf {
    PathBuf::from("web").join("key.gpg")
}

fn default_key_id() -> String {
    "D8D87602D00F0680F44BD468F90FBC2AE63EB38F".to_string()
}

fn default_gpg_program() -> String {
    "gpg".to_string()
}

fn default_signing_timeout() -> u64 {
    120
}

fn default_dpkg_deb_program() -> String {
    "dpkg-deb".to_string()
}

fn default_inspection_timeout() -> u64 {
    60
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            key_id: default_key_id(),
            gpg_program: default_gpg_program(),
            homedir: None,
            timeout_secs: default_signing_timeout(),
        }
    }
}

impl SigningConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for InspectionConfig {
    fn default() -> Self {
        Self {
            dpkg_deb_program: default_dpkg_deb_program(),
            timeout_secs: default_inspection_timeout(),
        }
    }
}

impl InspectionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            origin: default_origin(),
            label: default_origin(),
            description: default_description(),
            distributions: default_distributions(),
            components: default_components(),
            architectures: default_architectures(),
            package_extension: default_package_extension(),
            filter_by_architecture: false,
            public_key_path: default_public_key_path(),
            signing: SigningConfig::default(),
            inspection: InspectionConfig::default(),
        }
    }
}

impl RepoConfig {
    /// Default configuration rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Load `debpool.yaml` from the repository root, or defaults if absent
    pub fn load(root: &Path) -> DebpoolResult<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            let config = Self::with_root(root);
            config.validate()?;
            return Ok(config);
        }
        Self::load_from(root, &path)
    }

    /// Load an explicit config file for the repository at `root`
    pub fn load_from(root: &Path, path: &Path) -> DebpoolResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DebpoolError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config: RepoConfig = serde_yaml::from_str(&content)
            .map_err(|e| DebpoolError::Config(format!("Failed to parse config: {}", e)))?;
        config.root = root.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Reject empty or duplicated enumerations
    pub fn validate(&self) -> DebpoolResult<()> {
        for (field, values) in [
            ("distributions", &self.distributions),
            ("components", &self.components),
            ("architectures", &self.architectures),
        ] {
            if values.is_empty() {
                return Err(DebpoolError::Config(format!("`{}` must not be empty", field)));
            }
            let mut seen = HashSet::new();
            for value in values {
                if value.is_empty() || value.contains('/') || value.contains(char::is_whitespace)
                {
                    return Err(DebpoolError::Config(format!(
                        "Invalid entry in `{}`: {:?}",
                        field, value
                    )));
                }
                if !seen.insert(value.as_str()) {
                    return Err(DebpoolError::Config(format!(
                        "Duplicate entry in `{}`: {}",
                        field, value
                    )));
                }
            }
        }
        if self.package_extension.is_empty() {
            return Err(DebpoolError::Config(
                "`package_extension` must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn layout(&self) -> RepoLayout {
        RepoLayout::new(&self.root, &self.public_key_path)
    }

    pub fn check_distribution(&self, distribution: &str) -> DebpoolResult<()> {
        if self.distributions.iter().any(|d| d == distribution) {
            Ok(())
        } else {
            Err(DebpoolError::InvalidDistribution(distribution.to_string()))
        }
    }

    pub fn check_component(&self, component: &str) -> DebpoolResult<()> {
        if self.components.iter().any(|c| c == component) {
            Ok(())
        } else {
            Err(DebpoolError::InvalidComponent(component.to_string()))
        }
    }

    pub fn check_architecture(&self, arch: &str) -> DebpoolResult<()> {
        if self.architectures.iter().any(|a| a == arch) {
            Ok(())
        } else {
            Err(DebpoolError::InvalidArchitecture(arch.to_string()))
        }
    }

    /// Accept only files the pool listing will index
    pub fn check_package_file(&self, path: &Path) -> DebpoolResult<()> {
        let matches = path.extension().and_then(|e| e.to_str())
            == Some(self.package_extension.as_str());
        if matches {
            Ok(())
        } else {
            Err(DebpoolError::InvalidPackageFile {
                path: path.to_path_buf(),
                extension: self.package_extension.clone(),
            })
        }
    }
}
