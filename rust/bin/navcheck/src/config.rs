//! navcheck configuration.
//!
//! Reads a TOML file such as `/etc/openerp/nav.toml`:
//!
//! ```toml
//! descriptor_dir = "/etc/openerp/nav"
//! builtin = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavConfig {
    /// Directory scanned for descriptor files. Relative paths are resolved
    /// against the config file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor_dir: Option<PathBuf>,

    /// Include the built-in descriptors.
    #[serde(default = "default_builtin")]
    pub builtin: bool,
}

fn default_builtin() -> bool {
    true
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            descriptor_dir: None,
            builtin: default_builtin(),
        }
    }
}

impl NavConfig {
    /// Resolve a context name or path. A bare name maps to
    /// `/etc/openerp/<name>.toml`; anything containing `/` or `.` is a path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from("/etc/openerp").join(format!("{}.toml", name_or_path))
        }
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let mut config: NavConfig = toml::from_str(&content)?;

        if let Some(dir) = config.descriptor_dir.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.descriptor_dir = Some(if dir.is_relative() { base.join(dir) } else { dir });
        }
        Ok(config)
    }
}
