//! Configuration management.

use anyhow::{Context as _, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tailshale::{ssh_config, LocalDirectoryConfig};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SSH client config to manage; `~` is expanded.
    pub ssh_config: Option<String>,

    /// Path of the `tailscale` binary.
    pub tailscale_bin: Option<PathBuf>,

    /// MagicDNS server address.
    pub dns_server: Option<SocketAddr>,

    /// Timeout for each call to tailscaled, in seconds.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "tailshale")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Locations searched when no config file is given, in order.
    pub fn search_paths() -> Result<Vec<PathBuf>> {
        Ok(vec![
            Self::default_path()?,
            PathBuf::from("/etc/tailshale/config.toml"),
            PathBuf::from("config.toml"),
        ])
    }

    /// Load configuration from `path`, or from the first existing file of
    /// [`search_paths`](Self::search_paths).
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_file(p),
            None => Self::load_first(&Self::search_paths()?),
        }
    }

    fn load_first(candidates: &[PathBuf]) -> Result<Self> {
        candidates
            .iter()
            .find(|p| p.exists())
            .map_or_else(|| Ok(Self::default()), |p| Self::load_file(p))
    }

    fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// SSH config path: `cli` if given, else the config file's, else `~/.ssh/config`.
    pub fn ssh_config_path(&self, cli: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = cli {
            return Ok(path);
        }

        if let Some(path) = &self.ssh_config {
            let expanded = shellexpand::full(path)
                .with_context(|| format!("could not expand ssh_config path {path}"))?;
            return Ok(PathBuf::from(expanded.as_ref()));
        }

        let dirs =
            BaseDirs::new().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(ssh_config::default_ssh_config_path(dirs.home_dir()))
    }

    /// Settings for the local tailscaled client.
    #[must_use]
    pub fn directory_config(&self) -> LocalDirectoryConfig {
        let mut config = LocalDirectoryConfig::default();
        if let Some(bin) = &self.tailscale_bin {
            config = config.tailscale_bin(bin.clone());
        }
        if let Some(addr) = self.dns_server {
            config = config.dns_server(addr);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "ssh_config = \"/etc/ssh/ssh_config.d/me\"\n\
             tailscale_bin = \"/usr/local/bin/tailscale\"\n\
             dns_server = \"127.0.0.1:5353\"\n\
             timeout_secs = 3\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(
            config.ssh_config_path(None).unwrap(),
            PathBuf::from("/etc/ssh/ssh_config.d/me")
        );

        let directory = config.directory_config();
        assert_eq!(directory.tailscale_bin, PathBuf::from("/usr/local/bin/tailscale"));
        assert_eq!(directory.dns_server.port(), 5353);
        assert_eq!(directory.timeout_secs(), 3);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_cli_path_wins() {
        let config = Config {
            ssh_config: Some("/from/file".to_string()),
            ..Config::default()
        };
        let path = config
            .ssh_config_path(Some(PathBuf::from("/from/cli")))
            .unwrap();
        assert_eq!(path, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_defaults() {
        let directory = Config::default().directory_config();
        assert_eq!(directory, LocalDirectoryConfig::default());
    }

    #[test]
    fn test_search_order() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let system = dir.path().join("system.toml");
        let local = dir.path().join("local.toml");
        std::fs::write(&system, "timeout_secs = 7").unwrap();
        std::fs::write(&local, "timeout_secs = 9").unwrap();

        let candidates = [user.clone(), system, local];
        assert_eq!(Config::load_first(&candidates).unwrap().timeout_secs, Some(7));

        std::fs::write(&user, "timeout_secs = 1").unwrap();
        assert_eq!(Config::load_first(&candidates).unwrap().timeout_secs, Some(1));
    }

    #[test]
    fn test_search_paths() {
        let paths = Config::search_paths().unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[1], PathBuf::from("/etc/tailshale/config.toml"));
        assert_eq!(paths[2], PathBuf::from("config.toml"));
    }

    #[test]
    fn test_no_candidates_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = [dir.path().join("a.toml"), dir.path().join("b.toml")];
        assert_eq!(Config::load_first(&candidates).unwrap(), Config::default());
    }
}
