use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_FILE: &str = "IMAGEFX_CONFIG";
pub const ENV_CONFIG_DIR: &str = "IMAGEFX_CONFIG_DIR";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "imagefx";
const APPLICATION: &str = "imagefx";
const CONFIG_FILE_NAME: &str = "imagefx.toml";

/// Where the configuration file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    CommandLine,
    Environment,
    UserDefault,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::CommandLine => f.write_str("--config"),
            ConfigOrigin::Environment => f.write_str(ENV_CONFIG_FILE),
            ConfigOrigin::UserDefault => f.write_str("user config directory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub origin: ConfigOrigin,
}

impl ConfigLocation {
    /// Directory holding the file; relative `assets` entries resolve here.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Picks the configuration file to load.
///
/// An explicit `--config` wins, then `$IMAGEFX_CONFIG`. Both must name a
/// file that is then loaded unconditionally. Otherwise `imagefx.toml` in the
/// user config directory is used when it exists, and `None` means built-in
/// defaults.
pub fn locate_config(explicit: Option<&Path>) -> Result<Option<ConfigLocation>> {
    if let Some(path) = explicit {
        return Ok(Some(ConfigLocation {
            path: path.to_path_buf(),
            origin: ConfigOrigin::CommandLine,
        }));
    }

    if let Some(path) = env_override(ENV_CONFIG_FILE) {
        return Ok(Some(ConfigLocation {
            path,
            origin: ConfigOrigin::Environment,
        }));
    }

    let candidate = user_config_dir()?.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        return Ok(Some(ConfigLocation {
            path: candidate,
            origin: ConfigOrigin::UserDefault,
        }));
    }
    tracing::debug!(path = %candidate.display(), "no user configuration file");
    Ok(None)
}

fn user_config_dir() -> Result<PathBuf> {
    if let Some(dir) = env_override(ENV_CONFIG_DIR) {
        return Ok(dir);
    }
    let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
        .ok_or_else(|| anyhow!("failed to determine user directories"))?;
    Ok(project_dirs.config_dir().to_path_buf())
}

fn env_override(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    fn env_lock() -> &'static Mutex<()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    struct EnvGuard {
        key: &'static str,
        previous: Option<OsString>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &Path) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }

        fn clear(key: &'static str) -> Self {
            let previous = env::var_os(key);
            env::remove_var(key);
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = self.previous.take() {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    #[test]
    fn explicit_path_wins_over_environment() {
        let _guard = env_lock().lock().unwrap();
        let root = TempDir::new().unwrap();
        let _file_guard = EnvGuard::set(ENV_CONFIG_FILE, &root.path().join("env.toml"));

        let location = locate_config(Some(Path::new("cli.toml"))).unwrap().unwrap();
        assert_eq!(location.path, PathBuf::from("cli.toml"));
        assert_eq!(location.origin, ConfigOrigin::CommandLine);
    }

    #[test]
    fn environment_names_the_file() {
        let _guard = env_lock().lock().unwrap();
        let root = TempDir::new().unwrap();
        let path = root.path().join("env.toml");
        let _file_guard = EnvGuard::set(ENV_CONFIG_FILE, &path);

        let location = locate_config(None).unwrap().unwrap();
        assert_eq!(location.path, path);
        assert_eq!(location.origin, ConfigOrigin::Environment);
        assert_eq!(location.directory(), root.path());
    }

    #[test]
    fn user_default_is_used_only_when_present() {
        let _guard = env_lock().lock().unwrap();
        let root = TempDir::new().unwrap();
        let _file_guard = EnvGuard::clear(ENV_CONFIG_FILE);
        let _dir_guard = EnvGuard::set(ENV_CONFIG_DIR, root.path());

        assert_eq!(locate_config(None).unwrap(), None);

        let path = root.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "").unwrap();
        let location = locate_config(None).unwrap().unwrap();
        assert_eq!(location.path, path);
        assert_eq!(location.origin, ConfigOrigin::UserDefault);
    }
}
