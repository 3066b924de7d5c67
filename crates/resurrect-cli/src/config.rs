//! Config file discovery and loading.
//!
//! Priority for the config file:
//! 1. `--config <PATH>` on the command line
//! 2. `RESURRECT_CONFIG` (explicit override, ignores empty string)
//! 3. `<config dir>/resurrect/config.json` (`$XDG_CONFIG_HOME` on Linux)
//!
//! A missing file means defaults. A file that exists but cannot be read or
//! parsed is an error.

use std::env;
use std::path::{Path, PathBuf};

use resurrect_core::config::Config;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Get the config file path with priority fallback.
pub fn get_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = env::var("RESURRECT_CONFIG") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|dir| dir.join("resurrect").join("config.json"))
}

/// Load the config, falling back to defaults when no file exists.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = get_config_path(explicit) else {
        debug!("No config directory on this platform, using defaults");
        return Ok(Config::default());
    };

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && explicit.is_none() => {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Config::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    debug!("Loaded config from {:?}", path);
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Env var manipulation is not thread-safe, so these tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    struct EnvGuard {
        vars: Vec<(String, Option<String>)>,
        _lock: std::sync::MutexGuard<'static, ()>,
    }

    impl EnvGuard {
        fn new(var_names: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let vars = var_names
                .iter()
                .map(|name| (name.to_string(), env::var(name).ok()))
                .collect();
            Self { vars, _lock: lock }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (name, value) in &self.vars {
                // SAFETY: We hold ENV_MUTEX, so no other test thread is modifying env vars
                unsafe {
                    match value {
                        Some(v) => env::set_var(name, v),
                        None => env::remove_var(name),
                    }
                }
            }
        }
    }

    #[test]
    fn test_explicit_path_wins() {
        let _guard = EnvGuard::new(&["RESURRECT_CONFIG"]);
        // SAFETY: We hold ENV_MUTEX via _guard
        unsafe { env::set_var("RESURRECT_CONFIG", "/from/env.json") };

        assert_eq!(
            get_config_path(Some(Path::new("/from/flag.json"))),
            Some(PathBuf::from("/from/flag.json"))
        );
    }

    #[test]
    fn test_env_override() {
        let _guard = EnvGuard::new(&["RESURRECT_CONFIG"]);
        // SAFETY: We hold ENV_MUTEX via _guard
        unsafe { env::set_var("RESURRECT_CONFIG", "/from/env.json") };

        assert_eq!(get_config_path(None), Some(PathBuf::from("/from/env.json")));
    }

    #[test]
    fn test_env_override_ignores_empty() {
        let _guard = EnvGuard::new(&["RESURRECT_CONFIG", "XDG_CONFIG_HOME"]);
        // SAFETY: We hold ENV_MUTEX via _guard
        unsafe {
            env::set_var("RESURRECT_CONFIG", "");
            env::set_var("XDG_CONFIG_HOME", "/xdg");
        }

        let path = get_config_path(None).expect("config dir");
        assert!(path.ends_with("resurrect/config.json"));
        #[cfg(target_os = "linux")]
        assert_eq!(path, PathBuf::from("/xdg/resurrect/config.json"));
    }

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let _guard = EnvGuard::new(&["RESURRECT_CONFIG"]);
        // SAFETY: We hold ENV_MUTEX via _guard
        unsafe { env::set_var("RESURRECT_CONFIG", dir.path().join("absent.json")) };

        assert_eq!(load(None).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"plugins": {"kitty": {"listen_socket": "unix:@k", "subprocesses": ["nvim"]}}}"#,
        )
        .unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.plugins.kitty.listen_socket, "unix:@k");
        assert!(config.plugins.kitty.subprocesses.contains("nvim"));
        assert_eq!(config.directory, resurrect_core::config::DEFAULT_DIRECTORY);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ plugins: ").unwrap();

        let err = load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.json"));
    }
}
