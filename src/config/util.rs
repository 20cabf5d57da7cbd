//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find the config file by walking upward from the current directory.
///
/// ```text
/// /srv/app/wwwroot/spa1/   ← cwd
/// /srv/app/spa-host.toml   ← found
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_from(&cwd, config_name)
}

/// Same as [`find_config_file`], starting at `start`.
pub fn find_config_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_walks_upward() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("wwwroot/spa1/assets");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("spa-host.toml"), "").unwrap();

        let found = find_config_from(&nested, Path::new("spa-host.toml")).unwrap();
        assert_eq!(found, dir.path().join("spa-host.toml"));
    }

    #[test]
    fn test_find_config_prefers_nearest() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("site");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("spa-host.toml"), "").unwrap();
        fs::write(nested.join("spa-host.toml"), "").unwrap();

        let found = find_config_from(&nested, Path::new("spa-host.toml")).unwrap();
        assert_eq!(found, nested.join("spa-host.toml"));
    }

    #[test]
    fn test_find_config_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert!(find_config_from(dir.path(), &path).is_none());

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_from(Path::new("/"), &path), Some(path));
    }

    #[test]
    fn test_find_config_ignores_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("spa-host.toml")).unwrap();
        let found = find_config_from(dir.path(), Path::new("spa-host.toml"));
        assert!(found.is_none_or(|p| p != dir.path().join("spa-host.toml")));
    }
}
