//! Config file discovery.
//!
//! Paths with a directory component are first tried as given. Relative names are
//! then joined onto each search root in order. Bare names get the conventional
//! extensions appended.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use super::ConfigError;

/// Extensions recognised as config files, in the order they are tried.
pub const EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Finds config files by name across an ordered list of directories.
#[derive(Debug, Clone)]
pub struct Locator {
    roots: Vec<PathBuf>,
    ascend: bool,
}

impl Default for Locator {
    /// Searches the working directory, then the directory holding the running executable.
    fn default() -> Self {
        let roots = [
            std::env::current_dir().ok(),
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf)),
        ];
        Self::new(roots.into_iter().flatten())
    }
}

impl Locator {
    /// Creates a locator that searches `roots` in the given order.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            ascend: false,
        }
    }

    /// Also search every ancestor of each root, nearest first.
    #[must_use]
    pub fn ascend(mut self, ascend: bool) -> Self {
        self.ascend = ascend;
        self
    }

    /// Appends a search root after the existing ones.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Returns the search roots in the order they are tried.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Resolves `name_or_path` to an existing config file.
    ///
    /// Returns `Ok(None)` when no candidate exists anywhere. Only unexpected
    /// filesystem failures (permissions and the like) are errors.
    pub fn find(&self, name_or_path: &str) -> Result<Option<PathBuf>, ConfigError> {
        let names = candidate_names(name_or_path);
        let given = Path::new(name_or_path);

        // Explicit paths are probed as given; bare names only go through the roots.
        if given.is_absolute() || given.components().count() > 1 {
            for name in &names {
                if is_config_file(Path::new(name))? {
                    tracing::debug!(path = %name, "located config file as given");
                    return Ok(Some(PathBuf::from(name)));
                }
            }
        }

        if given.is_absolute() {
            return Ok(None);
        }

        let mut checked = HashSet::new();
        for root in &self.roots {
            for dir in self.directories(root) {
                if !checked.insert(dir.to_path_buf()) {
                    continue;
                }
                for name in &names {
                    let candidate = dir.join(name);
                    if is_config_file(&candidate)? {
                        tracing::debug!(path = %candidate.display(), "located config file");
                        return Ok(Some(candidate));
                    }
                }
            }
        }

        tracing::debug!(name = name_or_path, "no config file found");
        Ok(None)
    }

    fn directories<'a>(&self, root: &'a Path) -> Box<dyn Iterator<Item = &'a Path> + 'a> {
        if self.ascend {
            Box::new(root.ancestors())
        } else {
            Box::new(std::iter::once(root))
        }
    }
}

/// Finds `name_or_path` with the default [`Locator`].
pub fn find(name_or_path: &str) -> Result<Option<PathBuf>, ConfigError> {
    Locator::default().find(name_or_path)
}

/// Returns the file names to try for `name`: as given when it already carries a
/// recognised extension, otherwise once per extension.
pub fn candidate_names(name: &str) -> Vec<String> {
    if has_config_extension(name) {
        vec![name.to_string()]
    } else {
        EXTENSIONS.iter().map(|ext| format!("{name}.{ext}")).collect()
    }
}

fn has_config_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

fn is_config_file(path: &Path) -> Result<bool, ConfigError> {
    tracing::trace!(path = %path.display(), "probing");
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(false)
        }
        Err(e) => Err(ConfigError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "session: test\n").unwrap();
        path
    }

    #[test]
    fn test_candidate_names_bare() {
        assert_eq!(candidate_names("config"), vec!["config.yaml", "config.yml"]);
    }

    #[test]
    fn test_candidate_names_with_extension() {
        assert_eq!(candidate_names("config.yaml"), vec!["config.yaml"]);
        assert_eq!(candidate_names("config.YML"), vec!["config.YML"]);
    }

    #[test]
    fn test_candidate_names_foreign_extension() {
        assert_eq!(
            candidate_names("config.local"),
            vec!["config.local.yaml", "config.local.yml"]
        );
    }

    #[test]
    fn test_find_name_without_extension() {
        let dir = TempDir::new().unwrap();
        let expected = touch(dir.path(), "settings.yaml");

        let found = Locator::new([dir.path()]).find("settings").unwrap();
        assert_eq!(found, Some(expected));
    }

    #[test]
    fn test_find_name_with_extension() {
        let dir = TempDir::new().unwrap();
        let expected = touch(dir.path(), "settings.yaml");

        let found = Locator::new([dir.path()]).find("settings.yaml").unwrap();
        assert_eq!(found, Some(expected));
    }

    #[test]
    fn test_find_falls_back_to_yml() {
        let dir = TempDir::new().unwrap();
        let expected = touch(dir.path(), "settings.yml");

        let found = Locator::new([dir.path()]).find("settings").unwrap();
        assert_eq!(found, Some(expected));
    }

    #[test]
    fn test_find_prefers_yaml_over_yml() {
        let dir = TempDir::new().unwrap();
        let expected = touch(dir.path(), "settings.yaml");
        touch(dir.path(), "settings.yml");

        let found = Locator::new([dir.path()]).find("settings").unwrap();
        assert_eq!(found, Some(expected));
    }

    #[test]
    fn test_find_absolute_path() {
        let dir = TempDir::new().unwrap();
        let expected = touch(dir.path(), "explicit.yaml");

        let found = Locator::new(Vec::<PathBuf>::new())
            .find(expected.to_str().unwrap())
            .unwrap();
        assert_eq!(found, Some(expected));
    }

    #[test]
    fn test_find_absolute_path_without_extension() {
        let dir = TempDir::new().unwrap();
        let expected = touch(dir.path(), "explicit.yaml");
        let bare = dir.path().join("explicit");

        let found = Locator::new(Vec::<PathBuf>::new())
            .find(bare.to_str().unwrap())
            .unwrap();
        assert_eq!(found, Some(expected));
    }

    #[test]
    fn test_find_relative_path_under_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("conf")).unwrap();
        let expected = touch(&dir.path().join("conf"), "app.yaml");

        let found = Locator::new([dir.path()]).find("conf/app").unwrap();
        assert_eq!(found, Some(expected));
    }

    #[test]
    fn test_find_respects_root_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let expected = touch(first.path(), "config.yaml");
        touch(second.path(), "config.yaml");

        let found = Locator::new([first.path(), second.path()])
            .find("config")
            .unwrap();
        assert_eq!(found, Some(expected));
    }

    #[test]
    fn test_find_later_root() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let expected = touch(second.path(), "config.yaml");

        let found = Locator::new([first.path()])
            .with_root(second.path())
            .find("config")
            .unwrap();
        assert_eq!(found, Some(expected));
    }

    #[test]
    fn test_find_missing_returns_none() {
        let dir = TempDir::new().unwrap();

        for name in ["config", "nothing_here.yaml", "nested/missing"] {
            let found = Locator::new([dir.path()]).find(name).unwrap();
            assert_eq!(found, None, "name {name:?}");
        }
    }

    #[test]
    fn test_find_bare_name_ignores_working_directory() {
        let name = "locate_cwd_shadow_check";
        let in_cwd = std::env::current_dir().unwrap().join(format!("{name}.yaml"));
        fs::write(&in_cwd, "session: from_cwd\n").unwrap();

        let dir = TempDir::new().unwrap();
        let expected = dir.path().join(format!("{name}.yaml"));
        fs::write(&expected, "session: from_root\n").unwrap();

        let found = Locator::new([dir.path()]).find(name);
        let missing = Locator::new(Vec::<PathBuf>::new()).find(name);
        fs::remove_file(&in_cwd).unwrap();

        assert_eq!(found.unwrap(), Some(expected));
        assert_eq!(missing.unwrap(), None);
    }

    #[test]
    fn test_free_find_missing_returns_none() {
        assert_eq!(find("definitely_not_a_config_file_anywhere").unwrap(), None);
    }

    #[test]
    fn test_find_missing_absolute_returns_none() {
        let found = Locator::default()
            .find("/nonexistent/path/config.yaml")
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_find_through_a_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "plain");

        let found = Locator::new([dir.path()]).find("plain/config").unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_find_ignores_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("config.yaml")).unwrap();

        let found = Locator::new([dir.path()]).find("config").unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_find_ascends_to_parent() {
        let dir = TempDir::new().unwrap();
        let expected = touch(dir.path(), "ascend_marker.yaml");
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let flat = Locator::new([&nested]).find("ascend_marker").unwrap();
        assert_eq!(flat, None);

        let found = Locator::new([&nested])
            .ascend(true)
            .find("ascend_marker")
            .unwrap();
        assert_eq!(found, Some(expected));
    }
}
