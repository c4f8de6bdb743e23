use std::path::{Path, PathBuf};

use iconship_core::PackageInfo;
use iconship_manifest::read_manifest;
use tracing::debug;

use crate::CONFIG_FILE;
use crate::config::{ReleaseConfig, load_config};
use crate::error::ProjectError;

const ROOT_MANIFEST: &str = "package.json";

/// A discovered icon monorepo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconProject {
    pub root: PathBuf,
    pub config: ReleaseConfig,
    /// Every `packages/*/package.json`, ordered by directory name.
    pub manifests: Vec<PathBuf>,
    /// Manifests that declare a name, in the same order.
    pub packages: Vec<PackageInfo>,
}

impl IconProject {
    /// Non-private named packages, sorted by name.
    #[must_use]
    pub fn publishable_packages(&self) -> Vec<&PackageInfo> {
        let mut publishable: Vec<&PackageInfo> =
            self.packages.iter().filter(|p| !p.private).collect();
        publishable.sort_by(|a, b| a.name.cmp(&b.name));
        publishable
    }

    #[must_use]
    pub fn root_manifest(&self) -> PathBuf {
        self.root.join(ROOT_MANIFEST)
    }

    #[must_use]
    pub fn changelog_path(&self) -> PathBuf {
        self.root.join(&self.config.changelog)
    }

    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.root.join(&self.config.history)
    }

    #[must_use]
    pub fn history_mirror_path(&self) -> Option<PathBuf> {
        self.config.history_mirror.as_ref().map(|p| self.root.join(p))
    }

    #[must_use]
    pub fn version_source_path(&self) -> PathBuf {
        self.root.join(&self.config.version_source)
    }

    /// `repository` field of the root `package.json`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the root manifest exists but cannot be parsed.
    pub fn repository_url(&self) -> Result<Option<String>, ProjectError> {
        let path = self.root_manifest();
        if !path.exists() {
            return Ok(None);
        }
        Ok(read_manifest(&path)?.repository_url)
    }
}

/// Walks upward from `start_dir` to the repository root.
///
/// The root is the first directory holding `release.toml`, or failing that the
/// first directory holding a `package.json` next to a `packages/` directory.
///
/// # Errors
///
/// Returns `ProjectError::NotFound` if no root exists above `start_dir`, or
/// an error if the configuration or a package manifest cannot be read.
pub fn discover_project(start_dir: &Path) -> Result<IconProject, ProjectError> {
    let start = start_dir
        .canonicalize()
        .map_err(|source| ProjectError::Io {
            path: start_dir.to_path_buf(),
            source,
        })?;

    let root = find_root(&start).ok_or_else(|| ProjectError::NotFound {
        start_dir: start_dir.to_path_buf(),
    })?;
    let config = load_config(&root)?;
    let manifests = collect_manifests(&root.join(&config.packages_dir))?;

    let mut packages = Vec::new();
    for manifest_path in &manifests {
        let manifest = read_manifest(manifest_path)?;
        if let Some(name) = manifest.name {
            packages.push(PackageInfo {
                name,
                manifest_path: manifest_path.clone(),
                private: manifest.private,
            });
        }
    }

    debug!(
        root = %root.display(),
        manifests = manifests.len(),
        packages = packages.len(),
        "discovered project"
    );

    Ok(IconProject {
        root,
        config,
        manifests,
        packages,
    })
}

fn find_root(start: &Path) -> Option<PathBuf> {
    let mut fallback = None;

    for dir in start.ancestors() {
        if dir.join(CONFIG_FILE).is_file() {
            return Some(dir.to_path_buf());
        }
        let default_packages = ReleaseConfig::default().packages_dir;
        if fallback.is_none()
            && dir.join(ROOT_MANIFEST).is_file()
            && dir.join(default_packages).is_dir()
        {
            fallback = Some(dir.to_path_buf());
        }
    }

    fallback
}

fn collect_manifests(packages_dir: &Path) -> Result<Vec<PathBuf>, ProjectError> {
    if !packages_dir.is_dir() {
        return Ok(Vec::new());
    }

    let to_io_error = |source| ProjectError::Io {
        path: packages_dir.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(packages_dir).map_err(to_io_error)? {
        let entry = entry.map_err(to_io_error)?;
        if entry.file_type().map_err(to_io_error)?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();

    Ok(dirs
        .into_iter()
        .map(|dir| dir.join(ROOT_MANIFEST))
        .filter(|path| path.is_file())
        .collect())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_package(root: &Path, dir: &str, manifest: &str) -> anyhow::Result<()> {
        let path = root.join("packages").join(dir);
        fs::create_dir_all(&path)?;
        fs::write(path.join("package.json"), manifest)?;
        Ok(())
    }

    fn setup_monorepo() -> anyhow::Result<TempDir> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("package.json"),
            r#"{ "name": "icons-root", "private": true, "repository": { "type": "git", "url": "git+https://github.com/acme/icons.git" } }"#,
        )?;
        write_package(dir.path(), "vue", r#"{ "name": "@acme/icons-vue", "version": "1.0.0" }"#)?;
        write_package(dir.path(), "react", r#"{ "name": "@acme/icons-react", "version": "1.0.0" }"#)?;
        write_package(
            dir.path(),
            "metadata",
            r#"{ "name": "@acme/icons-metadata", "version": "1.0.0", "private": true }"#,
        )?;
        write_package(dir.path(), "scratch", r#"{ "version": "1.0.0" }"#)?;
        fs::create_dir_all(dir.path().join("packages/empty"))?;
        Ok(dir)
    }

    #[test]
    fn discovers_root_from_nested_directory() -> anyhow::Result<()> {
        let dir = setup_monorepo()?;

        let project = discover_project(&dir.path().join("packages/vue"))?;

        assert_eq!(project.root, dir.path().canonicalize()?);
        Ok(())
    }

    #[test]
    fn manifests_are_sorted_by_directory() -> anyhow::Result<()> {
        let dir = setup_monorepo()?;

        let project = discover_project(dir.path())?;

        let names: Vec<_> = project
            .manifests
            .iter()
            .filter_map(|p| p.parent()?.file_name()?.to_str())
            .collect();
        assert_eq!(names, vec!["metadata", "react", "scratch", "vue"]);
        Ok(())
    }

    #[test]
    fn publishable_excludes_private_and_unnamed() -> anyhow::Result<()> {
        let dir = setup_monorepo()?;

        let project = discover_project(dir.path())?;

        let names: Vec<_> = project
            .publishable_packages()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["@acme/icons-react", "@acme/icons-vue"]);
        Ok(())
    }

    #[test]
    fn release_toml_marks_root_and_configures_layout() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("release.toml"), "packages_dir = \"libs\"\n")?;
        fs::create_dir_all(dir.path().join("libs/core"))?;
        fs::write(
            dir.path().join("libs/core/package.json"),
            r#"{ "name": "core", "version": "0.1.0" }"#,
        )?;

        let project = discover_project(&dir.path().join("libs"))?;

        assert_eq!(project.config.packages_dir, PathBuf::from("libs"));
        assert_eq!(project.packages.len(), 1);
        Ok(())
    }

    #[test]
    fn repository_url_comes_from_root_manifest() -> anyhow::Result<()> {
        let dir = setup_monorepo()?;

        let project = discover_project(dir.path())?;

        assert_eq!(
            project.repository_url()?.as_deref(),
            Some("git+https://github.com/acme/icons.git")
        );
        Ok(())
    }

    #[test]
    fn missing_root_is_not_found() {
        let dir = TempDir::new().expect("temp dir");

        let result = discover_project(dir.path());

        assert!(matches!(result, Err(ProjectError::NotFound { .. })));
    }
}
