use iconship_core::tag_name;
use iconship_project::IconProject;
use semver::Version;
use tracing::debug;

use crate::traits::{GitProvider, HostingProvider, RegistryProvider};
use crate::{OperationError, Result};

/// Duplicate-release checks that must all pass before anything is published.
pub struct ReleaseGuard<'a> {
    project: &'a IconProject,
    git: &'a dyn GitProvider,
    hosting: &'a dyn HostingProvider,
    registry: &'a dyn RegistryProvider,
}

impl<'a> ReleaseGuard<'a> {
    #[must_use]
    pub fn new(
        project: &'a IconProject,
        git: &'a dyn GitProvider,
        hosting: &'a dyn HostingProvider,
        registry: &'a dyn RegistryProvider,
    ) -> Self {
        Self {
            project,
            git,
            hosting,
            registry,
        }
    }

    /// # Errors
    ///
    /// Returns `OperationError::LocalTagExists` if the tag is already present.
    pub fn check_local_tag(&self, tag: &str) -> Result<()> {
        if self.git.local_tag_exists(&self.project.root, tag)? {
            return Err(OperationError::LocalTagExists {
                tag: tag.to_string(),
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `OperationError::RemoteTagExists` if the remote has the tag.
    pub fn check_remote_tag(&self, tag: &str) -> Result<()> {
        let remote = &self.project.config.remote;
        if self.git.remote_tag_exists(&self.project.root, remote, tag)? {
            return Err(OperationError::RemoteTagExists {
                tag: tag.to_string(),
                remote: remote.clone(),
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `OperationError::HostedReleaseExists` if a release is already
    /// attached to the tag, or the hosting error if the query is inconclusive.
    pub fn check_hosted_release(&self, tag: &str) -> Result<()> {
        if self.hosting.release_exists(&self.project.root, tag)? {
            return Err(OperationError::HostedReleaseExists {
                tag: tag.to_string(),
            });
        }
        Ok(())
    }

    /// Queries every publishable package and reports all that already ship
    /// `version` together.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::AlreadyPublished` naming every offending
    /// package, or the first registry query failure.
    pub fn check_registry(&self, version: &Version) -> Result<()> {
        let target = version.to_string();
        let mut published = Vec::new();

        for package in self.project.publishable_packages() {
            let current = self
                .registry
                .published_version(&self.project.root, &package.name)?;
            debug!(package = %package.name, published = ?current, "queried registry");
            if current.as_deref() == Some(target.as_str()) {
                published.push(package.name.clone());
            }
        }

        if published.is_empty() {
            Ok(())
        } else {
            Err(OperationError::AlreadyPublished {
                version: target,
                packages: published,
            })
        }
    }

    /// Runs every check in order, stopping at the first collision.
    ///
    /// # Errors
    ///
    /// Returns the first failing check's error.
    pub fn assert_all(&self, version: &Version) -> Result<()> {
        let tag = tag_name(&self.project.config.tag_prefix, version);
        self.check_local_tag(&tag)?;
        self.check_remote_tag(&tag)?;
        self.check_hosted_release(&tag)?;
        self.check_registry(version)
    }
}
