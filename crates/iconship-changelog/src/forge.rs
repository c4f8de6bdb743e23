use url::Url;

use crate::error::ChangelogError;

/// Code-hosting flavour, which decides the shape of comparison links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forge {
    GitHub,
    GitLab,
    Gitea,
    Bitbucket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub forge: Forge,
    pub owner: String,
    pub repo: String,
    pub base_url: Url,
}

impl RepositoryInfo {
    /// # Errors
    ///
    /// Returns `ChangelogError::UrlParse` if the URL is invalid and
    /// `ChangelogError::InvalidRepositoryPath` if it lacks an owner/repo path.
    pub fn from_url(url_str: &str) -> Result<Self, ChangelogError> {
        let url = Url::parse(url_str).map_err(|source| ChangelogError::UrlParse {
            url: url_str.to_string(),
            source,
        })?;

        let host = url.host_str().ok_or_else(|| ChangelogError::UrlParse {
            url: url_str.to_string(),
            source: url::ParseError::EmptyHost,
        })?;

        let forge = detect_forge(host);
        let (owner, repo) = owner_and_repo(&url)?;

        let base_url = Url::parse(&format!("https://{host}")).map_err(|source| {
            ChangelogError::UrlParse {
                url: url_str.to_string(),
                source,
            }
        })?;

        Ok(Self {
            forge,
            owner,
            repo,
            base_url,
        })
    }

    /// Accepts the forms npm allows in a manifest `repository` field:
    /// `git+https://…/repo.git`, `git@host:owner/repo.git`, `github:owner/repo`
    /// and bare `owner/repo` GitHub shorthand.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalised URL cannot be parsed.
    pub fn from_package_repository(raw: &str) -> Result<Self, ChangelogError> {
        Self::from_url(&normalize_repository_url(raw))
    }

    #[must_use]
    pub fn web_url(&self) -> String {
        format!("{}{}/{}", self.base_url, self.owner, self.repo)
    }

    #[must_use]
    pub fn comparison_url(&self, base: &str, target: &str) -> String {
        let web = self.web_url();
        match self.forge {
            Forge::GitHub | Forge::Gitea => format!("{web}/compare/{base}...{target}"),
            Forge::GitLab => format!("{web}/-/compare/{base}...{target}"),
            Forge::Bitbucket => format!("{web}/branches/compare/{target}..{base}"),
        }
    }

    /// Link for a first release, which has nothing to compare against.
    #[must_use]
    pub fn tag_url(&self, tag: &str) -> String {
        let web = self.web_url();
        match self.forge {
            Forge::GitHub | Forge::Gitea => format!("{web}/releases/tag/{tag}"),
            Forge::GitLab => format!("{web}/-/tags/{tag}"),
            Forge::Bitbucket => format!("{web}/commits/tag/{tag}"),
        }
    }
}

fn normalize_repository_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_prefix = trimmed.strip_prefix("git+").unwrap_or(trimmed);
    let without_suffix = without_prefix
        .strip_suffix(".git")
        .unwrap_or(without_prefix);

    if let Some(rest) = without_suffix.strip_prefix("github:") {
        return format!("https://github.com/{rest}");
    }

    if let Some(rest) = without_suffix.strip_prefix("git@") {
        if let Some((host, path)) = rest.split_once(':') {
            return format!("https://{host}/{path}");
        }
    }

    if let Some(rest) = without_suffix.strip_prefix("ssh://git@") {
        return format!("https://{rest}");
    }

    if let Some(rest) = without_suffix.strip_prefix("git://") {
        return format!("https://{rest}");
    }

    if !without_suffix.contains("://") && without_suffix.matches('/').count() == 1 {
        return format!("https://github.com/{without_suffix}");
    }

    without_suffix.to_string()
}

fn detect_forge(host: &str) -> Forge {
    let host = host.to_lowercase();

    if host == "gitlab.com" || host.starts_with("gitlab.") || host.contains(".gitlab.") {
        Forge::GitLab
    } else if host == "codeberg.org" || host.starts_with("gitea.") {
        Forge::Gitea
    } else if host == "bitbucket.org" {
        Forge::Bitbucket
    } else {
        Forge::GitHub
    }
}

fn owner_and_repo(url: &Url) -> Result<(String, String), ChangelogError> {
    let path = url.path().trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some(owner), Some(repo)) => Ok((owner.to_string(), repo.to_string())),
        _ => Err(ChangelogError::InvalidRepositoryPath {
            url: url.to_string(),
        }),
    }
}
