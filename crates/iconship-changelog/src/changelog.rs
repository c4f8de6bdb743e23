use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use semver::Version;
use tracing::{debug, warn};

use crate::error::ChangelogError;
use crate::forge::RepositoryInfo;
use crate::notes::{extract_release_notes, is_section_boundary};

const UNRELEASED_HEADING: &str = "## [Unreleased]";
const UNRELEASED_LINK: &str = "[Unreleased]: ";

/// A Keep a Changelog document held in memory.
#[derive(Debug, Clone)]
pub struct Changelog {
    path: PathBuf,
    content: String,
}

/// Inputs for moving the Unreleased body into a dated release section.
#[derive(Debug, Clone)]
pub struct FinalizeRequest<'a> {
    pub version: &'a Version,
    /// Newest already-released version, `None` for a first release.
    pub previous: Option<&'a Version>,
    pub date: NaiveDate,
    pub tag_prefix: &'a str,
    pub repository: &'a RepositoryInfo,
}

impl Changelog {
    #[must_use]
    pub fn parse(content: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `ChangelogError::Read` if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self, ChangelogError> {
        let content = std::fs::read_to_string(path).map_err(|source| ChangelogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::parse(content, path))
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors
    ///
    /// Returns `ChangelogError::Write` if the file cannot be written.
    pub fn write_to_file(&self) -> Result<(), ChangelogError> {
        std::fs::write(&self.path, &self.content).map_err(|source| ChangelogError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "wrote changelog");
        Ok(())
    }

    /// Newest version that already has its own `## [X.Y.Z]` section.
    #[must_use]
    pub fn latest_released_version(&self) -> Option<Version> {
        self.content.lines().find_map(|line| {
            let rest = line.strip_prefix("## [")?;
            let (label, _) = rest.split_once(']')?;
            Version::parse(label).ok()
        })
    }

    #[must_use]
    pub fn release_notes(&self, version: &Version) -> String {
        extract_release_notes(&self.content, &version.to_string())
    }

    /// Moves the Unreleased body into a new `## [version] - date` section,
    /// leaves an empty Unreleased section on top and rewrites the comparison
    /// links. Returns the release notes for the new version.
    ///
    /// The document is only changed in memory; call [`Self::write_to_file`]
    /// to persist it. CRLF documents are written back with CRLF endings.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::MissingUnreleasedSection` if the document has
    /// no `## [Unreleased]` heading.
    pub fn finalize_unreleased(
        &mut self,
        request: &FinalizeRequest<'_>,
    ) -> Result<String, ChangelogError> {
        let newline = if self.content.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        };
        let mut lines: Vec<String> = self.content.lines().map(str::to_string).collect();

        let start = lines
            .iter()
            .position(|line| line.trim_end() == UNRELEASED_HEADING)
            .ok_or_else(|| ChangelogError::MissingUnreleasedSection {
                path: self.path.clone(),
            })?;

        let end = lines
            .iter()
            .enumerate()
            .skip(start + 1)
            .find(|(_, line)| is_section_boundary(line))
            .map_or(lines.len(), |(index, _)| index);

        let body = trim_blank_edges(&lines[start + 1..end]);

        let mut section = vec![
            UNRELEASED_HEADING.to_string(),
            String::new(),
            format!(
                "## [{}] - {}",
                request.version,
                request.date.format("%Y-%m-%d")
            ),
        ];
        if !body.is_empty() {
            section.push(String::new());
            section.extend(body);
        }
        section.push(String::new());
        lines.splice(start..end, section);

        rewrite_links(&mut lines, request);

        self.content = render(&lines, newline);
        Ok(self.release_notes(request.version))
    }
}

fn rewrite_links(lines: &mut Vec<String>, request: &FinalizeRequest<'_>) {
    let repo = request.repository;
    let new_tag = format!("{}{}", request.tag_prefix, request.version);

    let unreleased_line = format!("{UNRELEASED_LINK}{}", repo.comparison_url(&new_tag, "HEAD"));
    let release_target = match request.previous {
        Some(previous) => {
            repo.comparison_url(&format!("{}{previous}", request.tag_prefix), &new_tag)
        }
        None => repo.tag_url(&new_tag),
    };
    let release_line = format!("[{}]: {release_target}", request.version);

    let unreleased_index = if let Some(index) =
        lines.iter().position(|line| line.starts_with(UNRELEASED_LINK))
    {
        lines[index] = unreleased_line;
        index
    } else {
        warn!("changelog had no [Unreleased] link reference, appending one");
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        lines.push(String::new());
        lines.push(unreleased_line);
        lines.len() - 1
    };

    let release_prefix = format!("[{}]: ", request.version);
    match lines.iter().position(|line| line.starts_with(&release_prefix)) {
        Some(index) => lines[index] = release_line,
        None => lines.insert(unreleased_index + 1, release_line),
    }
}

fn trim_blank_edges(lines: &[String]) -> Vec<String> {
    let is_content = |line: &String| !line.trim().is_empty();
    let Some(first) = lines.iter().position(is_content) else {
        return Vec::new();
    };
    let last = lines.iter().rposition(is_content).unwrap_or(first);
    lines[first..=last].to_vec()
}

// Joins lines, keeps at most one blank line in a row and ends with a single newline.
fn render(lines: &[String], newline: &str) -> String {
    let mut out = String::new();
    let mut previous_blank = false;

    for line in lines {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push_str(line.trim_end_matches('\r'));
        out.push_str(newline);
        previous_blank = blank;
    }

    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out.push_str(newline);
    out
}
