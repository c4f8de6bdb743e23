/// Returns the trimmed body of the `## [version] - date` section.
///
/// The section ends at the next `## [` heading, the `[Unreleased]:` link
/// line or the end of the text. A missing or empty section yields `Release v<version>`.
#[must_use]
pub fn extract_release_notes(changelog: &str, version: &str) -> String {
    let fallback = || format!("Release v{version}");
    let heading = format!("## [{version}]");

    let mut lines = changelog.lines();
    let found = lines.by_ref().any(|line| {
        line.strip_prefix(&heading)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(" - "))
    });
    if !found {
        return fallback();
    }

    let body: Vec<&str> = lines
        .take_while(|line| !is_section_boundary(line))
        .collect();
    let notes = body.join("\n");
    let notes = notes.trim();

    if notes.is_empty() {
        fallback()
    } else {
        notes.to_string()
    }
}

/// Lines that close a version section: the next heading or the
/// `[Unreleased]:` link that starts the reference block.
pub(crate) fn is_section_boundary(line: &str) -> bool {
    line.starts_with("## [") || line.starts_with("[Unreleased]:")
}
