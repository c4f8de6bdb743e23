use iconship_core::tag_name;
use iconship_project::ReleaseConfig;

use crate::types::{ReleaseMode, ReleaseState};

const VERSION_PLACEHOLDER: &str = "<version>";

/// Numbered next steps for an operator after a release stopped part way.
///
/// Nothing is rolled back, so the guide only lists what is still missing
/// given the flags in `state`.
#[must_use]
pub fn recovery_guide(state: &ReleaseState, config: &ReleaseConfig) -> Vec<String> {
    let tag = state.new_version.as_ref().map_or_else(
        || format!("{}{VERSION_PLACEHOLDER}", config.tag_prefix),
        |v| tag_name(&config.tag_prefix, v),
    );
    let build = config.build_command.join(" ");
    let publish = config.publish_command.join(" ");
    let remote = &config.remote;
    let branch = &config.main_branch;

    let steps: Vec<String> = match state.mode {
        ReleaseMode::Ci => vec![
            format!("Confirm {branch} branch and authentication: gh auth status / npm whoami"),
            format!(
                "Check duplicates: git tag --list {tag}, gh release view {tag}, npm view <package> version"
            ),
            "If duplicate publish already happened, skip rerun and verify package contents on the registry.".to_string(),
            "Otherwise fix the cause and rerun: iconship release --ci".to_string(),
        ],
        ReleaseMode::Prepare if !state.version_bumped => {
            vec!["Fix the issue and rerun: iconship prepare --type=<patch|minor|major|auto>".to_string()]
        }
        ReleaseMode::Prepare => vec![
            "Review changed files: git status --short".to_string(),
            format!("Finish the changelog for {tag} by hand, or discard the changes and rerun: iconship prepare"),
        ],
        ReleaseMode::Local if !state.version_bumped => vec![
            "Fix preflight issue and rerun: iconship release --type=<patch|minor|major|auto>".to_string(),
        ],
        ReleaseMode::Local if !state.commit_created => vec![
            "Review changed files: git status --short".to_string(),
            format!("Build artifacts: {build}"),
            format!("Commit release changes manually: git add -A && git commit -m \"release: {tag}\""),
            format!("Continue manually: git tag {tag} && git push {remote} {branch} && git push {remote} {tag}"),
            format!(
                "Create hosted release and publish: gh release create {tag} --title {tag} --notes \"<notes>\" && {publish}"
            ),
        ],
        ReleaseMode::Local => {
            let mut steps = vec!["Review changed files: git status --short".to_string()];
            if !state.tag_created {
                steps.push(format!("Create tag manually: git tag {tag}"));
            }
            if !state.pushed {
                steps.push(format!(
                    "Push release branch/tag: git push {remote} {branch} && git push {remote} {tag}"
                ));
            }
            if !state.hosted_release_created {
                steps.push(format!(
                    "Create hosted release: gh release create {tag} --title {tag} --notes \"<notes>\""
                ));
            }
            if !state.packages_published {
                steps.push(format!("Publish packages: {publish}"));
            }
            steps
        }
    };

    steps
        .into_iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use iconship_core::ReleaseType;
    use semver::Version;

    use super::*;

    fn local_state() -> ReleaseState {
        let mut state = ReleaseState::new(ReleaseMode::Local, ReleaseType::Auto, false);
        state.new_version = Some(Version::new(1, 2, 0));
        state
    }

    #[test]
    fn failure_before_bump_only_asks_for_rerun() {
        let mut state = local_state();
        state.new_version = None;

        let guide = recovery_guide(&state, &ReleaseConfig::default());

        assert_eq!(guide.len(), 1);
        assert!(guide[0].starts_with("1. Fix preflight issue and rerun"));
    }

    #[test]
    fn failure_before_commit_lists_full_manual_path() {
        let mut state = local_state();
        state.version_bumped = true;
        state.changelog_updated = true;

        let guide = recovery_guide(&state, &ReleaseConfig::default());

        assert_eq!(guide.len(), 5);
        assert!(guide[2].contains("git commit -m \"release: v1.2.0\""));
        assert!(guide[3].contains("git push origin main && git push origin v1.2.0"));
    }

    #[test]
    fn failure_after_tag_lists_only_missing_steps() {
        let mut state = local_state();
        state.version_bumped = true;
        state.commit_created = true;
        state.tag_created = true;

        let guide = recovery_guide(&state, &ReleaseConfig::default());

        assert_eq!(guide, vec![
            "1. Review changed files: git status --short".to_string(),
            "2. Push release branch/tag: git push origin main && git push origin v1.2.0".to_string(),
            "3. Create hosted release: gh release create v1.2.0 --title v1.2.0 --notes \"<notes>\"".to_string(),
            "4. Publish packages: pnpm run publish-packages".to_string(),
        ]);
    }

    #[test]
    fn ci_guide_is_fixed_and_names_the_tag() {
        let mut state = local_state();
        state.mode = ReleaseMode::Ci;

        let guide = recovery_guide(&state, &ReleaseConfig::default());

        assert_eq!(guide.len(), 4);
        assert!(guide[1].contains("git tag --list v1.2.0"));
        assert!(guide[3].ends_with("iconship release --ci"));
    }

    #[test]
    fn unknown_version_uses_placeholder() {
        let mut state = local_state();
        state.mode = ReleaseMode::Ci;
        state.new_version = None;

        let guide = recovery_guide(&state, &ReleaseConfig::default());

        assert!(guide[1].contains("gh release view v<version>"));
    }
}
