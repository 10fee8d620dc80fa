//! Container build file generation
//!
//! The build file is entirely derived: a warning header, the template copied
//! verbatim, then a final stage that copies in the fetched helper binaries
//! and one binary per name. It is regenerated in full on every run.

use crate::settings::{Settings, GENERATOR};
use crate::update::FileUpdate;

/// Regenerate the build file, comparing against its `existing` content
/// (`None` when the file does not exist yet).
pub fn update(
    template: &str,
    existing: Option<&str>,
    names: &[String],
    settings: &Settings,
) -> FileUpdate {
    FileUpdate::new(
        settings.build_file_path(),
        existing,
        render(template, names, settings),
    )
}

/// Render the build file for `names` from the template content.
///
/// Trailing whitespace is stripped from every template line. Every output
/// line, including the last, ends with `\n`.
pub fn render(template: &str, names: &[String], settings: &Settings) -> String {
    let image = &settings.image;
    let install_dir = image.install_dir.trim_end_matches('/');
    let fetcher_dir = image.fetcher_dir.trim_end_matches('/');

    let mut lines: Vec<String> = vec![
        "# DO NOT EDIT BY HAND!".to_string(),
        format!("# Auto-generated by {}", GENERATOR),
        String::new(),
    ];

    lines.extend(template.lines().map(|line| line.trim_end().to_string()));

    lines.push(String::new());
    lines.push(format!("FROM {} AS final", image.base_image));
    lines.push("ARG TARGETPLATFORM".to_string());

    for binary in &image.fetched_binaries {
        lines.push(format!(
            "COPY --from={} {}/{} {}/{}",
            image.fetcher_stage, fetcher_dir, binary, install_dir, binary
        ));
    }

    // Release tooling lays out artifacts as <os>/<arch>/<binary> per platform.
    for name in names {
        lines.push(format!("COPY $TARGETPLATFORM/{} {}/{}", name, install_dir, name));
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_render_full_output() {
        let settings = Settings::default();
        let rendered = render("FROM base\nRUN install-fetcher\n", &names(&["foo"]), &settings);

        insta::assert_snapshot!(rendered, @r"
        # DO NOT EDIT BY HAND!
        # Auto-generated by update-configs

        FROM base
        RUN install-fetcher

        FROM quay.io/fedora/fedora:43 AS final
        ARG TARGETPLATFORM
        COPY --from=fetcher /oc/oc /usr/local/bin/oc
        COPY --from=fetcher /oc/kubectl /usr/local/bin/kubectl
        COPY $TARGETPLATFORM/foo /usr/local/bin/foo
        ");
    }

    #[test]
    fn test_render_ends_with_copy_for_each_name() {
        let settings = Settings::default();
        let rendered = render("FROM base", &names(&["bar", "foo"]), &settings);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            &lines[lines.len() - 2..],
            &[
                "COPY $TARGETPLATFORM/bar /usr/local/bin/bar",
                "COPY $TARGETPLATFORM/foo /usr/local/bin/foo"
            ]
        );
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn test_render_strips_trailing_whitespace_from_template() {
        let settings = Settings::default();
        let rendered = render("FROM base   \r\nRUN x\t\n", &[], &settings);
        assert!(rendered.contains("\nFROM base\nRUN x\n"));
    }

    #[test]
    fn test_render_without_names_keeps_fixed_stage() {
        let settings = Settings::default();
        let rendered = render("", &[], &settings);
        assert!(rendered.starts_with("# DO NOT EDIT BY HAND!\n"));
        assert!(rendered.ends_with("COPY --from=fetcher /oc/kubectl /usr/local/bin/kubectl\n"));
        assert!(!rendered.contains("$TARGETPLATFORM/"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let settings = Settings::default();
        let list = names(&["a", "b"]);
        assert_eq!(render("FROM x", &list, &settings), render("FROM x", &list, &settings));
    }

    #[test]
    fn test_render_uses_image_settings() {
        let mut settings = Settings::default();
        settings.image.base_image = "alpine:3".to_string();
        settings.image.fetched_binaries = vec!["jq".to_string()];
        settings.image.fetcher_dir = "/tools/".to_string();
        settings.image.install_dir = "/opt/bin".to_string();

        let rendered = render("FROM base", &names(&["foo"]), &settings);
        assert!(rendered.contains("FROM alpine:3 AS final\n"));
        assert!(rendered.contains("COPY --from=fetcher /tools/jq /opt/bin/jq\n"));
        assert!(rendered.contains("COPY $TARGETPLATFORM/foo /opt/bin/foo\n"));
        assert!(!rendered.contains("kubectl"));
    }

    #[test]
    fn test_update_compares_with_existing_file() {
        let settings = Settings::default();
        let list = names(&["foo"]);
        let rendered = render("FROM base", &list, &settings);

        let missing = update("FROM base", None, &list, &settings);
        assert!(missing.changed);
        assert_eq!(missing.content, rendered);
        assert_eq!(missing.path, settings.build_file_path());

        let current = update("FROM base", Some(rendered.as_str()), &list, &settings);
        assert!(!current.changed);

        let stale = update("FROM base", Some(rendered.as_str()), &names(&["bar", "foo"]), &settings);
        assert!(stale.changed);
    }
}
